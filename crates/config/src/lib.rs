use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Root of the engine configuration file.
///
/// Every section carries serde defaults, so an empty or partial YAML file
/// deserializes into a fully populated configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub engine: EngineInfo,
    #[serde(default)]
    pub strikes: StrikesConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineInfo {
    #[serde(default = "default_engine_name")]
    pub name: String,
    #[serde(default = "default_engine_version")]
    pub version: String,
}

impl Default for EngineInfo {
    fn default() -> Self {
        Self {
            name: default_engine_name(),
            version: default_engine_version(),
        }
    }
}

// ==================================================================================
// STRIKE GRID CONFIG
// ==================================================================================

/// Strike step per index symbol
/// Example YAML:
/// ```yaml
/// strikes:
///   default_step: 50
///   steps:
///     NIFTY: 50
///     BANKNIFTY: 100
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StrikesConfig {
    /// Step used for symbols without an explicit entry
    #[serde(default = "default_strike_step")]
    pub default_step: f64,
    /// Steps keyed by upper-case index symbol
    #[serde(default = "default_strike_steps")]
    pub steps: BTreeMap<String, f64>,
}

impl StrikesConfig {
    /// Strike step for `symbol`, falling back to `default_step`
    pub fn step_for(&self, symbol: &str) -> f64 {
        self.steps
            .get(&symbol.trim().to_uppercase())
            .copied()
            .unwrap_or(self.default_step)
    }
}

impl Default for StrikesConfig {
    fn default() -> Self {
        Self {
            default_step: default_strike_step(),
            steps: default_strike_steps(),
        }
    }
}

// ==================================================================================
// PRICING CONFIG
// ==================================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PricingConfig {
    /// Annual risk-free rate in percent
    #[serde(default = "default_risk_free_rate_pct")]
    pub risk_free_rate_pct: f64,
    /// Volatility used when a caller supplies none, in percent
    #[serde(default = "default_volatility_pct")]
    pub default_volatility_pct: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate_pct: default_risk_free_rate_pct(),
            default_volatility_pct: default_volatility_pct(),
        }
    }
}

// ==================================================================================
// OPTION CHAIN CONFIG
// ==================================================================================

/// Materiality band for OI-change trends.
///
/// Changes whose magnitude stays within the band are reported as stable.
/// Example YAML:
/// ```yaml
/// oi_trend_threshold:
///   type: percent
///   value: 2.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OiTrendThreshold {
    /// Fixed number of contracts
    Absolute(u64),
    /// Percentage of the side's total open interest
    Percent(f64),
}

impl OiTrendThreshold {
    /// Width of the stable band for a side holding `total_oi` contracts
    pub fn band(&self, total_oi: u64) -> f64 {
        match *self {
            OiTrendThreshold::Absolute(contracts) => contracts as f64,
            OiTrendThreshold::Percent(pct) => total_oi as f64 * pct / 100.0,
        }
    }
}

impl Default for OiTrendThreshold {
    fn default() -> Self {
        default_oi_trend_threshold()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChainConfig {
    #[serde(default = "default_oi_trend_threshold")]
    pub oi_trend_threshold: OiTrendThreshold,
    /// Runner-up OI, as a percentage of the maximum, at which a level turns weak
    #[serde(default = "default_strength_ratio_pct")]
    pub strength_ratio_pct: f64,
    /// Strikes kept on each side of ATM when windowing a chain
    #[serde(default = "default_window_strikes")]
    pub window_strikes: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            oi_trend_threshold: default_oi_trend_threshold(),
            strength_ratio_pct: default_strength_ratio_pct(),
            window_strikes: default_window_strikes(),
        }
    }
}

// ==================================================================================
// STRATEGY CONFIG
// ==================================================================================

/// Strike offsets used by strategy templates, in multiples of the strike step
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StrategyConfig {
    #[serde(default = "default_near_offset_steps")]
    pub near_offset_steps: u32,
    #[serde(default = "default_far_offset_steps")]
    pub far_offset_steps: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            near_offset_steps: default_near_offset_steps(),
            far_offset_steps: default_far_offset_steps(),
        }
    }
}
