//! Strategy request and candidate types

use common::{OptionType, Side, BROAD_INDEX_STRIKE_STEP};
use serde::{Deserialize, Serialize};

/// Directional view supplied by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outlook {
    Bullish,
    Bearish,
    Neutral,
}

impl Outlook {
    pub const ALL: [Outlook; 3] = [Outlook::Bullish, Outlook::Bearish, Outlook::Neutral];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bullish" | "bull" => Some(Self::Bullish),
            "bearish" | "bear" => Some(Self::Bearish),
            "neutral" | "sideways" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl std::str::FromStr for Outlook {
    type Err = common::Error;

    fn from_str(s: &str) -> common::Result<Self> {
        Self::parse(s).ok_or_else(|| common::Error::unknown("outlook", s, "bullish, bearish or neutral"))
    }
}

/// How much risk the user is willing to carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskAppetite {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskAppetite {
    pub const ALL: [RiskAppetite; 3] = [
        RiskAppetite::Conservative,
        RiskAppetite::Moderate,
        RiskAppetite::Aggressive,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "conservative" | "low" => Some(Self::Conservative),
            "moderate" | "medium" => Some(Self::Moderate),
            "aggressive" | "high" => Some(Self::Aggressive),
            _ => None,
        }
    }
}

impl std::str::FromStr for RiskAppetite {
    type Err = common::Error;

    fn from_str(s: &str) -> common::Result<Self> {
        Self::parse(s).ok_or_else(|| common::Error::unknown("risk appetite", s, "conservative, moderate or aggressive"))
    }
}

/// Risk label attached to a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLabel::Low => write!(f, "Low"),
            RiskLabel::Medium => write!(f, "Medium"),
            RiskLabel::High => write!(f, "High"),
            RiskLabel::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// One leg of a suggested strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyLeg {
    pub side: Side,
    pub option_type: OptionType,
    pub strike: f64,
    pub rationale: String,
    /// Theoretical premium per unit, when pricing inputs were supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_premium: Option<f64>,
}

impl StrategyLeg {
    pub fn new(side: Side, option_type: OptionType, strike: f64, rationale: impl Into<String>) -> Self {
        Self {
            side,
            option_type,
            strike,
            rationale: rationale.into(),
            estimated_premium: None,
        }
    }
}

impl std::fmt::Display for StrategyLeg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.side, self.strike, self.option_type)
    }
}

/// A suggested multi-leg strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyCandidate {
    pub name: String,
    pub legs: Vec<StrategyLeg>,
    pub max_profit: String,
    pub max_loss: String,
    pub win_rate_band: String,
    pub risk: RiskLabel,
    /// Fixed per template, 0-100
    pub confidence: u8,
    pub reasoning: String,
    /// Premium received minus premium paid; positive for a net credit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_premium: Option<f64>,
}

impl StrategyCandidate {
    pub fn is_credit(&self) -> bool {
        self.net_premium.is_some_and(|p| p > 0.0)
    }
}

/// Inputs for one suggestion round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyRequest {
    pub spot: f64,
    /// Falls back to spot rounded to the strike grid
    pub atm_strike: Option<f64>,
    /// Falls back to ATM minus the far offset
    pub support: Option<f64>,
    /// Falls back to ATM plus the far offset
    pub resistance: Option<f64>,
    pub outlook: Outlook,
    pub risk_appetite: RiskAppetite,
    pub strike_step: f64,
}

impl StrategyRequest {
    pub fn new(spot: f64, outlook: Outlook, risk_appetite: RiskAppetite) -> Self {
        Self {
            spot,
            atm_strike: None,
            support: None,
            resistance: None,
            outlook,
            risk_appetite,
            strike_step: BROAD_INDEX_STRIKE_STEP,
        }
    }

    pub fn with_levels(mut self, atm_strike: Option<f64>, support: Option<f64>, resistance: Option<f64>) -> Self {
        self.atm_strike = atm_strike;
        self.support = support;
        self.resistance = resistance;
        self
    }

    pub fn with_strike_step(mut self, strike_step: f64) -> Self {
        self.strike_step = strike_step;
        self
    }
}
