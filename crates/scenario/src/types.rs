//! Keys and records for the Chart-of-Accuracy tables

use serde::{Deserialize, Serialize};

/// Qualitative strength of a support or resistance level (COA 1.0 input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    /// OI is concentrated at a single strike
    Strong,
    /// A comparable OI concentration sits at a lower strike
    WeakTowardBottom,
    /// A comparable OI concentration sits at a higher strike
    WeakTowardTop,
}

impl Strength {
    pub const ALL: [Strength; 3] = [
        Strength::Strong,
        Strength::WeakTowardBottom,
        Strength::WeakTowardTop,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "strong" | "s" => Some(Self::Strong),
            "weak_toward_bottom" | "wtb" => Some(Self::WeakTowardBottom),
            "weak_toward_top" | "wtt" => Some(Self::WeakTowardTop),
            _ => None,
        }
    }
}

impl std::str::FromStr for Strength {
    type Err = common::Error;

    fn from_str(s: &str) -> common::Result<Self> {
        Self::parse(s).ok_or_else(|| common::Error::unknown("level strength", s, "strong, wtb or wtt"))
    }
}

/// Direction of open-interest change on one side of the chain (COA 2.0 input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OiTrend {
    Stable,
    Decreasing,
    Increasing,
}

impl OiTrend {
    pub const ALL: [OiTrend; 3] = [OiTrend::Stable, OiTrend::Decreasing, OiTrend::Increasing];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stable" | "flat" => Some(Self::Stable),
            "decreasing" | "down" => Some(Self::Decreasing),
            "increasing" | "up" => Some(Self::Increasing),
            _ => None,
        }
    }
}

impl std::str::FromStr for OiTrend {
    type Err = common::Error;

    fn from_str(s: &str) -> common::Result<Self> {
        Self::parse(s).ok_or_else(|| common::Error::unknown("OI trend", s, "stable, decreasing or increasing"))
    }
}

/// COA 1.0 key: strength of support and of resistance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioKey {
    pub support: Strength,
    pub resistance: Strength,
}

/// COA 2.0 key: OI trend of the call side and of the put side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioKey2 {
    pub call_oi_trend: OiTrend,
    pub put_oi_trend: OiTrend,
}

/// Directional bias a scenario implies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    MildlyBullish,
    RangeBound,
    MildlyBearish,
    Bearish,
    /// Conflicting signals
    Uncertain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// One fixed row of a COA table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub id: u8,
    pub name: &'static str,
    pub bias: Bias,
    pub risk: RiskLevel,
    /// `false` marks a deliberate "do not trade" signal
    pub tradable: bool,
    pub day_top: &'static str,
    pub day_bottom: &'static str,
    pub action: &'static str,
}

/// Action text reported when no table row matches
pub const INSUFFICIENT_DATA: &str = "Insufficient data";

/// Outcome of a table lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioMatch {
    Matched(&'static Scenario),
    /// No row matched; callers must not infer a bias
    NoMatch,
}

impl ScenarioMatch {
    pub fn scenario(&self) -> Option<&'static Scenario> {
        match self {
            ScenarioMatch::Matched(scenario) => Some(scenario),
            ScenarioMatch::NoMatch => None,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            ScenarioMatch::Matched(scenario) => scenario.action,
            ScenarioMatch::NoMatch => INSUFFICIENT_DATA,
        }
    }

    pub fn is_tradable(&self) -> bool {
        self.scenario().is_some_and(|s| s.tradable)
    }
}
