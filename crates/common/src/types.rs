//! Common types used across Optix
//!
//! This module provides the fundamental domain types shared by the pricer,
//! the option-chain aggregator and the strategy generator.

use serde::{Deserialize, Serialize};

/// Strike step for broad indices (NIFTY, FINNIFTY)
pub const BROAD_INDEX_STRIKE_STEP: f64 = 50.0;

/// Strike step for high-priced indices (BANKNIFTY, SENSEX, BANKEX)
pub const PREMIUM_INDEX_STRIKE_STEP: f64 = 100.0;

const PREMIUM_INDICES: &[&str] = &["BANKNIFTY", "SENSEX", "BANKEX"];

/// Trade direction of an option leg (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy (long) the option
    Buy,
    /// Sell (write) the option
    Sell,
}

impl Side {
    /// Returns true if this is a buy leg
    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }

    /// Returns true if this is a sell leg
    pub fn is_sell(&self) -> bool {
        matches!(self, Side::Sell)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// Option type, using the exchange's CE/PE naming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Call (European call)
    #[serde(rename = "CE", alias = "ce", alias = "call", alias = "Call")]
    Call,
    /// Put (European put)
    #[serde(rename = "PE", alias = "pe", alias = "put", alias = "Put")]
    Put,
}

impl OptionType {
    /// Exchange code ("CE" or "PE")
    pub fn code(&self) -> &'static str {
        match self {
            OptionType::Call => "CE",
            OptionType::Put => "PE",
        }
    }

    /// Parse from string (case-insensitive, accepts CE/PE and call/put)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ce" | "call" | "c" => Some(Self::Call),
            "pe" | "put" | "p" => Some(Self::Put),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for OptionType {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::Error::unknown("option type", s, "ce or pe"))
    }
}

/// Index symbol (e.g., "NIFTY", "BANKNIFTY"), always upper case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct Symbol(pub String);

impl Symbol {
    /// Create a new Symbol
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Get the symbol as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Listed strike interval when no override is configured.
    pub fn default_strike_step(&self) -> f64 {
        if PREMIUM_INDICES.contains(&self.as_str()) {
            PREMIUM_INDEX_STRIKE_STEP
        } else {
            BROAD_INDEX_STRIKE_STEP
        }
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::new("NIFTY")
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
