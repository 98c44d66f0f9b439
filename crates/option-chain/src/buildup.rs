//! Price/OI build-up classification

use serde::{Deserialize, Serialize};

use crate::types::{OptionChainSnapshot, OptionLegQuote};

/// Quadrant of price change × OI change for one option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Buildup {
    /// Price up, OI up
    LongBuildup,
    /// Price down, OI up
    ShortBuildup,
    /// Price up, OI down
    ShortCovering,
    /// Price down, OI down
    LongUnwinding,
    /// Price or OI unchanged
    Neutral,
}

impl Buildup {
    pub fn classify(price_change: f64, oi_change: i64) -> Self {
        let price_up = price_change > 0.0;
        let price_down = price_change < 0.0;

        match (price_up, price_down, oi_change.signum()) {
            (true, _, 1) => Buildup::LongBuildup,
            (_, true, 1) => Buildup::ShortBuildup,
            (true, _, -1) => Buildup::ShortCovering,
            (_, true, -1) => Buildup::LongUnwinding,
            _ => Buildup::Neutral,
        }
    }

    pub fn from_quote(quote: &OptionLegQuote) -> Self {
        Self::classify(quote.price_change, quote.open_interest_change)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Buildup::LongBuildup => "Long Build-up",
            Buildup::ShortBuildup => "Short Build-up",
            Buildup::ShortCovering => "Short Covering",
            Buildup::LongUnwinding => "Long Unwinding",
            Buildup::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Buildup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Build-up of both sides at one strike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeBuildup {
    pub strike: f64,
    pub call: Buildup,
    pub put: Buildup,
}

/// Per-strike build-ups in ascending strike order
pub fn buildups(snapshot: &OptionChainSnapshot) -> Vec<StrikeBuildup> {
    snapshot
        .rows()
        .iter()
        .map(|row| StrikeBuildup {
            strike: row.strike,
            call: Buildup::from_quote(&row.call),
            put: Buildup::from_quote(&row.put),
        })
        .collect()
}
