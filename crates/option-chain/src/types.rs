//! Option-chain snapshot types

use chrono::NaiveDateTime;
use common::Symbol;
use serde::{Deserialize, Serialize};

use crate::{ChainError, Result};

/// Quote for one side (call or put) of one strike
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionLegQuote {
    /// Outstanding contracts
    pub open_interest: u64,
    /// Change in open interest since the previous session
    pub open_interest_change: i64,
    /// Contracts traded today
    pub volume: u64,
    /// Implied volatility in percent
    pub implied_volatility: f64,
    pub last_price: f64,
    /// Change in last price since the previous session
    pub price_change: f64,
}

impl OptionLegQuote {
    /// Fold another quote for the same strike into this one.
    ///
    /// Contract counts are summed; prices and IV of `self` are kept.
    pub fn merge(&mut self, other: &OptionLegQuote) {
        self.open_interest = self.open_interest.saturating_add(other.open_interest);
        self.open_interest_change = self
            .open_interest_change
            .saturating_add(other.open_interest_change);
        self.volume = self.volume.saturating_add(other.volume);
    }
}

/// One strike of the chain with both sides
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeRow {
    pub strike: f64,
    #[serde(default)]
    pub call: OptionLegQuote,
    #[serde(default)]
    pub put: OptionLegQuote,
}

impl StrikeRow {
    pub fn new(strike: f64, call: OptionLegQuote, put: OptionLegQuote) -> Self {
        Self { strike, call, put }
    }
}

/// Point-in-time option chain for one index and expiry.
///
/// Rows are sorted ascending by strike and strikes are unique. Gaps in the
/// strike grid are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotData")]
pub struct OptionChainSnapshot {
    symbol: Symbol,
    underlying_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<NaiveDateTime>,
    rows: Vec<StrikeRow>,
}

/// Unvalidated wire shape of [`OptionChainSnapshot`]
#[derive(Deserialize)]
struct SnapshotData {
    symbol: String,
    underlying_value: f64,
    #[serde(default)]
    timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    rows: Vec<StrikeRow>,
}

impl TryFrom<SnapshotData> for OptionChainSnapshot {
    type Error = ChainError;

    fn try_from(data: SnapshotData) -> Result<Self> {
        Ok(OptionChainSnapshot::new(data.symbol, data.underlying_value, data.rows)?
            .with_timestamp(data.timestamp))
    }
}

impl OptionChainSnapshot {
    /// Build a snapshot, sorting rows by strike.
    ///
    /// Fails on a non-finite or negative underlying value, on non-positive or
    /// non-finite strikes, and on duplicate strikes.
    pub fn new(
        symbol: impl Into<Symbol>,
        underlying_value: f64,
        mut rows: Vec<StrikeRow>,
    ) -> Result<Self> {
        if !underlying_value.is_finite() || underlying_value < 0.0 {
            return Err(ChainError::InvalidSnapshot(format!(
                "underlying value must be a finite non-negative number, got {}",
                underlying_value
            )));
        }

        if let Some(row) = rows.iter().find(|r| !r.strike.is_finite() || r.strike <= 0.0) {
            return Err(ChainError::InvalidStrike(row.strike));
        }

        rows.sort_by(|a, b| a.strike.total_cmp(&b.strike));

        if let Some(pair) = rows.windows(2).find(|w| w[0].strike == w[1].strike) {
            return Err(ChainError::DuplicateStrike(pair[0].strike));
        }

        Ok(Self {
            symbol: symbol.into(),
            underlying_value,
            timestamp: None,
            rows,
        })
    }

    pub fn with_timestamp(mut self, timestamp: Option<NaiveDateTime>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Spot price of the underlying index
    pub fn underlying_value(&self) -> f64 {
        self.underlying_value
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    /// Rows in ascending strike order
    pub fn rows(&self) -> &[StrikeRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn strikes(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.strike)
    }

    /// Listed strike interval for this snapshot's index
    pub fn strike_step(&self) -> f64 {
        self.symbol.default_strike_step()
    }

    /// Index of the row whose strike is nearest to `price`; ties go to the lower strike
    pub fn nearest_index(&self, price: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, row) in self.rows.iter().enumerate() {
            let distance = (row.strike - price).abs();
            match best {
                Some((_, d)) if distance >= d => {}
                _ => best = Some((i, distance)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Strike nearest to `price`; ties go to the lower strike
    pub fn nearest_strike(&self, price: f64) -> Option<f64> {
        self.nearest_index(price).map(|i| self.rows[i].strike)
    }

    /// Sub-snapshot holding `strikes_each_side` rows on either side of the
    /// strike nearest to `atm`, plus that strike itself
    pub fn window(&self, atm: f64, strikes_each_side: usize) -> OptionChainSnapshot {
        let rows = match self.nearest_index(atm) {
            Some(center) => {
                let lo = center.saturating_sub(strikes_each_side);
                let hi = center
                    .saturating_add(strikes_each_side)
                    .saturating_add(1)
                    .min(self.rows.len());
                self.rows[lo..hi].to_vec()
            }
            None => Vec::new(),
        };

        OptionChainSnapshot {
            symbol: self.symbol.clone(),
            underlying_value: self.underlying_value,
            timestamp: self.timestamp,
            rows,
        }
    }
}
