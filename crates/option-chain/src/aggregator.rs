//! Chain Aggregator
//!
//! Reduces a snapshot to support/resistance levels, put-call ratios and
//! OI-change buckets. Every function here is a pure function of its inputs.

use config::ChainConfig;
use scenario::{classify1, classify2, ScenarioKey, ScenarioKey2, ScenarioMatch};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::buildup::{buildups, StrikeBuildup};
use crate::trend::{derive_scenario_key, derive_scenario_key2};
use crate::types::{OptionChainSnapshot, OptionLegQuote, StrikeRow};

/// PCR above which positioning reads as put-heavy
pub const BULLISH_PCR: f64 = 1.3;
/// PCR below which positioning reads as call-heavy
pub const BEARISH_PCR: f64 = 0.7;

/// Market sentiment implied by the OI put-call ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Bullish,
    Neutral,
    Bearish,
}

impl Sentiment {
    /// Sentiment for a PCR computed over a chain with call-side OI.
    ///
    /// A ratio of 0 reads as call-heavy here; use [`from_totals`](Self::from_totals)
    /// when the call side may be empty.
    pub fn from_pcr(pcr: f64) -> Self {
        if pcr > BULLISH_PCR {
            Sentiment::Bullish
        } else if pcr < BEARISH_PCR {
            Sentiment::Bearish
        } else {
            Sentiment::Neutral
        }
    }

    /// Sentiment from the OI totals of both sides.
    ///
    /// A chain with puts and no calls is maximally put-heavy, even though its
    /// reported PCR is 0. A chain with no OI at all is neutral.
    pub fn from_totals(total_put_oi: u64, total_call_oi: u64) -> Self {
        match (total_put_oi, total_call_oi) {
            (0, 0) => Sentiment::Neutral,
            (_, 0) => Sentiment::Bullish,
            (put, call) => Self::from_pcr(put as f64 / call as f64),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "put-heavy",
            Sentiment::Neutral => "balanced",
            Sentiment::Bearish => "call-heavy",
        }
    }
}

/// OI additions and reductions on one side of the chain
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SideOiChange {
    /// Strikes where OI was added
    pub strikes_added: usize,
    pub contracts_added: u64,
    /// Strikes where OI was shed
    pub strikes_shed: usize,
    pub contracts_shed: u64,
    /// Strike with the largest OI addition
    pub max_addition_strike: Option<f64>,
}

impl SideOiChange {
    fn record(&mut self, strike: f64, change: i64, best: &mut i64) {
        if change > 0 {
            self.strikes_added += 1;
            self.contracts_added = self.contracts_added.saturating_add(change.unsigned_abs());
            if change > *best {
                *best = change;
                self.max_addition_strike = Some(strike);
            }
        } else if change < 0 {
            self.strikes_shed += 1;
            self.contracts_shed = self.contracts_shed.saturating_add(change.unsigned_abs());
        }
    }

    /// Net contracts added (negative when more were shed)
    pub fn net(&self) -> i64 {
        (self.contracts_added as i64).saturating_sub(self.contracts_shed as i64)
    }
}

/// OI-change buckets for both sides
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OiChangeBuckets {
    pub call: SideOiChange,
    pub put: SideOiChange,
}

impl OiChangeBuckets {
    pub fn from_snapshot(snapshot: &OptionChainSnapshot) -> Self {
        let mut buckets = OiChangeBuckets::default();
        let (mut best_call, mut best_put) = (0i64, 0i64);

        for row in snapshot.rows() {
            buckets
                .call
                .record(row.strike, row.call.open_interest_change, &mut best_call);
            buckets
                .put
                .record(row.strike, row.put.open_interest_change, &mut best_put);
        }

        buckets
    }
}

/// Levels and ratios derived from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    /// Strike with the highest put OI
    pub support_strike: Option<f64>,
    /// Strike with the highest call OI
    pub resistance_strike: Option<f64>,
    pub max_put_oi: u64,
    pub max_call_oi: u64,
    /// Put OI over call OI; 0 when the call side holds no OI
    pub pcr_oi: f64,
    pub pcr_volume: f64,
    /// Strike nearest to the underlying value
    pub atm_strike: Option<f64>,
    pub total_call_oi: u64,
    pub total_put_oi: u64,
    pub total_call_volume: u64,
    pub total_put_volume: u64,
    pub call_oi_change: i64,
    pub put_oi_change: i64,
    /// From [`Sentiment::from_totals`], so a put-only chain is bullish
    /// although `pcr_oi` is 0
    pub sentiment: Sentiment,
    pub max_pain_strike: Option<f64>,
    pub oi_change: OiChangeBuckets,
}

impl LevelSet {
    /// True when the chain produced no levels at all
    pub fn is_empty(&self) -> bool {
        self.atm_strike.is_none()
    }
}

/// Strike with the highest OI on one side; the first (lowest) strike wins ties.
///
/// Returns `None` when the chain is empty or holds no OI on that side.
pub fn max_oi_strike<F>(rows: &[StrikeRow], side: F) -> Option<(f64, u64)>
where
    F: Fn(&StrikeRow) -> &OptionLegQuote,
{
    let mut best: Option<(f64, u64)> = None;
    for row in rows {
        let oi = side(row).open_interest;
        match best {
            Some((_, max)) if oi <= max => {}
            _ if oi == 0 => {}
            _ => best = Some((row.strike, oi)),
        }
    }
    best
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Expiry strike that minimises the total intrinsic payout to option holders.
///
/// Ties go to the lower strike. `None` for an empty chain or one without OI.
pub fn max_pain(snapshot: &OptionChainSnapshot) -> Option<f64> {
    let rows = snapshot.rows();
    let has_oi = rows
        .iter()
        .any(|r| r.call.open_interest > 0 || r.put.open_interest > 0);
    if !has_oi {
        return None;
    }

    let payout = |expiry: f64| -> f64 {
        rows.iter()
            .map(|r| {
                let call = (expiry - r.strike).max(0.0) * r.call.open_interest as f64;
                let put = (r.strike - expiry).max(0.0) * r.put.open_interest as f64;
                call + put
            })
            .sum()
    };

    let mut best: Option<(f64, f64)> = None;
    for expiry in snapshot.strikes() {
        let total = payout(expiry);
        match best {
            Some((_, min)) if total >= min => {}
            _ => best = Some((expiry, total)),
        }
    }
    best.map(|(strike, _)| strike)
}

/// Compute the [`LevelSet`] for a snapshot
pub fn aggregate(snapshot: &OptionChainSnapshot) -> LevelSet {
    let rows = snapshot.rows();

    if snapshot.is_empty() {
        warn!(symbol = %snapshot.symbol(), "Empty option chain; no levels derived");
    }

    let atm_strike = snapshot.nearest_strike(snapshot.underlying_value());
    let resistance = max_oi_strike(rows, |r| &r.call);
    let support = max_oi_strike(rows, |r| &r.put);

    let sum = |f: fn(&StrikeRow) -> u64| rows.iter().map(f).fold(0u64, u64::saturating_add);
    let total_call_oi = sum(|r| r.call.open_interest);
    let total_put_oi = sum(|r| r.put.open_interest);
    let total_call_volume = sum(|r| r.call.volume);
    let total_put_volume = sum(|r| r.put.volume);

    let call_oi_change = rows
        .iter()
        .map(|r| r.call.open_interest_change)
        .fold(0i64, i64::saturating_add);
    let put_oi_change = rows
        .iter()
        .map(|r| r.put.open_interest_change)
        .fold(0i64, i64::saturating_add);

    let pcr_oi = ratio(total_put_oi, total_call_oi);
    let pcr_volume = ratio(total_put_volume, total_call_volume);

    let sentiment = Sentiment::from_totals(total_put_oi, total_call_oi);

    let levels = LevelSet {
        support_strike: support.map(|(s, _)| s),
        resistance_strike: resistance.map(|(s, _)| s),
        max_put_oi: support.map_or(0, |(_, oi)| oi),
        max_call_oi: resistance.map_or(0, |(_, oi)| oi),
        pcr_oi,
        pcr_volume,
        atm_strike,
        total_call_oi,
        total_put_oi,
        total_call_volume,
        total_put_volume,
        call_oi_change,
        put_oi_change,
        sentiment,
        max_pain_strike: max_pain(snapshot),
        oi_change: OiChangeBuckets::from_snapshot(snapshot),
    };

    debug!(
        symbol = %snapshot.symbol(),
        atm = ?levels.atm_strike,
        support = ?levels.support_strike,
        resistance = ?levels.resistance_strike,
        pcr_oi = levels.pcr_oi,
        sentiment = ?levels.sentiment,
        "Aggregated option chain"
    );

    levels
}

/// Full read of a chain: levels, derived COA keys and their scenarios
#[derive(Debug, Clone, Serialize)]
pub struct ChainAnalysis {
    pub levels: LevelSet,
    /// `None` when either side of the chain carries no OI
    pub scenario_key: Option<ScenarioKey>,
    pub scenario_key2: ScenarioKey2,
    pub coa1: ScenarioMatch,
    pub coa2: ScenarioMatch,
    pub buildups: Vec<StrikeBuildup>,
}

/// Aggregator bound to a chain configuration
#[derive(Debug, Clone, Default)]
pub struct ChainAggregator {
    config: ChainConfig,
}

impl ChainAggregator {
    pub fn new(config: ChainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn aggregate(&self, snapshot: &OptionChainSnapshot) -> LevelSet {
        aggregate(snapshot)
    }

    /// Near-money window around the snapshot's ATM strike
    pub fn window(&self, snapshot: &OptionChainSnapshot) -> OptionChainSnapshot {
        snapshot.window(snapshot.underlying_value(), self.config.window_strikes)
    }

    pub fn scenario_key(&self, snapshot: &OptionChainSnapshot) -> Option<ScenarioKey> {
        derive_scenario_key(snapshot, self.config.strength_ratio_pct)
    }

    pub fn scenario_key2(&self, snapshot: &OptionChainSnapshot) -> ScenarioKey2 {
        derive_scenario_key2(snapshot, self.config.oi_trend_threshold)
    }

    /// Aggregate the whole chain and classify both COA tables.
    ///
    /// Level strength is judged over the same rows as the levels, so the
    /// COA 1.0 key always describes `levels.support_strike` and
    /// `levels.resistance_strike`. Window the snapshot first to analyse the
    /// near-money chain only.
    pub fn analyze(&self, snapshot: &OptionChainSnapshot) -> ChainAnalysis {
        let levels = self.aggregate(snapshot);
        let scenario_key = self.scenario_key(snapshot);
        let scenario_key2 = self.scenario_key2(snapshot);

        let coa1 = match scenario_key {
            Some(key) => classify1(key),
            None => {
                warn!(symbol = %snapshot.symbol(), "No OI on one side; COA 1.0 not classified");
                ScenarioMatch::NoMatch
            }
        };
        let coa2 = classify2(scenario_key2);

        ChainAnalysis {
            levels,
            scenario_key,
            scenario_key2,
            coa1,
            coa2,
            buildups: buildups(snapshot),
        }
    }
}
