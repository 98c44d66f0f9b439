//! Derivation of COA table keys from a snapshot

use config::OiTrendThreshold;
use scenario::{OiTrend, ScenarioKey, ScenarioKey2, Strength};
use tracing::debug;

use crate::aggregator::max_oi_strike;
use crate::types::{OptionChainSnapshot, OptionLegQuote, StrikeRow};

/// Classify a summed OI change against a materiality threshold.
///
/// Changes within the band (inclusive) are stable.
pub fn oi_trend(change: i64, total_oi: u64, threshold: OiTrendThreshold) -> OiTrend {
    let band = threshold.band(total_oi);

    if (change as f64).abs() <= band {
        OiTrend::Stable
    } else if change > 0 {
        OiTrend::Increasing
    } else {
        OiTrend::Decreasing
    }
}

/// COA 2.0 key from each side's summed OI change
pub fn derive_scenario_key2(snapshot: &OptionChainSnapshot, threshold: OiTrendThreshold) -> ScenarioKey2 {
    let side_trend = |side: fn(&StrikeRow) -> &OptionLegQuote| {
        let (change, total) = snapshot.rows().iter().map(side).fold((0i64, 0u64), |(c, t), q| {
            (
                c.saturating_add(q.open_interest_change),
                t.saturating_add(q.open_interest),
            )
        });
        oi_trend(change, total, threshold)
    };

    let key = ScenarioKey2 {
        call_oi_trend: side_trend(|r| &r.call),
        put_oi_trend: side_trend(|r| &r.put),
    };

    debug!(?key, ?threshold, "Derived COA 2.0 key");
    key
}

/// Strength of the max-OI level on one side.
///
/// When the runner-up strike holds at least `ratio_pct` percent of the
/// maximum OI, the level is weak toward the runner-up's side. `None` when
/// the side carries no OI.
pub fn level_strength<F>(rows: &[StrikeRow], side: F, ratio_pct: f64) -> Option<Strength>
where
    F: Fn(&StrikeRow) -> &OptionLegQuote,
{
    let (max_strike, max_oi) = max_oi_strike(rows, &side)?;

    let mut runner_up: Option<(f64, u64)> = None;
    for row in rows.iter().filter(|r| r.strike != max_strike) {
        let oi = side(row).open_interest;
        match runner_up {
            Some((_, best)) if oi <= best => {}
            _ => runner_up = Some((row.strike, oi)),
        }
    }

    let strength = match runner_up {
        Some((strike, oi)) if oi > 0 && oi as f64 >= max_oi as f64 * ratio_pct / 100.0 => {
            if strike < max_strike {
                Strength::WeakTowardBottom
            } else {
                Strength::WeakTowardTop
            }
        }
        _ => Strength::Strong,
    };

    Some(strength)
}

/// COA 1.0 key from put-side (support) and call-side (resistance) strength
pub fn derive_scenario_key(snapshot: &OptionChainSnapshot, ratio_pct: f64) -> Option<ScenarioKey> {
    let rows = snapshot.rows();
    let key = ScenarioKey {
        support: level_strength(rows, |r| &r.put, ratio_pct)?,
        resistance: level_strength(rows, |r| &r.call, ratio_pct)?,
    };

    debug!(?key, ratio_pct, "Derived COA 1.0 key");
    Some(key)
}
