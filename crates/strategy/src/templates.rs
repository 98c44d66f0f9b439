//! Strategy templates
//!
//! Each template places its legs on the resolved strike grid and carries a
//! fixed confidence score. Templates whose structure needs the levels on a
//! particular side of ATM return `None` when they are not.

use common::OptionType::{Call, Put};
use common::Side::{Buy, Sell};
use tracing::debug;

use crate::types::{RiskLabel, StrategyCandidate, StrategyLeg};

/// Strikes a suggestion round works with.
///
/// Support and resistance are the chain's levels as given; they may sit at
/// or beyond ATM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStrikes {
    pub atm: f64,
    pub support: f64,
    pub resistance: f64,
    /// Near offset in points
    pub near: f64,
    /// Far offset in points
    pub far: f64,
}

impl ResolvedStrikes {
    /// Resistance above ATM, leaving room for a bullish debit spread
    pub fn has_upside_room(&self) -> bool {
        self.resistance > self.atm
    }

    /// Support below ATM, leaving room for a bearish debit spread
    pub fn has_downside_room(&self) -> bool {
        self.support < self.atm
    }

    /// Support at or below resistance, so short puts and calls do not cross
    pub fn levels_ordered(&self) -> bool {
        self.support <= self.resistance
    }
}

#[allow(clippy::too_many_arguments)]
fn candidate(
    name: &str,
    legs: Vec<StrategyLeg>,
    max_profit: &str,
    max_loss: &str,
    win_rate_band: &str,
    risk: RiskLabel,
    confidence: u8,
    reasoning: String,
) -> StrategyCandidate {
    StrategyCandidate {
        name: name.to_string(),
        legs,
        max_profit: max_profit.to_string(),
        max_loss: max_loss.to_string(),
        win_rate_band: win_rate_band.to_string(),
        risk,
        confidence,
        reasoning,
        net_premium: None,
    }
}

pub fn bull_put_spread(s: &ResolvedStrikes) -> StrategyCandidate {
    candidate(
        "Bull Put Spread",
        vec![
            StrategyLeg::new(Sell, Put, s.support, "Sell put at support"),
            StrategyLeg::new(Buy, Put, s.support - s.near, "Buy put below support as a hedge"),
        ],
        "Net credit received",
        "Spread width minus net credit",
        "65-75%",
        RiskLabel::Low,
        75,
        format!("Put writers defend {}; collect premium while price holds above it", s.support),
    )
}

pub fn bull_call_spread(s: &ResolvedStrikes) -> Option<StrategyCandidate> {
    if !s.has_upside_room() {
        debug!(atm = s.atm, resistance = s.resistance, "Resistance not above ATM; no bull call spread");
        return None;
    }

    Some(candidate(
        "Bull Call Spread",
        vec![
            StrategyLeg::new(Buy, Call, s.atm, "Buy ATM call"),
            StrategyLeg::new(Sell, Call, s.resistance, "Sell call at resistance"),
        ],
        "Spread width minus net debit",
        "Net debit paid",
        "45-55%",
        RiskLabel::Low,
        70,
        format!("Capped upside from {} toward resistance at {}", s.atm, s.resistance),
    ))
}

pub fn long_otm_call(s: &ResolvedStrikes) -> StrategyCandidate {
    let strike = s.atm + s.near;
    candidate(
        "Long OTM Call",
        vec![StrategyLeg::new(Buy, Call, strike, "Buy OTM call above ATM")],
        "Unlimited",
        "Premium paid",
        "30-40%",
        RiskLabel::High,
        60,
        format!("Leveraged bet on a move through {}", strike),
    )
}

pub fn naked_put_sell(s: &ResolvedStrikes) -> StrategyCandidate {
    candidate(
        "Naked ATM Put Sell",
        vec![StrategyLeg::new(Sell, Put, s.atm, "Sell ATM put")],
        "Premium received",
        "Substantial if price falls below the strike",
        "50-60%",
        RiskLabel::VeryHigh,
        50,
        format!("Maximum premium capture if price stays above {}", s.atm),
    )
}

pub fn bear_call_spread(s: &ResolvedStrikes) -> StrategyCandidate {
    candidate(
        "Bear Call Spread",
        vec![
            StrategyLeg::new(Sell, Call, s.resistance, "Sell call at resistance"),
            StrategyLeg::new(Buy, Call, s.resistance + s.near, "Buy call above resistance as a hedge"),
        ],
        "Net credit received",
        "Spread width minus net credit",
        "65-75%",
        RiskLabel::Low,
        75,
        format!("Call writers cap {}; collect premium while price holds below it", s.resistance),
    )
}

pub fn bear_put_spread(s: &ResolvedStrikes) -> Option<StrategyCandidate> {
    if !s.has_downside_room() {
        debug!(atm = s.atm, support = s.support, "Support not below ATM; no bear put spread");
        return None;
    }

    Some(candidate(
        "Bear Put Spread",
        vec![
            StrategyLeg::new(Buy, Put, s.atm, "Buy ATM put"),
            StrategyLeg::new(Sell, Put, s.support, "Sell put at support"),
        ],
        "Spread width minus net debit",
        "Net debit paid",
        "45-55%",
        RiskLabel::Low,
        70,
        format!("Capped downside from {} toward support at {}", s.atm, s.support),
    ))
}

pub fn long_otm_put(s: &ResolvedStrikes) -> StrategyCandidate {
    let strike = s.atm - s.near;
    candidate(
        "Long OTM Put",
        vec![StrategyLeg::new(Buy, Put, strike, "Buy OTM put below ATM")],
        "Strike minus premium paid",
        "Premium paid",
        "30-40%",
        RiskLabel::High,
        60,
        format!("Leveraged bet on a move through {}", strike),
    )
}

pub fn naked_call_sell(s: &ResolvedStrikes) -> StrategyCandidate {
    candidate(
        "Naked ATM Call Sell",
        vec![StrategyLeg::new(Sell, Call, s.atm, "Sell ATM call")],
        "Premium received",
        "Unlimited",
        "50-60%",
        RiskLabel::VeryHigh,
        50,
        format!("Maximum premium capture if price stays below {}", s.atm),
    )
}

pub fn iron_condor(s: &ResolvedStrikes) -> Option<StrategyCandidate> {
    if !s.levels_ordered() {
        debug!(support = s.support, resistance = s.resistance, "Levels cross; no iron condor");
        return None;
    }

    Some(candidate(
        "Iron Condor",
        vec![
            StrategyLeg::new(Sell, Put, s.support, "Sell put at support"),
            StrategyLeg::new(Buy, Put, s.support - s.near, "Buy put below support as a hedge"),
            StrategyLeg::new(Sell, Call, s.resistance, "Sell call at resistance"),
            StrategyLeg::new(Buy, Call, s.resistance + s.near, "Buy call above resistance as a hedge"),
        ],
        "Net credit received",
        "Wider wing width minus net credit",
        "65-75%",
        RiskLabel::Low,
        75,
        format!("Defined-risk range trade between {} and {}", s.support, s.resistance),
    ))
}

pub fn short_strangle(s: &ResolvedStrikes) -> Option<StrategyCandidate> {
    if !s.levels_ordered() {
        debug!(support = s.support, resistance = s.resistance, "Levels cross; no short strangle");
        return None;
    }

    Some(candidate(
        "Short Strangle",
        vec![
            StrategyLeg::new(Sell, Put, s.support, "Sell put at support"),
            StrategyLeg::new(Sell, Call, s.resistance, "Sell call at resistance"),
        ],
        "Net credit received",
        "Unlimited beyond either strike",
        "60-70%",
        RiskLabel::High,
        65,
        format!("Range expected to hold between {} and {}", s.support, s.resistance),
    ))
}

pub fn iron_butterfly(s: &ResolvedStrikes) -> StrategyCandidate {
    candidate(
        "Iron Butterfly",
        vec![
            StrategyLeg::new(Sell, Call, s.atm, "Sell ATM call"),
            StrategyLeg::new(Sell, Put, s.atm, "Sell ATM put"),
            StrategyLeg::new(Buy, Call, s.atm + s.far, "Buy far OTM call as a hedge"),
            StrategyLeg::new(Buy, Put, s.atm - s.far, "Buy far OTM put as a hedge"),
        ],
        "Net credit received",
        "Wing width minus net credit",
        "40-50%",
        RiskLabel::Medium,
        60,
        format!("Price expected to pin near {}", s.atm),
    )
}

pub fn short_straddle(s: &ResolvedStrikes) -> StrategyCandidate {
    candidate(
        "Short Straddle",
        vec![
            StrategyLeg::new(Sell, Call, s.atm, "Sell ATM call"),
            StrategyLeg::new(Sell, Put, s.atm, "Sell ATM put"),
        ],
        "Net credit received",
        "Unlimited",
        "40-50%",
        RiskLabel::VeryHigh,
        50,
        format!("Maximum premium capture if price stays at {}", s.atm),
    )
}
