//! The two Chart-of-Accuracy tables.
//!
//! Both are 9-row static arrays looked up by exact key match. Rows never
//! change at runtime and may be shared freely across threads.

use tracing::{debug, warn};

use crate::types::{
    Bias, OiTrend, RiskLevel, Scenario, ScenarioKey, ScenarioKey2, ScenarioMatch, Strength,
};
use crate::types::OiTrend::{Decreasing as Down, Increasing as Up, Stable};
use crate::types::Strength::{Strong, WeakTowardBottom as Wtb, WeakTowardTop as Wtt};

/// A table row: the key it answers and the scenario it yields
#[derive(Debug)]
pub struct ScenarioRow<K: 'static> {
    pub key: K,
    pub scenario: Scenario,
}

const fn v1(support: Strength, resistance: Strength, scenario: Scenario) -> ScenarioRow<ScenarioKey> {
    ScenarioRow {
        key: ScenarioKey { support, resistance },
        scenario,
    }
}

const fn v2(call_oi_trend: OiTrend, put_oi_trend: OiTrend, scenario: Scenario) -> ScenarioRow<ScenarioKey2> {
    ScenarioRow {
        key: ScenarioKey2 {
            call_oi_trend,
            put_oi_trend,
        },
        scenario,
    }
}

/// COA 1.0: support strength × resistance strength
pub static SCENARIOS_V1: [ScenarioRow<ScenarioKey>; 9] = [
    v1(Strong, Strong, Scenario {
        id: 1,
        name: "Strong Range",
        bias: Bias::RangeBound,
        risk: RiskLevel::Low,
        tradable: true,
        day_top: "At resistance",
        day_bottom: "At support",
        action: "Sell near resistance and buy near support; both levels are expected to hold",
    }),
    v1(Strong, Wtb, Scenario {
        id: 2,
        name: "Resistance Drifting Lower",
        bias: Bias::MildlyBearish,
        risk: RiskLevel::Medium,
        tradable: true,
        day_top: "Below resistance, toward the lower call concentration",
        day_bottom: "At support",
        action: "Sell on rallies below resistance; buy only at support",
    }),
    v1(Strong, Wtt, Scenario {
        id: 3,
        name: "Resistance Drifting Higher",
        bias: Bias::MildlyBullish,
        risk: RiskLevel::Medium,
        tradable: true,
        day_top: "Above resistance, toward the higher call concentration",
        day_bottom: "At support",
        action: "Buy near support; resistance is likely to give way on the upside",
    }),
    v1(Wtb, Strong, Scenario {
        id: 4,
        name: "Support Drifting Lower",
        bias: Bias::MildlyBearish,
        risk: RiskLevel::Medium,
        tradable: true,
        day_top: "At resistance",
        day_bottom: "Below support, toward the lower put concentration",
        action: "Sell near resistance; support is likely to give way on the downside",
    }),
    v1(Wtb, Wtb, Scenario {
        id: 5,
        name: "Bearish Shift",
        bias: Bias::Bearish,
        risk: RiskLevel::High,
        tradable: true,
        day_top: "Below resistance, toward the lower call concentration",
        day_bottom: "Below support, toward the lower put concentration",
        action: "Sell on rises; both levels are migrating lower",
    }),
    v1(Wtb, Wtt, Scenario {
        id: 6,
        name: "Range Expansion",
        bias: Bias::Uncertain,
        risk: RiskLevel::VeryHigh,
        tradable: false,
        day_top: "Above resistance, toward the higher call concentration",
        day_bottom: "Below support, toward the lower put concentration",
        action: "Do not trade: support and resistance are moving apart",
    }),
    v1(Wtt, Strong, Scenario {
        id: 7,
        name: "Support Drifting Higher",
        bias: Bias::MildlyBullish,
        risk: RiskLevel::Medium,
        tradable: true,
        day_top: "At resistance",
        day_bottom: "Above support, toward the higher put concentration",
        action: "Buy on dips above support; resistance is expected to cap the day",
    }),
    v1(Wtt, Wtb, Scenario {
        id: 8,
        name: "Range Squeeze",
        bias: Bias::Uncertain,
        risk: RiskLevel::VeryHigh,
        tradable: false,
        day_top: "Below resistance, toward the lower call concentration",
        day_bottom: "Above support, toward the higher put concentration",
        action: "Do not trade: support and resistance are converging with no clear side",
    }),
    v1(Wtt, Wtt, Scenario {
        id: 9,
        name: "Bullish Shift",
        bias: Bias::Bullish,
        risk: RiskLevel::High,
        tradable: true,
        day_top: "Above resistance, toward the higher call concentration",
        day_bottom: "Above support, toward the higher put concentration",
        action: "Buy on dips; both levels are migrating higher",
    }),
];

/// COA 2.0: call-OI trend × put-OI trend
pub static SCENARIOS_V2: [ScenarioRow<ScenarioKey2>; 9] = [
    v2(Stable, Stable, Scenario {
        id: 1,
        name: "Balanced Positions",
        bias: Bias::RangeBound,
        risk: RiskLevel::Low,
        tradable: true,
        day_top: "Resistance holds",
        day_bottom: "Support holds",
        action: "Range trade between support and resistance",
    }),
    v2(Stable, Down, Scenario {
        id: 2,
        name: "Put Unwinding",
        bias: Bias::MildlyBearish,
        risk: RiskLevel::Medium,
        tradable: true,
        day_top: "Resistance holds",
        day_bottom: "Support weakening",
        action: "Avoid fresh longs; support may give way",
    }),
    v2(Stable, Up, Scenario {
        id: 3,
        name: "Put Writing",
        bias: Bias::MildlyBullish,
        risk: RiskLevel::Medium,
        tradable: true,
        day_top: "Resistance holds",
        day_bottom: "Support strengthening",
        action: "Buy on dips toward support",
    }),
    v2(Down, Stable, Scenario {
        id: 4,
        name: "Call Unwinding",
        bias: Bias::MildlyBullish,
        risk: RiskLevel::Medium,
        tradable: true,
        day_top: "Resistance weakening",
        day_bottom: "Support holds",
        action: "Avoid fresh shorts; resistance may give way",
    }),
    v2(Down, Down, Scenario {
        id: 5,
        name: "Two-sided Unwinding",
        bias: Bias::Uncertain,
        risk: RiskLevel::High,
        tradable: false,
        day_top: "Resistance weakening",
        day_bottom: "Support weakening",
        action: "Stand aside: writers are exiting both sides ahead of a breakout",
    }),
    v2(Down, Up, Scenario {
        id: 6,
        name: "Bullish Writing Shift",
        bias: Bias::Bullish,
        risk: RiskLevel::Medium,
        tradable: true,
        day_top: "Resistance weakening",
        day_bottom: "Support strengthening",
        action: "Buy: call writers are covering while put writers add",
    }),
    v2(Up, Stable, Scenario {
        id: 7,
        name: "Call Writing",
        bias: Bias::MildlyBearish,
        risk: RiskLevel::Medium,
        tradable: true,
        day_top: "Resistance strengthening",
        day_bottom: "Support holds",
        action: "Sell on rallies toward resistance",
    }),
    v2(Up, Down, Scenario {
        id: 8,
        name: "Bearish Writing Shift",
        bias: Bias::Bearish,
        risk: RiskLevel::Medium,
        tradable: true,
        day_top: "Resistance strengthening",
        day_bottom: "Support weakening",
        action: "Sell: call writers are adding while put writers cover",
    }),
    v2(Up, Up, Scenario {
        id: 9,
        name: "Two-sided Writing",
        bias: Bias::RangeBound,
        risk: RiskLevel::Low,
        tradable: true,
        day_top: "Resistance strengthening",
        day_bottom: "Support strengthening",
        action: "Sell premium: writers are defending both sides of the range",
    }),
];

fn lookup<K: PartialEq + std::fmt::Debug>(table: &'static [ScenarioRow<K>], key: &K) -> ScenarioMatch {
    match table.iter().find(|row| row.key == *key) {
        Some(row) => {
            debug!(?key, id = row.scenario.id, name = row.scenario.name, "scenario matched");
            ScenarioMatch::Matched(&row.scenario)
        }
        None => {
            warn!(?key, "no scenario matched");
            ScenarioMatch::NoMatch
        }
    }
}

/// Classify support/resistance strength with the COA 1.0 table
pub fn classify1(key: ScenarioKey) -> ScenarioMatch {
    lookup(&SCENARIOS_V1, &key)
}

/// Classify call/put OI trends with the COA 2.0 table
pub fn classify2(key: ScenarioKey2) -> ScenarioMatch {
    lookup(&SCENARIOS_V2, &key)
}

/// All COA 1.0 rows in table order
pub fn all_v1() -> impl Iterator<Item = (ScenarioKey, &'static Scenario)> {
    SCENARIOS_V1.iter().map(|row| (row.key, &row.scenario))
}

/// All COA 2.0 rows in table order
pub fn all_v2() -> impl Iterator<Item = (ScenarioKey2, &'static Scenario)> {
    SCENARIOS_V2.iter().map(|row| (row.key, &row.scenario))
}
