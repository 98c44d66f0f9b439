//! Strategy Generator
//!
//! Turns spot, levels, outlook and risk appetite into an ordered list of
//! candidates. Identical input always yields identical output.

use common::BROAD_INDEX_STRIKE_STEP;
use config::StrategyConfig;
use pricer::{greeks, PricingInputs};
use tracing::{debug, warn};

use crate::templates::{self, ResolvedStrikes};
use crate::types::{Outlook, RiskAppetite, StrategyCandidate, StrategyRequest};

/// Round `price` to the nearest multiple of `step`; ties go down
pub fn round_to_strike(price: f64, step: f64) -> f64 {
    let lower = (price / step).floor() * step;
    if price - lower > step / 2.0 {
        lower + step
    } else {
        lower
    }
}

fn usable(level: Option<f64>) -> Option<f64> {
    level.filter(|l| l.is_finite() && *l > 0.0)
}

#[derive(Debug, Clone, Default)]
pub struct StrategyGenerator {
    config: StrategyConfig,
}

impl StrategyGenerator {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Resolve ATM, support and resistance, applying fallbacks.
    ///
    /// Supplied levels are kept wherever they sit relative to ATM; only a
    /// missing or unusable level falls back to `atm ∓ far`. The support
    /// fallback never goes below one strike step. Returns `None` only when
    /// neither a usable ATM nor a usable spot is given.
    pub fn resolve_strikes(&self, request: &StrategyRequest) -> Option<ResolvedStrikes> {
        let step = if request.strike_step.is_finite() && request.strike_step > 0.0 {
            request.strike_step
        } else {
            warn!(step = request.strike_step, "Unusable strike step; using {}", BROAD_INDEX_STRIKE_STEP);
            BROAD_INDEX_STRIKE_STEP
        };

        let atm = match usable(request.atm_strike) {
            Some(atm) => atm,
            None => {
                let spot = usable(Some(request.spot))?;
                let atm = round_to_strike(spot, step).max(step);
                debug!(spot, atm, "ATM derived from spot");
                atm
            }
        };

        let near = f64::from(self.config.near_offset_steps) * step;
        let far = f64::from(self.config.far_offset_steps) * step;

        let support = match usable(request.support) {
            Some(support) => support,
            None => {
                let fallback = (atm - far).max(step);
                warn!(support = ?request.support, atm, fallback, "Support missing; using fallback below ATM");
                fallback
            }
        };

        let resistance = match usable(request.resistance) {
            Some(resistance) => resistance,
            None => {
                let fallback = atm + far;
                warn!(resistance = ?request.resistance, atm, fallback, "Resistance missing; using fallback above ATM");
                fallback
            }
        };

        if support > atm || resistance < atm {
            debug!(atm, support, resistance, "Levels sit beyond ATM");
        }

        Some(ResolvedStrikes {
            atm,
            support,
            resistance,
            near,
            far,
        })
    }

    /// Ordered candidates for the request's outlook and risk appetite.
    ///
    /// Templates the levels cannot support, and any candidate with a leg at
    /// or below zero, are left out; the order of the rest is unchanged.
    pub fn suggest(&self, request: &StrategyRequest) -> Vec<StrategyCandidate> {
        let Some(strikes) = self.resolve_strikes(request) else {
            warn!(spot = request.spot, "No usable spot or ATM; no strategies suggested");
            return Vec::new();
        };

        let s = &strikes;
        let selected = match (request.outlook, request.risk_appetite) {
            (Outlook::Bullish, RiskAppetite::Conservative) => {
                vec![Some(templates::bull_put_spread(s)), templates::bull_call_spread(s)]
            }
            (Outlook::Bullish, RiskAppetite::Moderate) => {
                vec![templates::bull_call_spread(s), Some(templates::long_otm_call(s))]
            }
            (Outlook::Bullish, RiskAppetite::Aggressive) => {
                vec![Some(templates::long_otm_call(s)), Some(templates::naked_put_sell(s))]
            }
            (Outlook::Bearish, RiskAppetite::Conservative) => {
                vec![Some(templates::bear_call_spread(s)), templates::bear_put_spread(s)]
            }
            (Outlook::Bearish, RiskAppetite::Moderate) => {
                vec![templates::bear_put_spread(s), Some(templates::long_otm_put(s))]
            }
            (Outlook::Bearish, RiskAppetite::Aggressive) => {
                vec![Some(templates::long_otm_put(s)), Some(templates::naked_call_sell(s))]
            }
            (Outlook::Neutral, RiskAppetite::Conservative) => vec![
                templates::iron_condor(s),
                templates::short_strangle(s),
                Some(templates::iron_butterfly(s)),
            ],
            (Outlook::Neutral, RiskAppetite::Moderate) => {
                vec![templates::short_strangle(s), Some(templates::iron_butterfly(s))]
            }
            (Outlook::Neutral, RiskAppetite::Aggressive) => vec![
                templates::short_strangle(s),
                Some(templates::iron_butterfly(s)),
                Some(templates::short_straddle(s)),
            ],
        };

        let candidates: Vec<StrategyCandidate> = selected
            .into_iter()
            .flatten()
            .filter(|candidate| {
                let listed = candidate.legs.iter().all(|l| l.strike.is_finite() && l.strike > 0.0);
                if !listed {
                    warn!(strategy = %candidate.name, "Leg strike at or below zero; candidate dropped");
                }
                listed
            })
            .collect();

        debug!(
            outlook = ?request.outlook,
            risk = ?request.risk_appetite,
            atm = strikes.atm,
            support = strikes.support,
            resistance = strikes.resistance,
            count = candidates.len(),
            "Strategies suggested"
        );

        candidates
    }

    /// Like [`suggest`](Self::suggest), with Black-Scholes premium estimates.
    ///
    /// `pricing` supplies spot, days, volatility and rate; each leg's strike
    /// and option type replace the ones it carries. A candidate gets a net
    /// premium only when every leg could be priced.
    pub fn suggest_priced(&self, request: &StrategyRequest, pricing: &PricingInputs) -> Vec<StrategyCandidate> {
        let mut candidates = self.suggest(request);

        for candidate in &mut candidates {
            let mut net = Some(0.0);

            for leg in &mut candidate.legs {
                leg.estimated_premium = greeks(&pricing.with_leg(leg.strike, leg.option_type)).map(|g| g.price);

                net = match (net, leg.estimated_premium) {
                    (Some(total), Some(premium)) if leg.side.is_sell() => Some(total + premium),
                    (Some(total), Some(premium)) => Some(total - premium),
                    _ => None,
                };
            }

            candidate.net_premium = net;
        }

        candidates
    }
}

/// Suggest strategies with the default offsets on a 50-point strike grid
pub fn suggest(
    spot: f64,
    atm_strike: Option<f64>,
    support: Option<f64>,
    resistance: Option<f64>,
    outlook: Outlook,
    risk_appetite: RiskAppetite,
) -> Vec<StrategyCandidate> {
    let request = StrategyRequest::new(spot, outlook, risk_appetite).with_levels(atm_strike, support, resistance);
    StrategyGenerator::default().suggest(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskLabel;
    use common::{OptionType, Side};

    fn request(outlook: Outlook, risk: RiskAppetite) -> StrategyRequest {
        StrategyRequest::new(24000.0, outlook, risk).with_levels(Some(24000.0), Some(23800.0), Some(24200.0))
    }

    fn names(candidates: &[StrategyCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.name.as_str()).collect()
    }

    fn legs(candidate: &StrategyCandidate) -> Vec<(Side, OptionType, f64)> {
        candidate.legs.iter().map(|l| (l.side, l.option_type, l.strike)).collect()
    }

    #[test]
    fn test_every_pair_is_non_empty_and_deterministic() {
        let generator = StrategyGenerator::default();

        for outlook in Outlook::ALL {
            for risk in RiskAppetite::ALL {
                let first = generator.suggest(&request(outlook, risk));
                let second = generator.suggest(&request(outlook, risk));

                assert!(!first.is_empty(), "{:?}/{:?}", outlook, risk);
                assert_eq!(first, second);
                assert!(first.iter().all(|c| c.confidence <= 100 && !c.legs.is_empty()));
            }
        }
    }

    #[test]
    fn test_template_order() {
        let generator = StrategyGenerator::default();
        let suggest = |o, r| generator.suggest(&request(o, r));

        assert_eq!(
            names(&suggest(Outlook::Bullish, RiskAppetite::Conservative)),
            vec!["Bull Put Spread", "Bull Call Spread"]
        );
        assert_eq!(
            names(&suggest(Outlook::Bearish, RiskAppetite::Aggressive)),
            vec!["Long OTM Put", "Naked ATM Call Sell"]
        );
        assert_eq!(
            names(&suggest(Outlook::Neutral, RiskAppetite::Conservative)),
            vec!["Iron Condor", "Short Strangle", "Iron Butterfly"]
        );
        assert_eq!(
            names(&suggest(Outlook::Neutral, RiskAppetite::Aggressive)),
            vec!["Short Strangle", "Iron Butterfly", "Short Straddle"]
        );
    }

    #[test]
    fn test_short_strangle_at_levels() {
        let candidates = suggest(
            24000.0,
            Some(24000.0),
            Some(23800.0),
            Some(24200.0),
            Outlook::Neutral,
            RiskAppetite::Moderate,
        );

        let strangle = candidates.iter().find(|c| c.name == "Short Strangle").unwrap();

        assert_eq!(
            legs(strangle),
            vec![(Side::Sell, OptionType::Put, 23800.0), (Side::Sell, OptionType::Call, 24200.0)]
        );
        assert_eq!(strangle.confidence, 65);
    }

    #[test]
    fn test_aggressive_naked_sell_is_very_high_risk() {
        let candidates = suggest(24000.0, None, None, None, Outlook::Bullish, RiskAppetite::Aggressive);

        let naked = &candidates[1];
        assert_eq!(naked.name, "Naked ATM Put Sell");
        assert_eq!(naked.risk, RiskLabel::VeryHigh);
        assert_eq!(naked.risk.to_string(), "Very High");
        assert_eq!(naked.legs[0].strike, 24000.0);
    }

    #[test]
    fn test_fallbacks_for_missing_levels() {
        let generator = StrategyGenerator::default();
        let req = StrategyRequest::new(24030.0, Outlook::Neutral, RiskAppetite::Moderate)
            .with_levels(None, Some(-1.0), None);

        let strikes = generator.resolve_strikes(&req).unwrap();

        assert_eq!(strikes.atm, 24050.0);
        assert_eq!(strikes.support, 24050.0 - 250.0);
        assert_eq!(strikes.resistance, 24050.0 + 250.0);
        assert_eq!(strikes.near, 100.0);
    }

    #[test]
    fn test_supplied_levels_kept_on_either_side_of_atm() {
        let generator = StrategyGenerator::default();
        let req = StrategyRequest::new(23700.0, Outlook::Neutral, RiskAppetite::Moderate).with_levels(
            Some(23700.0),
            Some(23800.0),
            Some(23650.0),
        );

        let strikes = generator.resolve_strikes(&req).unwrap();

        assert_eq!(strikes.support, 23800.0);
        assert_eq!(strikes.resistance, 23650.0);
        assert!(!strikes.has_downside_room());
        assert!(!strikes.has_upside_room());
        assert!(!strikes.levels_ordered());
    }

    #[test]
    fn test_support_at_atm_anchors_the_strangle() {
        let candidates = suggest(
            24000.0,
            Some(24000.0),
            Some(24000.0),
            Some(24200.0),
            Outlook::Neutral,
            RiskAppetite::Moderate,
        );

        assert_eq!(names(&candidates), vec!["Short Strangle", "Iron Butterfly"]);
        assert_eq!(
            legs(&candidates[0]),
            vec![(Side::Sell, OptionType::Put, 24000.0), (Side::Sell, OptionType::Call, 24200.0)]
        );
    }

    #[test]
    fn test_support_above_atm_after_sell_off() {
        let bullish = suggest(
            23700.0,
            Some(23700.0),
            Some(23800.0),
            Some(24200.0),
            Outlook::Bullish,
            RiskAppetite::Conservative,
        );

        assert_eq!(names(&bullish), vec!["Bull Put Spread", "Bull Call Spread"]);
        assert_eq!(
            legs(&bullish[0]),
            vec![(Side::Sell, OptionType::Put, 23800.0), (Side::Buy, OptionType::Put, 23700.0)]
        );

        // No room below ATM for a bear put spread toward support
        let bearish = suggest(
            23700.0,
            Some(23700.0),
            Some(23800.0),
            Some(24200.0),
            Outlook::Bearish,
            RiskAppetite::Conservative,
        );
        assert_eq!(names(&bearish), vec!["Bear Call Spread"]);
    }

    #[test]
    fn test_crossed_levels_leave_only_atm_structures() {
        let candidates = suggest(
            24200.0,
            Some(24200.0),
            Some(24300.0),
            Some(24100.0),
            Outlook::Neutral,
            RiskAppetite::Conservative,
        );

        assert_eq!(names(&candidates), vec!["Iron Butterfly"]);
    }

    #[test]
    fn test_low_spot_never_yields_non_positive_strikes() {
        let candidates = suggest(120.0, None, None, None, Outlook::Bullish, RiskAppetite::Conservative);

        // Bull put hedge would land below zero
        assert_eq!(names(&candidates), vec!["Bull Call Spread"]);
        assert_eq!(
            legs(&candidates[0]),
            vec![(Side::Buy, OptionType::Call, 100.0), (Side::Sell, OptionType::Call, 350.0)]
        );

        for outlook in Outlook::ALL {
            for risk in RiskAppetite::ALL {
                for spot in [1.0, 20.0, 120.0, 260.0] {
                    let candidates = suggest(spot, None, None, None, outlook, risk);
                    assert!(
                        candidates.iter().flat_map(|c| &c.legs).all(|l| l.strike > 0.0),
                        "{:?}/{:?} at {}",
                        outlook,
                        risk,
                        spot
                    );
                }
            }
        }
    }

    #[test]
    fn test_low_spot_priced_legs_all_carry_premiums() {
        let generator = StrategyGenerator::default();
        let request = StrategyRequest::new(120.0, Outlook::Neutral, RiskAppetite::Aggressive);
        let pricing = PricingInputs {
            spot: 120.0,
            strike: 120.0,
            days_to_expiry: 7.0,
            volatility_pct: 30.0,
            risk_free_rate_pct: 6.5,
            option_type: OptionType::Call,
        };

        let candidates = generator.suggest_priced(&request, &pricing);

        assert_eq!(names(&candidates), vec!["Short Strangle", "Short Straddle"]);
        assert!(candidates.iter().all(|c| c.net_premium.is_some()));
    }

    #[test]
    fn test_round_to_strike_ties_down() {
        assert_eq!(round_to_strike(24025.0, 50.0), 24000.0);
        assert_eq!(round_to_strike(24025.1, 50.0), 24050.0);
        assert_eq!(round_to_strike(52049.0, 100.0), 52000.0);
        assert_eq!(round_to_strike(52051.0, 100.0), 52100.0);
    }

    #[test]
    fn test_strike_step_and_offsets_from_config() {
        let generator = StrategyGenerator::new(StrategyConfig {
            near_offset_steps: 1,
            far_offset_steps: 3,
        });
        let req = StrategyRequest::new(52000.0, Outlook::Bullish, RiskAppetite::Moderate).with_strike_step(100.0);

        let candidates = generator.suggest(&req);

        assert_eq!(candidates[1].name, "Long OTM Call");
        assert_eq!(candidates[1].legs[0].strike, 52100.0);
        // Bull Call Spread sells at the fallback resistance
        assert_eq!(candidates[0].legs[1].strike, 52300.0);
    }

    #[test]
    fn test_unusable_spot_yields_nothing() {
        let candidates = suggest(f64::NAN, None, None, None, Outlook::Neutral, RiskAppetite::Moderate);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_priced_candidates_carry_premiums() {
        let generator = StrategyGenerator::default();
        let pricing = PricingInputs {
            spot: 24000.0,
            strike: 24000.0,
            days_to_expiry: 7.0,
            volatility_pct: 15.0,
            risk_free_rate_pct: 6.5,
            option_type: OptionType::Call,
        };

        let candidates = generator.suggest_priced(&request(Outlook::Neutral, RiskAppetite::Moderate), &pricing);

        let strangle = &candidates[0];
        assert!(strangle.legs.iter().all(|l| l.estimated_premium.is_some_and(|p| p > 0.0)));
        assert!(strangle.is_credit());

        let net: f64 = strangle.legs.iter().filter_map(|l| l.estimated_premium).sum();
        assert!((strangle.net_premium.unwrap() - net).abs() < 1e-9);
    }

    #[test]
    fn test_debit_spread_has_negative_net_premium() {
        let generator = StrategyGenerator::default();
        let pricing = PricingInputs {
            spot: 24000.0,
            strike: 24000.0,
            days_to_expiry: 7.0,
            volatility_pct: 15.0,
            risk_free_rate_pct: 6.5,
            option_type: OptionType::Call,
        };

        let candidates = generator.suggest_priced(&request(Outlook::Bullish, RiskAppetite::Moderate), &pricing);

        assert_eq!(candidates[0].name, "Bull Call Spread");
        assert!(candidates[0].net_premium.unwrap() < 0.0);
        // Single long call is a pure debit
        assert!(!candidates[1].is_credit());
    }

    #[test]
    fn test_candidate_json() {
        let candidates = suggest(
            24000.0,
            Some(24000.0),
            Some(23800.0),
            Some(24200.0),
            Outlook::Bearish,
            RiskAppetite::Conservative,
        );
        let json = serde_json::to_value(&candidates[0]).unwrap();

        assert_eq!(json["name"], "Bear Call Spread");
        assert_eq!(json["legs"][0]["side"], "sell");
        assert_eq!(json["legs"][0]["option_type"], "CE");
        assert_eq!(json["risk"], "Low");
        assert!(json.get("net_premium").is_none());
    }
}
