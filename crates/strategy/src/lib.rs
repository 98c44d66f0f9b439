//! Strategy Generator for Optix
//!
//! A fixed rule table keyed on `(Outlook, RiskAppetite)` selects an ordered
//! list of multi-leg templates; strikes come from the ATM strike, the strike
//! step and the support/resistance levels of the chain.
//!
//! # Key Invariants
//!
//! - Every `(Outlook, RiskAppetite)` pair yields at least one candidate when ATM
//!   sits well above the bottom of the strike grid
//! - No leg is ever placed at or below a zero strike
//! - Output order is significant and deterministic
//! - Confidence is a fixed constant per template

pub mod generator;
pub mod templates;
pub mod types;

pub use generator::{round_to_strike, suggest, StrategyGenerator};
pub use templates::ResolvedStrikes;
pub use types::{Outlook, RiskAppetite, RiskLabel, StrategyCandidate, StrategyLeg, StrategyRequest};

#[cfg(test)]
mod tests {
    use super::*;
    use common::{OptionType, Side};
    use option_chain::{aggregate, OptionChainSnapshot, OptionLegQuote, StrikeRow};
    use pricer::price_and_greeks;

    fn quote(open_interest: u64) -> OptionLegQuote {
        OptionLegQuote {
            open_interest,
            ..Default::default()
        }
    }

    #[test]
    fn test_chain_levels_to_neutral_strangle() {
        let greeks = price_and_greeks(24000.0, 24000.0, 7.0, 15.0, 6.5, OptionType::Call).unwrap();
        assert!((greeks.delta - 0.52).abs() <= 0.05);
        assert!(greeks.price > 0.0);
        assert!(greeks.gamma > 0.0);

        let rows = vec![
            StrikeRow::new(23800.0, quote(10_000), quote(90_000)),
            StrikeRow::new(24000.0, quote(40_000), quote(40_000)),
            StrikeRow::new(24200.0, quote(100_000), quote(5_000)),
        ];
        let snapshot = OptionChainSnapshot::new("NIFTY", 24000.0, rows).unwrap();
        let levels = aggregate(&snapshot);

        assert_eq!(levels.support_strike, Some(23800.0));
        assert_eq!(levels.resistance_strike, Some(24200.0));

        let candidates = suggest(
            24000.0,
            levels.atm_strike,
            levels.support_strike,
            levels.resistance_strike,
            Outlook::Neutral,
            RiskAppetite::Moderate,
        );
        let strangle = candidates
            .iter()
            .find(|c| c.name == "Short Strangle")
            .expect("short strangle suggested");

        let legs: Vec<(Side, OptionType, f64)> =
            strangle.legs.iter().map(|l| (l.side, l.option_type, l.strike)).collect();
        assert!(legs.contains(&(Side::Sell, OptionType::Put, 23800.0)));
        assert!(legs.contains(&(Side::Sell, OptionType::Call, 24200.0)));
    }
}
