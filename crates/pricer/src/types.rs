//! Shared types for the Pricer

use common::OptionType;
use serde::{Deserialize, Serialize};

/// Days per year used to convert days-to-expiry into year fractions
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Inputs for Black-Scholes pricing, in the units a calculator form uses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInputs {
    /// Spot price of the underlying index
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    /// Calendar days to expiry (fractional days allowed)
    pub days_to_expiry: f64,
    /// Implied volatility in percent (15.0 = 15%)
    pub volatility_pct: f64,
    /// Annual risk-free rate in percent (6.5 = 6.5%)
    pub risk_free_rate_pct: f64,
    /// Option type
    pub option_type: OptionType,
}

impl PricingInputs {
    /// True when spot, strike and days are positive and every field is finite.
    ///
    /// Volatility and rate are allowed to be zero; volatility is floored
    /// internally so that the normal CDF saturates instead of dividing by zero.
    pub fn is_valid(&self) -> bool {
        let all_finite = self.spot.is_finite()
            && self.strike.is_finite()
            && self.days_to_expiry.is_finite()
            && self.volatility_pct.is_finite()
            && self.risk_free_rate_pct.is_finite();

        all_finite
            && self.spot > 0.0
            && self.strike > 0.0
            && self.days_to_expiry > 0.0
            && self.volatility_pct >= 0.0
    }

    /// Time to expiry in years
    pub fn time(&self) -> f64 {
        self.days_to_expiry / DAYS_PER_YEAR
    }

    /// Volatility as a decimal
    pub fn vol(&self) -> f64 {
        self.volatility_pct / 100.0
    }

    /// Risk-free rate as a decimal
    pub fn rate(&self) -> f64 {
        self.risk_free_rate_pct / 100.0
    }

    /// Same inputs for a different strike and option type
    pub fn with_leg(&self, strike: f64, option_type: OptionType) -> Self {
        Self {
            strike,
            option_type,
            ..*self
        }
    }
}

/// Theoretical premium and Greeks for one option leg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreeksResult {
    /// Theoretical premium, never below [`crate::black_scholes::MIN_PREMIUM`]
    pub price: f64,
    /// Delta: ∂V/∂S
    pub delta: f64,
    /// Gamma: ∂²V/∂S², identical for calls and puts
    pub gamma: f64,
    /// Theta per calendar day (negative for long options)
    pub theta: f64,
    /// Vega per 1 percentage point of implied volatility
    pub vega: f64,
    /// Rho per 1 percentage point of the risk-free rate
    pub rho: f64,
    /// Intrinsic value at the current spot
    pub intrinsic: f64,
    /// Premium above intrinsic value
    pub time_value: f64,
}
