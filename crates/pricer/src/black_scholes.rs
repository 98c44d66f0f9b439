use std::f64::consts::{PI, SQRT_2};

use common::OptionType;
use tracing::trace;

use crate::types::{GreeksResult, PricingInputs};

/// One second, in years. Time to expiry is floored here before pricing.
pub const MIN_TIME: f64 = 1.0 / (365.0 * 24.0 * 3600.0);
/// Volatility floor (decimal); keeps σ√T positive so d1/d2 saturate instead of dividing by zero.
pub const MIN_VOL: f64 = 1e-6;
/// Smallest premium ever reported.
pub const MIN_PREMIUM: f64 = 0.01;
/// Implied volatility search bounds (decimal).
pub const MIN_IMPLIED_VOL: f64 = 0.01;
pub const MAX_IMPLIED_VOL: f64 = 5.0;

const IV_TOLERANCE: f64 = 1e-6;
const IV_MAX_NEWTON_STEPS: usize = 100;
const IV_MAX_BISECTION_STEPS: usize = 200;

pub fn norm_pdf(x: f64) -> f64 {
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * x * x).exp()
}

/// Error function, Abramowitz & Stegun 7.1.26 (|error| < 1.5e-7).
///
/// Odd by construction, so `norm_cdf(x) + norm_cdf(-x) == 1` holds exactly.
pub fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

/// Standard normal CDF via `Φ(x) = ½(1 + erf(x/√2))`. Saturates to 0/1 for large |x|.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Time (years) and volatility (decimal) after the degenerate-input floors.
fn floored_time_and_vol(input: &PricingInputs) -> (f64, f64) {
    (input.time().max(MIN_TIME), input.vol().max(MIN_VOL))
}

pub fn d1_d2(input: &PricingInputs) -> (f64, f64) {
    let (t, v) = floored_time_and_vol(input);
    let s = input.spot;
    let k = input.strike;
    let r = input.rate();

    let vol_sqrt_t = v * t.sqrt();
    let d1 = ((s / k).ln() + (r + 0.5 * v * v) * t) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;

    (d1, d2)
}

/// Unfloored Black-Scholes value. Callers must have validated the inputs.
pub fn theoretical_price(input: &PricingInputs) -> f64 {
    let (d1, d2) = d1_d2(input);
    let (t, _) = floored_time_and_vol(input);
    let s = input.spot;
    let k = input.strike;
    let discount = (-input.rate() * t).exp();

    let price = match input.option_type {
        OptionType::Call => s * norm_cdf(d1) - k * discount * norm_cdf(d2),
        OptionType::Put => k * discount * norm_cdf(-d2) - s * norm_cdf(-d1),
    };

    price.max(0.0)
}

pub fn intrinsic_value(spot: f64, strike: f64, option_type: OptionType) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

/// Premium and Greeks for one European leg.
///
/// Returns `None` for non-positive spot, strike or days (or any non-finite
/// input) so a half-filled calculator form never shows stale numbers.
pub fn price_and_greeks(
    spot: f64,
    strike: f64,
    days_to_expiry: f64,
    volatility_pct: f64,
    risk_free_rate_pct: f64,
    option_type: OptionType,
) -> Option<GreeksResult> {
    greeks(&PricingInputs {
        spot,
        strike,
        days_to_expiry,
        volatility_pct,
        risk_free_rate_pct,
        option_type,
    })
}

pub fn greeks(input: &PricingInputs) -> Option<GreeksResult> {
    if !input.is_valid() {
        trace!(?input, "pricing inputs rejected");
        return None;
    }

    let (d1, d2) = d1_d2(input);
    let (t, v) = floored_time_and_vol(input);
    let s = input.spot;
    let k = input.strike;
    let discount = (-input.rate() * t).exp();

    let pdf = norm_pdf(d1);
    let sqrt_t = t.sqrt();

    let delta = match input.option_type {
        OptionType::Call => norm_cdf(d1),
        OptionType::Put => norm_cdf(d1) - 1.0,
    };

    let gamma = pdf / (s * v * sqrt_t);

    let theta = -(s * v * pdf) / (2.0 * sqrt_t) / 365.0;

    let vega = s * sqrt_t * pdf / 100.0;

    let rho = match input.option_type {
        OptionType::Call => k * t * discount * norm_cdf(d2) / 100.0,
        OptionType::Put => -k * t * discount * norm_cdf(-d2) / 100.0,
    };

    let price = theoretical_price(input).max(MIN_PREMIUM);
    let intrinsic = intrinsic_value(s, k, input.option_type);

    let result = GreeksResult {
        price,
        delta,
        gamma,
        theta,
        vega,
        rho,
        intrinsic,
        time_value: (price - intrinsic).max(0.0),
    };

    let finite = [
        result.price,
        result.delta,
        result.gamma,
        result.theta,
        result.vega,
        result.rho,
    ]
    .iter()
    .all(|x| x.is_finite());

    if finite {
        Some(result)
    } else {
        trace!(?input, "non-finite greeks discarded");
        None
    }
}

/// Solve for the implied volatility (in percent) that reproduces `market_price`.
///
/// `input.volatility_pct` is ignored. Newton-Raphson on vega first, bisection
/// over [`MIN_IMPLIED_VOL`, `MAX_IMPLIED_VOL`] when Newton leaves the bounds
/// or stalls. Returns `None` when the price violates no-arbitrage bounds.
pub fn implied_volatility(market_price: f64, input: &PricingInputs) -> Option<f64> {
    let mut input = *input;
    input.volatility_pct = MIN_IMPLIED_VOL * 100.0;
    if !input.is_valid() || !market_price.is_finite() || market_price <= 0.0 {
        return None;
    }

    let t = input.time().max(MIN_TIME);
    let discounted_strike = input.strike * (-input.rate() * t).exp();
    let (lower, upper) = match input.option_type {
        OptionType::Call => ((input.spot - discounted_strike).max(0.0), input.spot),
        OptionType::Put => ((discounted_strike - input.spot).max(0.0), discounted_strike),
    };
    if market_price <= lower || market_price >= upper {
        trace!(market_price, lower, upper, "market price outside no-arbitrage bounds");
        return None;
    }

    let price_at = |vol: f64, input: &mut PricingInputs| {
        input.volatility_pct = vol * 100.0;
        theoretical_price(input)
    };

    let mut vol = 0.2;
    for _ in 0..IV_MAX_NEWTON_STEPS {
        let diff = price_at(vol, &mut input) - market_price;
        if diff.abs() < IV_TOLERANCE {
            return Some(vol * 100.0);
        }

        let (d1, _) = d1_d2(&input);
        let vega = input.spot * t.sqrt() * norm_pdf(d1);
        if vega.abs() < 1e-8 {
            break;
        }

        vol -= diff / vega;
        if !(MIN_IMPLIED_VOL..=MAX_IMPLIED_VOL).contains(&vol) {
            break;
        }
    }

    let mut lo = MIN_IMPLIED_VOL;
    let mut hi = MAX_IMPLIED_VOL;
    if price_at(lo, &mut input) > market_price || price_at(hi, &mut input) < market_price {
        return None;
    }

    for _ in 0..IV_MAX_BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        let diff = price_at(mid, &mut input) - market_price;
        if diff.abs() < IV_TOLERANCE || (hi - lo) < 1e-10 {
            return Some(mid * 100.0);
        }
        if diff > 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    Some(0.5 * (lo + hi) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nifty_atm(option_type: OptionType) -> PricingInputs {
        PricingInputs {
            spot: 24000.0,
            strike: 24000.0,
            days_to_expiry: 7.0,
            volatility_pct: 15.0,
            risk_free_rate_pct: 6.5,
            option_type,
        }
    }

    #[test]
    fn test_atm_weekly_call() {
        let g = price_and_greeks(24000.0, 24000.0, 7.0, 15.0, 6.5, OptionType::Call).unwrap();

        assert!((g.delta - 0.52).abs() <= 0.05, "delta = {}", g.delta);
        assert!(g.price > 0.0);
        assert!(g.gamma > 0.0);
        assert!(g.vega > 0.0);
        assert!(g.theta < 0.0);
    }

    #[test]
    fn test_invalid_inputs_return_none() {
        assert!(price_and_greeks(0.0, 24000.0, 7.0, 15.0, 6.5, OptionType::Call).is_none());
        assert!(price_and_greeks(24000.0, -1.0, 7.0, 15.0, 6.5, OptionType::Call).is_none());
        assert!(price_and_greeks(24000.0, 24000.0, 0.0, 15.0, 6.5, OptionType::Put).is_none());
        assert!(price_and_greeks(f64::NAN, 24000.0, 7.0, 15.0, 6.5, OptionType::Put).is_none());
        assert!(price_and_greeks(24000.0, 24000.0, 7.0, f64::INFINITY, 6.5, OptionType::Put).is_none());
    }

    #[test]
    fn test_put_call_parity() {
        for &(spot, strike, days) in &[
            (24000.0, 24000.0, 7.0),
            (24000.0, 23500.0, 30.0),
            (51000.0, 52000.0, 14.0),
        ] {
            let call = price_and_greeks(spot, strike, days, 15.0, 6.5, OptionType::Call).unwrap();
            let put = price_and_greeks(spot, strike, days, 15.0, 6.5, OptionType::Put).unwrap();

            let t = days / 365.0;
            let parity_rhs = spot - strike * (-0.065 * t).exp();

            assert!(
                (call.price - put.price - parity_rhs).abs() < 1e-3,
                "parity broken at S={} K={}",
                spot,
                strike
            );
        }
    }

    #[test]
    fn test_delta_bounds() {
        for &strike in &[20000.0, 23000.0, 24000.0, 25000.0, 30000.0] {
            for &vol in &[0.0, 5.0, 15.0, 60.0] {
                let call = price_and_greeks(24000.0, strike, 10.0, vol, 6.5, OptionType::Call).unwrap();
                let put = price_and_greeks(24000.0, strike, 10.0, vol, 6.5, OptionType::Put).unwrap();

                assert!((0.0..=1.0).contains(&call.delta));
                assert!((-1.0..=0.0).contains(&put.delta));
            }
        }
    }

    #[test]
    fn test_gamma_and_vega_match_for_call_and_put() {
        let call = greeks(&nifty_atm(OptionType::Call)).unwrap();
        let put = greeks(&nifty_atm(OptionType::Put)).unwrap();

        assert_eq!(call.gamma, put.gamma);
        assert_eq!(call.vega, put.vega);
        assert_eq!(call.theta, put.theta);
    }

    #[test]
    fn test_zero_vol_prices_discounted_intrinsic() {
        let g = price_and_greeks(24000.0, 23000.0, 30.0, 0.0, 6.5, OptionType::Call).unwrap();
        let discounted_intrinsic = 24000.0 - 23000.0 * (-0.065_f64 * 30.0 / 365.0).exp();

        assert!((g.price - discounted_intrinsic).abs() < 1e-6);
        assert_eq!(g.delta, 1.0);
        assert!(g.gamma.is_finite());
        assert!(g.theta.is_finite());
    }

    #[test]
    fn test_zero_vol_otm_floors_premium() {
        let g = price_and_greeks(24000.0, 25000.0, 30.0, 0.0, 6.5, OptionType::Call).unwrap();

        assert_eq!(g.price, MIN_PREMIUM);
        assert_eq!(g.delta, 0.0);
        assert!(g.gamma.is_finite());
    }

    #[test]
    fn test_near_expiry_prices_intrinsic() {
        let call = price_and_greeks(24000.0, 23500.0, 1e-6, 15.0, 6.5, OptionType::Call).unwrap();
        let put = price_and_greeks(24000.0, 24500.0, 1e-6, 15.0, 6.5, OptionType::Put).unwrap();

        assert!((call.price - 500.0).abs() < 0.01);
        assert!((put.price - 500.0).abs() < 0.01);
        assert!(call.theta.is_finite() && put.theta.is_finite());
    }

    #[test]
    fn test_deep_otm_put_never_shows_zero() {
        let g = price_and_greeks(24000.0, 18000.0, 2.0, 10.0, 6.5, OptionType::Put).unwrap();
        assert_eq!(g.price, MIN_PREMIUM);
    }

    #[test]
    fn test_intrinsic_and_time_value() {
        let g = price_and_greeks(24000.0, 23800.0, 7.0, 15.0, 6.5, OptionType::Call).unwrap();

        assert_eq!(g.intrinsic, 200.0);
        assert!((g.time_value - (g.price - 200.0)).abs() < 1e-9);
        assert_eq!(intrinsic_value(23000.0, 24000.0, OptionType::Call), 0.0);
        assert_eq!(intrinsic_value(23000.0, 24000.0, OptionType::Put), 1000.0);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        assert!((norm_cdf(0.5) + norm_cdf(-0.5) - 1.0).abs() < 1e-15);
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-8);
        assert!((norm_cdf(1.96) - 0.975).abs() < 1e-4);
    }

    #[test]
    fn test_norm_cdf_saturates() {
        assert_eq!(norm_cdf(40.0), 1.0);
        assert_eq!(norm_cdf(-40.0), 0.0);
        assert_eq!(norm_cdf(f64::INFINITY), 1.0);
        assert_eq!(norm_cdf(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_rho_sign() {
        let call = greeks(&nifty_atm(OptionType::Call)).unwrap();
        let put = greeks(&nifty_atm(OptionType::Put)).unwrap();

        assert!(call.rho > 0.0);
        assert!(put.rho < 0.0);
    }

    #[test]
    fn test_implied_vol_roundtrip() {
        for &option_type in &[OptionType::Call, OptionType::Put] {
            let mut input = nifty_atm(option_type);
            input.strike = 24200.0;
            input.volatility_pct = 18.0;

            let price = theoretical_price(&input);
            let iv = implied_volatility(price, &input).unwrap();

            assert!((iv - 18.0).abs() < 0.01, "iv = {}", iv);
        }
    }

    #[test]
    fn test_implied_vol_rejects_arbitrage_prices() {
        let input = nifty_atm(OptionType::Call);

        assert!(implied_volatility(0.0, &input).is_none());
        assert!(implied_volatility(25000.0, &input).is_none());

        let mut itm = input;
        itm.strike = 23000.0;
        assert!(implied_volatility(500.0, &itm).is_none());
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        let first = greeks(&nifty_atm(OptionType::Call));
        for _ in 0..100 {
            let _ = greeks(&nifty_atm(OptionType::Put));
        }
        assert_eq!(first, greeks(&nifty_atm(OptionType::Call)));
    }
}
