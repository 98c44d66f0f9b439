//! Option Pricer for Optix
//!
//! Closed-form Black-Scholes valuation and Greeks for a single European
//! option leg, plus an implied-volatility solver.
//!
//! # Core Components
//!
//! - [`black_scholes`] - Pricing, Greeks, normal CDF/PDF and implied volatility
//! - [`types`] - Calculator inputs and the Greeks result
//!
//! # Key Invariants
//!
//! - Invalid inputs (non-positive spot, strike or days) yield `None`, never a panic
//! - The normal CDF saturates to 0/1, so vanishing volatility or time never yields NaN
//! - Reported premiums are never below 0.01
//! - Every call is independent; nothing is cached between calls

pub mod black_scholes;
pub mod types;

pub use black_scholes::{greeks, implied_volatility, intrinsic_value, price_and_greeks, theoretical_price};
pub use types::{GreeksResult, PricingInputs};
