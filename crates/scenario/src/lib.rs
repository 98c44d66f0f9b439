//! Scenario Classifier for Optix
//!
//! Maps qualitative chain observations to one of nine predefined market
//! scenarios per table, each carrying a bias, a risk level, expected day
//! extremes and a recommended action.
//!
//! - COA 1.0 is keyed on support strength × resistance strength
//! - COA 2.0 is keyed on call-OI trend × put-OI trend
//!
//! Both tables are total over their key space. Non-tradable rows are
//! ordinary matches with `tradable == false`; [`ScenarioMatch::NoMatch`]
//! is reserved for keys no row answers.

pub mod coa;
pub mod types;

pub use coa::{all_v1, all_v2, classify1, classify2, ScenarioRow, SCENARIOS_V1, SCENARIOS_V2};
pub use types::*;
