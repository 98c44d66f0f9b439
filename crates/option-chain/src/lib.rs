//! Option Chain Analytics for Optix
//!
//! # Core Components
//!
//! - [`types`] - Snapshot model: strike rows and per-side quotes
//! - [`nse`] - Decoding of NSE option-chain API responses
//! - [`aggregator`] - Support/resistance, PCR, OI-change buckets and max pain
//! - [`trend`] - OI trends and level strength, the COA table inputs
//! - [`buildup`] - Long/short build-up, covering and unwinding per strike
//!
//! # Key Invariants
//!
//! - Snapshot rows are sorted ascending by strike and strikes are unique
//! - Ties (ATM distance, max OI) always resolve to the lower strike
//! - Put-call ratios are 0 when the call-side total is 0
//! - An empty chain yields `None` levels, never a panic

pub mod aggregator;
pub mod buildup;
pub mod error;
pub mod nse;
pub mod trend;
pub mod types;

pub use aggregator::{
    aggregate, max_pain, ChainAggregator, ChainAnalysis, LevelSet, OiChangeBuckets, Sentiment,
    SideOiChange,
};
pub use buildup::{buildups, Buildup, StrikeBuildup};
pub use error::ChainError;
pub use trend::{derive_scenario_key, derive_scenario_key2, level_strength, oi_trend};
pub use types::{OptionChainSnapshot, OptionLegQuote, StrikeRow};

pub type Result<T> = std::result::Result<T, ChainError>;
