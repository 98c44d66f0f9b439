//! Option-chain error types

use thiserror::Error;

/// Errors raised while decoding or constructing a chain snapshot
#[derive(Error, Debug)]
pub enum ChainError {
    /// Snapshot JSON could not be decoded
    #[error("Failed to decode option chain: {0}")]
    Decode(#[from] serde_json::Error),

    /// Snapshot violates a structural invariant
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// The same strike appears in more than one row
    #[error("Duplicate strike {0} in snapshot")]
    DuplicateStrike(f64),

    /// A strike is NaN, infinite or not positive
    #[error("Strike must be a positive finite number, got {0}")]
    InvalidStrike(f64),
}
