//! Common error types for Optix

use thiserror::Error;

/// Error raised when parsing shared domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A textual value did not name any known variant
    #[error("Unknown {kind}: {value} (expected {expected})")]
    UnknownValue {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Result type alias using the common Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn unknown(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self::UnknownValue {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_value_message() {
        let err = Error::unknown("outlook", "sideways-ish", "bullish, bearish or neutral");
        assert_eq!(
            err.to_string(),
            "Unknown outlook: sideways-ish (expected bullish, bearish or neutral)"
        );
    }
}
