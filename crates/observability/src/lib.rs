//! Observability infrastructure for Optix
//!
//! Structured logging via `tracing`. Log output goes to stderr so that
//! command output on stdout stays machine-readable.
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("optix", LogFormat::Pretty)?;
//! ```

pub mod logging;

pub use logging::{init_logging, init_logging_with_level, LogFormat};
