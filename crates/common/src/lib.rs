//! Common types and utilities for Optix
//!
//! This crate provides shared types and the common error used across
//! all Optix crates.
//!
//! # Modules
//!
//! - [`error`] - Common error types
//! - [`types`] - Shared domain types (Side, OptionType, Symbol)

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
