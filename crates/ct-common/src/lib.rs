//! ctree common types and errors.
//!
//! This crate provides foundational types shared across the ct-* crates:
//! - The alphabet bijection between symbols and dense indices
//! - Common error types with stable codes
//! - Output format specifications

pub mod alphabet;
pub mod error;
pub mod output;

pub use alphabet::Alphabet;
pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;

/// Schema version stamped on every report this workspace emits.
pub const SCHEMA_VERSION: &str = "1.0.0";
