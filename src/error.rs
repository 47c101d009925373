//! Error types for the memoizer
//!
//! Only construction and configuration can fail inside the crate. Failures of
//! a memoized computation are returned to the caller as they are.

use thiserror::Error;

// == Memoizer Error Enum ==
/// Unified error type for building a memoizer.
#[derive(Error, Debug)]
pub enum MemoizerError {
    /// A configuration value could not be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration document could not be parsed
    #[error("Malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the memoizer.
pub type Result<T> = std::result::Result<T, MemoizerError>;
