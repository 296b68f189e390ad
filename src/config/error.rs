//! Configuration error types.

use crate::perf::HarnessError;
use thiserror::Error;

/// Errors in run options, raised before any timed work.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A duration could not be parsed.
    #[error("invalid duration '{input}': {message}")]
    InvalidDuration {
        /// Raw input.
        input: String,
        /// Why it was rejected.
        message: String,
    },

    /// A parameter override could not be parsed or carries a bad value.
    #[error("invalid parameter override '{input}': {message}")]
    InvalidParam {
        /// Raw input.
        input: String,
        /// Why it was rejected.
        message: String,
    },

    /// Option validation failed.
    #[error("configuration validation failed: {0}")]
    ValidationError(String),

    /// The harness rejected the options.
    #[error(transparent)]
    Harness(#[from] HarnessError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
