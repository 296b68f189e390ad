//! Harness error types.

use thiserror::Error;

/// Errors raised while building a benchmark fixture.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The requested fixture cannot address every probe position.
    #[error("fixture of {size} elements is too small, need at least {min}")]
    TooSmall {
        /// Requested fixture size.
        size: usize,
        /// Smallest size the suite accepts.
        min: usize,
    },

    /// The suite declares a parameter but none was supplied.
    #[error("missing value for parameter '{0}'")]
    MissingParam(&'static str),

    /// Any other fixture construction failure.
    #[error("{0}")]
    Failed(String),
}

/// Errors that stop a run before any timed work begins.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A parameter override carries an unusable value.
    #[error("invalid value for parameter '{name}': {message}")]
    InvalidParam {
        /// Parameter name.
        name: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A parameter override names a parameter no selected suite declares.
    #[error("no selected benchmark declares parameter '{0}'")]
    UnknownParam(String),

    /// The measurement policy cannot produce a result.
    #[error("invalid benchmark configuration: {0}")]
    InvalidConfig(String),

    /// A selection pattern is not a valid regular expression.
    #[error("invalid benchmark pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The selection patterns matched nothing.
    #[error("no benchmarks match {0:?}")]
    NoMatch(Vec<String>),
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
