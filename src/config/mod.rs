//! # Run Configuration
//!
//! Command-line options for the harness: selection patterns, measurement
//! policy overrides, parameter overrides, seeding and output format.
//! Options are validated before any benchmark runs.
//!
//! ## Example
//!
//! ```text
//! collection-bench 'Filter.*union' -i 3 -r 200ms -p size=10,100 --seed 7
//! ```

mod error;
mod types;
mod validation;

pub use error::{ConfigError, ConfigResult};
pub use types::{parse_duration, LogFormat, LoggingConfig, OutputFormat, ParamOverride, RunOptions};
pub use validation::{
    ParamValidator, PolicyValidator, ValidationError, ValidationResult, ValidationSeverity,
    Validator,
};
