//! Run option validation.

use super::types::RunOptions;
use std::collections::HashSet;
use std::time::Duration;

/// A single validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The option that failed validation.
    pub field: String,
    /// Error message.
    pub message: String,
    /// Severity level.
    pub severity: ValidationSeverity,
}

impl ValidationError {
    /// Create a new error.
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }

    /// Create a new warning.
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }
}

/// Severity of validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    /// The options cannot be run.
    Error,
    /// The options run, but the numbers may not mean much.
    Warning,
}

/// Result of option validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty (valid) result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Check if the validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self
            .errors
            .iter()
            .any(|e| e.severity == ValidationSeverity::Error)
    }

    /// Get all validation issues.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get only errors (not warnings).
    #[must_use]
    pub fn errors_only(&self) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ValidationSeverity::Error)
            .collect()
    }

    /// Get only warnings.
    #[must_use]
    pub fn warnings(&self) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ValidationSeverity::Warning)
            .collect()
    }

    /// Merge another validation result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }
}

/// Trait for run option validators.
pub trait Validator: std::fmt::Debug + Send + Sync {
    /// Validate the options and return any issues.
    fn validate(&self, options: &RunOptions) -> ValidationResult;
}

/// Flags policy overrides that run but produce questionable numbers.
///
/// Hard errors such as zero forks are left to
/// [`BenchmarkConfig::validate`](crate::perf::BenchmarkConfig::validate).
#[derive(Debug, Default)]
pub struct PolicyValidator;

impl PolicyValidator {
    /// Create a new policy validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Validator for PolicyValidator {
    fn validate(&self, options: &RunOptions) -> ValidationResult {
        let mut result = ValidationResult::new();

        if options.warmup_iterations == Some(0) {
            result.add_error(ValidationError::warning(
                "warmup_iterations",
                "Running without warm-up, early iterations will include cold caches",
            ));
        } else if options.warmup_time == Some(Duration::ZERO) {
            result.add_error(ValidationError::warning(
                "warmup_time",
                "Zero-length warm-up iterations run the body only once each",
            ));
        }
        if let (Some(threads), Ok(cores)) = (options.threads, std::thread::available_parallelism())
        {
            if threads > cores.get() {
                result.add_error(ValidationError::warning(
                    "threads",
                    format!("{threads} threads exceed the {cores} available cores"),
                ));
            }
        }

        result
    }
}

/// Checks parameter overrides for conflicts.
#[derive(Debug, Default)]
pub struct ParamValidator;

impl ParamValidator {
    /// Create a new parameter validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Validator for ParamValidator {
    fn validate(&self, options: &RunOptions) -> ValidationResult {
        let mut result = ValidationResult::new();
        let mut seen = HashSet::new();

        for param in &options.params {
            if !seen.insert(param.name.as_str()) {
                result.add_error(ValidationError::error(
                    format!("param.{}", param.name),
                    format!("Parameter '{}' is overridden more than once", param.name),
                ));
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParamOverride;

    #[test]
    fn test_default_options_valid() {
        let options = RunOptions::default();
        assert!(PolicyValidator::new().validate(&options).is_valid());
        assert!(ParamValidator::new().validate(&options).is_valid());
    }

    #[test]
    fn test_zero_counts_left_to_harness() {
        let options = RunOptions {
            iterations: Some(0),
            forks: Some(0),
            threads: Some(0),
            time: Some(Duration::ZERO),
            ..Default::default()
        };
        let result = PolicyValidator::new().validate(&options);
        assert!(result.is_valid());
        assert!(result.errors_only().is_empty());
    }

    #[test]
    fn test_zero_warmup_time_is_warning() {
        let options = RunOptions {
            warmup_time: Some(Duration::ZERO),
            ..Default::default()
        };
        let result = PolicyValidator::new().validate(&options);
        assert!(result.is_valid());
        assert_eq!(result.warnings()[0].field, "warmup_time");
    }

    #[test]
    fn test_zero_warmup_is_warning() {
        let options = RunOptions {
            warmup_iterations: Some(0),
            ..Default::default()
        };
        let result = PolicyValidator::new().validate(&options);
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
        assert_eq!(result.warnings()[0].field, "warmup_iterations");
    }

    #[test]
    fn test_duplicate_params_rejected() {
        let param = ParamOverride {
            name: "size".to_string(),
            values: vec![10],
        };
        let options = RunOptions {
            params: vec![param.clone(), param],
            ..Default::default()
        };
        let result = ParamValidator::new().validate(&options);
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].field, "param.size");
    }

    #[test]
    fn test_merge() {
        let mut result = ValidationResult::new();
        result.add_error(ValidationError::warning("a", "warn"));
        let mut other = ValidationResult::new();
        other.add_error(ValidationError::error("b", "fail"));
        result.merge(other);
        assert_eq!(result.errors().len(), 2);
        assert!(!result.is_valid());
    }
}
