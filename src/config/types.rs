//! Run option type definitions.

use super::error::{ConfigError, ConfigResult};
use super::validation::{ParamValidator, PolicyValidator, Validator};
use crate::perf::{BenchmarkRunner, ConfigOverrides, Mode, TimeUnit};
use clap::{Args, ValueEnum};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Parse a duration such as `1s`, `500ms`, `250us` or `100ns`. A bare
/// number is read as seconds.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDuration`] on an unknown suffix or a
/// malformed number.
pub fn parse_duration(input: &str) -> ConfigResult<Duration> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(split);

    let invalid = |message: &str| ConfigError::InvalidDuration {
        input: input.to_string(),
        message: message.to_string(),
    };

    let value: f64 = number.parse().map_err(|_| invalid("expected a number"))?;
    let seconds = match suffix.trim() {
        "" | "s" => value,
        "ms" => value / 1e3,
        "us" => value / 1e6,
        "ns" => value / 1e9,
        "m" | "min" => value * 60.0,
        _ => return Err(invalid("unknown unit, expected ns, us, ms, s or min")),
    };
    Duration::try_from_secs_f64(seconds).map_err(|_| invalid("out of range"))
}

/// Override of a declared parameter's values, written `name=v1,v2,...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamOverride {
    /// Parameter name.
    pub name: String,
    /// Replacement values.
    pub values: Vec<usize>,
}

impl FromStr for ParamOverride {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: String| ConfigError::InvalidParam {
            input: s.to_string(),
            message,
        };

        let (name, values) = s
            .split_once('=')
            .ok_or_else(|| invalid("expected NAME=VALUE[,VALUE...]".to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("parameter name cannot be empty".to_string()));
        }

        let mut parsed = Vec::new();
        for raw in values.split(',').map(str::trim).filter(|v| !v.is_empty()) {
            let value: i64 = raw
                .parse()
                .map_err(|_| invalid(format!("'{raw}' is not an integer")))?;
            let value = usize::try_from(value)
                .map_err(|_| invalid(format!("{value} is negative, values must be >= 0")))?;
            parsed.push(value);
        }
        if parsed.is_empty() {
            return Err(invalid("no values given".to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            values: parsed,
        })
    }
}

/// Output format of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `Benchmark Mode Cnt Score Error Units` table.
    #[default]
    Table,
    /// Pretty-printed JSON report.
    Json,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    Pretty,
    /// Single-line output.
    #[default]
    Compact,
    /// JSON lines.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct LoggingConfig {
    /// Log filter directive, e.g. `debug` or `collection_bench=trace`
    /// (overrides `RUST_LOG`)
    #[arg(long = "log-level", value_name = "FILTER")]
    pub level: Option<String>,

    /// Log line format
    #[arg(long = "log-format", value_enum, default_value_t)]
    pub format: LogFormat,
}

/// Harness options taken from the command line.
#[derive(Debug, Clone, Default, Args)]
pub struct RunOptions {
    /// Regular expressions selecting benchmarks by `Suite.method`
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Measurement iterations
    #[arg(short = 'i', long)]
    pub iterations: Option<u32>,

    /// Measurement iteration time, e.g. 1s or 200ms
    #[arg(short = 'r', long, value_parser = parse_duration)]
    pub time: Option<Duration>,

    /// Warm-up iterations
    #[arg(long = "warmup-iterations")]
    pub warmup_iterations: Option<u32>,

    /// Warm-up iteration time
    #[arg(short = 'w', long = "warmup-time", value_parser = parse_duration)]
    pub warmup_time: Option<Duration>,

    /// Forks, each with freshly built fixtures
    #[arg(short = 'f', long)]
    pub forks: Option<u32>,

    /// Worker threads per fork, each with its own fixture
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Benchmark mode: avgt or thrpt
    #[arg(long)]
    pub mode: Option<Mode>,

    /// Output time unit: ns, us, ms or s
    #[arg(long = "time-unit")]
    pub time_unit: Option<TimeUnit>,

    /// Parameter override, e.g. size=10,100 (repeatable)
    #[arg(short = 'p', long = "param", value_name = "NAME=V1,V2")]
    pub params: Vec<ParamOverride>,

    /// Seed for reproducible fixtures
    #[arg(long)]
    pub seed: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl RunOptions {
    /// Policy overrides carried by these options.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            mode: self.mode,
            warmup_iterations: self.warmup_iterations,
            warmup_time: self.warmup_time,
            iterations: self.iterations,
            time: self.time,
            forks: self.forks,
            threads: self.threads,
            time_unit: self.time_unit,
        }
    }

    /// Validate the options and build a runner from them.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or a pattern is not a valid regex.
    pub fn build_runner(&self) -> ConfigResult<BenchmarkRunner> {
        let mut result = PolicyValidator::new().validate(self);
        result.merge(ParamValidator::new().validate(self));

        for warning in result.warnings() {
            warn!(field = %warning.field, "{}", warning.message);
        }
        if !result.is_valid() {
            let errors: Vec<String> = result
                .errors_only()
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            return Err(ConfigError::ValidationError(errors.join("; ")));
        }

        let mut runner = BenchmarkRunner::new()
            .with_patterns(&self.patterns)?
            .with_overrides(self.overrides())
            .with_seed(self.seed);
        for param in &self.params {
            runner = runner.with_param(param.name.clone(), param.values.clone());
        }
        Ok(runner)
    }
}
