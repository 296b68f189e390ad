//! Benchmark runner.
//!
//! Selects benchmarks by pattern, resolves parameter values, builds one
//! fixture per phase and collects every entry into a [`Report`].

use super::benchmark::{
    measure, BenchMethod, BenchmarkConfig, Mode, Param, ParamValue, Suite, TimeUnit, Window,
};
use super::error::{HarnessError, HarnessResult, SetupError};
use super::report::{Outcome, Report, RunResult};
use super::stats::Statistics;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Partial measurement policy applied on top of a suite's own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    /// Score mode.
    pub mode: Option<Mode>,
    /// Warm-up iteration count.
    pub warmup_iterations: Option<u32>,
    /// Warm-up iteration time.
    pub warmup_time: Option<Duration>,
    /// Measurement iteration count.
    pub iterations: Option<u32>,
    /// Measurement iteration time.
    pub time: Option<Duration>,
    /// Fork count.
    pub forks: Option<u32>,
    /// Worker threads.
    pub threads: Option<usize>,
    /// Output unit.
    pub time_unit: Option<TimeUnit>,
}

impl ConfigOverrides {
    /// Merge these overrides into `config`.
    #[must_use]
    pub fn apply(&self, config: BenchmarkConfig) -> BenchmarkConfig {
        BenchmarkConfig {
            mode: self.mode.unwrap_or(config.mode),
            warmup: Window::new(
                self.warmup_iterations.unwrap_or(config.warmup.iterations),
                self.warmup_time.unwrap_or(config.warmup.time),
            ),
            measurement: Window::new(
                self.iterations.unwrap_or(config.measurement.iterations),
                self.time.unwrap_or(config.measurement.time),
            ),
            forks: self.forks.unwrap_or(config.forks),
            threads: self.threads.unwrap_or(config.threads),
            time_unit: self.time_unit.unwrap_or(config.time_unit),
        }
    }
}

/// Object-safe view of a [`Suite`], so suites with different fixture types
/// can be listed and run together.
pub trait SuiteRunner {
    /// Suite name.
    fn suite_name(&self) -> &'static str;
    /// Suite policy before overrides.
    fn suite_config(&self) -> BenchmarkConfig;
    /// Declared parameter.
    fn suite_param(&self) -> Option<Param>;
    /// Method names.
    fn method_names(&self) -> Vec<&'static str>;
    /// Run the selected methods of this suite.
    ///
    /// # Errors
    ///
    /// See [`BenchmarkRunner::run`].
    fn run_with(&self, runner: &BenchmarkRunner, report: &mut Report) -> HarnessResult<()>;
}

impl<S: Suite> SuiteRunner for S {
    fn suite_name(&self) -> &'static str {
        self.name()
    }

    fn suite_config(&self) -> BenchmarkConfig {
        self.config()
    }

    fn suite_param(&self) -> Option<Param> {
        self.param()
    }

    fn method_names(&self) -> Vec<&'static str> {
        self.methods().iter().map(|m| m.name).collect()
    }

    fn run_with(&self, runner: &BenchmarkRunner, report: &mut Report) -> HarnessResult<()> {
        runner.run(self, report)
    }
}

/// Runs suites under one set of overrides.
#[derive(Debug, Default)]
pub struct BenchmarkRunner {
    patterns: Vec<Regex>,
    overrides: ConfigOverrides,
    params: HashMap<String, Vec<usize>>,
    seed: Option<u64>,
}

impl BenchmarkRunner {
    /// Create a runner that selects every benchmark.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only run benchmarks whose `Suite.method` matches one of `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Pattern`] if a pattern is not a valid regex.
    pub fn with_patterns<I, P>(mut self, patterns: I) -> HarnessResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        for pattern in patterns {
            self.patterns.push(Regex::new(pattern.as_ref())?);
        }
        Ok(self)
    }

    /// Override parts of every suite's policy.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Replace the declared values of parameter `name`.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, values: Vec<usize>) -> Self {
        self.params.insert(name.into(), values);
        self
    }

    /// Generate fixtures from a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Whether `Suite.method` is selected.
    #[must_use]
    pub fn selects(&self, benchmark: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.is_match(benchmark))
    }

    fn selected_methods(&self, suite: &dyn SuiteRunner) -> Vec<&'static str> {
        suite
            .method_names()
            .into_iter()
            .filter(|m| self.selects(&format!("{}.{m}", suite.suite_name())))
            .collect()
    }

    /// Effective policy for a suite.
    #[must_use]
    pub fn config_for(&self, suite: &dyn SuiteRunner) -> BenchmarkConfig {
        self.overrides.apply(suite.suite_config())
    }

    /// Parameter values a suite will run with: overrides win over declarations.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidParam`] when an override has no values.
    pub fn param_values(&self, param: Option<&Param>) -> HarnessResult<Vec<Option<ParamValue>>> {
        let Some(param) = param else {
            return Ok(vec![None]);
        };
        let values = self.params.get(&param.name).unwrap_or(&param.values);
        if values.is_empty() {
            return Err(HarnessError::InvalidParam {
                name: param.name.clone(),
                message: "no values given".to_string(),
            });
        }
        Ok(values
            .iter()
            .map(|&value| {
                Some(ParamValue {
                    name: param.name.clone(),
                    value,
                })
            })
            .collect())
    }

    /// Check every selected suite before any timed work starts.
    ///
    /// # Errors
    ///
    /// Fails when nothing is selected, a policy is invalid, a parameter
    /// override has no values, or it names a parameter no selected suite declares.
    pub fn validate(&self, suites: &[Box<dyn SuiteRunner>]) -> HarnessResult<()> {
        let selected: Vec<&dyn SuiteRunner> = suites
            .iter()
            .map(|s| &**s)
            .filter(|s| !self.selected_methods(*s).is_empty())
            .collect();

        if selected.is_empty() {
            return Err(HarnessError::NoMatch(
                self.patterns.iter().map(|p| p.as_str().to_string()).collect(),
            ));
        }

        for name in self.params.keys() {
            let declared = selected
                .iter()
                .any(|s| s.suite_param().is_some_and(|p| &p.name == name));
            if !declared {
                return Err(HarnessError::UnknownParam(name.clone()));
            }
        }

        for suite in &selected {
            self.config_for(*suite).validate()?;
            self.param_values(suite.suite_param().as_ref())?;
        }
        Ok(())
    }

    /// Validate, then run every selected benchmark of every suite.
    ///
    /// # Errors
    ///
    /// Returns the first validation error; fixture failures do not error but
    /// are recorded as failed entries.
    pub fn run_all(&self, suites: &[Box<dyn SuiteRunner>]) -> HarnessResult<Report> {
        self.validate(suites)?;
        let mut report = Report::new();
        for suite in suites {
            if self.selected_methods(suite.as_ref()).is_empty() {
                continue;
            }
            suite.run_with(self, &mut report)?;
        }
        Ok(report)
    }

    /// Run the selected methods of one suite, once per parameter value.
    ///
    /// # Errors
    ///
    /// Returns an error if the effective policy or parameter values are
    /// invalid. A failing fixture only fails its own entry.
    pub fn run<S: Suite>(&self, suite: &S, report: &mut Report) -> HarnessResult<()> {
        let config = self.overrides.apply(suite.config());
        config.validate()?;
        let params = self.param_values(suite.param().as_ref())?;

        for method in suite.methods() {
            let benchmark = format!("{}.{}", suite.name(), method.name);
            if !self.selects(&benchmark) {
                continue;
            }

            for param in &params {
                info!(
                    benchmark = %benchmark,
                    param = ?param.as_ref().map(ToString::to_string),
                    "running"
                );

                let outcome = match self.run_entry(suite, &config, &method, param.as_ref()) {
                    Ok(samples) => match Statistics::from_samples(&samples) {
                        Some(stats) => Outcome::Completed(RunResult {
                            benchmark: benchmark.clone(),
                            param: param.clone(),
                            mode: config.mode,
                            stats,
                            unit: config.score_unit(),
                        }),
                        None => Outcome::Failed {
                            benchmark: benchmark.clone(),
                            param: param.clone(),
                            reason: "no samples recorded".to_string(),
                        },
                    },
                    Err(err) => {
                        warn!(benchmark = %benchmark, error = %err, "fixture setup failed");
                        Outcome::Failed {
                            benchmark: benchmark.clone(),
                            param: param.clone(),
                            reason: err.to_string(),
                        }
                    },
                };
                report.add(outcome);
            }
        }
        Ok(())
    }

    // All forks of one benchmark entry; samples in fork order.
    fn run_entry<S: Suite>(
        &self,
        suite: &S,
        config: &BenchmarkConfig,
        method: &BenchMethod<S::Fixture>,
        param: Option<&ParamValue>,
    ) -> Result<Vec<f64>, SetupError> {
        let mut samples = Vec::with_capacity(config.sample_count() as usize);
        for fork in 0..config.forks {
            debug!(method = method.name, fork = fork + 1, "starting fork");
            let scores = if config.threads == 1 {
                let mut rng = self.fixture_rng(fork, 0);
                let fixture = guarded_setup(suite, param, &mut rng)?;
                measure(config, &fixture, method)
            } else {
                self.run_threaded(suite, config, method, param, fork)?
            };
            samples.extend(scores);
        }
        Ok(samples)
    }

    // Each worker owns its fixture; per-iteration scores are combined across
    // workers (summed for throughput, averaged for time per op).
    fn run_threaded<S: Suite>(
        &self,
        suite: &S,
        config: &BenchmarkConfig,
        method: &BenchMethod<S::Fixture>,
        param: Option<&ParamValue>,
        fork: u32,
    ) -> Result<Vec<f64>, SetupError> {
        let per_thread: Vec<Result<Vec<f64>, SetupError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..config.threads)
                .map(|thread| {
                    let mut rng = self.fixture_rng(fork, thread);
                    scope.spawn(move || {
                        let fixture = guarded_setup(suite, param, &mut rng)?;
                        Ok(measure(config, &fixture, method))
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| {
                    h.join().unwrap_or_else(|payload| {
                        Err(SetupError::Failed(format!(
                            "worker panicked: {}",
                            panic_message(payload.as_ref())
                        )))
                    })
                })
                .collect()
        });

        let per_thread = per_thread.into_iter().collect::<Result<Vec<_>, _>>()?;
        let iterations = config.measurement.iterations as usize;
        let threads = per_thread.len() as f64;
        Ok((0..iterations)
            .map(|i| {
                let total: f64 = per_thread.iter().map(|scores| scores[i]).sum();
                match config.mode {
                    Mode::Throughput => total,
                    Mode::AverageTime => total / threads,
                }
            })
            .collect())
    }

    // The seed, fork and thread each own a disjoint part of the key, so no
    // two (seed, fork, thread) triples share a stream.
    fn fixture_rng(&self, fork: u32, thread: usize) -> StdRng {
        let Some(seed) = self.seed else {
            return StdRng::seed_from_u64(rand::random());
        };
        let mut key = <StdRng as SeedableRng>::Seed::default();
        let bytes = key.as_mut();
        bytes[..8].copy_from_slice(&seed.to_le_bytes());
        bytes[8..12].copy_from_slice(&fork.to_le_bytes());
        bytes[12..20].copy_from_slice(&(thread as u64).to_le_bytes());
        StdRng::from_seed(key)
    }
}

// Build a fixture, turning a panic inside `setup` into a failed entry.
fn guarded_setup<S: Suite>(
    suite: &S,
    param: Option<&ParamValue>,
    rng: &mut StdRng,
) -> Result<S::Fixture, SetupError> {
    panic::catch_unwind(AssertUnwindSafe(|| suite.setup(param, rng))).unwrap_or_else(|payload| {
        Err(SetupError::Failed(format!(
            "setup panicked: {}",
            panic_message(payload.as_ref())
        )))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// One line per benchmark, with the parameter values it would run.
#[must_use]
pub fn list_benchmarks(suites: &[Box<dyn SuiteRunner>]) -> String {
    let mut out = String::from("Benchmarks:\n");
    for suite in suites {
        let param = suite
            .suite_param()
            .map(|p| {
                let values: Vec<String> = p.values.iter().map(ToString::to_string).collect();
                format!(" ({} = {})", p.name, values.join(", "))
            })
            .unwrap_or_default();
        for method in suite.method_names() {
            out.push_str(&format!("  {}.{method}{param}\n", suite.suite_name()));
        }
    }
    out
}
