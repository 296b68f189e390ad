//! Benchmark definitions and the measurement loop.
//!
//! A [`Suite`] owns a fixture type, a measurement policy and a list of
//! [`BenchMethod`] bodies. The runner builds one fixture per phase and hands
//! it to [`measure`], which drives warm-up and measurement iterations.

use super::error::{HarnessError, HarnessResult, SetupError};
use rand::rngs::StdRng;
use serde::Serialize;
use std::fmt;
use std::hint::black_box;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// What an iteration score measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Average time per invocation.
    AverageTime,
    /// Invocations per unit of time.
    Throughput,
}

impl Mode {
    /// Short label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::AverageTime => "avgt",
            Self::Throughput => "thrpt",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "avgt" | "averagetime" | "average_time" => Ok(Self::AverageTime),
            "thrpt" | "throughput" => Ok(Self::Throughput),
            other => Err(HarnessError::InvalidConfig(format!(
                "unknown mode '{other}', expected avgt or thrpt"
            ))),
        }
    }
}

/// Unit scores are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    /// Nanoseconds.
    Nanoseconds,
    /// Microseconds.
    Microseconds,
    /// Milliseconds.
    Milliseconds,
    /// Seconds.
    Seconds,
}

impl TimeUnit {
    /// Short label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Nanoseconds => "ns",
            Self::Microseconds => "us",
            Self::Milliseconds => "ms",
            Self::Seconds => "s",
        }
    }

    fn nanos_per_unit(self) -> f64 {
        match self {
            Self::Nanoseconds => 1.0,
            Self::Microseconds => 1e3,
            Self::Milliseconds => 1e6,
            Self::Seconds => 1e9,
        }
    }

    /// Express a duration in this unit.
    #[must_use]
    pub fn convert(self, duration: Duration) -> f64 {
        duration.as_nanos() as f64 / self.nanos_per_unit()
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeUnit {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ns" | "nanoseconds" => Ok(Self::Nanoseconds),
            "us" | "microseconds" => Ok(Self::Microseconds),
            "ms" | "milliseconds" => Ok(Self::Milliseconds),
            "s" | "seconds" => Ok(Self::Seconds),
            other => Err(HarnessError::InvalidConfig(format!(
                "unknown time unit '{other}', expected ns, us, ms or s"
            ))),
        }
    }
}

/// A warm-up or measurement window: how many iterations, each lasting `time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    /// Number of iterations.
    pub iterations: u32,
    /// Duration of one iteration.
    pub time: Duration,
}

impl Window {
    /// Create a window.
    #[must_use]
    pub const fn new(iterations: u32, time: Duration) -> Self {
        Self { iterations, time }
    }
}

/// Measurement policy for a suite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkConfig {
    /// Score mode.
    pub mode: Mode,
    /// Iterations discarded before recording.
    pub warmup: Window,
    /// Iterations whose scores are recorded.
    pub measurement: Window,
    /// Independent trials, each with a freshly built fixture.
    pub forks: u32,
    /// Worker threads per trial, each with its own fixture.
    pub threads: usize,
    /// Output unit.
    pub time_unit: TimeUnit,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            mode: Mode::AverageTime,
            warmup: Window::new(5, Duration::from_secs(1)),
            measurement: Window::new(5, Duration::from_secs(1)),
            forks: 5,
            threads: 1,
            time_unit: TimeUnit::Nanoseconds,
        }
    }
}

impl BenchmarkConfig {
    /// Set the score mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the warm-up window.
    #[must_use]
    pub fn with_warmup(mut self, warmup: Window) -> Self {
        self.warmup = warmup;
        self
    }

    /// Set the measurement window.
    #[must_use]
    pub fn with_measurement(mut self, measurement: Window) -> Self {
        self.measurement = measurement;
        self
    }

    /// Set the number of forks.
    #[must_use]
    pub fn with_forks(mut self, forks: u32) -> Self {
        self.forks = forks;
        self
    }

    /// Set the number of worker threads.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the output unit.
    #[must_use]
    pub fn with_time_unit(mut self, time_unit: TimeUnit) -> Self {
        self.time_unit = time_unit;
        self
    }

    /// Reject policies that cannot produce a score.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidConfig`] when there are no measurement
    /// iterations, no forks, no threads, or a zero-length measurement window.
    pub fn validate(&self) -> HarnessResult<()> {
        if self.measurement.iterations == 0 {
            return Err(HarnessError::InvalidConfig(
                "measurement iterations must be > 0".to_string(),
            ));
        }
        if self.measurement.time.is_zero() {
            return Err(HarnessError::InvalidConfig(
                "measurement time must be > 0".to_string(),
            ));
        }
        if self.forks == 0 {
            return Err(HarnessError::InvalidConfig("forks must be > 0".to_string()));
        }
        if self.threads == 0 {
            return Err(HarnessError::InvalidConfig(
                "threads must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Unit label for scores, e.g. `ns/op` or `ops/us`.
    #[must_use]
    pub fn score_unit(&self) -> String {
        match self.mode {
            Mode::AverageTime => format!("{}/op", self.time_unit),
            Mode::Throughput => format!("ops/{}", self.time_unit),
        }
    }

    /// Score of an iteration that completed `ops` invocations in `elapsed`.
    #[must_use]
    pub fn score(&self, ops: u64, elapsed: Duration) -> f64 {
        let time = self.time_unit.convert(elapsed);
        match self.mode {
            Mode::AverageTime => time / ops as f64,
            Mode::Throughput => ops as f64 / time,
        }
    }

    /// Number of recorded samples per benchmark entry.
    #[must_use]
    pub fn sample_count(&self) -> u64 {
        u64::from(self.forks) * u64::from(self.measurement.iterations)
    }
}

/// Consumption sink for benchmark results.
///
/// Every value passed to [`Blackhole::consume`] goes through
/// [`std::hint::black_box`], so the optimizer has to assume it is observed
/// and cannot drop the computation that produced it.
#[derive(Debug, Default)]
pub struct Blackhole {
    consumed: u64,
}

impl Blackhole {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a value.
    #[inline]
    pub fn consume<T>(&mut self, value: T) {
        black_box(value);
        self.consumed += 1;
    }

    /// Number of values consumed so far.
    #[must_use]
    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}

/// A parameter declared by a suite, with the values to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Values, each run as its own warm-up + measurement cycle.
    pub values: Vec<usize>,
}

impl Param {
    /// Declare a parameter.
    pub fn new(name: impl Into<String>, values: impl Into<Vec<usize>>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
        }
    }
}

/// One value of a declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamValue {
    /// Parameter name.
    pub name: String,
    /// Value for this run.
    pub value: usize,
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Signature of a benchmark body.
///
/// Bodies read the fixture and feed their result to the sink. They never get
/// mutable access to the fixture.
pub type BenchFn<F> = fn(&F, &mut Blackhole);

/// A named benchmark body.
pub struct BenchMethod<F> {
    /// Method name, reported as `Suite.method`.
    pub name: &'static str,
    /// The measured body.
    pub body: BenchFn<F>,
}

impl<F> BenchMethod<F> {
    /// Create a method.
    pub const fn new(name: &'static str, body: BenchFn<F>) -> Self {
        Self { name, body }
    }
}

impl<F> fmt::Debug for BenchMethod<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchMethod")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A group of benchmarks sharing one fixture type.
pub trait Suite: Sync {
    /// Per-phase state handed to every body.
    type Fixture;

    /// Suite name, the prefix of every benchmark in the report.
    fn name(&self) -> &'static str;

    /// Measurement policy before command-line overrides.
    fn config(&self) -> BenchmarkConfig {
        BenchmarkConfig::default()
    }

    /// Declared parameter, if any.
    fn param(&self) -> Option<Param> {
        None
    }

    /// Build a fixture for one measurement phase.
    ///
    /// # Errors
    ///
    /// A [`SetupError`] fails the benchmark entry for this parameter value.
    fn setup(
        &self,
        param: Option<&ParamValue>,
        rng: &mut StdRng,
    ) -> Result<Self::Fixture, SetupError>;

    /// The benchmark bodies.
    fn methods(&self) -> Vec<BenchMethod<Self::Fixture>>;
}

fn run_iteration<F>(
    body: BenchFn<F>,
    fixture: &F,
    sink: &mut Blackhole,
    time: Duration,
) -> (u64, Duration) {
    let start = Instant::now();
    let deadline = start + time;
    let mut ops = 0u64;
    loop {
        body(fixture, sink);
        ops += 1;
        if Instant::now() >= deadline {
            break;
        }
    }
    (ops, start.elapsed())
}

/// Drive one phase of `method` over `fixture`: warm-up iterations are
/// discarded, measurement iterations each yield a score.
pub fn measure<F>(config: &BenchmarkConfig, fixture: &F, method: &BenchMethod<F>) -> Vec<f64> {
    let mut sink = Blackhole::new();

    for i in 0..config.warmup.iterations {
        let (ops, elapsed) = run_iteration(method.body, fixture, &mut sink, config.warmup.time);
        trace!(
            method = method.name,
            iteration = i + 1,
            ops,
            score = config.score(ops, elapsed),
            "warmup iteration"
        );
    }

    let mut warned = false;
    if config.warmup.iterations > 0 && sink.consumed() == 0 {
        warn!(
            method = method.name,
            "benchmark body never fed the sink during warm-up, its work may be optimized away"
        );
        warned = true;
    }

    let mut scores = Vec::with_capacity(config.measurement.iterations as usize);
    for i in 0..config.measurement.iterations {
        let (ops, elapsed) =
            run_iteration(method.body, fixture, &mut sink, config.measurement.time);
        let score = config.score(ops, elapsed);
        debug!(
            method = method.name,
            iteration = i + 1,
            ops,
            score,
            "measurement iteration"
        );
        scores.push(score);
    }

    if !warned && sink.consumed() == 0 {
        warn!(
            method = method.name,
            "benchmark body never fed the sink, its work may be optimized away"
        );
    }

    scores
}
