//! # Benchmark Harness
//!
//! A small measurement harness in the style of JMH.
//!
//! ## Features
//!
//! - **Policy**: warm-up and measurement windows, forks, worker threads,
//!   average-time or throughput mode, output unit
//! - **Parameterization**: one full warm-up + measurement cycle per value
//! - **Fixtures**: built per phase and per worker, read-only while timed
//! - **Sink**: [`Blackhole`] keeps results observable to the optimizer
//! - **Reporting**: `Benchmark Mode Cnt Score Error Units` tables and JSON
//!
//! ## Example
//!
//! ```rust,ignore
//! use collection_bench::perf::BenchmarkRunner;
//! use collection_bench::suites::all_suites;
//!
//! let report = BenchmarkRunner::new()
//!     .with_patterns(["PredicateFilter"])?
//!     .with_param("size", vec![10, 100])
//!     .run_all(&all_suites())?;
//!
//! print!("{}", report.render_table());
//! ```

pub mod benchmark;
pub mod error;
pub mod report;
pub mod runner;
pub mod stats;

pub use benchmark::{
    measure, BenchFn, BenchMethod, BenchmarkConfig, Blackhole, Mode, Param, ParamValue, Suite,
    TimeUnit, Window,
};
pub use error::{HarnessError, HarnessResult, SetupError};
pub use report::{Outcome, Report, RunResult};
pub use runner::{list_benchmarks, BenchmarkRunner, ConfigOverrides, SuiteRunner};
pub use stats::Statistics;
