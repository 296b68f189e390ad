//! # Collection Bench
//!
//! Microbenchmarks comparing collection strategies, plus the small harness
//! that runs them.
//!
//! ## Suites
//!
//! - [`suites::CollectionLookupBenchmark`]: membership checks on an ordered
//!   sequence versus a hash set.
//! - [`suites::PredicateFilterBenchmark`]: five ways to drop a fixed set of
//!   values from a list, at sizes 10, 100 and 1000.
//!
//! ## Architecture
//!
//! Each suite implements [`perf::Suite`]: a fixture built outside timing,
//! and plain functions that feed their results into a [`perf::Blackhole`].
//! [`perf::BenchmarkRunner`] applies the warm-up/measurement policy, forks
//! and threads, and collects a [`perf::Report`]. [`config::RunOptions`]
//! turns command-line options into a runner.

pub mod config;
pub mod perf;
pub mod suites;
