//! Criterion settings shared by the benchmarks.
//!
//! Mirrors the harness defaults: one-second warm-up and measurement windows.

use collection_bench::suites::FILTER_SIZES;
use criterion::Criterion;
use std::time::Duration;

/// Fixture sizes for the filter benchmarks.
pub const SIZES: [usize; 3] = FILTER_SIZES;

/// Criterion configured with one-second warm-up and measurement windows.
pub fn bench_criterion() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(1))
}
