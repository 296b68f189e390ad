//! # Benchmark Suites
//!
//! - [`CollectionLookupBenchmark`]: membership checks against a `Vec` and a
//!   `HashSet` built from the same 1000 random `i64` values
//! - [`PredicateFilterBenchmark`]: five strategies for removing
//!   `{10, 11, 20, 30, 40}` from `size` random `i32` values

pub mod filter;
pub mod fixture;
pub mod lookup;

pub use filter::{FilterFixture, FilterStrategy, PredicateFilterBenchmark, EXCLUDED, FILTER_SIZES};
pub use fixture::{fixture_rng, random_ints, random_longs};
pub use lookup::{CollectionLookupBenchmark, LookupFixture, LookupStrategy, LOOKUP_SIZE};

use crate::perf::SuiteRunner;

/// Every suite with its default settings.
#[must_use]
pub fn all_suites() -> Vec<Box<dyn SuiteRunner>> {
    vec![
        Box::new(CollectionLookupBenchmark::default()),
        Box::new(PredicateFilterBenchmark::default()),
    ]
}
