//! Fixture generators for the Criterion benchmarks.
//!
//! Seeded so that repeated `cargo bench` runs compare like with like.

use collection_bench::suites::{fixture_rng, random_ints, LookupFixture, LOOKUP_SIZE};

/// Seed shared by every Criterion fixture.
pub const BENCH_SEED: u64 = 0x5eed;

/// Lookup fixture of the default size.
pub fn lookup_fixture() -> LookupFixture {
    LookupFixture::generate(&mut fixture_rng(Some(BENCH_SEED)), LOOKUP_SIZE)
        .expect("default lookup size covers every probe")
}

/// `size` random integers for the filter benchmarks.
pub fn filter_input(size: usize) -> Vec<i32> {
    random_ints(&mut fixture_rng(Some(BENCH_SEED)), size)
}
