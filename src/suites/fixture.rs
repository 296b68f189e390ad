//! Fixture data generators.
//!
//! All generators draw from the caller's RNG so a seeded run reproduces the
//! same data.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// RNG for fixture generation: seeded when `seed` is given, fresh otherwise.
#[must_use]
pub fn fixture_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

/// `count` uniformly random 64-bit integers.
pub fn random_longs<R: RngExt + ?Sized>(rng: &mut R, count: usize) -> Vec<i64> {
    (0..count).map(|_| rng.random::<i64>()).collect()
}

/// `count` uniformly random 32-bit integers.
pub fn random_ints<R: RngExt + ?Sized>(rng: &mut R, count: usize) -> Vec<i32> {
    (0..count).map(|_| rng.random::<i32>()).collect()
}

/// `count` integers drawn from `0..bound`, dense enough that excluded values
/// actually occur.
#[cfg(test)]
pub(crate) fn small_ints<R: RngExt + ?Sized>(rng: &mut R, count: usize, bound: i32) -> Vec<i32> {
    (0..count).map(|_| rng.random_range(0..bound)).collect()
}
