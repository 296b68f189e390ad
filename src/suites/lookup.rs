//! Collection lookup suite: linear scan over a `Vec` versus a `HashSet`.

use super::fixture::random_longs;
use crate::perf::{BenchMethod, Blackhole, ParamValue, SetupError, Suite};
use rand::rngs::StdRng;
use std::collections::HashSet;

/// Default fixture size.
pub const LOOKUP_SIZE: usize = 1000;

/// Interior positions probed in addition to the first and last element.
pub const PROBE_INDEXES: [usize; 3] = [10, 100, 900];

/// Membership check strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// `slice::contains`, linear scan.
    OrderedSequence,
    /// `HashSet::contains`.
    HashSet,
}

impl LookupStrategy {
    /// Every strategy.
    pub const ALL: [Self; 2] = [Self::OrderedSequence, Self::HashSet];

    /// Benchmark method name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::OrderedSequence => "list_contains",
            Self::HashSet => "set_contains",
        }
    }
}

/// The same values held as an ordered sequence and as a hash set, plus
/// the probes to look up.
#[derive(Debug, Clone)]
pub struct LookupFixture {
    sequence: Vec<i64>,
    set: HashSet<i64>,
    probes: Vec<i64>,
}

impl LookupFixture {
    /// Build from existing values. Probes are the first and last element
    /// and the elements at [`PROBE_INDEXES`].
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::TooSmall`] if `values` cannot address every probe.
    pub fn from_values(values: Vec<i64>) -> Result<Self, SetupError> {
        let min = PROBE_INDEXES[PROBE_INDEXES.len() - 1] + 1;
        let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
            return Err(SetupError::TooSmall { size: 0, min });
        };
        if values.len() < min {
            return Err(SetupError::TooSmall {
                size: values.len(),
                min,
            });
        }

        let mut probes = vec![first, last];
        probes.extend(PROBE_INDEXES.iter().map(|&i| values[i]));

        let set = values.iter().copied().collect();
        Ok(Self {
            sequence: values,
            set,
            probes,
        })
    }

    /// Generate `size` random values.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::TooSmall`] if `size` cannot address every probe.
    pub fn generate(rng: &mut StdRng, size: usize) -> Result<Self, SetupError> {
        Self::from_values(random_longs(rng, size))
    }

    /// Values in generation order.
    #[must_use]
    pub fn sequence(&self) -> &[i64] {
        &self.sequence
    }

    /// Values as a set.
    #[must_use]
    pub fn set(&self) -> &HashSet<i64> {
        &self.set
    }

    /// Probe values.
    #[must_use]
    pub fn probes(&self) -> &[i64] {
        &self.probes
    }

    /// Membership of `value` under `strategy`.
    #[must_use]
    pub fn contains(&self, strategy: LookupStrategy, value: i64) -> bool {
        match strategy {
            LookupStrategy::OrderedSequence => self.sequence.contains(&value),
            LookupStrategy::HashSet => self.set.contains(&value),
        }
    }
}

fn list_contains(fixture: &LookupFixture, sink: &mut Blackhole) {
    for probe in &fixture.probes {
        sink.consume(fixture.sequence.contains(probe));
    }
}

fn set_contains(fixture: &LookupFixture, sink: &mut Blackhole) {
    for probe in &fixture.probes {
        sink.consume(fixture.set.contains(probe));
    }
}

/// Lookup suite over a fixed-size fixture of random 64-bit integers.
#[derive(Debug, Clone)]
pub struct CollectionLookupBenchmark {
    size: usize,
}

impl Default for CollectionLookupBenchmark {
    fn default() -> Self {
        Self { size: LOOKUP_SIZE }
    }
}

impl CollectionLookupBenchmark {
    /// Suite over a fixture of `size` values.
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self { size }
    }
}

impl Suite for CollectionLookupBenchmark {
    type Fixture = LookupFixture;

    fn name(&self) -> &'static str {
        "CollectionLookupBenchmark"
    }

    fn setup(
        &self,
        _param: Option<&ParamValue>,
        rng: &mut StdRng,
    ) -> Result<Self::Fixture, SetupError> {
        LookupFixture::generate(rng, self.size)
    }

    fn methods(&self) -> Vec<BenchMethod<Self::Fixture>> {
        vec![
            BenchMethod::new(LookupStrategy::OrderedSequence.name(), list_contains),
            BenchMethod::new(LookupStrategy::HashSet.name(), set_contains),
        ]
    }
}
