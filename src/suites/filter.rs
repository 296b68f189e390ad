//! Predicate filter suite: five ways to drop a fixed set of values from a list.
//!
//! Every strategy keeps the elements not in [`EXCLUDED`], in input order.
//! They differ only in how the predicate is evaluated.

use super::fixture::random_ints;
use crate::perf::{
    BenchMethod, BenchmarkConfig, Blackhole, Param, ParamValue, SetupError, Suite, Window,
};
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::time::Duration;

/// Values removed by every strategy.
pub const EXCLUDED: [i32; 5] = [10, 11, 20, 30, 40];

/// Fixture sizes run by default.
pub const FILTER_SIZES: [usize; 3] = [10, 100, 1000];

/// Five eager passes, one per excluded value, each materializing a new `Vec`.
#[must_use]
pub fn chained(input: &[i32]) -> Vec<i32> {
    let pass: Vec<i32> = input.iter().copied().filter(|&x| x != 10).collect();
    let pass: Vec<i32> = pass.iter().copied().filter(|&x| x != 11).collect();
    let pass: Vec<i32> = pass.iter().copied().filter(|&x| x != 20).collect();
    let pass: Vec<i32> = pass.iter().copied().filter(|&x| x != 30).collect();
    pass.iter().copied().filter(|&x| x != 40).collect()
}

/// One pass, short-circuit conjunction of five inequalities.
#[must_use]
pub fn union(input: &[i32]) -> Vec<i32> {
    input
        .iter()
        .copied()
        .filter(|&x| x != 10 && x != 11 && x != 20 && x != 30 && x != 40)
        .collect()
}

/// One pass, non-membership in a five-element set built per call.
#[must_use]
pub fn in_set(input: &[i32]) -> Vec<i32> {
    let excluded: HashSet<i32> = HashSet::from(EXCLUDED);
    input
        .iter()
        .copied()
        .filter(|x| !excluded.contains(x))
        .collect()
}

/// One pass through a predicate closure called behind `dyn Fn`.
#[must_use]
pub fn predicate(input: &[i32]) -> Vec<i32> {
    let keep: &dyn Fn(i32) -> bool = &|x| x != 10 && x != 11 && x != 20 && x != 30 && x != 40;
    input.iter().copied().filter(|&x| keep(x)).collect()
}

/// Five lazy iterator adapters, collected once.
#[must_use]
pub fn lazy(input: &[i32]) -> Vec<i32> {
    input
        .iter()
        .copied()
        .filter(|&x| x != 10)
        .filter(|&x| x != 11)
        .filter(|&x| x != 20)
        .filter(|&x| x != 30)
        .filter(|&x| x != 40)
        .collect()
}

/// Filtering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStrategy {
    /// See [`chained`].
    Chained,
    /// See [`union`].
    Union,
    /// See [`in_set`].
    InSet,
    /// See [`predicate`].
    Predicate,
    /// See [`lazy`].
    Lazy,
}

impl FilterStrategy {
    /// Every strategy.
    pub const ALL: [Self; 5] = [
        Self::Chained,
        Self::Union,
        Self::InSet,
        Self::Predicate,
        Self::Lazy,
    ];

    /// Benchmark method name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Chained => "chained",
            Self::Union => "union",
            Self::InSet => "in_set",
            Self::Predicate => "predicate",
            Self::Lazy => "lazy",
        }
    }

    /// Filter `input`.
    #[must_use]
    pub fn apply(self, input: &[i32]) -> Vec<i32> {
        match self {
            Self::Chained => chained(input),
            Self::Union => union(input),
            Self::InSet => in_set(input),
            Self::Predicate => predicate(input),
            Self::Lazy => lazy(input),
        }
    }
}

/// Random 32-bit integers to filter.
#[derive(Debug, Clone)]
pub struct FilterFixture {
    values: Vec<i32>,
}

impl FilterFixture {
    /// Wrap existing values.
    #[must_use]
    pub fn new(values: Vec<i32>) -> Self {
        Self { values }
    }

    /// Generate `size` random values.
    #[must_use]
    pub fn generate(rng: &mut StdRng, size: usize) -> Self {
        Self::new(random_ints(rng, size))
    }

    /// The values.
    #[must_use]
    pub fn values(&self) -> &[i32] {
        &self.values
    }
}

fn bench_chained(fixture: &FilterFixture, sink: &mut Blackhole) {
    sink.consume(chained(&fixture.values).len());
}

fn bench_union(fixture: &FilterFixture, sink: &mut Blackhole) {
    sink.consume(union(&fixture.values).len());
}

fn bench_in_set(fixture: &FilterFixture, sink: &mut Blackhole) {
    sink.consume(in_set(&fixture.values).len());
}

fn bench_predicate(fixture: &FilterFixture, sink: &mut Blackhole) {
    sink.consume(predicate(&fixture.values).len());
}

fn bench_lazy(fixture: &FilterFixture, sink: &mut Blackhole) {
    sink.consume(lazy(&fixture.values).len());
}

/// Filter suite, parameterized by fixture `size`.
#[derive(Debug, Clone)]
pub struct PredicateFilterBenchmark {
    sizes: Vec<usize>,
}

impl Default for PredicateFilterBenchmark {
    fn default() -> Self {
        Self {
            sizes: FILTER_SIZES.to_vec(),
        }
    }
}

impl PredicateFilterBenchmark {
    /// Suite declaring `sizes` as its parameter values.
    #[must_use]
    pub fn with_sizes(sizes: Vec<usize>) -> Self {
        Self { sizes }
    }
}

impl Suite for PredicateFilterBenchmark {
    type Fixture = FilterFixture;

    fn name(&self) -> &'static str {
        "PredicateFilterBenchmark"
    }

    fn config(&self) -> BenchmarkConfig {
        BenchmarkConfig::default().with_warmup(Window::new(3, Duration::from_secs(1)))
    }

    fn param(&self) -> Option<Param> {
        Some(Param::new("size", self.sizes.clone()))
    }

    fn setup(
        &self,
        param: Option<&ParamValue>,
        rng: &mut StdRng,
    ) -> Result<Self::Fixture, SetupError> {
        let size = param.ok_or(SetupError::MissingParam("size"))?.value;
        Ok(FilterFixture::generate(rng, size))
    }

    fn methods(&self) -> Vec<BenchMethod<Self::Fixture>> {
        vec![
            BenchMethod::new(FilterStrategy::Chained.name(), bench_chained),
            BenchMethod::new(FilterStrategy::Union.name(), bench_union),
            BenchMethod::new(FilterStrategy::InSet.name(), bench_in_set),
            BenchMethod::new(FilterStrategy::Predicate.name(), bench_predicate),
            BenchMethod::new(FilterStrategy::Lazy.name(), bench_lazy),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suites::fixture::{fixture_rng, small_ints};
    use proptest::prelude::*;

    fn reference(input: &[i32]) -> Vec<i32> {
        input
            .iter()
            .copied()
            .filter(|x| !EXCLUDED.contains(x))
            .collect()
    }

    #[test]
    fn test_concrete_scenario() {
        for strategy in FilterStrategy::ALL {
            assert_eq!(strategy.apply(&[10, 5, 11, 7, 20]), vec![5, 7], "{strategy:?}");
        }
    }

    #[test]
    fn test_empty_input() {
        for strategy in FilterStrategy::ALL {
            assert!(strategy.apply(&[]).is_empty());
        }
    }

    #[test]
    fn test_all_excluded() {
        for strategy in FilterStrategy::ALL {
            assert!(strategy.apply(&[40, 30, 20, 11, 10, 10]).is_empty());
        }
    }

    #[test]
    fn test_size_1000_length() {
        let fixture = FilterFixture::new(small_ints(&mut fixture_rng(Some(11)), 1000, 64));
        let hits = fixture
            .values()
            .iter()
            .filter(|x| EXCLUDED.contains(x))
            .count();
        assert!(hits > 0);
        for strategy in FilterStrategy::ALL {
            assert_eq!(strategy.apply(fixture.values()).len(), 1000 - hits);
        }
    }

    #[test]
    fn test_setup_uses_param() {
        let suite = PredicateFilterBenchmark::default();
        let mut rng = fixture_rng(Some(1));
        let param = ParamValue {
            name: "size".to_string(),
            value: 100,
        };
        assert_eq!(suite.setup(Some(&param), &mut rng).unwrap().values().len(), 100);

        let zero = ParamValue {
            name: "size".to_string(),
            value: 0,
        };
        assert!(suite.setup(Some(&zero), &mut rng).unwrap().values().is_empty());

        assert!(matches!(
            suite.setup(None, &mut rng),
            Err(SetupError::MissingParam("size"))
        ));
    }

    #[test]
    fn test_suite_shape() {
        let suite = PredicateFilterBenchmark::default();
        assert_eq!(suite.param().unwrap().values, vec![10, 100, 1000]);
        assert_eq!(suite.config().warmup.iterations, 3);
        let names: Vec<&str> = suite.methods().iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["chained", "union", "in_set", "predicate", "lazy"]);
    }

    #[test]
    fn test_bodies_feed_sink() {
        let fixture = FilterFixture::new(vec![1, 10, 2]);
        let mut sink = Blackhole::new();
        for method in PredicateFilterBenchmark::default().methods() {
            (method.body)(&fixture, &mut sink);
        }
        assert_eq!(sink.consumed(), 5);
    }

    proptest! {
        #[test]
        fn prop_strategies_agree(input in prop::collection::vec(-5i32..50, 0..300)) {
            let expected = reference(&input);
            for strategy in FilterStrategy::ALL {
                prop_assert_eq!(strategy.apply(&input), expected.clone());
            }
        }

        #[test]
        fn prop_strategies_agree_on_full_range(input: Vec<i32>) {
            let expected = reference(&input);
            for strategy in FilterStrategy::ALL {
                prop_assert_eq!(strategy.apply(&input), expected.clone());
            }
        }
    }
}
