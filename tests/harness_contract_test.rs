//! Integration tests for the benchmark harness and the built-in suites.

use collection_bench::config::RunOptions;
use collection_bench::perf::{
    BenchMethod, BenchmarkRunner, Blackhole, ConfigOverrides, HarnessError, Mode, Outcome,
    ParamValue, SetupError, Suite, SuiteRunner,
};
use collection_bench::suites::{
    all_suites, random_longs, CollectionLookupBenchmark, PredicateFilterBenchmark,
};
use rand::rngs::StdRng;
use std::sync::Mutex;
use std::time::Duration;

/// Overrides that keep every entry in the low milliseconds.
fn quick() -> ConfigOverrides {
    ConfigOverrides {
        warmup_iterations: Some(0),
        iterations: Some(2),
        time: Some(Duration::from_millis(5)),
        forks: Some(1),
        ..Default::default()
    }
}

fn quick_runner() -> BenchmarkRunner {
    BenchmarkRunner::new().with_overrides(quick())
}

#[test]
fn test_run_all_suites() {
    let report = quick_runner().run_all(&all_suites()).unwrap();

    assert!(!report.has_failures());
    // 2 lookup methods + 5 filter methods at 3 sizes.
    assert_eq!(report.results().count(), 2 + 5 * 3);

    for result in report.results() {
        assert_eq!(result.stats.n, 2);
        assert!(result.stats.mean > 0.0, "{}", result.benchmark);
        assert_eq!(result.unit, "ns/op");
    }
    assert!(report
        .result("CollectionLookupBenchmark.set_contains", None)
        .is_some());
    assert!(report
        .result("PredicateFilterBenchmark.in_set", Some(1000))
        .is_some());
}

#[test]
fn test_pattern_selects_subset() {
    let runner = quick_runner()
        .with_patterns(["PredicateFilter.*\\.lazy$"])
        .unwrap()
        .with_param("size", vec![10]);
    let report = runner.run_all(&all_suites()).unwrap();

    let names: Vec<&str> = report.results().map(|r| r.benchmark.as_str()).collect();
    assert_eq!(names, vec!["PredicateFilterBenchmark.lazy"]);
}

#[test]
fn test_pattern_without_match_rejected() {
    let runner = quick_runner().with_patterns(["NoSuchBenchmark"]).unwrap();
    assert!(matches!(
        runner.run_all(&all_suites()),
        Err(HarnessError::NoMatch(_))
    ));
}

#[test]
fn test_unknown_param_rejected() {
    let runner = quick_runner().with_param("length", vec![10]);
    assert!(matches!(
        runner.run_all(&all_suites()),
        Err(HarnessError::UnknownParam(name)) if name == "length"
    ));
}

#[test]
fn test_undersized_lookup_fails_its_entries_only() {
    let suites: Vec<Box<dyn SuiteRunner>> = vec![
        Box::new(CollectionLookupBenchmark::with_size(500)),
        Box::new(PredicateFilterBenchmark::with_sizes(vec![10])),
    ];
    let report = quick_runner().run_all(&suites).unwrap();

    assert!(report.has_failures());
    let failed: Vec<&str> = report.failures().map(Outcome::benchmark).collect();
    assert_eq!(
        failed,
        vec![
            "CollectionLookupBenchmark.list_contains",
            "CollectionLookupBenchmark.set_contains"
        ]
    );
    assert_eq!(report.results().count(), 5);

    let table = report.render_table();
    assert!(table.contains("Failed benchmarks:"));
    assert!(table.contains("CollectionLookupBenchmark.list_contains"));
}

#[test]
fn test_size_override_includes_zero() {
    let suites: Vec<Box<dyn SuiteRunner>> = vec![Box::new(PredicateFilterBenchmark::default())];
    let runner = quick_runner().with_param("size", vec![0, 10]);
    let report = runner.run_all(&suites).unwrap();

    assert!(!report.has_failures());
    assert_eq!(report.results().count(), 10);
    assert!(report
        .result("PredicateFilterBenchmark.chained", Some(0))
        .is_some());
    assert!(report
        .result("PredicateFilterBenchmark.chained", Some(1000))
        .is_none());
}

#[test]
fn test_throughput_mode_and_unit() {
    let suites: Vec<Box<dyn SuiteRunner>> = vec![Box::new(CollectionLookupBenchmark::default())];
    let overrides = ConfigOverrides {
        mode: Some(Mode::Throughput),
        ..quick()
    };
    let report = BenchmarkRunner::new()
        .with_overrides(overrides)
        .run_all(&suites)
        .unwrap();

    for result in report.results() {
        assert_eq!(result.mode, Mode::Throughput);
        assert_eq!(result.unit, "ops/ns");
        assert!(result.stats.mean > 0.0);
    }
}

#[test]
fn test_threads_and_forks_multiply_samples() {
    let suites: Vec<Box<dyn SuiteRunner>> =
        vec![Box::new(PredicateFilterBenchmark::with_sizes(vec![100]))];
    let overrides = ConfigOverrides {
        forks: Some(2),
        threads: Some(2),
        ..quick()
    };
    let report = BenchmarkRunner::new()
        .with_overrides(overrides)
        .with_patterns(["union"])
        .unwrap()
        .run_all(&suites)
        .unwrap();

    let result = report
        .result("PredicateFilterBenchmark.union", Some(100))
        .unwrap();
    assert_eq!(result.stats.n, 4);
    assert!(!result.stats.error.is_nan());
}

/// Records the first fixture value seen by each setup call.
struct Recording {
    seen: Mutex<Vec<i64>>,
}

impl Suite for Recording {
    type Fixture = Vec<i64>;

    fn name(&self) -> &'static str {
        "Recording"
    }

    fn setup(
        &self,
        _param: Option<&ParamValue>,
        rng: &mut StdRng,
    ) -> Result<Self::Fixture, SetupError> {
        let values = random_longs(rng, 16);
        self.seen.lock().unwrap().push(values[0]);
        Ok(values)
    }

    fn methods(&self) -> Vec<BenchMethod<Self::Fixture>> {
        vec![BenchMethod::new(
            "sum",
            |values: &Vec<i64>, sink: &mut Blackhole| {
                sink.consume(values.iter().fold(0i64, |a, &v| a.wrapping_add(v)));
            },
        )]
    }
}

fn recorded_fixtures(seed: u64) -> Vec<i64> {
    let suite = Recording {
        seen: Mutex::new(Vec::new()),
    };
    let overrides = ConfigOverrides {
        forks: Some(3),
        ..quick()
    };
    let mut report = collection_bench::perf::Report::new();
    BenchmarkRunner::new()
        .with_overrides(overrides)
        .with_seed(Some(seed))
        .run(&suite, &mut report)
        .unwrap();
    suite.seen.into_inner().unwrap()
}

#[test]
fn test_seeded_runs_reproduce_fixtures() {
    let first = recorded_fixtures(7);
    let second = recorded_fixtures(7);
    let other = recorded_fixtures(8);

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
    assert_ne!(first, other);
    // Each fork builds a fresh fixture from its own stream.
    assert_ne!(first[0], first[1]);
}

#[test]
fn test_report_table_format() {
    let runner = quick_runner()
        .with_patterns(["CollectionLookupBenchmark"])
        .unwrap();
    let table = runner.run_all(&all_suites()).unwrap().render_table();
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 3);
    let header: Vec<&str> = lines[0].split_whitespace().collect();
    assert_eq!(header, vec!["Benchmark", "Mode", "Cnt", "Score", "Error", "Units"]);
    assert!(lines[1].starts_with("CollectionLookupBenchmark.list_contains"));
    assert!(lines[1].contains("avgt"));
    assert!(lines[1].ends_with("ns/op"));
}

#[test]
fn test_report_json() {
    let suites: Vec<Box<dyn SuiteRunner>> =
        vec![Box::new(PredicateFilterBenchmark::with_sizes(vec![10]))];
    let report = quick_runner().run_all(&suites).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    let outcomes = json["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 5);
    assert_eq!(outcomes[0]["status"], "completed");
    assert_eq!(outcomes[0]["benchmark"], "PredicateFilterBenchmark.chained");
    assert_eq!(outcomes[0]["param"]["value"], 10);
    assert!(json["timestamp"].is_string());
}

#[test]
fn test_options_drive_runner() {
    let options = RunOptions {
        patterns: vec!["set_contains".to_string()],
        warmup_iterations: Some(0),
        iterations: Some(1),
        time: Some(Duration::from_millis(5)),
        forks: Some(1),
        seed: Some(3),
        ..Default::default()
    };
    let report = options
        .build_runner()
        .unwrap()
        .run_all(&all_suites())
        .unwrap();

    let result = report
        .result("CollectionLookupBenchmark.set_contains", None)
        .unwrap();
    assert_eq!(result.stats.n, 1);
    assert!(result.stats.std_dev.is_nan());
    assert!(!report.render_table().contains('±'));
}
