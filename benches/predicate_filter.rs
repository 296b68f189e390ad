//! Benchmarks for the five filter strategies at sizes 10, 100 and 1000.

mod common;
use collection_bench::suites::FilterStrategy;
use common::generators;
use common::harness::{bench_criterion, SIZES};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("predicate_filter");

    for size in SIZES {
        let input = generators::filter_input(size);
        group.throughput(Throughput::Elements(size as u64));

        for strategy in FilterStrategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), size),
                &input,
                |b, input| {
                    b.iter(|| black_box(strategy.apply(black_box(input)).len()));
                },
            );
        }
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = bench_criterion();
    targets = bench_filter
}
criterion_main!(benches);
