use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ratingspace::builder::CrossValidationBuilder;
use std::hint::black_box;
use std::time::Duration;

mod common;

pub fn criterion_benchmark(c: &mut Criterion) {
    let table = common::synthetic_table(150, 200, 20, 42);
    let catalog = common::synthetic_catalog(200, 7);

    let mut group = c.benchmark_group("cross_validation");
    group.warm_up_time(Duration::from_millis(300));
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    for parallel in [false, true] {
        let validator = CrossValidationBuilder::new()
            .with_sample_ratio(0.2)
            .with_seed(42)
            .with_parallel(parallel)
            .build()
            .unwrap();
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(BenchmarkId::new(label, "ratio0.2"), |b| {
            b.iter(|| black_box(validator.evaluate(&table, &catalog)))
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
