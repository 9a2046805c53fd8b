//! Benchmarks for dataset generation.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ledgerfab::aggregate::fold_stock;
use ledgerfab::prelude::*;

fn small(profile: Profile, scale: f64) -> FabricConfig {
    FabricConfig::for_profile(profile)
        .scaled(scale)
        .with_seed(Some(42))
}

fn benchmark_calendar(c: &mut Criterion) {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2029, 12, 31).unwrap();
    c.bench_function("calendar_30_years", |b| {
        b.iter(|| {
            FiscalCalendar::build(black_box(start), black_box(end), FiscalYearStart::April, false)
                .unwrap()
        })
    });
}

fn benchmark_profiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    for profile in Profile::ALL {
        let config = small(profile, 0.05);
        group.bench_with_input(
            BenchmarkId::new("run", profile.name()),
            &config,
            |b, config| {
                b.iter(|| {
                    let mut pipeline = DataFabricPipeline::new(config.clone()).unwrap();
                    pipeline.run().unwrap()
                })
            },
        );
    }

    group.finish();
}

fn benchmark_stock_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("stock_fold");

    for scale in [0.05, 0.2] {
        let mut pipeline = DataFabricPipeline::new(small(Profile::Inventory, scale)).unwrap();
        let dataset = pipeline.run().unwrap();

        group.bench_with_input(
            BenchmarkId::new("fold", dataset.material_movements.len()),
            &dataset,
            |b, dataset| {
                b.iter(|| {
                    fold_stock(
                        black_box(&dataset.reference.storage_stock),
                        black_box(&dataset.material_movements),
                        false,
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_calendar,
    benchmark_profiles,
    benchmark_stock_fold
);
criterion_main!(benches);
