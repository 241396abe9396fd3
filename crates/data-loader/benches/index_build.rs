//! Benchmarks for rating index construction
//!
//! Run with: cargo bench --package data-loader
//!
//! Uses a synthetic dataset shaped like MovieLens 100k (943 users, 1682 items).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Record, RatingIndex};

fn synthetic_records(n: u32) -> Vec<Record> {
    (0..n)
        .map(|i| Record::new(i % 943 + 1, (i * 7) % 1682 + 1, (i % 5) as f32 + 1.0))
        .collect()
}

fn bench_build_sequential(c: &mut Criterion) {
    let records = synthetic_records(100_000);

    c.bench_function("rating_index_build", |b| {
        b.iter(|| {
            let index = RatingIndex::build(black_box(&records));
            black_box(index)
        })
    });
}

fn bench_build_parallel(c: &mut Criterion) {
    let records = synthetic_records(100_000);

    c.bench_function("rating_index_build_parallel", |b| {
        b.iter(|| {
            let index = RatingIndex::build_parallel(black_box(&records), black_box(10_000));
            black_box(index)
        })
    });
}

criterion_group!(benches, bench_build_sequential, bench_build_parallel);
criterion_main!(benches);
