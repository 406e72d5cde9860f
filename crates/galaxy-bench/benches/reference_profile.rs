//! Criterion benchmarks for whole engine steps.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use galaxy_bench::{build_engine, reference_profile, stress_profile};

fn bench_step_reference(c: &mut Criterion) {
    c.bench_function("step_reference_10_myr", |b| {
        b.iter_batched(
            || {
                let mut engine = build_engine(reference_profile()).unwrap();
                // Advance past the supernova onset so every product has work.
                for _ in 0..9 {
                    engine.step().unwrap();
                }
                engine
            },
            |mut engine| {
                let report = engine.step().unwrap();
                black_box(report);
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

fn bench_run_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    group.sample_size(10);
    group.bench_function("reference_50_steps", |b| {
        b.iter(|| {
            let output = build_engine(reference_profile()).unwrap().run().unwrap();
            black_box(output);
        });
    });
    group.bench_function("stress_50_steps", |b| {
        b.iter(|| {
            let output = build_engine(stress_profile()).unwrap().run().unwrap();
            black_box(output);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_step_reference, bench_run_reference);
criterion_main!(benches);
