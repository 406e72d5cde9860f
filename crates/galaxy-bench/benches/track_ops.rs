//! Criterion micro-benchmarks for track interpolation.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use galaxy_test_utils::{solar_set, synthetic_library};

/// Benchmark: 200 mass-track lookups at one age, as in one cohort step on
/// the small grid.
fn bench_lookup_small_grid(c: &mut Criterion) {
    let lib = synthetic_library(solar_set());
    let masses: Vec<f64> = (0..200)
        .map(|k| 100f64.powf((k as f64 + 0.5) / 200.0))
        .collect();

    c.bench_function("lookup_200_masses", |b| {
        b.iter(|| {
            for &m in &masses {
                let state = lib.lookup(m, 5.0e6).unwrap();
                black_box(state);
            }
        });
    });
}

/// Benchmark: build one isochrone and evaluate it at 1000 masses below the
/// turnoff.
fn bench_isochrone(c: &mut Criterion) {
    let lib = synthetic_library(solar_set());
    let masses: Vec<f64> = (0..1000)
        .map(|k| 14f64.powf((k as f64 + 0.5) / 1000.0))
        .collect();

    c.bench_function("isochrone_1000_masses", |b| {
        b.iter(|| {
            let iso = lib.isochrone(1.0e7);
            for &m in &masses {
                black_box(iso.lookup(m).unwrap());
            }
        });
    });
}

/// Benchmark: turnoff mass at 1000 ages.
fn bench_turnoff(c: &mut Criterion) {
    let lib = synthetic_library(solar_set());
    let ages: Vec<f64> = (0..1000)
        .map(|k| 1.0e6 * 1.0e4f64.powf(k as f64 / 1000.0))
        .collect();

    c.bench_function("turnoff_1000_ages", |b| {
        b.iter(|| {
            for &age in &ages {
                black_box(lib.turnoff_mass(age));
            }
        });
    });
}

criterion_group!(benches, bench_lookup_small_grid, bench_isochrone, bench_turnoff);
criterion_main!(benches);
