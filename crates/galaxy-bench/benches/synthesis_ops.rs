//! Criterion benchmarks for spectral synthesis.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use galaxy_atmos::SpectralSynthesizer;
use galaxy_core::{InterpolationMode, PopulationSnapshot, SnapshotEntry, StepId};
use galaxy_engine::WavelengthGrid;
use galaxy_test_utils::{blackbody_atmospheres, solar_set, synthetic_library};

/// A 200-entry Salpeter population at 5 Myr.
fn population() -> PopulationSnapshot {
    let lib = synthetic_library(solar_set());
    let entries = (0..200)
        .filter_map(|k| {
            let lo = 100f64.powf(k as f64 / 200.0);
            let hi = 100f64.powf((k + 1) as f64 / 200.0);
            let m = (lo * hi).sqrt();
            let state = lib.lookup(m, 5.0e6).unwrap().alive()?;
            Some(SnapshotEntry {
                weight: 1.0e4 * m.powf(-2.35) * (hi - lo),
                state,
            })
        })
        .collect();
    PopulationSnapshot {
        step: StepId(0),
        time: 5.0e6,
        dt: 1.0e5,
        mode: InterpolationMode::MassTrack,
        entries,
        events: Vec::new(),
    }
}

/// Benchmark: synthesize the composite SED on the default output grid.
fn bench_synthesize_default_grid(c: &mut Criterion) {
    let wavelengths = WavelengthGrid::default().build();
    let synth = SpectralSynthesizer::new(blackbody_atmospheres(), wavelengths);
    let snapshot = population();

    c.bench_function("synthesize_200_entries", |b| {
        b.iter(|| {
            let sed = synth.synthesize(&snapshot, 0.014).unwrap();
            black_box(sed.bolometric());
        });
    });
}

criterion_group!(benches, bench_synthesize_default_grid);
criterion_main!(benches);
