//! End-to-end scenarios on the synthetic track fixture.
//!
//! The fixture lifetimes run from about 3 Myr at 100 M☉ to about 40 Myr at
//! 8 M☉, so burst and continuous populations reproduce the qualitative
//! behavior of real models on those time scales.

use std::sync::Arc;

use galaxy::prelude::*;
use galaxy::types::units::SOLAR_LUMINOSITY;
use galaxy_test_utils::{blackbody_atmospheres, solar_set, synthetic_library};

fn catalog() -> TrackCatalog {
    let mut catalog = TrackCatalog::new();
    catalog.insert(Arc::new(synthetic_library(solar_set())));
    catalog
}

fn run(config: ModelConfig) -> RunOutput {
    Simulation::new(config, &catalog(), Arc::new(blackbody_atmospheres()))
        .unwrap()
        .run()
        .unwrap()
}

/// 10⁶ M☉ Salpeter burst between 0.1 and 100 M☉, every 0.1 Myr from
/// 0.01 to 50 Myr.
fn burst(outputs: OutputSelection) -> ModelConfig {
    ModelConfig {
        name: "burst".to_owned(),
        star_formation: StarFormation::Burst { total_mass: 1.0e6 },
        imf: vec![ImfSegment::new(2.35, 0.1, 100.0)],
        atmosphere: AtmosphereModel::Blackbody,
        time: TimeGridSpec::Linear {
            start: 1.0e4,
            end: 5.0e7,
            step: 1.0e5,
        },
        outputs,
        ..ModelConfig::default()
    }
}

fn burst_outputs() -> OutputSelection {
    OutputSelection::empty()
        .with(ProductKind::StellarParameters)
        .with(ProductKind::SupernovaRate)
        .with(ProductKind::WindPower)
}

struct Budget {
    times: Vec<f64>,
    luminosity: Vec<f64>,
    wind: Vec<f64>,
    supernova: Vec<f64>,
    supernova_rate: Vec<f64>,
}

fn budget(out: &RunOutput) -> Budget {
    let Some(ProductSeries::StellarParameters(params)) =
        out.series(ProductKind::StellarParameters)
    else {
        panic!("parameters missing");
    };
    let Some(ProductSeries::WindPower(wind)) = out.series(ProductKind::WindPower) else {
        panic!("wind power missing");
    };
    let Some(ProductSeries::SupernovaRate(sn)) = out.series(ProductKind::SupernovaRate) else {
        panic!("supernova rate missing");
    };
    Budget {
        times: params.times().to_vec(),
        luminosity: params
            .rows()
            .iter()
            .map(|r| r.bolometric_luminosity)
            .collect(),
        wind: wind.rows().iter().map(|r| r.power).collect(),
        supernova: sn.rows().iter().map(|r| r.power).collect(),
        supernova_rate: sn.rows().iter().map(|r| r.rate).collect(),
    }
}

#[test]
fn burst_fades_after_the_most_massive_stars_die() {
    let b = budget(&run(burst(burst_outputs())));
    assert_eq!(b.times.len(), 500);
    let fading: Vec<_> = b
        .times
        .iter()
        .zip(&b.luminosity)
        .filter(|(&t, _)| t >= 3.5e6)
        .map(|(_, &l)| l)
        .collect();
    for w in fading.windows(2) {
        assert!(w[1] <= w[0] * (1.0 + 1e-9), "{} > {}", w[1], w[0]);
    }
    assert!(fading.last().unwrap() < &(0.2 * fading[0]));
}

#[test]
fn supernovae_occur_only_between_3_and_40_myr() {
    let b = budget(&run(burst(burst_outputs())));
    for (&t, &rate) in b.times.iter().zip(&b.supernova_rate) {
        if rate > 0.0 {
            assert!(t > 3.0e6 && t < 4.1e7, "supernovae at {t} yr");
        }
    }
    let at = |time: f64| {
        let i = b.times.iter().position(|&t| t >= time).unwrap();
        b.supernova_rate[i]
    };
    assert!(at(5.0e6) > 0.0);
    assert!(at(3.0e7) > 0.0);
    assert_eq!(at(4.5e7), 0.0);
}

#[test]
fn burst_energy_budget_never_exceeds_its_start() {
    let b = budget(&run(burst(burst_outputs())));
    let power: Vec<f64> = (0..b.times.len())
        .map(|i| b.luminosity[i] * SOLAR_LUMINOSITY + b.wind[i] + b.supernova[i])
        .collect();
    let initial = power[0];
    for (t, p) in b.times.iter().zip(&power) {
        assert!(*p <= 1.1 * initial, "power {p} at {t} yr exceeds 1.1 × {initial}");
    }
}

#[test]
fn burst_returns_no_more_mass_than_it_formed() {
    // Every star of a 40–100 M☉ burst has exploded by 4 Myr.
    let config = ModelConfig {
        imf: vec![ImfSegment::new(2.35, 40.0, 100.0)],
        time: TimeGridSpec::Linear {
            start: 1.0e5,
            end: 1.5e7,
            step: 1.0e5,
        },
        ..burst(
            OutputSelection::empty()
                .with(ProductKind::Yields)
                .with(ProductKind::SupernovaRate),
        )
    };
    let out = run(config);
    let Some(ProductSeries::SupernovaRate(sn)) = out.series(ProductKind::SupernovaRate) else {
        panic!("supernova rate missing");
    };
    let Some(ProductSeries::Yields(yields)) = out.series(ProductKind::Yields) else {
        panic!("yields missing");
    };
    let explosions = sn.rows().last().unwrap().cumulative_count;
    let returned = yields.rows().last().unwrap().cumulative.total();
    let available = 1.0e6 - explosions * galaxy::products::NEUTRON_STAR_MASS;
    assert!(explosions > 0.0);
    assert!(returned <= available, "returned {returned} of {available} M☉");
    // Winds and explosions still return most of the mass.
    assert!(returned > 0.5 * available);
}

#[test]
fn continuous_formation_reaches_a_steady_state() {
    // Longest lifetime on the IMF is about 6 Myr.
    let config = ModelConfig {
        name: "continuous".to_owned(),
        star_formation: StarFormation::Continuous {
            rate: SfrHistory::Constant(1.0),
        },
        imf: vec![ImfSegment::new(2.35, 20.0, 100.0)],
        atmosphere: AtmosphereModel::Blackbody,
        time: TimeGridSpec::Linear {
            start: 2.0e5,
            end: 2.0e7,
            step: 2.0e5,
        },
        outputs: burst_outputs(),
        ..ModelConfig::default()
    };
    let b = budget(&run(config));
    let early = b.times.iter().position(|&t| t >= 1.0e6).unwrap();
    let settled = b.times.iter().position(|&t| t >= 8.0e6).unwrap();

    assert!(b.luminosity[settled] > 2.0 * b.luminosity[early]);
    for w in b.luminosity[settled..].windows(2) {
        assert!((w[1] - w[0]).abs() / w[0] < 1e-3, "{} vs {}", w[1], w[0]);
    }
    for w in b.supernova_rate[settled..].windows(2) {
        assert!((w[1] - w[0]).abs() / w[0] < 1e-3);
    }
}

#[test]
fn isochrone_and_mass_track_runs_differ_but_agree_roughly() {
    let outputs = OutputSelection::empty().with(ProductKind::StellarParameters);
    let config = |method| ModelConfig {
        method,
        time: TimeGridSpec::Logarithmic {
            start: 1.0e6,
            end: 3.0e7,
            count: 12,
        },
        ..burst(outputs)
    };
    let tracks = run(config(SynthesisMethod::SmallGrid));
    let isochrones = run(config(SynthesisMethod::Isochrone));
    assert_eq!(tracks.mode, InterpolationMode::MassTrack);
    assert_eq!(isochrones.mode, InterpolationMode::Isochrone);

    let a = budget_luminosity(&tracks);
    let b = budget_luminosity(&isochrones);
    assert_ne!(a, b);
    for (la, lb) in a.iter().zip(&b) {
        let ratio = la / lb;
        assert!((0.8..1.25).contains(&ratio), "mass-track/isochrone = {ratio}");
    }
}

fn budget_luminosity(out: &RunOutput) -> Vec<f64> {
    match out.series(ProductKind::StellarParameters) {
        Some(ProductSeries::StellarParameters(params)) => params
            .rows()
            .iter()
            .map(|r| r.bolometric_luminosity)
            .collect(),
        _ => panic!("parameters missing"),
    }
}

#[test]
fn spectral_products_follow_the_burst() {
    let config = ModelConfig {
        time: TimeGridSpec::Logarithmic {
            start: 1.0e6,
            end: 2.0e7,
            count: 5,
        },
        ..burst(
            OutputSelection::empty()
                .with(ProductKind::Quanta)
                .with(ProductKind::Spectrum)
                .with(ProductKind::Colors),
        )
    };
    let out = run(config);
    let Some(ProductSeries::Quanta(quanta)) = out.series(ProductKind::Quanta) else {
        panic!("quanta missing");
    };
    let rows = quanta.rows();
    assert!(rows[0].q_h0 > 100.0 * rows[4].q_h0);
    let Some(ProductSeries::Colors(colors)) = out.series(ProductKind::Colors) else {
        panic!("colors missing");
    };
    let bv: Vec<f64> = colors
        .rows()
        .iter()
        .map(|r| r.color("B", "V").unwrap())
        .collect();
    assert!(bv[4] > bv[0], "population should redden: {bv:?}");
}

#[test]
fn run_output_serializes() {
    let config = ModelConfig {
        time: TimeGridSpec::Linear {
            start: 1.0e6,
            end: 2.0e6,
            step: 1.0e6,
        },
        ..burst(OutputSelection::empty().with(ProductKind::SupernovaRate))
    };
    let json = serde_json::to_value(run(config)).unwrap();
    assert_eq!(json["mode"], "mass_track");
    assert_eq!(json["steps"], 2);
    assert_eq!(json["series"][0]["product"], "supernova_rate");
}
