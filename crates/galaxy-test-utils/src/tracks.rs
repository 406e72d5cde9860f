//! Synthetic evolutionary tracks.
//!
//! Power-law main-sequence scalings with a short post-main-sequence tail,
//! close enough to real models that burst and continuous scenarios behave
//! qualitatively right:
//!
//! - lifetime `τ(m) = 3 Myr + 10 Gyr · m^-2.7`
//! - `L ∝ m^3.5` below 10 M☉, `m^2.5` above, brightening by 0.03 dex
//!   over the life of the star
//! - `Teff = 5772 K · m^0.55` on the ZAMS
//! - `log Ṁ = -13 + 1.25 log L`
//! - the last 10% of each life is post-main-sequence: giants below
//!   9 M☉, blue then red supergiants up to 25 M☉, Wolf–Rayet above.

use galaxy_core::units::SOLAR_TEFF;
use galaxy_core::EvolutionaryPhase;
use galaxy_tracks::{MassTrack, TrackLibrary, TrackSample, TrackSetId};

/// Initial masses of the synthetic grid, M☉.
pub const FIXTURE_MASSES: [f64; 20] = [
    0.1, 0.2, 0.5, 0.8, 1.0, 1.5, 2.0, 3.0, 5.0, 7.0, 9.0, 12.0, 15.0, 20.0, 25.0, 40.0, 60.0,
    85.0, 100.0, 120.0,
];

/// Fraction of the lifetime at which samples are tabulated.
const AGE_FRACTIONS: [f64; 8] = [0.0, 0.2, 0.4, 0.6, 0.8, 0.9, 0.95, 1.0];

/// Lifetime of the synthetic star of initial mass `m`, years.
pub fn fixture_lifetime(m: f64) -> f64 {
    3.0e6 + 1.0e10 * m.powf(-2.7)
}

fn zams_log_l(m: f64) -> f64 {
    if m <= 10.0 {
        3.5 * m.log10()
    } else {
        3.5 + 2.5 * (m / 10.0).log10()
    }
}

fn sample(m: f64, f: f64) -> TrackSample {
    let log_t0 = SOLAR_TEFF.log10() + 0.55 * m.log10();
    let log_l = zams_log_l(m) + 0.03 * f;
    let (phase, log_teff) = if f < 0.85 {
        (EvolutionaryPhase::MainSequence, log_t0 - 0.05 * f)
    } else if m >= 25.0 {
        match f {
            f if f < 0.925 => (EvolutionaryPhase::BlueSupergiant, log_t0 - 0.05),
            f if f < 0.975 => (EvolutionaryPhase::WolfRayetWn, log_t0 + 0.15),
            _ => (EvolutionaryPhase::WolfRayetWc, log_t0 + 0.2),
        }
    } else if m >= 9.0 {
        if f < 0.925 {
            (EvolutionaryPhase::BlueSupergiant, log_t0 - 0.1)
        } else {
            (EvolutionaryPhase::RedSupergiant, 4000f64.log10())
        }
    } else {
        (EvolutionaryPhase::Giant, log_t0 - 0.3 * (f - 0.8) / 0.2)
    };
    // L = 4πR²σT⁴ in solar units.
    let log_r = 0.5 * log_l - 2.0 * (log_teff - SOLAR_TEFF.log10());
    let mass = if m >= 25.0 {
        m * (1.0 - 0.3 * f.powi(4))
    } else {
        m * (1.0 - 0.05 * f)
    };
    let log_mdot = -13.0 + 1.25 * log_l + if phase.is_wolf_rayet() { 0.5 } else { 0.0 };
    TrackSample {
        age: f * fixture_lifetime(m),
        log_l,
        log_teff,
        log_r,
        mass,
        log_mdot,
        phase,
    }
}

/// The synthetic track of initial mass `m`.
pub fn synthetic_track(m: f64) -> MassTrack {
    let samples = AGE_FRACTIONS.iter().map(|&f| sample(m, f)).collect();
    MassTrack::new(m, samples).expect("synthetic track is well formed")
}

/// A track library over [`FIXTURE_MASSES`] labelled with `set`.
pub fn synthetic_library(set: TrackSetId) -> TrackLibrary {
    synthetic_library_with(set, &FIXTURE_MASSES)
}

/// A track library over a custom ascending list of masses.
pub fn synthetic_library_with(set: TrackSetId, masses: &[f64]) -> TrackLibrary {
    let tracks = masses.iter().map(|&m| synthetic_track(m)).collect();
    TrackLibrary::new(set, tracks).expect("synthetic library is well formed")
}

/// Solar-metallicity Geneva 2012 set (selector code 14).
pub fn solar_set() -> TrackSetId {
    TrackSetId::from_code(14).expect("code 14 is a known track set")
}

/// Render `lib` in the plain-text track table format.
pub fn to_table_text(lib: &TrackLibrary) -> String {
    let mut out = String::new();
    for track in lib.tracks() {
        out.push_str(&format!("M={}\n", track.initial_mass()));
        for s in track.samples() {
            out.push_str(&format!(
                "{:e} {} {} {} {:e} {} {}\n",
                s.age,
                s.log_l,
                10f64.powf(s.log_teff),
                10f64.powf(s.log_r),
                10f64.powf(s.log_mdot),
                s.phase.code(),
                s.mass,
            ));
        }
    }
    out
}
