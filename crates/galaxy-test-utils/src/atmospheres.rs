//! Blackbody atmosphere fixtures.
//!
//! Every sub-library a [`BlendRule`] names is filled with blackbody grids
//! at two metallicities, so routing and nearest-Z selection can be
//! exercised without model atmosphere data.

use std::sync::Arc;

use galaxy_atmos::blackbody::blackbody_grid;
use galaxy_atmos::{AtmosphereLibrary, BlendRule, SubLibrary};

/// Metallicities at which fixture grids are tabulated.
pub const FIXTURE_METALLICITIES: [f64; 2] = [0.004, 0.02];

/// `n` logarithmically spaced values from `lo` to `hi` inclusive.
pub fn log_spaced(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|k| lo * (hi / lo).powf(k as f64 / (n - 1) as f64))
        .collect()
}

/// Native wavelength grid of the fixture atmospheres, Å.
pub fn native_wavelengths() -> Arc<[f64]> {
    log_spaced(20.0, 2.0e6, 1500).into()
}

/// Output grid suitable for spectral synthesis against the fixtures, Å.
pub fn output_wavelengths() -> Arc<[f64]> {
    log_spaced(25.0, 1.6e6, 1000).into()
}

fn fixture_teffs() -> Vec<f64> {
    log_spaced(500.0, 200_000.0, 80)
}

/// A sub-library of blackbody grids named `name`.
pub fn blackbody_sublibrary(name: &str, wavelengths: &Arc<[f64]>) -> SubLibrary {
    let teffs = fixture_teffs();
    let grids = FIXTURE_METALLICITIES
        .iter()
        .map(|&z| {
            blackbody_grid(name, z, Arc::clone(wavelengths), &teffs, &[-1.0, 6.0])
                .expect("blackbody fixture grid is well formed")
        })
        .collect();
    SubLibrary::new(name, grids).expect("fixture sub-library is non-empty")
}

/// An atmosphere library whose sub-libraries are exactly those `rule`
/// names, all blackbody.
pub fn fixture_atmospheres(rule: BlendRule) -> AtmosphereLibrary {
    let wavelengths = native_wavelengths();
    let mut names: Vec<String> = rule.libraries().map(str::to_owned).collect();
    names.sort();
    names.dedup();
    let sublibraries = names
        .iter()
        .map(|name| blackbody_sublibrary(name, &wavelengths))
        .collect();
    AtmosphereLibrary::new(sublibraries, rule).expect("rule names only fixture sub-libraries")
}

/// Single blackbody sub-library named `"blackbody"`.
pub fn blackbody_atmospheres() -> AtmosphereLibrary {
    fixture_atmospheres(BlendRule::single("blackbody"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_atmos::AtmosphereModel;

    #[test]
    fn preset_rules_build() {
        for code in 1..=5 {
            let model = AtmosphereModel::from_code(code).unwrap();
            let lib = fixture_atmospheres(model.rule());
            assert!(lib.rule().libraries().all(|n| lib.contains(n)));
        }
    }

    #[test]
    fn log_spacing_hits_endpoints() {
        let v = log_spaced(10.0, 1000.0, 3);
        assert!((v[1] - 100.0).abs() < 1e-9);
        assert!((v[2] - 1000.0).abs() < 1e-9);
    }
}
