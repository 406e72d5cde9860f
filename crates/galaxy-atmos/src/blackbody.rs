//! Planck surface flux and blackbody atmosphere grids.

use std::sync::Arc;

use galaxy_core::units::{C_LIGHT, H_PLANCK, K_BOLTZMANN};
use galaxy_core::DataError;

use crate::grid::{AtmosphereGrid, GravityNode, TeffRow};

/// Emergent surface flux `π B_λ(T)` of a blackbody, in erg s⁻¹ cm⁻² Å⁻¹,
/// at `wavelength` in Å.
pub fn surface_flux(teff: f64, wavelength: f64) -> f64 {
    let lambda_cm = wavelength * 1e-8;
    let x = H_PLANCK * C_LIGHT / (lambda_cm * K_BOLTZMANN * teff);
    // Far Wien tail underflows to zero.
    if x > 700.0 {
        return 0.0;
    }
    let b_lambda = 2.0 * H_PLANCK * C_LIGHT * C_LIGHT / (lambda_cm.powi(5) * x.exp_m1());
    // per cm → per Å
    std::f64::consts::PI * b_lambda * 1e-8
}

/// Build a blackbody [`AtmosphereGrid`].
///
/// Flux is independent of gravity, but every Teff row still carries one
/// node per requested `log g` so the grid behaves like a model atmosphere
/// grid under interpolation.
pub fn blackbody_grid(
    name: &str,
    metallicity: f64,
    wavelengths: Arc<[f64]>,
    teffs: &[f64],
    log_gs: &[f64],
) -> Result<AtmosphereGrid, DataError> {
    let rows = teffs
        .iter()
        .map(|&teff| {
            let flux: Vec<f64> = wavelengths.iter().map(|&w| surface_flux(teff, w)).collect();
            TeffRow {
                teff,
                nodes: log_gs
                    .iter()
                    .map(|&log_g| GravityNode {
                        log_g,
                        flux: flux.clone(),
                    })
                    .collect(),
            }
        })
        .collect();
    AtmosphereGrid::new(name, metallicity, wavelengths, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_core::units::SIGMA_SB;

    #[test]
    fn integrates_to_stefan_boltzmann() {
        let teff = 10_000.0;
        let n = 20_000;
        let (lo, hi): (f64, f64) = (100.0, 1.0e6);
        let ratio = (hi / lo).ln() / n as f64;
        let mut total = 0.0;
        for k in 0..n {
            let a = lo * (ratio * k as f64).exp();
            let b = lo * (ratio * (k + 1) as f64).exp();
            total += 0.5 * (b - a) * (surface_flux(teff, a) + surface_flux(teff, b));
        }
        let want = SIGMA_SB * teff.powi(4);
        assert!((total - want).abs() / want < 1e-3, "{total} vs {want}");
    }

    #[test]
    fn wien_tail_is_zero_not_nan() {
        let f = surface_flux(2000.0, 10.0);
        assert_eq!(f, 0.0);
    }
}
