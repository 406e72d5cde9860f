//! Composite spectral energy distributions.

use std::sync::Arc;

use galaxy_core::units::{C_LIGHT, H_PLANCK, SOLAR_LUMINOSITY};

/// Population-integrated monochromatic luminosity `L_λ` in erg s⁻¹ Å⁻¹ on
/// the output wavelength grid (Å).
#[derive(Clone, Debug, PartialEq)]
pub struct Sed {
    wavelengths: Arc<[f64]>,
    luminosity: Vec<f64>,
}

impl Sed {
    /// Wrap a luminosity array; lengths must match.
    pub fn new(wavelengths: Arc<[f64]>, luminosity: Vec<f64>) -> Self {
        debug_assert_eq!(wavelengths.len(), luminosity.len());
        Self {
            wavelengths,
            luminosity,
        }
    }

    /// Output wavelengths in Å.
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    /// The shared output grid handle.
    pub fn shared_wavelengths(&self) -> &Arc<[f64]> {
        &self.wavelengths
    }

    /// `L_λ` in erg s⁻¹ Å⁻¹.
    pub fn luminosity(&self) -> &[f64] {
        &self.luminosity
    }

    /// Total luminosity by trapezoidal integration, in erg s⁻¹.
    pub fn bolometric(&self) -> f64 {
        self.wavelengths
            .windows(2)
            .zip(self.luminosity.windows(2))
            .map(|(w, l)| 0.5 * (w[1] - w[0]) * (l[0] + l[1]))
            .sum()
    }

    /// Total luminosity in L☉.
    pub fn bolometric_solar(&self) -> f64 {
        self.bolometric() / SOLAR_LUMINOSITY
    }

    /// Photon emission rate shortward of `edge` (Å), in s⁻¹.
    ///
    /// Integrates `L_λ λ / (h c)` by the trapezoid rule; the interval
    /// straddling the edge is cut at the edge with `L_λ` interpolated
    /// linearly.
    pub fn ionizing_photons(&self, edge: f64) -> f64 {
        let photons = |w: f64, l: f64| l * w * 1e-8 / (H_PLANCK * C_LIGHT);
        let mut total = 0.0;
        for (w, l) in self.wavelengths.windows(2).zip(self.luminosity.windows(2)) {
            if w[0] >= edge {
                break;
            }
            let (w1, l1) = if w[1] <= edge {
                (w[1], l[1])
            } else {
                let f = (edge - w[0]) / (w[1] - w[0]);
                (edge, l[0] + f * (l[1] - l[0]))
            };
            total += 0.5 * (w1 - w[0]) * (photons(w[0], l[0]) + photons(w1, l1));
        }
        total
    }

    /// `L_λ` at `wavelength` by linear interpolation; zero outside the grid.
    pub fn at(&self, wavelength: f64) -> f64 {
        let w = &self.wavelengths;
        let n = w.len();
        if n == 0 || wavelength < w[0] || wavelength > w[n - 1] {
            return 0.0;
        }
        let j = w.partition_point(|&x| x < wavelength);
        if w[j] == wavelength {
            return self.luminosity[j];
        }
        let f = (wavelength - w[j - 1]) / (w[j] - w[j - 1]);
        self.luminosity[j - 1] + f * (self.luminosity[j] - self.luminosity[j - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat() -> Sed {
        Sed::new(Arc::from(vec![100.0, 500.0, 900.0, 1300.0]), vec![1.0; 4])
    }

    #[test]
    fn bolometric_of_flat_sed() {
        assert!((flat().bolometric() - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn photons_cut_at_edge() {
        // ∫_100^700 λ dλ · 1e-8 / (h c)
        let want = 0.5 * (700.0f64.powi(2) - 100.0f64.powi(2)) * 1e-8 / (H_PLANCK * C_LIGHT);
        let got = flat().ionizing_photons(700.0);
        assert!((got - want).abs() / want < 1e-12);
    }

    #[test]
    fn no_photons_below_grid() {
        assert_eq!(flat().ionizing_photons(50.0), 0.0);
    }

    #[test]
    fn at_interpolates() {
        let sed = Sed::new(Arc::from(vec![1.0, 3.0]), vec![2.0, 6.0]);
        assert_eq!(sed.at(2.0), 4.0);
        assert_eq!(sed.at(4.0), 0.0);
    }
}
