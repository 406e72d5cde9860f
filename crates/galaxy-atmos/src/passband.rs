//! Photometric passbands and AB magnitudes.
//!
//! A [`Passband`] is a piecewise-linear transmission curve `T(λ)` on an
//! ascending wavelength table (Å), zero outside the table. Magnitudes are
//! computed for a photon-counting detector on the AB system, with the
//! population placed at 10 pc so that the result is an absolute magnitude.

use galaxy_core::units::{C_LIGHT_ANGSTROM, PARSEC_CM};
use thiserror::Error;

use crate::sed::Sed;

/// Errors constructing a passband table.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PassbandError {
    /// Wavelength and transmission tables differ in length.
    #[error("wavelength and transmission tables must have the same length")]
    LengthMismatch,
    /// Fewer than two table points.
    #[error("a passband needs at least two points")]
    TooShort,
    /// Wavelengths are not strictly ascending.
    #[error("wavelengths must be in ascending order")]
    NotAscending,
    /// A transmission value lies outside `[0, 1]`.
    #[error("transmission values must be between 0.0 and 1.0")]
    OutOfRange,
}

/// A filter transmission curve.
#[derive(Clone, Debug, PartialEq)]
pub struct Passband {
    name: String,
    wavelengths: Vec<f64>,
    transmission: Vec<f64>,
}

/// AB zero point in erg s⁻¹ cm⁻² Hz⁻¹ expressed as a magnitude offset.
const AB_ZERO_POINT: f64 = -48.60;

/// Johnson–Cousins bands as `(name, effective wavelength Å, FWHM Å)`.
const JOHNSON: [(&str, f64, f64); 8] = [
    ("U", 3_600.0, 700.0),
    ("B", 4_400.0, 1_000.0),
    ("V", 5_500.0, 900.0),
    ("R", 6_400.0, 1_500.0),
    ("I", 7_900.0, 1_500.0),
    ("J", 12_200.0, 2_600.0),
    ("H", 16_300.0, 2_900.0),
    ("K", 21_900.0, 4_100.0),
];

impl Passband {
    /// Build a passband from a transmission table.
    pub fn from_table(
        name: impl Into<String>,
        wavelengths: Vec<f64>,
        transmission: Vec<f64>,
    ) -> Result<Self, PassbandError> {
        if wavelengths.len() != transmission.len() {
            return Err(PassbandError::LengthMismatch);
        }
        if wavelengths.len() < 2 {
            return Err(PassbandError::TooShort);
        }
        if wavelengths.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PassbandError::NotAscending);
        }
        if transmission.iter().any(|t| !(0.0..=1.0).contains(t)) {
            return Err(PassbandError::OutOfRange);
        }
        Ok(Self {
            name: name.into(),
            wavelengths,
            transmission,
        })
    }

    /// Idealized trapezoidal band: full transmission over the central half
    /// of `2 × fwhm`, ramping linearly to zero at `center ± 0.75 fwhm`.
    pub fn trapezoid(name: impl Into<String>, center: f64, fwhm: f64) -> Result<Self, PassbandError> {
        let band = Self::trapezoid_table(name, center, fwhm);
        Self::from_table(band.name, band.wavelengths, band.transmission)
    }

    /// The Johnson UBVRIJHK set, idealized as trapezoids.
    pub fn johnson() -> Vec<Passband> {
        // Every JOHNSON width is positive, so the tables are valid.
        JOHNSON
            .iter()
            .map(|&(name, center, fwhm)| Self::trapezoid_table(name, center, fwhm))
            .collect()
    }

    fn trapezoid_table(name: impl Into<String>, center: f64, fwhm: f64) -> Self {
        Self {
            name: name.into(),
            wavelengths: vec![
                center - 0.75 * fwhm,
                center - 0.25 * fwhm,
                center + 0.25 * fwhm,
                center + 0.75 * fwhm,
            ],
            transmission: vec![0.0, 1.0, 1.0, 0.0],
        }
    }

    /// Band name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transmission at `wavelength`; zero outside the table.
    pub fn at(&self, wavelength: f64) -> f64 {
        let w = &self.wavelengths;
        let n = w.len();
        if wavelength < w[0] || wavelength > w[n - 1] {
            return 0.0;
        }
        let j = w.partition_point(|&x| x < wavelength);
        if w[j] == wavelength {
            return self.transmission[j];
        }
        let f = (wavelength - w[j - 1]) / (w[j] - w[j - 1]);
        self.transmission[j - 1] + f * (self.transmission[j] - self.transmission[j - 1])
    }

    /// Photon-weighted mean `f_ν` of `sed` observed from 10 pc, in
    /// erg s⁻¹ cm⁻² Hz⁻¹.
    ///
    /// `⟨f_ν⟩ = ∫ f_λ T λ dλ / ∫ T (c / λ) dλ`, integrated by the trapezoid
    /// rule on the union of SED and passband wavelengths inside the band.
    pub fn mean_fnu(&self, sed: &Sed) -> f64 {
        let (lo, hi) = (self.wavelengths[0], self.wavelengths[self.wavelengths.len() - 1]);
        let mut grid: Vec<f64> = sed
            .wavelengths()
            .iter()
            .copied()
            .filter(|&w| w > lo && w < hi)
            .chain(self.wavelengths.iter().copied())
            .collect();
        grid.sort_by(f64::total_cmp);
        grid.dedup();

        let dilution = 1.0 / (4.0 * std::f64::consts::PI * (10.0 * PARSEC_CM).powi(2));
        let mut num = 0.0;
        let mut den = 0.0;
        for w in grid.windows(2) {
            let (a, b) = (w[0], w[1]);
            let (ta, tb) = (self.at(a), self.at(b));
            let fa = sed.at(a) * dilution;
            let fb = sed.at(b) * dilution;
            num += 0.5 * (b - a) * (fa * ta * a + fb * tb * b);
            den += 0.5 * (b - a) * (ta * C_LIGHT_ANGSTROM / a + tb * C_LIGHT_ANGSTROM / b);
        }
        if den > 0.0 {
            num / den
        } else {
            0.0
        }
    }

    /// Absolute AB magnitude of `sed` in this band; `None` when the SED has
    /// no flux in the band.
    pub fn ab_magnitude(&self, sed: &Sed) -> Option<f64> {
        let fnu = self.mean_fnu(sed);
        (fnu > 0.0).then(|| -2.5 * fnu.log10() + AB_ZERO_POINT)
    }
}
