//! Row types of the output series, one per implemented product.
//!
//! Rows are plain data. Column layout and number formatting belong to
//! whichever writer consumes the series; every row derives `Serialize` so
//! that writer can be a serde format.

use std::sync::Arc;

use serde::Serialize;

// ── Quanta ─────────────────────────────────────────────────────────

/// Ionizing photon emission rates, s⁻¹.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct QuantaRow {
    /// Photons shortward of 911.76 Å (H⁰ ionizing).
    pub q_h0: f64,
    /// Photons shortward of 504.26 Å (He⁰ ionizing).
    pub q_he0: f64,
    /// Photons shortward of 227.84 Å (He⁺ ionizing).
    pub q_he1: f64,
}

impl QuantaRow {
    /// `log₁₀ Q(H⁰)`, or `None` when no ionizing photons are emitted.
    pub fn log_q_h0(&self) -> Option<f64> {
        (self.q_h0 > 0.0).then(|| self.q_h0.log10())
    }
}

// ── Supernovae ─────────────────────────────────────────────────────

/// Core-collapse supernova rate and energy input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SupernovaRow {
    /// Supernovae per year during the step.
    pub rate: f64,
    /// Mean mechanical power of the step's explosions, erg s⁻¹.
    pub power: f64,
    /// Energy released by all supernovae so far, erg.
    pub cumulative_energy: f64,
    /// Number of supernovae so far.
    pub cumulative_count: f64,
    /// Direct-collapse black holes formed during the step.
    pub black_holes: f64,
}

// ── HRD ────────────────────────────────────────────────────────────

/// One weighted point in the Hertzsprung–Russell diagram.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HrdPoint {
    /// Initial mass of the representative star, M☉.
    pub initial_mass: f64,
    /// `log₁₀ Teff`.
    pub log_teff: f64,
    /// `log₁₀ L/L☉`.
    pub log_l: f64,
    /// Number of stars the point stands for.
    pub weight: f64,
}

/// Population in the HRD at one time.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HrdRow {
    /// Points in ascending initial mass.
    pub points: Vec<HrdPoint>,
}

// ── Winds ──────────────────────────────────────────────────────────

/// Stellar-wind mechanical output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct WindRow {
    /// Wind power `Σ w ½ ṁ v∞²`, erg s⁻¹.
    pub power: f64,
    /// Wind energy deposited so far, erg.
    pub cumulative_energy: f64,
    /// Total wind mass-loss rate, M☉ yr⁻¹.
    pub mass_loss_rate: f64,
}

// ── Stellar parameters ─────────────────────────────────────────────

/// Number of living stars per spectral class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SpectralCensus {
    /// Teff ≥ 30 000 K.
    pub o: f64,
    /// 10 000 K ≤ Teff < 30 000 K.
    pub b: f64,
    /// 7 500 K ≤ Teff < 10 000 K.
    pub a: f64,
    /// 6 000 K ≤ Teff < 7 500 K.
    pub f: f64,
    /// 5 200 K ≤ Teff < 6 000 K.
    pub g: f64,
    /// 3 700 K ≤ Teff < 5 200 K.
    pub k: f64,
    /// Teff < 3 700 K.
    pub m: f64,
    /// Nitrogen-sequence Wolf–Rayet stars.
    pub wn: f64,
    /// Carbon-sequence Wolf–Rayet stars.
    pub wc: f64,
}

impl SpectralCensus {
    /// Wolf–Rayet stars of either sequence.
    pub fn wolf_rayet(&self) -> f64 {
        self.wn + self.wc
    }

    /// WR/O number ratio, `None` without O stars.
    pub fn wr_to_o(&self) -> Option<f64> {
        (self.o > 0.0).then(|| self.wolf_rayet() / self.o)
    }
}

/// Integrated stellar parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StellarParametersRow {
    /// Total bolometric luminosity, L☉.
    pub bolometric_luminosity: f64,
    /// Mass in living stars, M☉.
    pub living_mass: f64,
    /// Number of living stars.
    pub star_count: f64,
    /// Luminosity-weighted mean `log₁₀ Teff`; zero for an empty population.
    pub mean_log_teff: f64,
    /// Spectral-type counts.
    pub census: SpectralCensus,
}

// ── Yields ─────────────────────────────────────────────────────────

/// Masses or mass rates per element, in M☉ or M☉ yr⁻¹.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ElementMasses {
    /// Hydrogen.
    pub h: f64,
    /// Helium.
    pub he: f64,
    /// Carbon.
    pub c: f64,
    /// Nitrogen.
    pub n: f64,
    /// Oxygen.
    pub o: f64,
}

impl ElementMasses {
    /// Every element multiplied by `s`.
    pub fn scaled(self, s: f64) -> Self {
        Self {
            h: self.h * s,
            he: self.he * s,
            c: self.c * s,
            n: self.n * s,
            o: self.o * s,
        }
    }

    /// Sum over the tracked elements.
    pub fn total(&self) -> f64 {
        self.h + self.he + self.c + self.n + self.o
    }
}

impl std::ops::Add for ElementMasses {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            h: self.h + rhs.h,
            he: self.he + rhs.he,
            c: self.c + rhs.c,
            n: self.n + rhs.n,
            o: self.o + rhs.o,
        }
    }
}

impl std::ops::AddAssign for ElementMasses {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Chemical enrichment of the interstellar medium.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct YieldsRow {
    /// Wind ejection rates, M☉ yr⁻¹.
    pub wind: ElementMasses,
    /// Supernova ejection rates, M☉ yr⁻¹.
    pub supernova: ElementMasses,
    /// Total ejected mass so far, M☉.
    pub cumulative: ElementMasses,
}

// ── Spectrum ───────────────────────────────────────────────────────

/// Composite SED at one time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpectrumRow {
    /// Output grid, Å. Shared across every row of a run.
    pub wavelengths: Arc<[f64]>,
    /// `L_λ`, erg s⁻¹ Å⁻¹.
    pub luminosity: Vec<f64>,
    /// Integrated luminosity, erg s⁻¹.
    pub bolometric: f64,
}

impl SpectrumRow {
    /// `log₁₀ L_λ` with zero flux mapped to `None`.
    pub fn log_luminosity(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.luminosity
            .iter()
            .map(|&l| (l > 0.0).then(|| l.log10()))
    }
}

// ── Colors ─────────────────────────────────────────────────────────

/// Absolute AB magnitude in one band.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BandMagnitude {
    /// Band name.
    pub name: String,
    /// Magnitude; `None` when the SED has no flux in the band.
    pub ab: Option<f64>,
}

/// Broad-band photometry at one time.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ColorsRow {
    /// Magnitudes in band order.
    pub bands: Vec<BandMagnitude>,
}

impl ColorsRow {
    /// Magnitude in the named band.
    pub fn magnitude(&self, band: &str) -> Option<f64> {
        self.bands.iter().find(|b| b.name == band)?.ab
    }

    /// Color index `a − b`, e.g. `color("B", "V")`.
    pub fn color(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.magnitude(a)? - self.magnitude(b)?)
    }

    /// Absolute V magnitude.
    pub fn absolute_v(&self) -> Option<f64> {
        self.magnitude("V")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> ColorsRow {
        ColorsRow {
            bands: vec![
                BandMagnitude { name: "B".into(), ab: Some(-10.2) },
                BandMagnitude { name: "V".into(), ab: Some(-10.0) },
                BandMagnitude { name: "K".into(), ab: None },
            ],
        }
    }

    #[test]
    fn color_index() {
        let c = colors();
        assert!((c.color("B", "V").unwrap() + 0.2).abs() < 1e-12);
        assert_eq!(c.absolute_v(), Some(-10.0));
    }

    #[test]
    fn missing_band_gives_no_color() {
        let c = colors();
        assert_eq!(c.color("V", "K"), None);
        assert_eq!(c.color("U", "B"), None);
    }

    #[test]
    fn element_arithmetic() {
        let a = ElementMasses { h: 1.0, he: 2.0, c: 0.0, n: 0.0, o: 1.0 };
        let mut b = a.scaled(2.0);
        b += a;
        assert_eq!(b.h, 3.0);
        assert_eq!(b.total(), 12.0);
    }

    #[test]
    fn census_ratio() {
        let c = SpectralCensus { o: 10.0, wn: 2.0, wc: 1.0, ..Default::default() };
        assert_eq!(c.wr_to_o(), Some(0.3));
        assert_eq!(SpectralCensus::default().wr_to_o(), None);
    }

    #[test]
    fn zero_flux_has_no_log() {
        let row = SpectrumRow {
            wavelengths: Arc::from(vec![1.0, 2.0]),
            luminosity: vec![0.0, 100.0],
            bolometric: 50.0,
        };
        let logs: Vec<_> = row.log_luminosity().collect();
        assert_eq!(logs, [None, Some(2.0)]);
    }

    #[test]
    fn rows_serialize() {
        let json = serde_json::to_string(&QuantaRow { q_h0: 1.0, q_he0: 0.5, q_he1: 0.0 }).unwrap();
        assert_eq!(json, r#"{"q_h0":1.0,"q_he0":0.5,"q_he1":0.0}"#);
    }
}
