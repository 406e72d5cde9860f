//! Integrated stellar parameters and the spectral-type census.

use galaxy_core::{EvolutionaryPhase, ProductError, ProductKind, StellarState};
use galaxy_product::{
    Inputs, OutputSeries, Product, ProductSeries, SpectralCensus, StellarParametersRow,
    StepContext,
};

/// Harvard spectral class from effective temperature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpectralClass {
    /// 30 000 K and hotter.
    O,
    /// From 10 000 K.
    B,
    /// From 7 500 K.
    A,
    /// From 6 000 K.
    F,
    /// From 5 200 K.
    G,
    /// From 3 700 K.
    K,
    /// Cooler than 3 700 K.
    M,
}

impl SpectralClass {
    /// Classify by `teff` in Kelvin.
    pub fn from_teff(teff: f64) -> Self {
        match teff {
            t if t >= 30_000.0 => Self::O,
            t if t >= 10_000.0 => Self::B,
            t if t >= 7_500.0 => Self::A,
            t if t >= 6_000.0 => Self::F,
            t if t >= 5_200.0 => Self::G,
            t if t >= 3_700.0 => Self::K,
            _ => Self::M,
        }
    }
}

fn tally(census: &mut SpectralCensus, state: &StellarState, weight: f64) {
    match state.phase {
        EvolutionaryPhase::WolfRayetWn => census.wn += weight,
        EvolutionaryPhase::WolfRayetWc => census.wc += weight,
        _ => {
            let slot = match SpectralClass::from_teff(state.teff()) {
                SpectralClass::O => &mut census.o,
                SpectralClass::B => &mut census.b,
                SpectralClass::A => &mut census.a,
                SpectralClass::F => &mut census.f,
                SpectralClass::G => &mut census.g,
                SpectralClass::K => &mut census.k,
                SpectralClass::M => &mut census.m,
            };
            *slot += weight;
        }
    }
}

/// Bolometric luminosity, living mass, star count, luminosity-weighted
/// temperature and the number of stars per spectral type.
#[derive(Debug, Default)]
pub struct StellarParametersProduct {
    series: OutputSeries<StellarParametersRow>,
}

impl StellarParametersProduct {
    /// An empty product.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Product for StellarParametersProduct {
    fn name(&self) -> &str {
        "stellar_parameters"
    }

    fn kind(&self) -> ProductKind {
        ProductKind::StellarParameters
    }

    fn reads(&self) -> Inputs {
        Inputs::SNAPSHOT
    }

    fn observe(&mut self, ctx: &StepContext<'_>) -> Result<(), ProductError> {
        let snapshot = ctx.snapshot();
        let mut census = SpectralCensus::default();
        let mut luminosity = 0.0;
        let mut weighted_log_teff = 0.0;
        for entry in &snapshot.entries {
            let l = entry.weight * entry.state.luminosity();
            luminosity += l;
            weighted_log_teff += l * entry.state.log_teff;
            tally(&mut census, &entry.state, entry.weight);
        }
        let mean_log_teff = if luminosity > 0.0 {
            weighted_log_teff / luminosity
        } else {
            0.0
        };
        self.series.push(
            ctx.time(),
            StellarParametersRow {
                bolometric_luminosity: luminosity,
                living_mass: snapshot.living_mass(),
                star_count: snapshot.star_count(),
                mean_log_teff,
                census,
            },
        )?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ProductSeries {
        ProductSeries::StellarParameters(self.series)
    }
}
