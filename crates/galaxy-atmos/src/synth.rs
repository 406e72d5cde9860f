//! Population spectral synthesis.

use std::sync::Arc;

use galaxy_core::{InterpolationError, PopulationSnapshot};
use indexmap::IndexMap;
use tracing::{debug, error};

use crate::library::AtmosphereLibrary;
use crate::resample::ResamplePlan;
use crate::sed::Sed;

/// Maps a population snapshot onto a composite SED.
///
/// Every living entry contributes `weight × 4πR² × F_λ(Teff, log g)` to an
/// accumulator on the native grid of the atmosphere it is routed to. Each
/// accumulator is resampled onto the output grid exactly once per call, so
/// resampling cost does not grow with the number of stars.
#[derive(Clone, Debug)]
pub struct SpectralSynthesizer {
    library: AtmosphereLibrary,
    output: Arc<[f64]>,
    /// `plans[sublibrary][grid]`.
    plans: Vec<Vec<ResamplePlan>>,
}

impl SpectralSynthesizer {
    /// Prepare resampling plans from every grid onto `output` (Å,
    /// strictly increasing).
    pub fn new(library: AtmosphereLibrary, output: Arc<[f64]>) -> Self {
        let plans = library
            .sublibraries()
            .map(|sub| {
                sub.grids()
                    .iter()
                    .map(|g| ResamplePlan::new(g.wavelengths(), &output))
                    .collect()
            })
            .collect();
        Self {
            library,
            output,
            plans,
        }
    }

    /// The routed library in use.
    pub fn library(&self) -> &AtmosphereLibrary {
        &self.library
    }

    /// Output wavelengths in Å.
    pub fn output_wavelengths(&self) -> &Arc<[f64]> {
        &self.output
    }

    /// Composite SED of `snapshot` at metallicity `z`.
    pub fn synthesize(&self, snapshot: &PopulationSnapshot, z: f64) -> Result<Sed, InterpolationError> {
        let rule = self.library.rule();
        let mut nearest: Vec<Option<usize>> = vec![None; self.plans.len()];
        let mut accumulators: IndexMap<(usize, usize), Vec<f64>> = IndexMap::new();

        for entry in &snapshot.entries {
            if entry.weight <= 0.0 {
                continue;
            }
            let state = &entry.state;
            let name = rule.route(state);
            let (si, sub) = self
                .library
                .sublibrary(name)
                .ok_or_else(|| InterpolationError::EmptyGrid {
                    what: format!("atmosphere sub-library '{name}'"),
                })?;
            let gi = *nearest[si].get_or_insert_with(|| sub.nearest_index(z).0);
            let grid = &sub.grids()[gi];
            let buffer = accumulators
                .entry((si, gi))
                .or_insert_with(|| vec![0.0; grid.wavelengths().len()]);

            let r = state.radius_cm();
            let area = 4.0 * std::f64::consts::PI * r * r;
            let (teff, log_g) = (state.teff(), state.log_g());
            if let Err(e) = grid.accumulate(teff, log_g, entry.weight * area, buffer) {
                error!(
                    initial_mass = state.initial_mass,
                    teff,
                    log_g,
                    phase = %state.phase,
                    library = name,
                    error = %e,
                    "atmosphere lookup failed"
                );
                return Err(e);
            }
        }

        let mut luminosity = vec![0.0; self.output.len()];
        for ((si, gi), buffer) in &accumulators {
            self.plans[*si][*gi].add_into(buffer, &mut luminosity);
        }
        debug!(
            step = %snapshot.step,
            entries = snapshot.entries.len(),
            grids = accumulators.len(),
            "synthesized SED"
        );
        Ok(Sed::new(Arc::clone(&self.output), luminosity))
    }
}
