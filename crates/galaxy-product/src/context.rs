//! Per-step view handed to every product.

use galaxy_atmos::Sed;
use galaxy_core::{PopulationSnapshot, ProductError, StepId};

/// Read-only inputs for one time step.
///
/// Borrowed from the engine for the duration of a single
/// [`Product::observe`](crate::Product::observe) call.
#[derive(Clone, Copy, Debug)]
pub struct StepContext<'a> {
    snapshot: &'a PopulationSnapshot,
    sed: Option<&'a Sed>,
    metallicity: f64,
}

impl<'a> StepContext<'a> {
    /// Assemble a context. `sed` is `None` when no registered product
    /// declared that it reads the SED.
    pub fn new(snapshot: &'a PopulationSnapshot, sed: Option<&'a Sed>, metallicity: f64) -> Self {
        Self {
            snapshot,
            sed,
            metallicity,
        }
    }

    /// Step index.
    pub fn step(&self) -> StepId {
        self.snapshot.step
    }

    /// Simulation time in years.
    pub fn time(&self) -> f64 {
        self.snapshot.time
    }

    /// Width of the step interval in years.
    pub fn dt(&self) -> f64 {
        self.snapshot.dt
    }

    /// Metal mass fraction of the population.
    pub fn metallicity(&self) -> f64 {
        self.metallicity
    }

    /// Living stars and remnant events of this step.
    pub fn snapshot(&self) -> &'a PopulationSnapshot {
        self.snapshot
    }

    /// The composite SED.
    ///
    /// Returns [`ProductError::MissingInput`] when the SED was not
    /// synthesized, which means the caller did not declare
    /// [`Inputs::SED`](crate::Inputs::SED).
    pub fn sed(&self) -> Result<&'a Sed, ProductError> {
        self.sed.ok_or(ProductError::MissingInput { input: "sed" })
    }
}
