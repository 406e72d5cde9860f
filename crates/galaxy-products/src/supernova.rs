//! Core-collapse supernova rate and energy input.

use galaxy_core::units::{SUPERNOVA_ENERGY, YEAR_S};
use galaxy_core::{ProductError, ProductKind, RemnantKind};
use galaxy_product::{Inputs, OutputSeries, Product, ProductSeries, StepContext, SupernovaRow};

/// Counts the supernova events of each step.
///
/// The engine has already classified deaths by the configured cutoffs, so
/// only [`RemnantKind::Supernova`] events count towards the rate; direct
/// black-hole collapses are reported separately and release no energy.
#[derive(Debug)]
pub struct SupernovaProduct {
    energy_per_event: f64,
    cumulative_energy: f64,
    cumulative_count: f64,
    series: OutputSeries<SupernovaRow>,
}

impl Default for SupernovaProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl SupernovaProduct {
    /// 10⁵¹ erg per explosion.
    pub fn new() -> Self {
        Self::with_energy(SUPERNOVA_ENERGY)
    }

    /// Custom kinetic energy per explosion, erg.
    pub fn with_energy(energy_per_event: f64) -> Self {
        Self {
            energy_per_event,
            cumulative_energy: 0.0,
            cumulative_count: 0.0,
            series: OutputSeries::new(),
        }
    }
}

impl Product for SupernovaProduct {
    fn name(&self) -> &str {
        "supernova_rate"
    }

    fn kind(&self) -> ProductKind {
        ProductKind::SupernovaRate
    }

    fn reads(&self) -> Inputs {
        Inputs::SNAPSHOT
    }

    fn observe(&mut self, ctx: &StepContext<'_>) -> Result<(), ProductError> {
        let snapshot = ctx.snapshot();
        let count = snapshot.death_count(RemnantKind::Supernova);
        let dt = ctx.dt();
        if dt <= 0.0 {
            return Err(ProductError::ExecutionFailed {
                reason: format!("step width {dt} is not positive"),
            });
        }
        let energy = count * self.energy_per_event;
        self.cumulative_energy += energy;
        self.cumulative_count += count;
        self.series.push(
            ctx.time(),
            SupernovaRow {
                rate: count / dt,
                power: energy / (dt * YEAR_S),
                cumulative_energy: self.cumulative_energy,
                cumulative_count: self.cumulative_count,
                black_holes: snapshot.death_count(RemnantKind::BlackHole),
            },
        )?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ProductSeries {
        ProductSeries::SupernovaRate(self.series)
    }
}
