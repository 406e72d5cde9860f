//! Mechanical power of stellar winds.

use galaxy_core::units::{SOLAR_MASS_PER_YEAR_G_S, YEAR_S};
use galaxy_core::{ProductError, ProductKind, StellarState, WindModel};
use galaxy_product::{Inputs, OutputSeries, Product, ProductSeries, StepContext, WindRow};

/// Fixed terminal velocity of the Wolf–Rayet winds under
/// [`WindModel::Evolution`], cm s⁻¹.
pub const WOLF_RAYET_VELOCITY: f64 = 1.8e8;

/// Terminal velocity of every wind under [`WindModel::Elson`], cm s⁻¹.
pub const ELSON_VELOCITY: f64 = 1.0e8;

/// Force multiplier exponent of radiation-driven wind theory.
const CAK_ALPHA: f64 = 0.6;

/// `v∞ / v_esc` by effective temperature, across the bistability jumps.
fn escape_ratio(teff: f64) -> f64 {
    if teff >= 21_000.0 {
        2.6
    } else if teff >= 10_000.0 {
        1.3
    } else {
        0.7
    }
}

/// Terminal wind velocity of `state` under `model`, cm s⁻¹.
pub fn terminal_velocity(model: WindModel, state: &StellarState) -> f64 {
    match model {
        WindModel::Evolution if state.phase.is_wolf_rayet() => WOLF_RAYET_VELOCITY,
        WindModel::Evolution => escape_ratio(state.teff()) * state.escape_velocity(),
        WindModel::Empirical => {
            let ratio = if state.teff() >= 21_000.0 { 2.6 } else { 1.3 };
            ratio * state.escape_velocity()
        }
        WindModel::Theoretical => {
            2.25 * CAK_ALPHA / (1.0 - CAK_ALPHA) * state.escape_velocity()
        }
        WindModel::Elson => ELSON_VELOCITY,
    }
}

/// Wind power `Σ w ½ Ṁ v∞²` and its running integral.
#[derive(Debug)]
pub struct WindPowerProduct {
    model: WindModel,
    cumulative_energy: f64,
    series: OutputSeries<WindRow>,
}

impl WindPowerProduct {
    /// Use the terminal-velocity prescription `model`.
    pub fn new(model: WindModel) -> Self {
        Self {
            model,
            cumulative_energy: 0.0,
            series: OutputSeries::new(),
        }
    }
}

impl Product for WindPowerProduct {
    fn name(&self) -> &str {
        "wind_power"
    }

    fn kind(&self) -> ProductKind {
        ProductKind::WindPower
    }

    fn reads(&self) -> Inputs {
        Inputs::SNAPSHOT
    }

    fn observe(&mut self, ctx: &StepContext<'_>) -> Result<(), ProductError> {
        let mut power = 0.0;
        let mut mass_loss_rate = 0.0;
        for entry in &ctx.snapshot().entries {
            let mdot = entry.state.mdot();
            let v = terminal_velocity(self.model, &entry.state);
            power += entry.weight * 0.5 * mdot * SOLAR_MASS_PER_YEAR_G_S * v * v;
            mass_loss_rate += entry.weight * mdot;
        }
        self.cumulative_energy += power * ctx.dt() * YEAR_S;
        self.series.push(
            ctx.time(),
            WindRow {
                power,
                cumulative_energy: self.cumulative_energy,
                mass_loss_rate,
            },
        )?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ProductSeries {
        ProductSeries::WindPower(self.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, snapshot, star};
    use galaxy_core::EvolutionaryPhase;

    #[test]
    fn wolf_rayet_winds_use_fixed_velocity() {
        let wr = star(40.0, 40_000.0, 5.5, EvolutionaryPhase::WolfRayetWn);
        assert_eq!(terminal_velocity(WindModel::Evolution, &wr), WOLF_RAYET_VELOCITY);
        assert_ne!(terminal_velocity(WindModel::Theoretical, &wr), WOLF_RAYET_VELOCITY);
    }

    #[test]
    fn cool_winds_are_slower() {
        let hot = star(20.0, 30_000.0, 5.0, EvolutionaryPhase::MainSequence);
        let cool = star(20.0, 8_000.0, 5.0, EvolutionaryPhase::RedSupergiant);
        let ratio_hot = terminal_velocity(WindModel::Evolution, &hot) / hot.escape_velocity();
        let ratio_cool = terminal_velocity(WindModel::Evolution, &cool) / cool.escape_velocity();
        assert!((ratio_hot - 2.6).abs() < 1e-12);
        assert!((ratio_cool - 0.7).abs() < 1e-12);
    }

    #[test]
    fn power_follows_mass_loss() {
        let mut s = star(20.0, 30_000.0, 5.0, EvolutionaryPhase::MainSequence);
        s.log_mdot = -6.0;
        let snap = snapshot(vec![(10.0, s)], vec![]);
        let mut p = WindPowerProduct::new(WindModel::Elson);
        p.observe(&context(&snap)).unwrap();

        let want = 10.0 * 0.5 * 1e-6 * SOLAR_MASS_PER_YEAR_G_S * ELSON_VELOCITY.powi(2);
        let ProductSeries::WindPower(series) = Box::new(p).finish() else {
            panic!("wrong series kind");
        };
        let (_, row) = series.last().unwrap();
        assert!((row.power - want).abs() / want < 1e-12);
        assert!((row.mass_loss_rate - 1e-5).abs() < 1e-18);
        assert!((row.cumulative_energy - want * snap.dt * YEAR_S).abs() / row.cumulative_energy < 1e-12);
    }
}
