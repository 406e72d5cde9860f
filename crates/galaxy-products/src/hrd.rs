//! Hertzsprung–Russell diagram.

use galaxy_core::{ProductError, ProductKind};
use galaxy_product::{HrdPoint, HrdRow, Inputs, OutputSeries, Product, ProductSeries, StepContext};

/// One weighted point per living mass bin.
#[derive(Debug, Default)]
pub struct HrdProduct {
    series: OutputSeries<HrdRow>,
}

impl HrdProduct {
    /// An empty product.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Product for HrdProduct {
    fn name(&self) -> &str {
        "hrd"
    }

    fn kind(&self) -> ProductKind {
        ProductKind::Hrd
    }

    fn reads(&self) -> Inputs {
        Inputs::SNAPSHOT
    }

    fn observe(&mut self, ctx: &StepContext<'_>) -> Result<(), ProductError> {
        let mut points: Vec<HrdPoint> = ctx
            .snapshot()
            .entries
            .iter()
            .filter(|e| e.weight > 0.0)
            .map(|e| HrdPoint {
                initial_mass: e.state.initial_mass,
                log_teff: e.state.log_teff,
                log_l: e.state.log_l,
                weight: e.weight,
            })
            .collect();
        points.sort_by(|a, b| a.initial_mass.total_cmp(&b.initial_mass));
        self.series.push(ctx.time(), HrdRow { points })?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ProductSeries {
        ProductSeries::Hrd(self.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, snapshot, star};
    use galaxy_core::EvolutionaryPhase;

    #[test]
    fn points_sorted_by_mass_and_empty_bins_dropped() {
        let ms = EvolutionaryPhase::MainSequence;
        let snap = snapshot(
            vec![
                (5.0, star(20.0, 33_000.0, 4.7, ms)),
                (0.0, star(10.0, 25_000.0, 3.9, ms)),
                (50.0, star(2.0, 9_000.0, 1.2, ms)),
            ],
            vec![],
        );
        let mut p = HrdProduct::new();
        p.observe(&context(&snap)).unwrap();
        let ProductSeries::Hrd(series) = Box::new(p).finish() else {
            panic!("wrong series kind");
        };
        let points = &series.rows()[0].points;
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].initial_mass, 2.0);
        assert_eq!(points[1].weight, 5.0);
    }
}
