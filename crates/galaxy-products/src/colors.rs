//! Broad-band photometry.

use galaxy_atmos::Passband;
use galaxy_core::{ProductError, ProductKind};
use galaxy_product::{
    BandMagnitude, ColorsRow, Inputs, OutputSeries, Product, ProductSeries, StepContext,
};

/// Absolute AB magnitudes of the composite SED in a set of passbands.
#[derive(Debug)]
pub struct ColorsProduct {
    bands: Vec<Passband>,
    series: OutputSeries<ColorsRow>,
}

impl Default for ColorsProduct {
    fn default() -> Self {
        Self::new(Passband::johnson())
    }
}

impl ColorsProduct {
    /// Photometry in `bands`, reported in the given order.
    pub fn new(bands: Vec<Passband>) -> Self {
        Self {
            bands,
            series: OutputSeries::new(),
        }
    }
}

impl Product for ColorsProduct {
    fn name(&self) -> &str {
        "colors"
    }

    fn kind(&self) -> ProductKind {
        ProductKind::Colors
    }

    fn reads(&self) -> Inputs {
        Inputs::SED
    }

    fn observe(&mut self, ctx: &StepContext<'_>) -> Result<(), ProductError> {
        let sed = ctx.sed()?;
        let bands = self
            .bands
            .iter()
            .map(|band| BandMagnitude {
                name: band.name().to_owned(),
                ab: band.ab_magnitude(sed),
            })
            .collect();
        self.series.push(ctx.time(), ColorsRow { bands })?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ProductSeries {
        ProductSeries::Colors(self.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context_with_sed, snapshot};
    use galaxy_atmos::Sed;
    use std::sync::Arc;

    #[test]
    fn hot_source_is_blue() {
        // Rayleigh–Jeans tail, L_λ ∝ λ⁻⁴.
        let wl: Vec<f64> = (0..1500).map(|k| 2000.0 + 10.0 * k as f64).collect();
        let lum: Vec<f64> = wl.iter().map(|w| 1e50 / w.powi(4)).collect();
        let sed = Sed::new(Arc::from(wl), lum);

        let snap = snapshot(vec![], vec![]);
        let mut p = ColorsProduct::default();
        p.observe(&context_with_sed(&snap, &sed)).unwrap();
        let ProductSeries::Colors(series) = Box::new(p).finish() else {
            panic!("wrong series kind");
        };
        let row = &series.rows()[0];
        assert_eq!(row.bands.len(), 8);
        assert!(row.color("B", "V").unwrap() < 0.0);
        assert!(row.absolute_v().is_some());
        // K lies beyond the SED grid.
        assert_eq!(row.magnitude("K"), None);
    }
}
