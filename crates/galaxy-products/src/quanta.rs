//! Ionizing photon rates.

use galaxy_core::units::{HE_II_EDGE, HE_I_EDGE, LYMAN_LIMIT};
use galaxy_core::{ProductError, ProductKind};
use galaxy_product::{Inputs, OutputSeries, Product, ProductSeries, QuantaRow, StepContext};

/// Integrates the composite SED shortward of the H⁰, He⁰ and He⁺
/// ionization edges.
#[derive(Debug, Default)]
pub struct QuantaProduct {
    series: OutputSeries<QuantaRow>,
}

impl QuantaProduct {
    /// An empty product.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Product for QuantaProduct {
    fn name(&self) -> &str {
        "quanta"
    }

    fn kind(&self) -> ProductKind {
        ProductKind::Quanta
    }

    fn reads(&self) -> Inputs {
        Inputs::SED
    }

    fn observe(&mut self, ctx: &StepContext<'_>) -> Result<(), ProductError> {
        let sed = ctx.sed()?;
        self.series.push(
            ctx.time(),
            QuantaRow {
                q_h0: sed.ionizing_photons(LYMAN_LIMIT),
                q_he0: sed.ionizing_photons(HE_I_EDGE),
                q_he1: sed.ionizing_photons(HE_II_EDGE),
            },
        )?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ProductSeries {
        ProductSeries::Quanta(self.series)
    }
}
