//! The composite SED as an output series.

use std::sync::Arc;

use galaxy_core::{ProductError, ProductKind};
use galaxy_product::{Inputs, OutputSeries, Product, ProductSeries, SpectrumRow, StepContext};

/// Records the full SED every step.
#[derive(Debug, Default)]
pub struct SpectrumProduct {
    series: OutputSeries<SpectrumRow>,
}

impl SpectrumProduct {
    /// An empty product.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Product for SpectrumProduct {
    fn name(&self) -> &str {
        "spectrum"
    }

    fn kind(&self) -> ProductKind {
        ProductKind::Spectrum
    }

    fn reads(&self) -> Inputs {
        Inputs::SED
    }

    fn observe(&mut self, ctx: &StepContext<'_>) -> Result<(), ProductError> {
        let sed = ctx.sed()?;
        self.series.push(
            ctx.time(),
            SpectrumRow {
                wavelengths: Arc::clone(sed.shared_wavelengths()),
                luminosity: sed.luminosity().to_vec(),
                bolometric: sed.bolometric(),
            },
        )?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ProductSeries {
        ProductSeries::Spectrum(self.series)
    }
}
