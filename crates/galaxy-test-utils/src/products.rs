//! Mock output collaborators for engine and registry tests.
//!
//! - [`RecordingProduct`]: records star count and luminosity every step.
//! - [`FailingProduct`]: fails deterministically after N calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use galaxy_core::{ProductError, ProductKind};
use galaxy_product::{
    HrdRow, Inputs, OutputSeries, Product, ProductSeries, StepContext, StellarParametersRow,
};

/// Records snapshot totals each step as a stellar-parameters series.
///
/// The call counter is shared so tests can inspect it after the product
/// has been moved into the engine.
pub struct RecordingProduct {
    pub name: String,
    pub reads: Inputs,
    calls: Arc<AtomicUsize>,
    series: OutputSeries<StellarParametersRow>,
}

impl RecordingProduct {
    pub fn new(name: impl Into<String>, reads: Inputs) -> Self {
        Self {
            name: name.into(),
            reads,
            calls: Arc::new(AtomicUsize::new(0)),
            series: OutputSeries::new(),
        }
    }

    /// Handle to the call counter.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Product for RecordingProduct {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProductKind {
        ProductKind::StellarParameters
    }

    fn reads(&self) -> Inputs {
        self.reads
    }

    fn observe(&mut self, ctx: &StepContext<'_>) -> Result<(), ProductError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.reads.sed {
            ctx.sed()?;
        }
        let snapshot = ctx.snapshot();
        let row = StellarParametersRow {
            bolometric_luminosity: snapshot.bolometric_luminosity(),
            living_mass: snapshot.living_mass(),
            star_count: snapshot.star_count(),
            ..Default::default()
        };
        self.series.push(ctx.time(), row)?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ProductSeries {
        ProductSeries::StellarParameters(self.series)
    }
}

/// Succeeds `succeed_count` times, then fails every call.
pub struct FailingProduct {
    pub name: String,
    pub succeed_count: usize,
    call_count: usize,
    series: OutputSeries<HrdRow>,
}

impl FailingProduct {
    pub fn new(name: impl Into<String>, succeed_count: usize) -> Self {
        Self {
            name: name.into(),
            succeed_count,
            call_count: 0,
            series: OutputSeries::new(),
        }
    }
}

impl Product for FailingProduct {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProductKind {
        ProductKind::Hrd
    }

    fn reads(&self) -> Inputs {
        Inputs::SNAPSHOT
    }

    fn observe(&mut self, ctx: &StepContext<'_>) -> Result<(), ProductError> {
        let n = self.call_count;
        self.call_count += 1;
        if n >= self.succeed_count {
            return Err(ProductError::ExecutionFailed {
                reason: format!(
                    "deliberate failure after {} successful calls",
                    self.succeed_count
                ),
            });
        }
        self.series.push(ctx.time(), HrdRow::default())?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> ProductSeries {
        ProductSeries::Hrd(self.series)
    }
}
