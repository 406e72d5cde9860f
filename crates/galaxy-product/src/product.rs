//! The [`Product`] trait.

use galaxy_core::{ProductError, ProductKind};

use crate::context::StepContext;
use crate::series::ProductSeries;

/// Inputs a product needs beyond the population snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Inputs {
    /// The synthesized SED.
    pub sed: bool,
}

impl Inputs {
    /// Only the population snapshot.
    pub const SNAPSHOT: Self = Self { sed: false };
    /// Snapshot plus the composite SED.
    pub const SED: Self = Self { sed: true };

    /// Union of two input sets.
    pub fn union(self, other: Self) -> Self {
        Self {
            sed: self.sed || other.sed,
        }
    }
}

/// An output collaborator: observes every step and accumulates one output
/// series.
///
/// # Contract
///
/// - `observe()` is called exactly once per step, in step order, and must
///   append exactly one row on success.
/// - `reads()` is called once at registration, not per step.
/// - Products own any running totals (cumulative energies, masses) they
///   report; the snapshot carries only per-step quantities.
///
/// # Object safety
///
/// The engine stores products as `Vec<Box<dyn Product>>`.
pub trait Product: Send + 'static {
    /// Name for error reporting and logging.
    fn name(&self) -> &str;

    /// Which output product this collaborator produces.
    fn kind(&self) -> ProductKind;

    /// Inputs needed from the engine.
    fn reads(&self) -> Inputs;

    /// Compute this step's row.
    fn observe(&mut self, ctx: &StepContext<'_>) -> Result<(), ProductError>;

    /// Hand over the accumulated series.
    fn finish(self: Box<Self>) -> ProductSeries;
}
