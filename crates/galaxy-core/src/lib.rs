//! Core types for the Galaxy stellar population synthesis engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other crate in the workspace: error types,
//! step identifiers, evolutionary phases, interpolated stellar states,
//! the per-step population snapshot, output product kinds, and the
//! physical constants used throughout the synthesis.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod model;
pub mod phase;
pub mod product;
pub mod snapshot;
pub mod state;
pub mod units;

pub use error::{DataError, InterpolationError, ProductError, Quantity, StepError};
pub use id::{CohortId, StepId};
pub use model::{InterpolationMode, MassCutoffs, SynthesisMethod, WindModel};
pub use phase::EvolutionaryPhase;
pub use product::{OutputSelection, ProductKind};
pub use snapshot::{PopulationSnapshot, RemnantEvent, RemnantKind, SnapshotEntry};
pub use state::{Evolved, StellarState};
