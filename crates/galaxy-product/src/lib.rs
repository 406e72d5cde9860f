//! Output collaborators for Galaxy.
//!
//! Every enabled output product is an independent [`Product`] that observes
//! each time step through a read-only [`StepContext`] and appends one row
//! to its own [`OutputSeries`]. The engine validates the registry once at
//! startup with [`validate_registry`], which also tells it whether any
//! product needs the synthesized SED.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod product;
pub mod registry;
pub mod rows;
pub mod series;

pub use context::StepContext;
pub use product::{Inputs, Product};
pub use registry::{validate_registry, RegistryError, RegistryPlan};
pub use rows::{
    BandMagnitude, ColorsRow, ElementMasses, HrdPoint, HrdRow, QuantaRow, SpectralCensus,
    SpectrumRow, StellarParametersRow, SupernovaRow, WindRow, YieldsRow,
};
pub use series::{OutputSeries, ProductSeries, SeriesError};
