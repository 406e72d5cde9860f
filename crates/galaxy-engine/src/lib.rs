//! Time-stepped population synthesis engine.
//!
//! Provides [`PopulationEngine`], which advances a burst or continuously
//! forming population through a time grid. At every step it forms new
//! cohorts, weights the living stars of every cohort by the IMF, collects
//! the stars that died during the step, synthesizes the composite spectrum
//! when a product needs it, and hands the result to each output product.
//!
//! Configuration lives in [`ModelConfig`], which is checked twice: once on
//! its own by [`ModelConfig::validate`] and once against the loaded
//! libraries by [`PopulationEngine::new`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cohort;
pub mod config;
pub mod engine;
pub mod grid;
pub mod metrics;
mod population;

pub use cohort::{Cohort, SfrHistory, SfrPoint, StarFormation};
pub use config::{ConfigError, ModelConfig};
pub use engine::{EngineState, PopulationEngine, RunOutput, StepReport};
pub use grid::{MassGrid, TimeGrid, TimeGridSpec, WavelengthGrid};
pub use metrics::StepMetrics;
