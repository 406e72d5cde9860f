//! Test utilities and fixtures for Galaxy development.
//!
//! Provides synthetic evolutionary tracks with power-law scalings,
//! blackbody atmosphere libraries for any [`BlendRule`](galaxy_atmos::BlendRule),
//! and mock [`Product`](galaxy_product::Product) implementations.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod atmospheres;
pub mod products;
pub mod tracks;

pub use atmospheres::{blackbody_atmospheres, fixture_atmospheres, log_spaced, output_wavelengths};
pub use products::{FailingProduct, RecordingProduct};
pub use tracks::{
    fixture_lifetime, solar_set, synthetic_library, synthetic_library_with, synthetic_track,
    to_table_text, FIXTURE_MASSES,
};
