//! Evolutionary track library for Galaxy.
//!
//! A [`TrackLibrary`] holds one set of mass tracks at a single metallicity
//! and answers "what does a star of initial mass `m` look like at age `t`"
//! in two ways: direct mass-track interpolation ([`TrackLibrary::lookup`])
//! and isochrone synthesis ([`TrackLibrary::isochrone`]). Libraries are
//! immutable after construction and are shared via `Arc`.
//!
//! [`TrackCatalog`] groups several libraries and resolves the numeric
//! track-set selector codes to the closest available set.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod compliance;
pub mod isochrone;
pub mod library;
pub mod table;
pub mod track;

pub use catalog::{CatalogError, TrackCatalog, TrackFamily, TrackSetId};
pub use isochrone::Isochrone;
pub use library::TrackLibrary;
pub use track::{MassTrack, TrackSample};
