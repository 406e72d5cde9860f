//! Atmosphere spectral libraries and spectral synthesis for Galaxy.
//!
//! An [`AtmosphereGrid`] tabulates emergent surface flux on a rectangular-ish
//! grid of effective temperature and surface gravity at one metallicity.
//! Grids of one model family form a [`SubLibrary`]; named sub-libraries plus
//! a [`BlendRule`] form an [`AtmosphereLibrary`]. The [`SpectralSynthesizer`]
//! turns a population snapshot into a composite [`Sed`], and [`Passband`]
//! folds an SED through a photometric filter.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod blackbody;
pub mod blend;
pub mod grid;
pub mod library;
pub mod passband;
pub mod resample;
pub mod sed;
pub mod synth;

pub use blend::{AtmosphereModel, BlendRule, HotStarRule};
pub use grid::{AtmosphereGrid, GravityNode, Spectrum, TeffRow};
pub use library::{AtmosphereLibrary, SubLibrary, UnknownSubLibrary};
pub use passband::{Passband, PassbandError};
pub use resample::ResamplePlan;
pub use sed::Sed;
pub use synth::SpectralSynthesizer;
