//! Galaxy: stellar population synthesis.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Galaxy sub-crates. Evolutionary tracks and atmosphere spectra are
//! weighted by an IMF and a star-formation history to predict the spectrum,
//! ionizing flux, colors, wind and supernova power, and chemical yields of
//! a stellar population as it ages.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use galaxy::prelude::*;
//! use galaxy_test_utils::{blackbody_atmospheres, solar_set, synthetic_library};
//!
//! let mut catalog = TrackCatalog::new();
//! catalog.insert(Arc::new(synthetic_library(solar_set())));
//!
//! let config = ModelConfig {
//!     atmosphere: AtmosphereModel::Blackbody,
//!     time: TimeGridSpec::Logarithmic { start: 1.0e6, end: 1.0e8, count: 9 },
//!     outputs: OutputSelection::empty()
//!         .with(ProductKind::SupernovaRate)
//!         .with(ProductKind::Quanta),
//!     ..ModelConfig::default()
//! };
//! let output = Simulation::new(config, &catalog, Arc::new(blackbody_atmospheres()))
//!     .unwrap()
//!     .run()
//!     .unwrap();
//! assert_eq!(output.steps, 9);
//! assert!(output.series(ProductKind::Quanta).is_some());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `galaxy-core` | stellar states, snapshots, errors, product kinds, units |
//! | [`imf`] | `galaxy-imf` | piecewise power-law IMF, integration and sampling |
//! | [`tracks`] | `galaxy-tracks` | track libraries, isochrones, the track catalog |
//! | [`atmos`] | `galaxy-atmos` | atmosphere libraries, blending, spectral synthesis |
//! | [`product`] | `galaxy-product` | the product trait, step context, output series |
//! | [`products`] | `galaxy-products` | built-in products and their builder |
//! | [`engine`] | `galaxy-engine` | configuration, grids, the population engine |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod simulation;

pub use simulation::{Simulation, SimulationError};

/// Shared vocabulary (`galaxy-core`).
///
/// Stellar states, population snapshots, remnant events, error types,
/// product kinds and physical constants in [`types::units`].
pub use galaxy_core as types;

/// Initial mass function (`galaxy-imf`).
pub use galaxy_imf as imf;

/// Evolutionary tracks (`galaxy-tracks`).
///
/// [`tracks::TrackLibrary`] interpolates along and across mass tracks;
/// [`tracks::TrackCatalog`] holds the loaded sets.
pub use galaxy_tracks as tracks;

/// Atmospheres and spectral synthesis (`galaxy-atmos`).
pub use galaxy_atmos as atmos;

/// Output product framework (`galaxy-product`).
///
/// The [`product::Product`] trait is the extension point for new outputs.
pub use galaxy_product as product;

/// Built-in output products (`galaxy-products`).
pub use galaxy_products as products;

/// The population engine (`galaxy-engine`).
pub use galaxy_engine as engine;

/// Common imports for typical Galaxy usage.
///
/// ```rust
/// use galaxy::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use galaxy_core::{
        EvolutionaryPhase, InterpolationMode, MassCutoffs, OutputSelection, PopulationSnapshot,
        ProductKind, RemnantKind, StellarState, SynthesisMethod, WindModel,
    };

    // Errors
    pub use galaxy_core::{DataError, InterpolationError, ProductError, StepError};

    // Libraries
    pub use galaxy_atmos::{AtmosphereLibrary, AtmosphereModel};
    pub use galaxy_imf::{Imf, ImfSegment};
    pub use galaxy_tracks::{TrackCatalog, TrackLibrary, TrackSetId};

    // Products
    pub use galaxy_product::{Product, ProductSeries, StepContext};
    pub use galaxy_products::{build_products, ProductSettings};

    // Engine
    pub use galaxy_engine::{
        ConfigError, ModelConfig, PopulationEngine, RunOutput, SfrHistory, StarFormation,
        StepMetrics, StepReport, TimeGridSpec,
    };

    pub use crate::{Simulation, SimulationError};
}
