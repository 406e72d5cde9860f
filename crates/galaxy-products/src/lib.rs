//! Built-in output products for the Galaxy synthesis engine.
//!
//! Each product observes one step at a time and keeps its own series.
//! Products that read the composite SED declare it through
//! [`Product::reads`](galaxy_product::Product::reads), and the engine only
//! synthesizes the spectrum when at least one of them is registered.
//!
//! | Product | Reads | Row |
//! |---|---|---|
//! | [`QuantaProduct`] | SED | ionizing photon rates |
//! | [`SupernovaProduct`] | snapshot | SN rate, power, cumulative energy |
//! | [`HrdProduct`] | snapshot | weighted HR-diagram points |
//! | [`WindPowerProduct`] | snapshot | wind power and mass-loss rate |
//! | [`StellarParametersProduct`] | snapshot | integrated parameters, spectral census |
//! | [`YieldsProduct`] | snapshot | element-resolved mass return |
//! | [`SpectrumProduct`] | SED | the SED itself |
//! | [`ColorsProduct`] | SED | broad-band AB magnitudes |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod colors;
pub mod hrd;
pub mod parameters;
pub mod quanta;
pub mod spectrum;
pub mod supernova;
pub mod wind;
pub mod yields;

pub use builder::{build_products, ProductSettings, UnsupportedProduct};
pub use colors::ColorsProduct;
pub use hrd::HrdProduct;
pub use parameters::{SpectralClass, StellarParametersProduct};
pub use quanta::QuantaProduct;
pub use spectrum::SpectrumProduct;
pub use supernova::SupernovaProduct;
pub use wind::{terminal_velocity, WindPowerProduct};
pub use yields::{wind_composition, YieldTable, YieldsProduct, NEUTRON_STAR_MASS};
