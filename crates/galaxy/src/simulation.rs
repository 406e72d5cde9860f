//! One-call runner: configuration and loaded data in, output series out.

use std::sync::Arc;

use galaxy_atmos::AtmosphereLibrary;
use galaxy_core::StepError;
use galaxy_engine::{ConfigError, ModelConfig, PopulationEngine, RunOutput, StepReport};
use galaxy_products::{build_products, ProductSettings};
use galaxy_tracks::{CatalogError, TrackCatalog};
use thiserror::Error;
use tracing::info;

/// Anything that can stop a [`Simulation`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimulationError {
    /// No track library of the configured family is loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The configuration is invalid or does not fit the loaded data.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A step failed.
    #[error(transparent)]
    Step(#[from] StepError),
}

/// A [`PopulationEngine`] wired to the built-in products.
///
/// Selects the configured track set from a [`TrackCatalog`] and registers
/// one product per enabled output.
pub struct Simulation {
    engine: PopulationEngine,
}

impl Simulation {
    /// Build with the default product settings and the configured wind
    /// model.
    pub fn new(
        config: ModelConfig,
        catalog: &TrackCatalog,
        atmospheres: Arc<AtmosphereLibrary>,
    ) -> Result<Self, SimulationError> {
        let settings = ProductSettings {
            wind_model: config.wind_model,
            ..ProductSettings::default()
        };
        Self::with_settings(config, catalog, atmospheres, &settings)
    }

    /// Build with explicit product settings.
    ///
    /// When the catalog falls back to the nearest-metallicity set of the
    /// configured family, the run uses that set and its metallicity.
    pub fn with_settings(
        mut config: ModelConfig,
        catalog: &TrackCatalog,
        atmospheres: Arc<AtmosphereLibrary>,
        settings: &ProductSettings,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let tracks = catalog.select(config.tracks)?;
        config.tracks = tracks.set();
        let products = build_products(config.outputs, settings)
            .map_err(|e| ConfigError::UnsupportedProduct { kind: e.kind })?;
        info!(
            model = %config.name,
            track_set = %config.tracks,
            products = products.len(),
            "simulation assembled"
        );
        let engine = PopulationEngine::new(config, tracks, atmospheres, products)?;
        Ok(Self { engine })
    }

    /// Advance one step. See [`PopulationEngine::step`].
    pub fn step(&mut self) -> Result<Option<StepReport>, StepError> {
        self.engine.step()
    }

    /// Run to completion.
    pub fn run(self) -> Result<RunOutput, SimulationError> {
        Ok(self.engine.run()?)
    }

    /// Hand over the series collected so far.
    pub fn finish(self) -> RunOutput {
        self.engine.finish()
    }

    /// The underlying engine.
    pub fn engine(&self) -> &PopulationEngine {
        &self.engine
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("engine", &self.engine)
            .finish()
    }
}
