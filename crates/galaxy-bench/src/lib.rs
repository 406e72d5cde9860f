//! Benchmark profiles and utilities for the Galaxy synthesis engine.
//!
//! Provides pre-built [`ModelConfig`] profiles for benchmarking, both run
//! against the synthetic fixture libraries:
//!
//! - [`reference_profile`]: 10⁶ M☉ Salpeter burst, small mass grid, every
//!   implemented product
//! - [`stress_profile`]: continuous star formation on the large mass grid,
//!   so the cohort count grows every step
//! - [`build_engine`]: wires a profile to the fixture libraries

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use galaxy_atmos::AtmosphereModel;
use galaxy_core::{ProductKind, SynthesisMethod};
use galaxy_engine::{
    ConfigError, ModelConfig, PopulationEngine, SfrHistory, StarFormation, TimeGridSpec,
};
use galaxy_products::{build_products, ProductSettings};
use galaxy_test_utils::{blackbody_atmospheres, solar_set, synthetic_library};

/// Reference profile: instantaneous burst, 50 linear steps to 50 Myr.
pub fn reference_profile() -> ModelConfig {
    ModelConfig {
        name: "reference".to_owned(),
        tracks: solar_set(),
        atmosphere: AtmosphereModel::Blackbody,
        time: TimeGridSpec::Linear {
            start: 1.0e6,
            end: 5.0e7,
            step: 1.0e6,
        },
        ..ModelConfig::default()
    }
}

/// Stress profile: 1 M☉/yr continuous formation, large mass grid, snapshot
/// products only.
pub fn stress_profile() -> ModelConfig {
    ModelConfig {
        name: "stress".to_owned(),
        star_formation: StarFormation::Continuous {
            rate: SfrHistory::Constant(1.0),
        },
        method: SynthesisMethod::LargeGrid,
        outputs: [
            ProductKind::SupernovaRate,
            ProductKind::WindPower,
            ProductKind::Yields,
        ]
        .into_iter()
        .collect(),
        ..reference_profile()
    }
}

/// Build an engine for `config` on the fixture tracks and blackbody
/// atmospheres, with the products its outputs select.
pub fn build_engine(config: ModelConfig) -> Result<PopulationEngine, ConfigError> {
    let products = build_products(config.outputs, &ProductSettings::default())
        .map_err(|e| ConfigError::UnsupportedProduct { kind: e.kind })?;
    PopulationEngine::new(
        config,
        Arc::new(synthetic_library(solar_set())),
        Arc::new(blackbody_atmospheres()),
        products,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_validates() {
        reference_profile().validate().unwrap();
        assert_eq!(reference_profile().build_time_grid().unwrap().len(), 50);
    }

    #[test]
    fn stress_profile_validates() {
        let config = stress_profile();
        config.validate().unwrap();
        assert!(config.star_formation.is_continuous());
    }

    #[test]
    fn profiles_build_engines() {
        assert!(build_engine(reference_profile()).is_ok());
        assert!(build_engine(stress_profile()).is_ok());
    }
}
