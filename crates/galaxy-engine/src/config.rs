//! Model configuration, validation, and error types.
//!
//! [`ModelConfig`] is the complete, immutable description of one synthesis
//! run. [`validate()`](ModelConfig::validate) checks every structural
//! invariant that does not depend on the loaded libraries; the
//! [`PopulationEngine`](crate::PopulationEngine) constructor repeats it and
//! then checks the configuration against the track and atmosphere data.

use galaxy_atmos::{AtmosphereModel, UnknownSubLibrary};
use galaxy_core::{MassCutoffs, OutputSelection, ProductKind, SynthesisMethod, WindModel};
use galaxy_imf::{Imf, ImfError, ImfSegment};
use galaxy_product::RegistryError;
use galaxy_tracks::{TrackFamily, TrackSetId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cohort::StarFormation;
use crate::grid::{TimeGrid, TimeGridSpec, WavelengthGrid};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected before any time step runs.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The IMF segment list is invalid.
    #[error("invalid IMF: {0}")]
    Imf(#[from] ImfError),
    /// The time grid specification is unusable.
    #[error("invalid time grid: {reason}")]
    InvalidTimeGrid {
        /// Description of the problem.
        reason: String,
    },
    /// Total mass or star-formation history is unusable.
    #[error("invalid star formation: {reason}")]
    InvalidStarFormation {
        /// Description of the problem.
        reason: String,
    },
    /// Supernova and black-hole cutoffs are not ordered positive masses.
    #[error("invalid mass cutoffs: supernova {supernova}, black hole {black_hole}")]
    InvalidCutoffs {
        /// Configured supernova cutoff.
        supernova: f64,
        /// Configured black-hole cutoff.
        black_hole: f64,
    },
    /// The output wavelength grid is unusable.
    #[error("invalid wavelength grid: {reason}")]
    InvalidWavelengths {
        /// Description of the problem.
        reason: String,
    },
    /// An enabled output has no implementation.
    #[error("output '{kind}' is not supported")]
    UnsupportedProduct {
        /// The unsupported kind.
        kind: ProductKind,
    },
    /// An enabled output has no registered product.
    #[error("output '{kind}' is enabled but no product produces it")]
    MissingProduct {
        /// The enabled kind.
        kind: ProductKind,
    },
    /// A numeric selector code does not name a known track set.
    #[error("unknown metallicity/track selector code {code}")]
    UnknownTrackCode {
        /// The rejected code.
        code: i32,
    },
    /// A numeric selector code does not name a wind model.
    #[error("unknown wind model code {code}")]
    UnknownWindCode {
        /// The rejected code.
        code: i32,
    },
    /// A numeric selector code does not name an atmosphere preset.
    #[error("unknown atmosphere model code {code}")]
    UnknownAtmosphereCode {
        /// The rejected code.
        code: i32,
    },
    /// The loaded tracks are not the configured set.
    #[error("configured track set {requested} but {loaded} was loaded")]
    TrackSetMismatch {
        /// Set named by the configuration.
        requested: TrackSetId,
        /// Set of the loaded library.
        loaded: TrackSetId,
    },
    /// The IMF extends beyond the tabulated track masses.
    #[error("IMF range [{imf_lo}, {imf_hi}] exceeds track masses [{track_lo}, {track_hi}]")]
    ImfOutsideTracks {
        /// Lower IMF bound.
        imf_lo: f64,
        /// Upper IMF bound.
        imf_hi: f64,
        /// Lowest tabulated track mass.
        track_lo: f64,
        /// Highest tabulated track mass.
        track_hi: f64,
    },
    /// The atmosphere preset routes to a sub-library that is not loaded.
    #[error(transparent)]
    Atmosphere(#[from] UnknownSubLibrary),
    /// The output products conflict with each other.
    #[error("product registry: {0}")]
    Registry(#[from] RegistryError),
}

// ── ModelConfig ────────────────────────────────────────────────────

/// Complete configuration of one synthesis run.
///
/// Times are in years and masses in M☉. The `Default` is a
/// 10⁶ M☉ Salpeter burst between 1 and 100 M☉, sampled every Myr
/// up to 100 Myr.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model designation, used in logs only.
    pub name: String,
    /// Instantaneous burst or continuous star formation.
    pub star_formation: StarFormation,
    /// IMF segments, contiguous and ordered by mass.
    pub imf: Vec<ImfSegment>,
    /// Remnant classification thresholds.
    pub cutoffs: MassCutoffs,
    /// Evolutionary track set.
    pub tracks: TrackSetId,
    /// Terminal-velocity prescription for stellar winds.
    pub wind_model: WindModel,
    /// Sample times.
    pub time: TimeGridSpec,
    /// Mass discretization and interpolation scheme.
    pub method: SynthesisMethod,
    /// Atmosphere family combination.
    pub atmosphere: AtmosphereModel,
    /// Wavelength grid of the synthesized SED.
    pub wavelengths: WavelengthGrid,
    /// Enabled output products.
    pub outputs: OutputSelection,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "default".to_owned(),
            star_formation: StarFormation::Burst {
                total_mass: 1.0e6,
            },
            imf: vec![ImfSegment::new(2.35, 1.0, 100.0)],
            cutoffs: MassCutoffs::default(),
            tracks: TrackSetId::new(TrackFamily::Geneva2012 { rotating: false }, 4),
            wind_model: WindModel::default(),
            time: TimeGridSpec::Linear {
                start: 1.0e6,
                end: 1.0e8,
                step: 1.0e6,
            },
            method: SynthesisMethod::default(),
            atmosphere: AtmosphereModel::default(),
            wavelengths: WavelengthGrid::default(),
            outputs: ProductKind::ALL
                .into_iter()
                .filter(|kind| kind.is_supported())
                .collect(),
        }
    }
}

impl ModelConfig {
    /// Validate all structural invariants.
    ///
    /// Pure: builds the IMF and time grid to check them and discards both.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. IMF segments.
        self.build_imf()?;
        // 2. Time grid.
        self.build_time_grid()?;
        // 3. Star formation.
        self.star_formation.validate()?;
        // 4. Cutoffs: positive and ordered.
        let c = self.cutoffs;
        if !(c.supernova.is_finite() && c.supernova > 0.0 && c.black_hole > c.supernova) {
            return Err(ConfigError::InvalidCutoffs {
                supernova: c.supernova,
                black_hole: c.black_hole,
            });
        }
        // 5. Output grid.
        self.wavelengths.validate()?;
        // 6. Every enabled output has an implementation.
        if let Some(kind) = self.outputs.first_unsupported() {
            return Err(ConfigError::UnsupportedProduct { kind });
        }
        Ok(())
    }

    /// Build the IMF from the segment list.
    pub fn build_imf(&self) -> Result<Imf, ConfigError> {
        Ok(Imf::new(self.imf.clone())?)
    }

    /// Expand the time grid specification.
    pub fn build_time_grid(&self) -> Result<TimeGrid, ConfigError> {
        TimeGrid::from_spec(&self.time)
    }

    /// Metal mass fraction of the configured track set.
    pub fn metallicity(&self) -> f64 {
        self.tracks.metallicity()
    }

    /// Select the track set by its numeric code (`11`–`65`).
    pub fn with_track_code(mut self, code: i32) -> Result<Self, ConfigError> {
        self.tracks = TrackSetId::from_code(code).ok_or(ConfigError::UnknownTrackCode { code })?;
        Ok(self)
    }

    /// Select the wind model by its numeric code (`0`–`3`).
    pub fn with_wind_code(mut self, code: i32) -> Result<Self, ConfigError> {
        self.wind_model = WindModel::from_code(code).ok_or(ConfigError::UnknownWindCode { code })?;
        Ok(self)
    }

    /// Select the atmosphere preset by its numeric code (`1`–`5`).
    pub fn with_atmosphere_code(mut self, code: i32) -> Result<Self, ConfigError> {
        self.atmosphere =
            AtmosphereModel::from_code(code).ok_or(ConfigError::UnknownAtmosphereCode { code })?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::SfrHistory;

    #[test]
    fn default_config_is_valid() {
        let cfg = ModelConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.outputs.len(), 8);
        assert_eq!(cfg.build_time_grid().unwrap().len(), 100);
    }

    #[test]
    fn gap_between_imf_segments_fails() {
        let cfg = ModelConfig {
            imf: vec![ImfSegment::new(1.3, 0.1, 0.5), ImfSegment::new(2.3, 0.6, 100.0)],
            ..ModelConfig::default()
        };
        match cfg.validate() {
            Err(ConfigError::Imf(ImfError::NotContiguous { .. })) => {}
            other => panic!("expected Imf(NotContiguous), got {other:?}"),
        }
    }

    #[test]
    fn inverted_time_grid_fails() {
        let cfg = ModelConfig {
            time: TimeGridSpec::Linear {
                start: 1.0e7,
                end: 1.0e6,
                step: 1.0e5,
            },
            ..ModelConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidTimeGrid { .. })
        ));
    }

    #[test]
    fn inverted_cutoffs_fail() {
        let mut cfg = ModelConfig::default();
        cfg.cutoffs.black_hole = 5.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidCutoffs {
                supernova: 8.0,
                black_hole: 5.0
            })
        );
    }

    #[test]
    fn negative_sfr_fails() {
        let cfg = ModelConfig {
            star_formation: StarFormation::Continuous {
                rate: SfrHistory::Constant(-1.0),
            },
            ..ModelConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidStarFormation { .. })
        ));
    }

    #[test]
    fn unsupported_output_fails() {
        let cfg = ModelConfig {
            outputs: OutputSelection::empty().with(ProductKind::WolfRayetLines),
            ..ModelConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::UnsupportedProduct {
                kind: ProductKind::WolfRayetLines
            })
        );
    }

    #[test]
    fn selector_codes() {
        let cfg = ModelConfig::default()
            .with_track_code(64)
            .unwrap()
            .with_wind_code(3)
            .unwrap()
            .with_atmosphere_code(1)
            .unwrap();
        assert_eq!(cfg.tracks.code(), 64);
        assert_eq!(cfg.metallicity(), 0.02);
        assert_eq!(cfg.wind_model, WindModel::Elson);
        assert_eq!(cfg.atmosphere, AtmosphereModel::Blackbody);

        assert_eq!(
            ModelConfig::default().with_track_code(33).err(),
            Some(ConfigError::UnknownTrackCode { code: 33 })
        );
        assert_eq!(
            ModelConfig::default().with_wind_code(9).err(),
            Some(ConfigError::UnknownWindCode { code: 9 })
        );
        assert_eq!(
            ModelConfig::default().with_atmosphere_code(0).err(),
            Some(ConfigError::UnknownAtmosphereCode { code: 0 })
        );
    }

    #[test]
    fn deserializes_with_defaults_for_missing_fields() {
        let json = r#"{
            "name": "cluster",
            "star_formation": { "mode": "burst", "total_mass": 1.0e5 },
            "imf": [ { "exponent": 2.35, "mass_lo": 0.1, "mass_hi": 100.0 } ],
            "time": { "scale": "logarithmic", "start": 1.0e5, "end": 1.0e8, "count": 31 },
            "method": "isochrone",
            "outputs": ["quanta", "spectrum"]
        }"#;
        let cfg: ModelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.name, "cluster");
        assert_eq!(cfg.method, SynthesisMethod::Isochrone);
        assert_eq!(cfg.cutoffs, MassCutoffs::default());
        assert!(cfg.outputs.contains(ProductKind::Spectrum));
        assert_eq!(cfg.outputs.len(), 2);
        assert_eq!(cfg.build_time_grid().unwrap().len(), 31);
        cfg.validate().unwrap();
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = ModelConfig {
            star_formation: StarFormation::Continuous {
                rate: SfrHistory::Constant(1.0),
            },
            ..ModelConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
