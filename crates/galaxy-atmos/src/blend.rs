//! Routing stars to sub-libraries.

use galaxy_core::StellarState;
use serde::{Deserialize, Serialize};

/// Default Teff above which hot-star atmospheres replace the base library.
pub const DEFAULT_CROSSOVER_TEFF: f64 = 25_000.0;

/// Hot-star override of the base library.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HotStarRule {
    /// Sub-library used at or above the crossover.
    pub library: String,
    /// Crossover effective temperature in K.
    #[serde(default = "default_crossover")]
    pub crossover_teff: f64,
}

fn default_crossover() -> f64 {
    DEFAULT_CROSSOVER_TEFF
}

/// Which sub-library supplies the spectrum of a given star.
///
/// Priority: Wolf–Rayet phase → `wolf_rayet` if configured; otherwise
/// `Teff ≥ crossover` → `hot` if configured; otherwise `base`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendRule {
    /// Library for every star not claimed by another rule.
    pub base: String,
    /// Optional hot-star library.
    #[serde(default)]
    pub hot: Option<HotStarRule>,
    /// Optional Wolf–Rayet library.
    #[serde(default)]
    pub wolf_rayet: Option<String>,
}

impl BlendRule {
    /// Every star uses `base`.
    pub fn single(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            hot: None,
            wolf_rayet: None,
        }
    }

    /// Name of the sub-library for a star with this state.
    pub fn route(&self, state: &StellarState) -> &str {
        self.route_parts(state.teff(), state.phase.is_wolf_rayet())
    }

    /// Name of the sub-library for a non-Wolf–Rayet star of `teff`.
    pub fn route_teff(&self, teff: f64) -> &str {
        self.route_parts(teff, false)
    }

    fn route_parts(&self, teff: f64, wolf_rayet: bool) -> &str {
        if wolf_rayet {
            if let Some(wr) = &self.wolf_rayet {
                return wr;
            }
        }
        if let Some(hot) = &self.hot {
            if teff >= hot.crossover_teff {
                return &hot.library;
            }
        }
        &self.base
    }

    /// Every sub-library name the rule can route to.
    pub fn libraries(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.base.as_str())
            .chain(self.hot.as_ref().map(|h| h.library.as_str()))
            .chain(self.wolf_rayet.as_deref())
    }
}

impl Default for BlendRule {
    fn default() -> Self {
        AtmosphereModel::default().rule()
    }
}

/// Preset combinations of the standard atmosphere families.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtmosphereModel {
    /// Planck spectra everywhere.
    Blackbody,
    /// Lejeune compilation everywhere.
    Lejeune,
    /// Lejeune, with Schmutz extended atmospheres for Wolf–Rayet stars.
    LejeuneSchmutz,
    /// Lejeune, with Hillier atmospheres for Wolf–Rayet stars.
    LejeuneHillier,
    /// Lejeune, Pauldrach atmospheres for hot stars and Hillier for
    /// Wolf–Rayet stars.
    #[default]
    PauldrachHillier,
}

impl AtmosphereModel {
    /// Decode the legacy selector code (`1`..=`5`).
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Blackbody),
            2 => Some(Self::Lejeune),
            3 => Some(Self::LejeuneSchmutz),
            4 => Some(Self::LejeuneHillier),
            5 => Some(Self::PauldrachHillier),
            _ => None,
        }
    }

    /// The blend rule this preset stands for.
    pub fn rule(self) -> BlendRule {
        match self {
            Self::Blackbody => BlendRule::single("blackbody"),
            Self::Lejeune => BlendRule::single("lejeune"),
            Self::LejeuneSchmutz => BlendRule {
                wolf_rayet: Some("schmutz".into()),
                ..BlendRule::single("lejeune")
            },
            Self::LejeuneHillier => BlendRule {
                wolf_rayet: Some("hillier".into()),
                ..BlendRule::single("lejeune")
            },
            Self::PauldrachHillier => BlendRule {
                base: "lejeune".into(),
                hot: Some(HotStarRule {
                    library: "pauldrach".into(),
                    crossover_teff: DEFAULT_CROSSOVER_TEFF,
                }),
                wolf_rayet: Some("hillier".into()),
            },
        }
    }
}
