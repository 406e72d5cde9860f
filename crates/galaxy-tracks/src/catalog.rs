//! Track-set identifiers and the multi-metallicity [`TrackCatalog`].

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::library::TrackLibrary;

// ── Track families ──────────────────────────────────────────────

/// A family of evolutionary models computed with one physics setup at
/// several metallicities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackFamily {
    /// Geneva 2012/13 models, optionally with rotation at 40% of critical.
    Geneva2012 {
        /// Whether the models include rotation.
        rotating: bool,
    },
    /// Padova models with thermally pulsing AGB.
    Padova,
    /// Geneva 1994 models with enhanced mass-loss rates.
    GenevaHighMassLoss,
    /// Geneva 1994 models with standard mass-loss rates.
    GenevaStandard,
}

impl TrackFamily {
    /// Metallicity of each of the five members of the family, indexed
    /// `1..=5` by the last digit of the selector code.
    fn metallicities(self) -> [f64; 5] {
        match self {
            Self::Geneva2012 { .. } => [0.002, 0.002, 0.014, 0.014, 0.014],
            Self::Padova => [0.0004, 0.004, 0.008, 0.02, 0.05],
            Self::GenevaHighMassLoss | Self::GenevaStandard => [0.001, 0.004, 0.008, 0.020, 0.040],
        }
    }

    fn decade(self) -> i32 {
        match self {
            Self::Geneva2012 { rotating: false } => 10,
            Self::Geneva2012 { rotating: true } => 20,
            Self::Padova => 40,
            Self::GenevaHighMassLoss => 50,
            Self::GenevaStandard => 60,
        }
    }
}

impl fmt::Display for TrackFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geneva2012 { rotating: false } => f.write_str("Geneva 2012 v00"),
            Self::Geneva2012 { rotating: true } => f.write_str("Geneva 2012 v40"),
            Self::Padova => f.write_str("Padova AGB"),
            Self::GenevaHighMassLoss => f.write_str("Geneva high mass-loss"),
            Self::GenevaStandard => f.write_str("Geneva standard"),
        }
    }
}

// ── Track set ids ───────────────────────────────────────────────

/// One member of a [`TrackFamily`], addressed by the numeric selector
/// codes `11`–`15`, `21`–`25`, `41`–`45`, `51`–`55` and `61`–`65`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackSetId {
    family: TrackFamily,
    member: u8,
}

impl TrackSetId {
    /// Construct from a family and a member index in `1..=5`.
    ///
    /// Out-of-range members are clamped into `1..=5`.
    pub fn new(family: TrackFamily, member: u8) -> Self {
        Self {
            family,
            member: member.clamp(1, 5),
        }
    }

    /// Decode a selector code; `None` for codes outside the known families.
    pub fn from_code(code: i32) -> Option<Self> {
        let family = match code / 10 {
            1 => TrackFamily::Geneva2012 { rotating: false },
            2 => TrackFamily::Geneva2012 { rotating: true },
            4 => TrackFamily::Padova,
            5 => TrackFamily::GenevaHighMassLoss,
            6 => TrackFamily::GenevaStandard,
            _ => return None,
        };
        let member = code % 10;
        if !(1..=5).contains(&member) {
            return None;
        }
        Some(Self {
            family,
            member: member as u8,
        })
    }

    /// The selector code for this set.
    pub fn code(&self) -> i32 {
        self.family.decade() + i32::from(self.member)
    }

    /// The family this set belongs to.
    pub fn family(&self) -> TrackFamily {
        self.family
    }

    /// Metal mass fraction `Z` of the set.
    pub fn metallicity(&self) -> f64 {
        self.family.metallicities()[usize::from(self.member - 1)]
    }
}

impl fmt::Display for TrackSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Z={} ({})", self.family, self.metallicity(), self.code())
    }
}

// ── Catalog ─────────────────────────────────────────────────────

/// Errors resolving a track set from a [`TrackCatalog`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CatalogError {
    /// No library of the requested family has been registered.
    #[error("no track library of family {family} is loaded")]
    FamilyNotLoaded {
        /// The requested family.
        family: TrackFamily,
    },
}

/// The loaded track libraries, keyed by set.
///
/// Lookups fall back to the nearest metallicity within the same family,
/// never across families.
#[derive(Clone, Debug, Default)]
pub struct TrackCatalog {
    libraries: IndexMap<TrackSetId, Arc<TrackLibrary>>,
}

impl TrackCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a library under its own set id, replacing any previous one.
    pub fn insert(&mut self, library: Arc<TrackLibrary>) {
        self.libraries.insert(library.set(), library);
    }

    /// Number of registered libraries.
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// The library for `id`, or the nearest-metallicity library of the same
    /// family.
    ///
    /// Metallicity distance is measured in `log Z`. The fallback is an
    /// approximation and is logged at `warn` level.
    pub fn select(&self, id: TrackSetId) -> Result<Arc<TrackLibrary>, CatalogError> {
        if let Some(lib) = self.libraries.get(&id) {
            return Ok(Arc::clone(lib));
        }
        let target = id.metallicity().log10();
        let nearest = self
            .libraries
            .iter()
            .filter(|(set, _)| set.family() == id.family())
            .min_by(|(a, _), (b, _)| {
                let da = (a.metallicity().log10() - target).abs();
                let db = (b.metallicity().log10() - target).abs();
                da.total_cmp(&db)
            });
        match nearest {
            Some((set, lib)) => {
                warn!(
                    requested = %id,
                    using = %set,
                    "track set not loaded, using nearest metallicity"
                );
                Ok(Arc::clone(lib))
            }
            None => Err(CatalogError::FamilyNotLoaded {
                family: id.family(),
            }),
        }
    }
}
