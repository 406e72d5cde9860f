//! Output product kinds and the [`OutputSelection`] bitset.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the fifteen output products a run can emit.
///
/// Each enabled kind maps to one output collaborator that observes every
/// time step and accumulates its own series of rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Ionizing photon rates shortward of the H⁰, He⁰ and He⁺ edges.
    Quanta,
    /// Supernova rate and mechanical power from supernovae.
    SupernovaRate,
    /// Hertzsprung–Russell diagram points.
    Hrd,
    /// Mechanical power and cumulative energy from stellar winds.
    WindPower,
    /// Bolometric luminosity, living mass, star counts and spectral census.
    StellarParameters,
    /// Element-resolved mass return from winds and supernovae.
    Yields,
    /// Composite spectral energy distribution.
    Spectrum,
    /// Nebular and stellar line spectrum.
    LineSpectrum,
    /// Broad-band colors and magnitudes.
    Colors,
    /// Equivalent widths of diagnostic lines.
    LineWidths,
    /// Infrared spectral features.
    IrFeatures,
    /// Ultraviolet O VI line region.
    Ovi,
    /// High-resolution UV spectrum.
    HighResolution,
    /// Wolf–Rayet emission line diagnostics.
    WolfRayetLines,
    /// IFA ultraviolet spectrum.
    IfaSpectrum,
}

impl ProductKind {
    /// Every product kind, in flag order.
    pub const ALL: [ProductKind; 15] = [
        Self::Quanta,
        Self::SupernovaRate,
        Self::Hrd,
        Self::WindPower,
        Self::StellarParameters,
        Self::Yields,
        Self::Spectrum,
        Self::LineSpectrum,
        Self::Colors,
        Self::LineWidths,
        Self::IrFeatures,
        Self::Ovi,
        Self::HighResolution,
        Self::WolfRayetLines,
        Self::IfaSpectrum,
    ];

    /// Bit position of this kind inside an [`OutputSelection`].
    pub fn bit(self) -> u16 {
        self as u16
    }

    /// Whether the workspace provides an output collaborator for this kind.
    ///
    /// Enabling an unsupported kind is rejected at configuration time.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            Self::Quanta
                | Self::SupernovaRate
                | Self::Hrd
                | Self::WindPower
                | Self::StellarParameters
                | Self::Yields
                | Self::Spectrum
                | Self::Colors
        )
    }

    /// Stable lowercase name, used for product registration and logging.
    pub fn name(self) -> &'static str {
        match self {
            Self::Quanta => "quanta",
            Self::SupernovaRate => "snr",
            Self::Hrd => "hrd",
            Self::WindPower => "power",
            Self::StellarParameters => "sptyp",
            Self::Yields => "yield",
            Self::Spectrum => "spectrum",
            Self::LineSpectrum => "spectrum_line",
            Self::Colors => "color",
            Self::LineWidths => "ewidth",
            Self::IrFeatures => "irfeature",
            Self::Ovi => "ovi",
            Self::HighResolution => "hires",
            Self::WolfRayetLines => "wrlines",
            Self::IfaSpectrum => "ifaspec",
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of enabled [`ProductKind`]s, stored as a 16-bit mask.
///
/// Serializes as a list of kind names so configuration files stay readable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<ProductKind>", into = "Vec<ProductKind>")]
pub struct OutputSelection {
    bits: u16,
}

impl OutputSelection {
    /// Create an empty selection.
    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Enable a product kind.
    pub fn insert(&mut self, kind: ProductKind) {
        self.bits |= 1u16 << kind.bit();
    }

    /// Disable a product kind.
    pub fn remove(&mut self, kind: ProductKind) {
        self.bits &= !(1u16 << kind.bit());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, kind: ProductKind) -> Self {
        self.insert(kind);
        self
    }

    /// Check whether a kind is enabled.
    pub fn contains(&self, kind: ProductKind) -> bool {
        self.bits & (1u16 << kind.bit()) != 0
    }

    /// Return the union of two selections.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns `true` if nothing is enabled.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of enabled kinds.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterate over the enabled kinds in flag order.
    pub fn iter(&self) -> impl Iterator<Item = ProductKind> + '_ {
        ProductKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }

    /// The first enabled kind that has no output collaborator, if any.
    pub fn first_unsupported(&self) -> Option<ProductKind> {
        self.iter().find(|kind| !kind.is_supported())
    }
}

impl FromIterator<ProductKind> for OutputSelection {
    fn from_iter<I: IntoIterator<Item = ProductKind>>(iter: I) -> Self {
        let mut set = Self::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl From<Vec<ProductKind>> for OutputSelection {
    fn from(kinds: Vec<ProductKind>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<OutputSelection> for Vec<ProductKind> {
    fn from(selection: OutputSelection) -> Self {
        selection.iter().collect()
    }
}
