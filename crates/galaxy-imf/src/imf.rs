//! The [`Imf`] integrator.

use serde::{Deserialize, Serialize};

use crate::error::ImfError;
use crate::power;

/// One power-law piece `ξ(m) ∝ m^−exponent` on `[mass_lo, mass_hi]`.
///
/// With this sign convention the Salpeter slope is `exponent = 2.35`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImfSegment {
    /// Power-law slope `α`.
    pub exponent: f64,
    /// Lower mass bound in M☉.
    pub mass_lo: f64,
    /// Upper mass bound in M☉.
    pub mass_hi: f64,
}

impl ImfSegment {
    /// Construct a segment.
    pub fn new(exponent: f64, mass_lo: f64, mass_hi: f64) -> Self {
        Self {
            exponent,
            mass_lo,
            mass_hi,
        }
    }
}

/// Relative tolerance for segment contiguity.
const CONTIGUITY_RTOL: f64 = 1e-9;

/// A normalized piecewise power-law initial mass function.
///
/// The function is continuous across segment boundaries: each segment's
/// scale factor is chosen so that `ξ` takes the same value on both sides.
/// All integrals are normalized to one solar mass formed over the full
/// range `[mass_lo, mass_hi]`.
#[derive(Clone, Debug)]
pub struct Imf {
    segments: Vec<ImfSegment>,
    /// Continuity scale factor per segment (first segment is 1).
    scales: Vec<f64>,
    /// Unnormalized `∫ ξ dm` over the full range.
    total_number: f64,
    /// Unnormalized `∫ m ξ dm` over the full range.
    total_mass: f64,
}

impl Imf {
    /// Build an IMF from contiguous segments ordered by mass.
    pub fn new(segments: Vec<ImfSegment>) -> Result<Self, ImfError> {
        validate_segments(&segments)?;

        let mut scales = Vec::with_capacity(segments.len());
        scales.push(1.0);
        for i in 1..segments.len() {
            let m = segments[i].mass_lo;
            let prev = scales[i - 1];
            let left = m.powf(-segments[i - 1].exponent);
            let right = m.powf(-segments[i].exponent);
            scales.push(prev * left / right);
        }

        let mut imf = Self {
            segments,
            scales,
            total_number: 1.0,
            total_mass: 1.0,
        };
        let (lo, hi) = (imf.mass_lo(), imf.mass_hi());
        imf.total_number = imf.raw_number(lo, hi);
        imf.total_mass = imf.raw_mass(lo, hi);
        Ok(imf)
    }

    /// Single-slope Salpeter IMF (`α = 2.35`) on `[lo, hi]`.
    pub fn salpeter(lo: f64, hi: f64) -> Result<Self, ImfError> {
        Self::new(vec![ImfSegment::new(2.35, lo, hi)])
    }

    /// Two-slope Kroupa IMF (`α = 1.3` below 0.5 M☉, `2.3` above) on `[lo, hi]`.
    ///
    /// Segments that fall entirely outside `[lo, hi]` are dropped.
    pub fn kroupa(lo: f64, hi: f64) -> Result<Self, ImfError> {
        const BREAK: f64 = 0.5;
        let segments = if hi <= BREAK {
            vec![ImfSegment::new(1.3, lo, hi)]
        } else if lo >= BREAK {
            vec![ImfSegment::new(2.3, lo, hi)]
        } else {
            vec![
                ImfSegment::new(1.3, lo, BREAK),
                ImfSegment::new(2.3, BREAK, hi),
            ]
        };
        Self::new(segments)
    }

    /// The segments this IMF was built from.
    pub fn segments(&self) -> &[ImfSegment] {
        &self.segments
    }

    /// Lowest mass with non-zero `ξ`.
    pub fn mass_lo(&self) -> f64 {
        self.segments[0].mass_lo
    }

    /// Highest mass with non-zero `ξ`.
    pub fn mass_hi(&self) -> f64 {
        self.segments[self.segments.len() - 1].mass_hi
    }

    /// Fraction of all stars with masses in `[lo, hi]`.
    ///
    /// The interval is clipped to the IMF range; an empty intersection is 0.
    pub fn number_fraction(&self, lo: f64, hi: f64) -> f64 {
        self.raw_number(lo, hi) / self.total_number
    }

    /// Fraction of the formed mass in stars with masses in `[lo, hi]`.
    pub fn weight_fraction(&self, lo: f64, hi: f64) -> f64 {
        self.raw_mass(lo, hi) / self.total_mass
    }

    /// Number of stars in `[lo, hi]` per solar mass formed.
    pub fn stars_per_unit_mass(&self, lo: f64, hi: f64) -> f64 {
        self.raw_number(lo, hi) / self.total_mass
    }

    /// Mass in stars with masses in `[lo, hi]` per solar mass formed.
    ///
    /// Identical to [`weight_fraction`](Self::weight_fraction); named for
    /// call sites that think in absolute masses.
    pub fn mass_per_unit_mass(&self, lo: f64, hi: f64) -> f64 {
        self.weight_fraction(lo, hi)
    }

    /// `dN/dm` at `m` per solar mass formed. Zero outside the range.
    pub fn density(&self, m: f64) -> f64 {
        match self.segment_index(m) {
            Some(i) => self.scales[i] * m.powf(-self.segments[i].exponent) / self.total_mass,
            None => 0.0,
        }
    }

    /// Mean stellar mass over the full range.
    pub fn mean_mass(&self) -> f64 {
        self.total_mass / self.total_number
    }

    /// Index of the segment containing `m`; the upper bound belongs to the
    /// last segment.
    pub(crate) fn segment_index(&self, m: f64) -> Option<usize> {
        if !(m >= self.mass_lo() && m <= self.mass_hi()) {
            return None;
        }
        let idx = self.segments.partition_point(|s| s.mass_hi < m);
        Some(idx.min(self.segments.len() - 1))
    }

    /// Scaled `∫ ξ dm` over segment `i` restricted to `[lo, hi]`.
    pub(crate) fn segment_number(&self, i: usize, lo: f64, hi: f64) -> f64 {
        let s = &self.segments[i];
        let (a, b) = (lo.max(s.mass_lo), hi.min(s.mass_hi));
        if a >= b {
            return 0.0;
        }
        self.scales[i] * power::integral(a, b, 1.0 - s.exponent)
    }

    fn segment_mass(&self, i: usize, lo: f64, hi: f64) -> f64 {
        let s = &self.segments[i];
        let (a, b) = (lo.max(s.mass_lo), hi.min(s.mass_hi));
        if a >= b {
            return 0.0;
        }
        self.scales[i] * power::integral(a, b, 2.0 - s.exponent)
    }

    fn raw_number(&self, lo: f64, hi: f64) -> f64 {
        (0..self.segments.len())
            .map(|i| self.segment_number(i, lo, hi))
            .sum()
    }

    fn raw_mass(&self, lo: f64, hi: f64) -> f64 {
        (0..self.segments.len())
            .map(|i| self.segment_mass(i, lo, hi))
            .sum()
    }
}

fn validate_segments(segments: &[ImfSegment]) -> Result<(), ImfError> {
    if segments.is_empty() {
        return Err(ImfError::Empty);
    }
    for (index, s) in segments.iter().enumerate() {
        // 1. Finite slope.
        if !s.exponent.is_finite() {
            return Err(ImfError::NonFiniteExponent {
                index,
                exponent: s.exponent,
            });
        }
        // 2. Positive bounds.
        for mass in [s.mass_lo, s.mass_hi] {
            if !(mass.is_finite() && mass > 0.0) {
                return Err(ImfError::NonPositiveMass { index, mass });
            }
        }
        // 3. Non-empty interval.
        if s.mass_hi <= s.mass_lo {
            return Err(ImfError::InvertedBounds {
                index,
                mass_lo: s.mass_lo,
                mass_hi: s.mass_hi,
            });
        }
        // 4. Contiguous with the previous segment.
        if index > 0 {
            let previous_hi = segments[index - 1].mass_hi;
            if (s.mass_lo - previous_hi).abs() > CONTIGUITY_RTOL * previous_hi {
                return Err(ImfError::NotContiguous {
                    index,
                    previous_hi,
                    mass_lo: s.mass_lo,
                });
            }
        }
    }
    Ok(())
}
