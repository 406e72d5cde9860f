//! IMF construction errors.

use thiserror::Error;

/// Structural problems with a list of IMF segments.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ImfError {
    /// No segments were given.
    #[error("IMF has no segments")]
    Empty,
    /// A segment bound is zero, negative or not finite.
    #[error("segment {index}: mass bound {mass} must be positive and finite")]
    NonPositiveMass {
        /// Index of the offending segment.
        index: usize,
        /// The offending bound.
        mass: f64,
    },
    /// A segment's upper bound does not exceed its lower bound.
    #[error("segment {index}: upper bound {mass_hi} does not exceed lower bound {mass_lo}")]
    InvertedBounds {
        /// Index of the offending segment.
        index: usize,
        /// Its lower bound.
        mass_lo: f64,
        /// Its upper bound.
        mass_hi: f64,
    },
    /// A segment does not start where the previous one ended.
    #[error("segment {index} starts at {mass_lo} but the previous segment ends at {previous_hi}")]
    NotContiguous {
        /// Index of the offending segment.
        index: usize,
        /// Upper bound of the previous segment.
        previous_hi: f64,
        /// Lower bound of this segment.
        mass_lo: f64,
    },
    /// An exponent is NaN or infinite.
    #[error("segment {index}: exponent {exponent} is not finite")]
    NonFiniteExponent {
        /// Index of the offending segment.
        index: usize,
        /// The offending exponent.
        exponent: f64,
    },
}
