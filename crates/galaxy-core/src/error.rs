//! Error types for the Galaxy synthesis engine.
//!
//! Organized by subsystem: tabulated data integrity (loaders and library
//! constructors), interpolation domain violations, output collaborator
//! failures, and the per-step error surfaced by the engine.
//! Configuration errors live next to the configuration in `galaxy-engine`.

use std::fmt;

use thiserror::Error;

use crate::id::StepId;

/// A tabulated quantity that an interpolation query can run off the edge of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Initial (zero-age) stellar mass in solar masses.
    InitialMass,
    /// Stellar age in years.
    Age,
    /// Effective temperature in Kelvin.
    EffectiveTemperature,
    /// Surface gravity, `log g` in cgs.
    SurfaceGravity,
    /// Metallicity (mass fraction Z).
    Metallicity,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InitialMass => "initial mass",
            Self::Age => "age",
            Self::EffectiveTemperature => "effective temperature",
            Self::SurfaceGravity => "surface gravity",
            Self::Metallicity => "metallicity",
        };
        f.write_str(name)
    }
}

/// A query outside the tabulated domain of a track or atmosphere grid.
///
/// The engine never issues such queries when boundary masses are derived
/// correctly, so inside a time step this is an invariant violation and
/// is fatal rather than clamped.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InterpolationError {
    /// The requested value lies outside `[min, max]`.
    #[error("{quantity} {value} outside tabulated range [{min}, {max}]")]
    OutOfRange {
        /// Which coordinate was out of range.
        quantity: Quantity,
        /// The requested value.
        value: f64,
        /// Smallest tabulated value.
        min: f64,
        /// Largest tabulated value.
        max: f64,
    },
    /// No table exists to interpolate in at all.
    #[error("no tabulated grid available for {what}")]
    EmptyGrid {
        /// Description of the missing table.
        what: String,
    },
}

/// Missing or malformed tabulated data.
///
/// Raised by table parsers and library constructors. Always fatal: no
/// partial output is valid once the input tables are known to be corrupt.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DataError {
    /// A table has no rows, tracks, or nodes.
    #[error("table '{table}' is empty")]
    EmptyTable {
        /// Name of the offending table.
        table: String,
    },
    /// Sample ages within a mass track are not strictly increasing.
    #[error("track M={initial_mass}: age at sample {index} is not strictly increasing")]
    NonIncreasingAge {
        /// Initial mass of the offending track.
        initial_mass: f64,
        /// Index of the first out-of-order sample.
        index: usize,
    },
    /// The mass grid across tracks is not strictly increasing.
    #[error("mass grid is not strictly increasing at track {index} (M={mass})")]
    NonIncreasingMass {
        /// Index of the offending track.
        index: usize,
        /// Its initial mass.
        mass: f64,
    },
    /// A more massive track outlives a less massive one.
    #[error("lifetime {lifetime} of M={mass} is not shorter than {previous} of the previous track")]
    NonDecreasingLifetime {
        /// Initial mass of the offending track.
        mass: f64,
        /// Its lifetime in years.
        lifetime: f64,
        /// Lifetime of the next less massive track.
        previous: f64,
    },
    /// Two parallel columns have different lengths.
    #[error("table '{table}': expected {expected} values, found {found}")]
    LengthMismatch {
        /// Name of the offending table.
        table: String,
        /// Expected number of values.
        expected: usize,
        /// Number actually present.
        found: usize,
    },
    /// A value is NaN, infinite, or physically meaningless.
    #[error("table '{table}': {reason}")]
    InvalidValue {
        /// Name of the offending table.
        table: String,
        /// Description of the problem.
        reason: String,
    },
    /// A text table could not be parsed.
    #[error("line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        reason: String,
    },
}

/// Errors from an individual output collaborator.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ProductError {
    /// The step context lacks an input the product declared it reads.
    #[error("missing input: {input}")]
    MissingInput {
        /// Name of the missing input.
        input: &'static str,
    },
    /// The product's computation failed.
    #[error("execution failed: {reason}")]
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A library lookup made by the product fell outside its domain.
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}

/// Errors from the population engine during `step()`.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StepError {
    /// A track or isochrone lookup left the tabulated domain.
    #[error("step {step}: interpolation out of range: {source}")]
    Interpolation {
        /// Step at which the violation occurred.
        step: StepId,
        /// The underlying interpolation error.
        source: InterpolationError,
    },
    /// Spectral synthesis could not map a stellar state onto the atmospheres.
    #[error("step {step}: spectral synthesis failed: {source}")]
    Synthesis {
        /// Step at which the violation occurred.
        step: StepId,
        /// The underlying interpolation error.
        source: InterpolationError,
    },
    /// An output collaborator returned an error.
    #[error("product '{name}' failed: {reason}")]
    ProductFailed {
        /// Name of the failing product.
        name: String,
        /// The underlying product error.
        #[source]
        reason: ProductError,
    },
}
