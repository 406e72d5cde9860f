//! Piecewise power-law initial mass function.
//!
//! An [`Imf`] is built once from a list of [`ImfSegment`]s, each a power law
//! `ξ(m) ∝ m^−α` over a contiguous mass interval. Continuity between
//! segments and the full-range normalization are solved at construction,
//! after which every query is a closed-form evaluation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod imf;
mod power;
pub mod sample;

pub use error::ImfError;
pub use imf::{Imf, ImfSegment};
