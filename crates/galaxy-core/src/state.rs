//! Interpolated stellar states.

use serde::{Deserialize, Serialize};

use crate::phase::EvolutionaryPhase;
use crate::units::{G_NEWTON, SOLAR_LOG_G, SOLAR_MASS_G, SOLAR_RADIUS_CM};

/// Physical parameters of a star of given initial mass at a given age.
///
/// Produced by track or isochrone interpolation. Logarithms are base 10;
/// luminosity and radius in solar units, mass-loss rate in M☉ yr⁻¹.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StellarState {
    /// Zero-age mass in M☉.
    pub initial_mass: f64,
    /// Current mass in M☉.
    pub mass: f64,
    /// `log10(L / L☉)`.
    pub log_l: f64,
    /// `log10(Teff / K)`.
    pub log_teff: f64,
    /// `log10(R / R☉)`.
    pub log_r: f64,
    /// `log10(Ṁ / M☉ yr⁻¹)`.
    pub log_mdot: f64,
    /// Discrete evolutionary phase.
    pub phase: EvolutionaryPhase,
}

impl StellarState {
    /// Luminosity in L☉.
    pub fn luminosity(&self) -> f64 {
        10f64.powf(self.log_l)
    }

    /// Effective temperature in K.
    pub fn teff(&self) -> f64 {
        10f64.powf(self.log_teff)
    }

    /// Radius in cm.
    pub fn radius_cm(&self) -> f64 {
        10f64.powf(self.log_r) * SOLAR_RADIUS_CM
    }

    /// Mass-loss rate in M☉ yr⁻¹.
    pub fn mdot(&self) -> f64 {
        10f64.powf(self.log_mdot)
    }

    /// Surface gravity `log10 g` in cgs, from current mass and radius.
    pub fn log_g(&self) -> f64 {
        SOLAR_LOG_G + self.mass.log10() - 2.0 * self.log_r
    }

    /// Surface escape velocity in cm s⁻¹.
    pub fn escape_velocity(&self) -> f64 {
        (2.0 * G_NEWTON * self.mass * SOLAR_MASS_G / self.radius_cm()).sqrt()
    }
}

/// Result of evaluating a star at an age.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Evolved {
    /// The star is still alive.
    Alive(StellarState),
    /// The star has exceeded its lifetime.
    Remnant {
        /// Zero-age mass in M☉.
        initial_mass: f64,
        /// Interpolated lifetime in years.
        lifetime: f64,
    },
}

impl Evolved {
    /// The living state, if any.
    pub fn alive(self) -> Option<StellarState> {
        match self {
            Self::Alive(state) => Some(state),
            Self::Remnant { .. } => None,
        }
    }
}
