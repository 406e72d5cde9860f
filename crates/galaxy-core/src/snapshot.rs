//! The per-step population snapshot handed to output collaborators.

use serde::{Deserialize, Serialize};

use crate::id::StepId;
use crate::model::InterpolationMode;
use crate::state::StellarState;

/// One weighted representative star of a living mass bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Number of stars this entry stands for.
    pub weight: f64,
    /// Interpolated state of the representative star.
    pub state: StellarState,
}

/// Terminal fate of a dying star.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemnantKind {
    /// Below the supernova cutoff.
    WhiteDwarf,
    /// Core-collapse supernova.
    Supernova,
    /// Direct collapse without an explosion.
    BlackHole,
}

/// Stars of one mass interval that reached the end of their lifetime
/// during the current step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemnantEvent {
    /// Outcome of these deaths.
    pub kind: RemnantKind,
    /// Lower bound of the dying initial-mass interval, M☉.
    pub mass_lo: f64,
    /// Upper bound of the dying initial-mass interval, M☉.
    pub mass_hi: f64,
    /// Number of stars that died.
    pub count: f64,
    /// Summed initial mass of the dying stars, M☉.
    pub initial_mass_total: f64,
    /// Summed mass of the dying stars at the end of their lives, after
    /// wind losses, M☉.
    pub final_mass_total: f64,
}

impl RemnantEvent {
    /// Mean initial mass of the dying stars.
    pub fn mean_mass(&self) -> f64 {
        if self.count > 0.0 {
            self.initial_mass_total / self.count
        } else {
            (self.mass_lo * self.mass_hi).sqrt()
        }
    }

    /// Mean pre-collapse mass of the dying stars.
    pub fn mean_final_mass(&self) -> f64 {
        if self.count > 0.0 {
            self.final_mass_total / self.count
        } else {
            0.0
        }
    }
}

/// Weighted list of living stellar states and remnant events at one time.
///
/// Produced once per step, lent read-only to every enabled collaborator,
/// then discarded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    /// Step index on the time grid.
    pub step: StepId,
    /// Simulation time in years.
    pub time: f64,
    /// Width of the interval `(t_prev, t]` in years.
    pub dt: f64,
    /// Interpolation scheme that produced the states.
    pub mode: InterpolationMode,
    /// Living stars.
    pub entries: Vec<SnapshotEntry>,
    /// Deaths during `(t_prev, t]`.
    pub events: Vec<RemnantEvent>,
}

impl PopulationSnapshot {
    /// Total number of living stars.
    pub fn star_count(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Current mass in living stars, M☉.
    pub fn living_mass(&self) -> f64 {
        self.entries.iter().map(|e| e.weight * e.state.mass).sum()
    }

    /// Bolometric luminosity summed over living stars, L☉.
    pub fn bolometric_luminosity(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.weight * e.state.luminosity())
            .sum()
    }

    /// Number of deaths of the given kind during this step.
    pub fn death_count(&self, kind: RemnantKind) -> f64 {
        self.events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.count)
            .sum()
    }
}
