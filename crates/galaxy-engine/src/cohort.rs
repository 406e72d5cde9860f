//! Star-formation histories and the birth cohorts they produce.

use galaxy_core::CohortId;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// One node of a tabulated star-formation history.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SfrPoint {
    /// Time in years.
    pub time: f64,
    /// Star-formation rate in M☉ yr⁻¹.
    pub rate: f64,
}

/// Star-formation rate as a function of time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SfrHistory {
    /// Fixed rate in M☉ yr⁻¹.
    Constant(f64),
    /// Piecewise-linear in time between nodes, held constant beyond the
    /// first and last node.
    Tabulated(Vec<SfrPoint>),
}

impl SfrHistory {
    /// Rate at `time`, M☉ yr⁻¹.
    pub fn rate_at(&self, time: f64) -> f64 {
        match self {
            Self::Constant(rate) => *rate,
            Self::Tabulated(points) => {
                let j = points.partition_point(|p| p.time < time);
                if j == 0 {
                    return points[0].rate;
                }
                if j == points.len() {
                    return points[j - 1].rate;
                }
                let (a, b) = (points[j - 1], points[j]);
                a.rate + (time - a.time) / (b.time - a.time) * (b.rate - a.rate)
            }
        }
    }

    /// Mass formed during `[t0, t1]`, M☉.
    ///
    /// Exact for both variants: the integrand is linear between the
    /// interval ends and every tabulated node inside the interval.
    pub fn mass_formed(&self, t0: f64, t1: f64) -> f64 {
        match self {
            Self::Constant(rate) => rate * (t1 - t0),
            Self::Tabulated(points) => {
                let mut knots = Vec::with_capacity(points.len() + 2);
                knots.push(t0);
                knots.extend(
                    points
                        .iter()
                        .map(|p| p.time)
                        .filter(|&t| t > t0 && t < t1),
                );
                knots.push(t1);
                knots
                    .windows(2)
                    .map(|w| 0.5 * (w[1] - w[0]) * (self.rate_at(w[0]) + self.rate_at(w[1])))
                    .sum()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidStarFormation { reason };
        match self {
            Self::Constant(rate) => {
                if !(rate.is_finite() && *rate > 0.0) {
                    return Err(invalid(format!("rate {rate} must be positive")));
                }
            }
            Self::Tabulated(points) => {
                if points.is_empty() {
                    return Err(invalid("tabulated history has no points".to_owned()));
                }
                if let Some(p) = points
                    .iter()
                    .find(|p| !(p.rate.is_finite() && p.rate >= 0.0 && p.time.is_finite()))
                {
                    return Err(invalid(format!(
                        "rate {} at t={} must be finite and non-negative",
                        p.rate, p.time
                    )));
                }
                if points.windows(2).any(|w| w[1].time <= w[0].time) {
                    return Err(invalid("tabulated times must increase strictly".to_owned()));
                }
                if points.iter().all(|p| p.rate == 0.0) {
                    return Err(invalid("tabulated history never forms stars".to_owned()));
                }
            }
        }
        Ok(())
    }
}

/// How the population forms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StarFormation {
    /// All stars form at `t = 0`.
    Burst {
        /// Total mass formed, M☉.
        total_mass: f64,
    },
    /// Stars form continuously at the given rate.
    Continuous {
        /// Star-formation history.
        rate: SfrHistory,
    },
}

impl StarFormation {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Burst { total_mass } => {
                if !(total_mass.is_finite() && *total_mass > 0.0) {
                    return Err(ConfigError::InvalidStarFormation {
                        reason: format!("total mass {total_mass} must be positive"),
                    });
                }
                Ok(())
            }
            Self::Continuous { rate } => rate.validate(),
        }
    }

    /// Whether stars form at more than one time.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Continuous { .. })
    }

    /// The cohort born during step `index`, which covers `(t_prev, t]`.
    ///
    /// A burst forms its single cohort at `t = 0` during the first step. A
    /// continuous history forms one cohort per step, placed at the interval
    /// midpoint and carrying the mass formed over the whole interval.
    /// `None` when nothing forms.
    pub fn cohort(&self, index: usize, t_prev: f64, t: f64) -> Option<Cohort> {
        let id = CohortId(index as u32);
        match self {
            Self::Burst { total_mass } => (index == 0).then_some(Cohort {
                id,
                birth: 0.0,
                mass: *total_mass,
            }),
            Self::Continuous { rate } => {
                let mass = rate.mass_formed(t_prev, t);
                (mass > 0.0).then_some(Cohort {
                    id,
                    birth: 0.5 * (t_prev + t),
                    mass,
                })
            }
        }
    }
}

/// Stars formed together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cohort {
    /// Identifier, the index of the step that formed the cohort.
    pub id: CohortId,
    /// Birth time in years.
    pub birth: f64,
    /// Mass formed, M☉.
    pub mass: f64,
}

impl Cohort {
    /// Age at `time`, never negative.
    pub fn age_at(&self, time: f64) -> f64 {
        (time - self.birth).max(0.0)
    }
}
