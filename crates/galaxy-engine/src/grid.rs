//! Time, mass, and wavelength grids.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Upper bound on the number of time steps a grid may expand to.
const MAX_STEPS: usize = 1_000_000;

/// Relative slack when deciding whether the last linear step reaches `end`.
const STEP_RTOL: f64 = 1e-9;

// ── Time grid ──────────────────────────────────────────────────────

/// How the sample times of a run are laid out, in years.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scale", rename_all = "snake_case")]
pub enum TimeGridSpec {
    /// `start, start + step, …` up to and including `end`.
    Linear {
        /// First sample time.
        start: f64,
        /// Last admissible sample time.
        end: f64,
        /// Spacing.
        step: f64,
    },
    /// `count` samples logarithmically spaced from `start` to `end`.
    Logarithmic {
        /// First sample time.
        start: f64,
        /// Last sample time.
        end: f64,
        /// Number of samples, at least 2.
        count: usize,
    },
}

/// Expanded, strictly increasing sample times.
///
/// Step `k` covers the interval `(t[k-1], t[k]]`; the first step covers
/// `(0, t[0]]`.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

fn time_grid_error(reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidTimeGrid {
        reason: reason.into(),
    }
}

impl TimeGrid {
    /// Expand and check a specification.
    pub fn from_spec(spec: &TimeGridSpec) -> Result<Self, ConfigError> {
        let times = match *spec {
            TimeGridSpec::Linear { start, end, step } => {
                check_bounds(start, end)?;
                if !(step.is_finite() && step > 0.0) {
                    return Err(time_grid_error(format!("step {step} must be positive")));
                }
                let span = (end - start) / step;
                if span >= MAX_STEPS as f64 {
                    return Err(time_grid_error(format!(
                        "{span:.0} steps exceed the limit of {MAX_STEPS}"
                    )));
                }
                let n = (span * (1.0 + STEP_RTOL)).floor() as usize + 1;
                (0..n).map(|k| start + k as f64 * step).collect()
            }
            TimeGridSpec::Logarithmic { start, end, count } => {
                check_bounds(start, end)?;
                if !(2..=MAX_STEPS).contains(&count) {
                    return Err(time_grid_error(format!(
                        "count {count} must lie in [2, {MAX_STEPS}]"
                    )));
                }
                let ratio = end / start;
                let last = (count - 1) as f64;
                (0..count)
                    .map(|k| start * ratio.powf(k as f64 / last))
                    .collect()
            }
        };
        Ok(Self { times })
    }

    /// Build directly from sample times.
    pub fn from_times(times: Vec<f64>) -> Result<Self, ConfigError> {
        if times.is_empty() {
            return Err(time_grid_error("no sample times"));
        }
        if !(times[0].is_finite() && times[0] > 0.0) {
            return Err(time_grid_error(format!(
                "first time {} must be positive",
                times[0]
            )));
        }
        if let Some(w) = times.windows(2).find(|w| !(w[1] > w[0] && w[1].is_finite())) {
            return Err(time_grid_error(format!(
                "times must increase strictly, found {} after {}",
                w[1], w[0]
            )));
        }
        Ok(Self { times })
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always `false` for a validated grid.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// All sample times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// `(t_prev, t)` for step `index`.
    pub fn interval(&self, index: usize) -> (f64, f64) {
        let prev = if index == 0 { 0.0 } else { self.times[index - 1] };
        (prev, self.times[index])
    }

    /// Last sample time.
    pub fn end(&self) -> f64 {
        self.times[self.times.len() - 1]
    }
}

fn check_bounds(start: f64, end: f64) -> Result<(), ConfigError> {
    if !(start.is_finite() && start > 0.0) {
        return Err(time_grid_error(format!("start {start} must be positive")));
    }
    if !(end.is_finite() && end > start) {
        return Err(time_grid_error(format!(
            "end {end} must be finite and exceed start {start}"
        )));
    }
    Ok(())
}

// ── Mass grid ──────────────────────────────────────────────────────

/// Logarithmically spaced initial-mass bins.
#[derive(Clone, Debug, PartialEq)]
pub struct MassGrid {
    edges: Vec<f64>,
}

impl MassGrid {
    /// `bins` equal intervals in `log m` across `[lo, hi]`.
    ///
    /// The outer edges are exactly `lo` and `hi`.
    pub fn logarithmic(lo: f64, hi: f64, bins: usize) -> Self {
        let bins = bins.max(1);
        let mut edges: Vec<f64> = (0..=bins)
            .map(|k| lo * (hi / lo).powf(k as f64 / bins as f64))
            .collect();
        edges[0] = lo;
        edges[bins] = hi;
        Self { edges }
    }

    /// Bin edges, `bins + 1` values.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// The parts of `[lo, hi]` that fall in each bin, in increasing mass.
    ///
    /// Empty when the interval is empty or misses the grid.
    pub fn split(&self, lo: f64, hi: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
        let lo = lo.max(self.edges[0]);
        let hi = hi.min(self.edges[self.edges.len() - 1]);
        let first = self.edges.partition_point(|&e| e <= lo).saturating_sub(1);
        self.edges[first..]
            .windows(2)
            .take_while(move |w| w[0] < hi)
            .map(move |w| (w[0].max(lo), w[1].min(hi)))
            .filter(|(a, b)| b > a)
    }
}

// ── Wavelength grid ────────────────────────────────────────────────

/// Logarithmic output wavelength grid for the synthesized SED, in Å.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WavelengthGrid {
    /// Shortest wavelength.
    pub min: f64,
    /// Longest wavelength.
    pub max: f64,
    /// Number of points.
    pub count: usize,
}

impl Default for WavelengthGrid {
    fn default() -> Self {
        Self {
            min: 91.0,
            max: 1.6e6,
            count: 1221,
        }
    }
}

impl WavelengthGrid {
    /// Check that the grid is non-degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.min > 0.0 && self.max.is_finite() && self.max > self.min)
        {
            return Err(ConfigError::InvalidWavelengths {
                reason: format!("range [{}, {}] is empty or non-positive", self.min, self.max),
            });
        }
        if self.count < 2 {
            return Err(ConfigError::InvalidWavelengths {
                reason: format!("{} points, need at least 2", self.count),
            });
        }
        Ok(())
    }

    /// The wavelengths.
    pub fn build(&self) -> Arc<[f64]> {
        let ratio = self.max / self.min;
        let last = (self.count - 1) as f64;
        (0..self.count)
            .map(|k| self.min * ratio.powf(k as f64 / last))
            .collect::<Vec<_>>()
            .into()
    }
}
