//! Time-keyed output series.

use galaxy_core::{ProductError, ProductKind};
use serde::Serialize;
use thiserror::Error;

use crate::rows::{
    ColorsRow, HrdRow, QuantaRow, SpectrumRow, StellarParametersRow, SupernovaRow, WindRow,
    YieldsRow,
};

/// Errors appending to an [`OutputSeries`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SeriesError {
    /// The new row is not later than the last one.
    #[error("time {time} does not follow the previous row at {previous}")]
    NonIncreasingTime {
        /// Time of the rejected row.
        time: f64,
        /// Time of the last accepted row.
        previous: f64,
    },
    /// The time is NaN or infinite.
    #[error("time {time} is not finite")]
    NonFiniteTime {
        /// The rejected time.
        time: f64,
    },
}

impl From<SeriesError> for ProductError {
    fn from(e: SeriesError) -> Self {
        ProductError::ExecutionFailed {
            reason: e.to_string(),
        }
    }
}

/// Ordered sequence of rows keyed by strictly increasing simulation time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutputSeries<R> {
    times: Vec<f64>,
    rows: Vec<R>,
}

impl<R> Default for OutputSeries<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> OutputSeries<R> {
    /// An empty series.
    pub fn new() -> Self {
        Self {
            times: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append `row` at `time` (years).
    pub fn push(&mut self, time: f64, row: R) -> Result<(), SeriesError> {
        if !time.is_finite() {
            return Err(SeriesError::NonFiniteTime { time });
        }
        if let Some(&previous) = self.times.last() {
            if time <= previous {
                return Err(SeriesError::NonIncreasingTime { time, previous });
            }
        }
        self.times.push(time);
        self.rows.push(row);
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row has been appended.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row times in years.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Rows in time order.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Most recent row.
    pub fn last(&self) -> Option<(f64, &R)> {
        Some((*self.times.last()?, self.rows.last()?))
    }

    /// `(time, row)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &R)> + '_ {
        self.times.iter().copied().zip(self.rows.iter())
    }
}

/// The finished series of one product, tagged by kind.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "product", content = "series", rename_all = "snake_case")]
pub enum ProductSeries {
    /// Ionizing photon rates.
    Quanta(OutputSeries<QuantaRow>),
    /// Supernova rate and energy.
    SupernovaRate(OutputSeries<SupernovaRow>),
    /// HRD positions.
    Hrd(OutputSeries<HrdRow>),
    /// Wind power.
    WindPower(OutputSeries<WindRow>),
    /// Integrated parameters and spectral census.
    StellarParameters(OutputSeries<StellarParametersRow>),
    /// Element ejection.
    Yields(OutputSeries<YieldsRow>),
    /// Composite SED.
    Spectrum(OutputSeries<SpectrumRow>),
    /// Broad-band magnitudes.
    Colors(OutputSeries<ColorsRow>),
}

macro_rules! each_series {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            ProductSeries::Quanta($s) => $body,
            ProductSeries::SupernovaRate($s) => $body,
            ProductSeries::Hrd($s) => $body,
            ProductSeries::WindPower($s) => $body,
            ProductSeries::StellarParameters($s) => $body,
            ProductSeries::Yields($s) => $body,
            ProductSeries::Spectrum($s) => $body,
            ProductSeries::Colors($s) => $body,
        }
    };
}

impl ProductSeries {
    /// Which product produced this series.
    pub fn kind(&self) -> ProductKind {
        match self {
            Self::Quanta(_) => ProductKind::Quanta,
            Self::SupernovaRate(_) => ProductKind::SupernovaRate,
            Self::Hrd(_) => ProductKind::Hrd,
            Self::WindPower(_) => ProductKind::WindPower,
            Self::StellarParameters(_) => ProductKind::StellarParameters,
            Self::Yields(_) => ProductKind::Yields,
            Self::Spectrum(_) => ProductKind::Spectrum,
            Self::Colors(_) => ProductKind::Colors,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        each_series!(self, s => s.len())
    }

    /// Whether the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row times in years.
    pub fn times(&self) -> &[f64] {
        each_series!(self, s => s.times())
    }
}
