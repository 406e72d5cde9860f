//! Model-atmosphere grids at a single metallicity.

use std::sync::Arc;

use galaxy_core::{DataError, InterpolationError, Quantity};
use smallvec::SmallVec;

/// Tabulated flux at one surface gravity.
#[derive(Clone, Debug, PartialEq)]
pub struct GravityNode {
    /// `log10 g` in cgs.
    pub log_g: f64,
    /// Surface flux in erg s⁻¹ cm⁻² Å⁻¹ on the grid wavelengths.
    pub flux: Vec<f64>,
}

/// All gravities tabulated at one effective temperature.
#[derive(Clone, Debug, PartialEq)]
pub struct TeffRow {
    /// Effective temperature in K.
    pub teff: f64,
    /// Nodes in increasing `log g`.
    pub nodes: Vec<GravityNode>,
}

/// Interpolation weights over grid nodes: `(row, node, weight)`.
pub(crate) type Stencil = SmallVec<[(usize, usize, f64); 4]>;

/// A single-metallicity atmosphere grid.
///
/// Rows are ordered by effective temperature; within a row, nodes are
/// ordered by surface gravity. Rows may cover different gravity ranges.
#[derive(Clone, Debug)]
pub struct AtmosphereGrid {
    name: String,
    metallicity: f64,
    wavelengths: Arc<[f64]>,
    rows: Vec<TeffRow>,
    log_teffs: Vec<f64>,
}

/// Surface flux of one star on its grid's native wavelengths.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    /// Native wavelengths in Å.
    pub wavelengths: Arc<[f64]>,
    /// Surface flux in erg s⁻¹ cm⁻² Å⁻¹.
    pub flux: Vec<f64>,
}

impl AtmosphereGrid {
    /// Build a grid, validating ordering and array lengths.
    pub fn new(
        name: &str,
        metallicity: f64,
        wavelengths: Arc<[f64]>,
        rows: Vec<TeffRow>,
    ) -> Result<Self, DataError> {
        let table = |what: &str| format!("{name}: {what}");
        if wavelengths.len() < 2 {
            return Err(DataError::EmptyTable {
                table: table("wavelengths"),
            });
        }
        if wavelengths.windows(2).any(|w| w[1] <= w[0]) || wavelengths[0] <= 0.0 {
            return Err(DataError::InvalidValue {
                table: table("wavelengths"),
                reason: "wavelengths must be positive and strictly increasing".into(),
            });
        }
        if rows.is_empty() {
            return Err(DataError::EmptyTable {
                table: table("Teff rows"),
            });
        }
        for (i, row) in rows.iter().enumerate() {
            if !(row.teff > 0.0) || (i > 0 && row.teff <= rows[i - 1].teff) {
                return Err(DataError::InvalidValue {
                    table: table("Teff rows"),
                    reason: format!("row {i}: Teff {} not positive and increasing", row.teff),
                });
            }
            if row.nodes.is_empty() {
                return Err(DataError::EmptyTable {
                    table: table(&format!("Teff={} gravities", row.teff)),
                });
            }
            for (j, node) in row.nodes.iter().enumerate() {
                if j > 0 && node.log_g <= row.nodes[j - 1].log_g {
                    return Err(DataError::InvalidValue {
                        table: table(&format!("Teff={}", row.teff)),
                        reason: format!("log g not increasing at node {j}"),
                    });
                }
                if node.flux.len() != wavelengths.len() {
                    return Err(DataError::LengthMismatch {
                        table: table(&format!("Teff={} log g={}", row.teff, node.log_g)),
                        expected: wavelengths.len(),
                        found: node.flux.len(),
                    });
                }
                if node.flux.iter().any(|f| !f.is_finite() || *f < 0.0) {
                    return Err(DataError::InvalidValue {
                        table: table(&format!("Teff={} log g={}", row.teff, node.log_g)),
                        reason: "flux must be finite and non-negative".into(),
                    });
                }
            }
        }
        let log_teffs = rows.iter().map(|r| r.teff.log10()).collect();
        Ok(Self {
            name: name.to_owned(),
            metallicity,
            wavelengths,
            rows,
            log_teffs,
        })
    }

    /// Grid name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Metal mass fraction `Z`.
    pub fn metallicity(&self) -> f64 {
        self.metallicity
    }

    /// Native wavelengths in Å.
    pub fn wavelengths(&self) -> &Arc<[f64]> {
        &self.wavelengths
    }

    /// Teff rows.
    pub fn rows(&self) -> &[TeffRow] {
        &self.rows
    }

    /// Tabulated effective-temperature range.
    pub fn teff_range(&self) -> (f64, f64) {
        (self.rows[0].teff, self.rows[self.rows.len() - 1].teff)
    }

    /// Interpolated surface flux at `(teff, log_g)`.
    pub fn spectrum(&self, teff: f64, log_g: f64) -> Result<Spectrum, InterpolationError> {
        let mut flux = vec![0.0; self.wavelengths.len()];
        self.accumulate(teff, log_g, 1.0, &mut flux)?;
        Ok(Spectrum {
            wavelengths: Arc::clone(&self.wavelengths),
            flux,
        })
    }

    /// Add `scale ×` the interpolated flux at `(teff, log_g)` into `out`.
    pub fn accumulate(
        &self,
        teff: f64,
        log_g: f64,
        scale: f64,
        out: &mut [f64],
    ) -> Result<(), InterpolationError> {
        for (row, node, w) in self.stencil(teff, log_g)? {
            let flux = &self.rows[row].nodes[node].flux;
            let s = scale * w;
            for (o, f) in out.iter_mut().zip(flux) {
                *o += s * f;
            }
        }
        Ok(())
    }

    /// Bilinear weights in `(log Teff, log g)`.
    ///
    /// `log g` outside a row's nodes clamps to the nearest node; Teff outside
    /// the grid is an error.
    pub(crate) fn stencil(&self, teff: f64, log_g: f64) -> Result<Stencil, InterpolationError> {
        let (lo, hi) = self.teff_range();
        if !(teff >= lo && teff <= hi) {
            return Err(InterpolationError::OutOfRange {
                quantity: Quantity::EffectiveTemperature,
                value: teff,
                min: lo,
                max: hi,
            });
        }
        let log_teff = teff.log10();
        let mut stencil = Stencil::new();
        let j = self.rows.partition_point(|r| r.teff < teff);
        if self.rows[j].teff == teff {
            push_gravity(&mut stencil, j, &self.rows[j], log_g, 1.0);
            return Ok(stencil);
        }
        let i = j - 1;
        let t = (log_teff - self.log_teffs[i]) / (self.log_teffs[j] - self.log_teffs[i]);
        push_gravity(&mut stencil, i, &self.rows[i], log_g, 1.0 - t);
        push_gravity(&mut stencil, j, &self.rows[j], log_g, t);
        Ok(stencil)
    }
}

fn push_gravity(stencil: &mut Stencil, row_index: usize, row: &TeffRow, log_g: f64, weight: f64) {
    let nodes = &row.nodes;
    let last = nodes.len() - 1;
    if log_g <= nodes[0].log_g {
        stencil.push((row_index, 0, weight));
        return;
    }
    if log_g >= nodes[last].log_g {
        stencil.push((row_index, last, weight));
        return;
    }
    let k = nodes.partition_point(|n| n.log_g < log_g);
    if nodes[k].log_g == log_g {
        stencil.push((row_index, k, weight));
        return;
    }
    let g = (log_g - nodes[k - 1].log_g) / (nodes[k].log_g - nodes[k - 1].log_g);
    stencil.push((row_index, k - 1, weight * (1.0 - g)));
    stencil.push((row_index, k, weight * g));
}
