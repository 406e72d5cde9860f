//! Deterministic resampling between wavelength grids.

/// Precomputed linear-interpolation weights from a native grid onto an
/// output grid.
///
/// Each output wavelength inside the native coverage takes the linear
/// interpolation of its two bracketing native points; output wavelengths
/// outside the coverage receive zero. Built once per (native, output) pair
/// and reused every step.
#[derive(Clone, Debug, PartialEq)]
pub struct ResamplePlan {
    /// Per output point: `(lower native index, fraction toward upper)`.
    taps: Vec<Option<(usize, f64)>>,
    native_len: usize,
}

impl ResamplePlan {
    /// Build the plan. Both grids must be strictly increasing.
    pub fn new(native: &[f64], output: &[f64]) -> Self {
        let n = native.len();
        let taps = output
            .iter()
            .map(|&w| {
                if n == 0 || w < native[0] || w > native[n - 1] {
                    return None;
                }
                let j = native.partition_point(|&x| x < w);
                if native[j] == w {
                    return Some((j, 0.0));
                }
                let i = j - 1;
                Some((i, (w - native[i]) / (native[j] - native[i])))
            })
            .collect();
        Self {
            taps,
            native_len: n,
        }
    }

    /// Number of output points.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Whether the output grid is empty.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Add the resampled `src` into `dst`.
    ///
    /// `src` must have the native length and `dst` the output length.
    pub fn add_into(&self, src: &[f64], dst: &mut [f64]) {
        debug_assert_eq!(src.len(), self.native_len);
        debug_assert_eq!(dst.len(), self.taps.len());
        for (d, tap) in dst.iter_mut().zip(&self.taps) {
            if let Some((i, f)) = *tap {
                *d += if f == 0.0 {
                    src[i]
                } else {
                    src[i] + f * (src[i + 1] - src[i])
                };
            }
        }
    }

    /// Resample `src` onto a fresh output vector.
    pub fn apply(&self, src: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.taps.len()];
        self.add_into(src, &mut out);
        out
    }
}
