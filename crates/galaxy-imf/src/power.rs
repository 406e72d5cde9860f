//! Closed-form power-law integrals.

/// `∫_a^b m^(p−1) dm` for `0 < a ≤ b`.
///
/// Written as `a^p · expm1(p·ln(b/a)) / p`, which stays accurate as `p → 0`
/// and reduces to the logarithmic antiderivative `ln(b/a)` at `p = 0`.
pub(crate) fn integral(a: f64, b: f64, p: f64) -> f64 {
    let ln_ratio = (b / a).ln();
    if p.abs() < 1e-12 {
        return ln_ratio;
    }
    a.powf(p) * (p * ln_ratio).exp_m1() / p
}

/// Inverse of [`integral`] in its upper bound: the `m` with
/// `∫_a^m x^(p−1) dx = u · ∫_a^b x^(p−1) dx`, for `u` in `[0, 1]`.
pub(crate) fn inverse(a: f64, b: f64, p: f64, u: f64) -> f64 {
    if p.abs() < 1e-12 {
        return a * (b / a).powf(u);
    }
    let ap = a.powf(p);
    (ap + u * (b.powf(p) - ap)).powf(1.0 / p)
}
