//! Numerical stability utilities.
//!
//! Provides safe implementations of the exponential-family reductions
//! that overflow or underflow in naïve form. Every support-set normalizer
//! and every categorical draw goes through the max-shift used here, so
//! `exp` is only ever applied to non-positive arguments.
//!
//! # Provided items
//! - [`EIGEN_EPS`]: eigenvalue cutoff when pseudo-inverting an information
//!   matrix.
//! - [`GENERAL_TOL`]: generic small tolerance for denominators and
//!   probability mass checks.
//! - [`log_sum_exp`]: stable `ln Σ exp(x_i)`.
//! - [`softmax`]: stable `exp(x_i) / Σ exp(x_j)`.
use ndarray::{Array1, ArrayView1};

/// Eigenvalues at or below this value are treated as zero when inverting
/// an observed information matrix.
pub const EIGEN_EPS: f64 = 1e-10;

/// Generic small positive tolerance.
pub const GENERAL_TOL: f64 = 1e-12;

/// Numerically stable `ln Σ exp(x_i)`.
///
/// Shifts by the maximum before exponentiating:
/// `lse(x) = m + ln Σ exp(x_i − m)` with `m = max_i x_i`.
///
/// # Returns
/// - `-inf` for an empty input or when every entry is `-inf`.
/// - `+inf` if any entry is `+inf`.
/// - `NaN` if any entry is `NaN`.
pub fn log_sum_exp(values: ArrayView1<'_, f64>) -> f64 {
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    let sum: f64 = values.iter().map(|&v| (v - max).exp()).sum();
    max + sum.ln()
}

/// Numerically stable softmax of `logits`.
///
/// Entries equal to `-inf` receive weight 0. When no entry is finite the
/// result is all zeros, which callers treat as a degenerate distribution.
pub fn softmax(logits: ArrayView1<'_, f64>) -> Array1<f64> {
    let lse = log_sum_exp(logits);
    if !lse.is_finite() {
        return Array1::zeros(logits.len());
    }
    logits.mapv(|v| (v - lse).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of `log_sum_exp` with the naïve formula on safe inputs.
    // - Behavior on large magnitudes and on empty / -inf inputs.
    // - Mass conservation of `softmax`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify `log_sum_exp` against `ln(Σ exp)` where the naïve form is safe.
    fn log_sum_exp_matches_naive_formula() {
        let x = array![-1.0, 0.5, 2.0];
        let naive = x.iter().map(|v: &f64| v.exp()).sum::<f64>().ln();
        assert_relative_eq!(log_sum_exp(x.view()), naive, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure huge logits do not overflow and degenerate inputs map to -inf.
    //
    // Given
    // -----
    // - [1000, 1000]; [] ; [-inf, -inf].
    //
    // Expect
    // ------
    // - 1000 + ln 2; -inf; -inf.
    fn log_sum_exp_handles_extremes() {
        assert_relative_eq!(
            log_sum_exp(array![1000.0, 1000.0].view()),
            1000.0 + 2f64.ln(),
            epsilon = 1e-9
        );
        assert_eq!(log_sum_exp(Array1::<f64>::zeros(0).view()), f64::NEG_INFINITY);
        assert_eq!(
            log_sum_exp(array![f64::NEG_INFINITY, f64::NEG_INFINITY].view()),
            f64::NEG_INFINITY
        );
    }

    #[test]
    // Purpose
    // -------
    // Softmax sums to one and gives zero weight to -inf logits.
    fn softmax_conserves_mass() {
        let p = softmax(array![0.0, f64::NEG_INFINITY, 800.0, 799.0].view());
        assert_relative_eq!(p.sum(), 1.0, epsilon = 1e-12);
        assert_eq!(p[1], 0.0);
        assert!(p[2] > p[3]);
    }
}
