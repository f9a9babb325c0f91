//! Consistency checks for optimizer inputs and outputs.
//!
//! Every check reports the first offending element through a dedicated
//! [`OptError`] variant, so a failing fit names the index (or matrix cell)
//! and value that broke it.
use ndarray::ArrayView1;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Information},
};

/// Optional gradient-norm tolerance; must be finite and `> 0` when present.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| tolerance_problem(t).map(|reason| (t, reason))) {
        Some((tol, reason)) => Err(OptError::InvalidTolGrad { tol, reason }),
        None => Ok(()),
    }
}

/// Optional cost-change tolerance; must be finite and `> 0` when present.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| tolerance_problem(t).map(|reason| (t, reason))) {
        Some((tol, reason)) => Err(OptError::InvalidTolCost { tol, reason }),
        None => Ok(()),
    }
}

/// Gradient of length `dim` with finite entries.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] on a length mismatch.
/// - [`OptError::InvalidGradient`] for the first non-finite entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match first_non_finite(grad.view()) {
        Some((index, value)) => Err(OptError::InvalidGradient {
            index,
            value,
            reason: "Gradient elements must be finite.",
        }),
        None => Ok(()),
    }
}

/// Unwrap the solver's best parameters, which must exist and be finite.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] when the solver kept no parameters.
/// - [`OptError::InvalidThetaHat`] for the first non-finite entry.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta_hat = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some((index, value)) = first_non_finite(theta_hat.view()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(theta_hat)
}

/// A log-likelihood value reported back to callers must be finite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Observed information of shape `dim × dim` with finite entries.
///
/// # Errors
/// - [`OptError::InformationDimMismatch`] for a wrong shape.
/// - [`OptError::InvalidInformation`] naming the first non-finite cell.
pub fn validate_information(information: &Information, dim: usize) -> OptResult<()> {
    let found = information.dim();
    if found != (dim, dim) {
        return Err(OptError::InformationDimMismatch { expected: dim, found });
    }
    match information.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => Err(OptError::InvalidInformation { row, col, value }),
        None => Ok(()),
    }
}

// ---- Helper methods ----

fn tolerance_problem(tol: f64) -> Option<&'static str> {
    if !tol.is_finite() {
        Some("Tolerance must be finite.")
    } else if tol <= 0.0 {
        Some("Tolerance must be positive.")
    } else {
        None
    }
}

fn first_non_finite(values: ArrayView1<'_, f64>) -> Option<(usize, f64)> {
    values.iter().copied().enumerate().find(|(_, v)| !v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Tolerance acceptance and the two rejection reasons.
    // - First-offender reporting for gradients and parameter estimates.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Absent or positive tolerances pass; zero and infinity fail with the
    // variant matching the tolerance kind.
    fn tolerances_must_be_finite_and_positive() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_cost(Some(1e-9)).is_ok());
        assert_eq!(
            verify_tol_grad(Some(0.0)).unwrap_err(),
            OptError::InvalidTolGrad { tol: 0.0, reason: "Tolerance must be positive." }
        );
        assert!(matches!(
            verify_tol_cost(Some(f64::INFINITY)).unwrap_err(),
            OptError::InvalidTolCost { reason: "Tolerance must be finite.", .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Gradient and θ̂ checks name the first non-finite index.
    //
    // Given
    // -----
    // - Vectors with a non-finite value at index 1.
    //
    // Expect
    // ------
    // - `index: 1` in the error; a missing θ̂ is its own error.
    fn non_finite_entries_are_reported_by_index() {
        let grad = array![0.0, f64::INFINITY, f64::NAN];
        assert!(matches!(
            validate_grad(&grad, 3).unwrap_err(),
            OptError::InvalidGradient { index: 1, .. }
        ));
        assert_eq!(
            validate_grad(&grad, 2).unwrap_err(),
            OptError::GradientDimMismatch { expected: 2, found: 3 }
        );
        assert!(matches!(
            validate_theta_hat(Some(array![1.0, f64::NAN])).unwrap_err(),
            OptError::InvalidThetaHat { index: 1, .. }
        ));
        assert_eq!(validate_theta_hat(None).unwrap_err(), OptError::MissingThetaHat);
        assert_eq!(validate_theta_hat(Some(array![0.5])).unwrap(), array![0.5]);
    }
}
