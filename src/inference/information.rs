//! inference::information — standard errors from the observed information.
//!
//! Purpose
//! -------
//! Turn the observed information matrix of a fitted DEFM,
//! `I(θ̂) = Σ_w Cov_w(s)`, into a covariance matrix and per-parameter
//! standard errors. For an exponential family the observed information is
//! available in closed form from the enumerated supports, so no numerical
//! differentiation is involved.
//!
//! Key behaviors
//! -------------
//! - Validate shape and finiteness of the information matrix.
//! - Copy it into `nalgebra` (symmetrizing by averaging off-diagonal pairs)
//!   and eigen-decompose with `symmetric_eigen`.
//! - Form the pseudoinverse `I⁺ = Σ_{λ_k > EIGEN_EPS} q_k q_kᵀ / λ_k`, so
//!   non-identified directions (e.g. a fixed-effect term that is constant
//!   within every support) do not blow up the remaining standard errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - The information matrix is positive semi-definite up to rounding; it is
//!   a sum of covariance matrices.
//! - Eigenvalues at or below [`EIGEN_EPS`] are treated as zero; the
//!   corresponding directions contribute nothing to the covariance.
//!
//! Testing notes
//! -------------
//! - Unit tests cover a diagonal matrix with a closed-form inverse and a
//!   rank-deficient matrix where the pseudoinverse is known.
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{Information, validation::validate_information},
    numerical_stability::transformations::EIGEN_EPS,
};

/// Pseudoinverse of the observed information.
///
/// Errors
/// ------
/// - `OptError::InformationDimMismatch` if the matrix is not square.
/// - `OptError::InvalidInformation` for non-finite entries.
pub fn covariance(information: &Information) -> OptResult<Array2<f64>> {
    let n = information.nrows();
    validate_information(information, n)?;
    let eigen = to_dmatrix(information).symmetric_eigen();
    let q = eigen.eigenvectors;
    let mut cov = Array2::<f64>::zeros((n, n));
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda <= EIGEN_EPS {
            continue;
        }
        for i in 0..n {
            for j in 0..n {
                cov[[i, j]] += q[(i, k)] * q[(j, k)] / lambda;
            }
        }
    }
    Ok(cov)
}

/// Square roots of the diagonal of [`covariance`].
pub fn standard_errors(information: &Information) -> OptResult<Array1<f64>> {
    let n = information.nrows();
    validate_information(information, n)?;
    Ok(solve_for_se(to_dmatrix(information), n))
}

// ---- Helper methods ----

fn to_dmatrix(information: &Information) -> DMatrix<f64> {
    let n = information.nrows();
    let mut out = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        out[(j, j)] = information[[j, j]];
        for i in (j + 1)..n {
            let v = 0.5 * (information[[i, j]] + information[[j, i]]);
            out[(i, j)] = v;
            out[(j, i)] = v;
        }
    }
    out
}

/// `Var(θ̂_i) = Σ_{k: λ_k > EIGEN_EPS} Q[i,k]² / λ_k`.
fn solve_for_se(information: DMatrix<f64>, n: usize) -> Array1<f64> {
    let eigen = information.symmetric_eigen();
    let q = eigen.eigenvectors;
    Array1::from_shape_fn(n, |i| {
        eigen
            .eigenvalues
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum::<f64>()
            .sqrt()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // A diagonal information matrix inverts element-wise.
    //
    // Given
    // -----
    // - I = diag(4, 1).
    //
    // Expect
    // ------
    // - SE = [0.5, 1.0]; covariance = diag(0.25, 1.0).
    fn diagonal_information_inverts_elementwise() {
        let info = array![[4.0, 0.0], [0.0, 1.0]];

        let se = standard_errors(&info).unwrap();
        let cov = covariance(&info).unwrap();

        assert_relative_eq!(se[0], 0.5, epsilon = 1e-10);
        assert_relative_eq!(se[1], 1.0, epsilon = 1e-10);
        assert_relative_eq!(cov[[0, 0]], 0.25, epsilon = 1e-10);
        assert_relative_eq!(cov[[0, 1]], 0.0, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Rank-deficient information uses the pseudoinverse instead of failing.
    //
    // Given
    // -----
    // - I = [[1, 1], [1, 1]] (eigenvalues 2 and 0).
    //
    // Expect
    // ------
    // - I⁺ = 0.25 · ones, so SE = [0.5, 0.5].
    fn rank_deficient_information_uses_pseudoinverse() {
        let info = array![[1.0, 1.0], [1.0, 1.0]];

        let se = standard_errors(&info).unwrap();
        let cov = covariance(&info).unwrap();

        assert_relative_eq!(se[0], 0.5, epsilon = 1e-10);
        assert_relative_eq!(se[1], 0.5, epsilon = 1e-10);
        assert_relative_eq!(cov[[0, 1]], 0.25, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Non-finite or non-square inputs are rejected with optimizer errors.
    fn invalid_information_is_rejected() {
        let bad = array![[f64::NAN, 0.0], [0.0, 1.0]];
        assert!(matches!(
            standard_errors(&bad).unwrap_err(),
            OptError::InvalidInformation { row: 0, col: 0, .. }
        ));

        let rect = Array2::<f64>::zeros((2, 3));
        assert_eq!(
            covariance(&rect).unwrap_err(),
            OptError::InformationDimMismatch { expected: 2, found: (2, 3) }
        );
    }
}
