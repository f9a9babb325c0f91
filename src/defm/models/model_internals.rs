//! DEFM model internals — window bookkeeping, traversal, and sampling.
//!
//! Purpose
//! -------
//! Provide the low-level pieces [`DefmModel`] is assembled from: the record
//! kept for every observed window after initialization, a traversal that
//! pairs each window with its support's precomputed quantities, parameter
//! validation, and the categorical draw used by simulation.
//!
//! Key behaviors
//! -------------
//! - [`WindowEntry`] stores what scoring needs without holding a borrow of
//!   the dataset: segment/offset coordinates, the aligned data row, the
//!   support index, the observed assignment's position and its statistics.
//! - [`walk_windows`] feeds each entry, in observation order, together with
//!   the value its support holds in a per-support table (log-normalizers or
//!   moments evaluated once per cached set).
//! - [`check_theta`] enforces the parameter-length contract.
//! - [`draw_assignment`] samples a support position with probability
//!   proportional to `exp(θ·s)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Entries are created once by `DefmModel::init` and never mutated.
//! - `entry.support` always indexes a set held by the model's cache.
//! - `entry.observed` is `None` only when an active support rule excludes
//!   the observed current row; such windows contribute `-inf` to the
//!   log-likelihood.
//!
//! Conventions
//! -----------
//! - Window ordinals are global and 0-based, in observation order
//!   (subject by subject, offset by offset).
//! - Functions return [`DefmResult`]; configuration mistakes surface as
//!   errors rather than panics.
use ndarray::{Array1, ArrayView1};
use rand::{Rng, distributions::Distribution};
use statrs::distribution::Categorical;

use crate::defm::{
    core::support::SupportSet,
    errors::{DefmError, DefmResult},
};

/// WindowEntry — one observed window after initialization.
///
/// Fields
/// ------
/// - `segment`: subject index into the model's segments.
/// - `offset`: window offset `p` within the subject.
/// - `row`: dataset row the current window row is aligned to.
/// - `support`: index of the window's support set in the cache.
/// - `observed`: position of the observed current row within the support,
///   or `None` if a rule excluded it.
/// - `stats`: statistic vector of the observed window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowEntry {
    pub segment: usize,
    pub offset: usize,
    pub row: usize,
    pub support: usize,
    pub observed: Option<usize>,
    pub stats: Array1<f64>,
}

impl WindowEntry {
    /// Log-likelihood contribution `θ·s_obs − ln Z(θ)` given the support's
    /// `log_z`, `-inf` when the observed row is outside the support.
    pub fn log_contribution(&self, log_z: f64, theta: ArrayView1<'_, f64>) -> f64 {
        match self.observed {
            Some(_) => self.stats.dot(&theta) - log_z,
            None => f64::NEG_INFINITY,
        }
    }
}

/// Visit every window with its support's entry in `per_support`, in
/// observation order. `per_support` is indexed like the support cache.
pub fn walk_windows<T, F>(entries: &[WindowEntry], per_support: &[T], mut step: F)
where
    F: FnMut(usize, &WindowEntry, &T),
{
    for (w, entry) in entries.iter().enumerate() {
        step(w, entry, &per_support[entry.support]);
    }
}

/// Reject parameter vectors whose length differs from the number of terms.
///
/// Errors
/// ------
/// - `DefmError::ParamLengthMismatch`.
pub fn check_theta(theta: ArrayView1<'_, f64>, n_terms: usize) -> DefmResult<()> {
    if theta.len() != n_terms {
        return Err(DefmError::ParamLengthMismatch { expected: n_terms, actual: theta.len() });
    }
    Ok(())
}

/// Draw one support position from the conditional distribution at `θ`.
///
/// Errors
/// ------
/// - `DefmError::DegenerateSupport` if the support is empty or no
///   assignment has positive finite probability.
pub fn draw_assignment<R: Rng + ?Sized>(
    set: &SupportSet, theta: ArrayView1<'_, f64>, window: usize, rng: &mut R,
) -> DefmResult<usize> {
    if set.is_empty() {
        return Err(DefmError::DegenerateSupport {
            window,
            reason: "support set is empty".to_string(),
        });
    }
    let weights = set.probabilities(theta).to_vec();
    let categorical = Categorical::new(&weights)
        .map_err(|e| DefmError::DegenerateSupport { window, reason: e.to_string() })?;
    let draw: f64 = categorical.sample(rng);
    Ok(draw as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defm::core::{
        counters::{Counter, Counters, TermContext},
        rules::SupportRules,
        window::Window,
    };
    use ndarray::{Array1 as A1, array};
    use rand::{SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Per-window contributions, including the excluded-observation case.
    // - Parameter-length validation.
    // - Categorical draws at extreme parameters and on empty supports.
    // -------------------------------------------------------------------------

    fn ones_support() -> SupportSet {
        let names = vec!["y0".to_string()];
        let ctx = TermContext { n_rows: 2, n_cols: 1, y_names: &names, x_names: &[] };
        let mut counters = Counters::new();
        counters.push(Counter::ones(None, &ctx));
        let cov = A1::<f64>::zeros(0);
        let window = Window::from_parts(array![[0_u8], [0]], cov.view(), 1);
        SupportSet::enumerate(&window, &counters, &SupportRules::default())
    }

    #[test]
    // Purpose
    // -------
    // A single binary outcome with θ = 0 contributes ln 0.5; an excluded
    // observation contributes -inf.
    //
    // Given
    // -----
    // - Support {0, 1} with statistic "number of ones".
    //
    // Expect
    // ------
    // - ln 0.5 for an observed entry, -inf when `observed` is `None`.
    fn log_contribution_matches_even_odds() {
        // Arrange
        let set = ones_support();
        let mut entry = WindowEntry {
            segment: 0,
            offset: 0,
            row: 1,
            support: 0,
            observed: Some(1),
            stats: array![1.0],
        };
        let theta = array![0.0];

        // Act
        let log_z = set.log_normalizer(theta.view());
        let observed = entry.log_contribution(log_z, theta.view());
        entry.observed = None;
        let excluded = entry.log_contribution(log_z, theta.view());

        // Assert
        approx::assert_relative_eq!(observed, 0.5_f64.ln(), epsilon = 1e-12);
        assert_eq!(excluded, f64::NEG_INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // `check_theta` reports the expected and actual lengths.
    fn check_theta_rejects_wrong_length() {
        let theta = array![0.0, 1.0];
        assert!(check_theta(theta.view(), 2).is_ok());
        assert_eq!(
            check_theta(theta.view(), 3).unwrap_err(),
            DefmError::ParamLengthMismatch { expected: 3, actual: 2 }
        );
    }

    #[test]
    // Purpose
    // -------
    // A very large parameter puts all mass on the all-ones assignment.
    //
    // Given
    // -----
    // - Support {0, 1}, θ = 50.
    //
    // Expect
    // ------
    // - Every draw returns the position of assignment [1].
    fn draw_assignment_follows_extreme_parameters() {
        // Arrange
        let set = ones_support();
        let theta = array![50.0];
        let mut rng = StdRng::seed_from_u64(7);
        let target = set.position(array![1_u8].view()).unwrap();

        // Act / Assert
        for _ in 0..20 {
            assert_eq!(draw_assignment(&set, theta.view(), 0, &mut rng).unwrap(), target);
        }
    }

    #[test]
    // Purpose
    // -------
    // An empty support cannot be sampled.
    fn draw_assignment_rejects_empty_support() {
        // Arrange
        let names = vec!["y0".to_string()];
        let ctx = TermContext { n_rows: 1, n_cols: 1, y_names: &names, x_names: &[] };
        let mut counters = Counters::new();
        counters.push(Counter::ones(None, &ctx));
        let mut rules = SupportRules::default();
        rules.push(crate::defm::core::rules::SupportRule::constrain_support(0, 5.0, 6.0).unwrap());
        let cov = A1::<f64>::zeros(0);
        let window = Window::from_parts(array![[0_u8]], cov.view(), 0);
        let set = SupportSet::enumerate(&window, &counters, &rules);
        let mut rng = StdRng::seed_from_u64(1);

        // Act
        let err = draw_assignment(&set, array![0.0].view(), 3, &mut rng).unwrap_err();

        // Assert
        assert!(matches!(err, DefmError::DegenerateSupport { window: 3, .. }));
    }
}
