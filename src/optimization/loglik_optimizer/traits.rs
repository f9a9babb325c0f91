//! The model-facing side of the optimizer seam.
//!
//! - [`LogLikelihood`]: what a model implements to be fitted.
//! - [`MLEOptions`] / [`Tolerances`] / [`LineSearcher`]: run configuration.
//! - [`OptimOutcome`]: what `maximize` returns.
//!
//! Models report the log-likelihood `ℓ(θ)` and its gradient; the adapter
//! turns them into the cost `c(θ) = -ℓ(θ)` that `argmin` minimizes.
use std::{fmt, str::FromStr};

use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};

/// A model whose log-likelihood can be maximized.
///
/// - `value` returns `ℓ(θ)` (not the cost).
/// - `check` runs once on `θ₀` before the solver starts; reject wrong
///   lengths, non-finite entries or an unprepared model here.
/// - `grad` returns `∇ℓ(θ)`. The default reports
///   [`OptError::GradientNotImplemented`], and the adapter falls back to
///   finite differences of the cost.
///
/// `Data` is an extra payload threaded through every call; a `DefmModel`
/// owns its dataset and uses `()`.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search used inside L-BFGS. Parses case-insensitively from
/// `"MoreThuente"` / `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSearcher {
    #[default]
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [LineSearcher::MoreThuente, LineSearcher::HagerZhang]
            .into_iter()
            .find(|ls| ls.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            })
    }
}

impl fmt::Display for LineSearcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineSearcher::MoreThuente => write!(f, "MoreThuente"),
            LineSearcher::HagerZhang => write!(f, "HagerZhang"),
        }
    }
}

/// Optimizer configuration carried by `DefmOptions::mle_opts`.
///
/// Fields
/// ------
/// - `tols`: stopping rules.
/// - `line_searcher`: line search inside L-BFGS.
/// - `verbose`: attach the terminal observer (feature `obs_slog`).
/// - `lbfgs_mem`: L-BFGS history; `None` means `DEFAULT_LBFGS_MEM`.
///
/// The default stops at a gradient norm of `1e-6` or after 300 iterations,
/// with More–Thuente line search and no observer.
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] for `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(OptError::InvalidLBFGSMem {
                mem: 0,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(MLEOptions { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        MLEOptions {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) },
            line_searcher: LineSearcher::default(),
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules. At least one must be set; tolerances are finite and
/// strictly positive, `max_iter` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] when every rule is `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] /
    ///   [`OptError::InvalidMaxIter`] for out-of-range values.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if (tol_grad, tol_cost, max_iter) == (None, None, None) {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Tolerances { tol_grad, tol_cost, max_iter })
    }
}

/// Result of `maximize`.
///
/// - `theta_hat`: best parameters found.
/// - `value`: `ℓ(θ̂)`, the log-likelihood (not the cost).
/// - `converged` / `status`: whether `argmin` reported a termination reason,
///   and which.
/// - `iterations`, `fn_evals`: work done, with `argmin`'s counter names.
/// - `grad_norm`: L2 norm of the last gradient, if the solver kept one.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Assemble an outcome from raw solver state.
    ///
    /// # Errors
    /// - [`OptError::MissingThetaHat`] / [`OptError::InvalidThetaHat`].
    /// - [`OptError::NonFiniteCost`] for a non-finite `value`.
    pub fn new(
        theta_hat: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        Ok(OptimOutcome {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm: grad.map(|g| g.l2_norm()),
        })
    }
}
