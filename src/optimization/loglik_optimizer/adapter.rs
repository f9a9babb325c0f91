//! [`ArgMinAdapter`]: a [`LogLikelihood`] seen by `argmin` as a cost to minimize.
//!
//! `argmin` only minimizes, so the adapter reports `c(θ) = -ℓ(θ)` and
//! `∇c(θ) = -∇ℓ(θ)`. Models without an analytic score get a numerical
//! gradient of the cost itself (central differences, forward differences as
//! a fallback), which needs no sign flip.
use std::cell::RefCell;

use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};

/// Borrowed `(model, data)` pair implementing `CostFunction` and `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }

    /// Numerical gradient of the cost.
    ///
    /// `finitediff` closures return a bare `f64`, so the first cost error is
    /// parked in a cell and the closure yields `NaN`. Central differences
    /// are kept when no evaluation failed and the result is finite;
    /// otherwise the gradient is recomputed with forward differences and any
    /// parked error is returned.
    fn numeric_gradient(&self, theta: &Theta) -> Result<Grad, Error> {
        let failure: RefCell<Option<Error>> = RefCell::new(None);
        let cost = |t: &Theta| -> f64 {
            self.cost(t).unwrap_or_else(|err| {
                failure.borrow_mut().get_or_insert(err);
                f64::NAN
            })
        };

        let central = theta.central_diff(&cost);
        if failure.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
            return Ok(central);
        }

        failure.replace(None);
        let forward = theta.forward_diff(&cost);
        if let Some(err) = failure.take() {
            return Err(err);
        }
        validate_grad(&forward, theta.len())?;
        Ok(forward)
    }
}

impl<F: LogLikelihood> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    /// `-ℓ(θ)`; a non-finite `ℓ(θ)` is an [`OptError::NonFiniteCost`].
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let loglik = self.f.value(theta, self.data)?;
        if loglik.is_finite() {
            Ok(-loglik)
        } else {
            Err(OptError::NonFiniteCost { value: loglik }.into())
        }
    }
}

impl<F: LogLikelihood> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// `-∇ℓ(θ)` from the model, or a numerical gradient when the model
    /// answers [`OptError::GradientNotImplemented`]. Other model errors and
    /// malformed gradients propagate.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(score) => {
                validate_grad(&score, theta.len())?;
                Ok(-score)
            }
            Err(OptError::GradientNotImplemented) => self.numeric_gradient(theta),
            Err(other) => Err(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The cost sign flip `c(θ) = -ℓ(θ)`.
    // - Analytic vs finite-difference gradients of the cost.
    // - Rejection of non-finite log-likelihood values.
    //
    // The toy model is a single-outcome logit, ℓ(θ) = k θ − n ln(1 + e^θ),
    // i.e. a DEFM with one `ones` term and order 0.
    // -------------------------------------------------------------------------

    struct Logit {
        analytic: bool,
    }

    // (ones observed, windows)
    type Counts = (f64, f64);

    impl LogLikelihood for Logit {
        type Data = Counts;

        fn value(&self, theta: &Theta, data: &Counts) -> OptResult<Cost> {
            let (k, n) = *data;
            Ok(k * theta[0] - n * theta[0].exp().ln_1p())
        }

        fn check(&self, _theta: &Theta, _data: &Counts) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, data: &Counts) -> OptResult<Grad> {
            if !self.analytic {
                return Err(OptError::GradientNotImplemented);
            }
            let (k, n) = *data;
            let p = 1.0 / (1.0 + (-theta[0]).exp());
            Ok(array![k - n * p])
        }
    }

    #[test]
    // Purpose
    // -------
    // The cost is the negated log-likelihood.
    //
    // Given
    // -----
    // - θ = 0, 3 ones out of 4 windows: ℓ = -4 ln 2.
    //
    // Expect
    // ------
    // - cost = 4 ln 2.
    fn cost_is_negated_loglik() {
        let model = Logit { analytic: true };
        let data = (3.0, 4.0);
        let adapter = ArgMinAdapter::new(&model, &data);

        let cost = adapter.cost(&array![0.0]).unwrap();

        assert_relative_eq!(cost, 4.0 * 2f64.ln(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Finite differences of the cost agree with the negated analytic score.
    fn finite_difference_matches_analytic_gradient() {
        let data = (3.0, 4.0);
        let theta = array![0.3];
        let analytic = Logit { analytic: true };
        let numeric = Logit { analytic: false };

        let g_analytic = ArgMinAdapter::new(&analytic, &data).gradient(&theta).unwrap();
        let g_numeric = ArgMinAdapter::new(&numeric, &data).gradient(&theta).unwrap();

        assert_relative_eq!(g_analytic[0], g_numeric[0], epsilon = 1e-6);
        assert!(g_analytic[0] < 0.0);
    }

    #[test]
    // Purpose
    // -------
    // A -inf log-likelihood (observed window outside its support) is reported
    // as a non-finite cost instead of reaching the solver.
    fn non_finite_loglik_is_an_error() {
        struct Impossible;
        impl LogLikelihood for Impossible {
            type Data = ();
            fn value(&self, _: &Theta, _: &()) -> OptResult<Cost> {
                Ok(f64::NEG_INFINITY)
            }
            fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
                Ok(())
            }
        }

        let err = ArgMinAdapter::new(&Impossible, &()).cost(&array![0.0]).unwrap_err();

        assert_eq!(OptError::from(err), OptError::NonFiniteCost { value: f64::NEG_INFINITY });
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic score, a model whose value always fails surfaces
    // that failure from the numerical gradient.
    fn numeric_gradient_propagates_model_errors() {
        struct Broken;
        impl LogLikelihood for Broken {
            type Data = ();
            fn value(&self, _: &Theta, _: &()) -> OptResult<Cost> {
                Err(OptError::InvalidThetaInput { index: 0, value: f64::NAN })
            }
            fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
                Ok(())
            }
        }

        let err = ArgMinAdapter::new(&Broken, &()).gradient(&array![0.0, 1.0]).unwrap_err();

        assert!(matches!(OptError::from(err), OptError::InvalidThetaInput { index: 0, .. }));
    }
}
