//! [`maximize`]: the single entry point of the optimizer seam.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` from `theta0` with L-BFGS.
///
/// `f.check` vets `theta0` first; the model is then wrapped in an
/// [`ArgMinAdapter`] (cost `-ℓ`) and handed to the solver selected by
/// `opts.line_searcher`. `data` is passed through untouched (`()` for a
/// `DefmModel`).
///
/// # Errors
/// Whatever `f.check` rejects, tolerances `argmin` refuses, and failures
/// raised during the run (line search, model evaluation, non-finite
/// estimates).
///
/// # Example
/// ```no_run
/// use defm::defm::prelude::*;
/// use defm::optimization::loglik_optimizer::{MLEOptions, maximize};
/// use ndarray::array;
///
/// let ids = [1_i64, 1, 1, 2, 2];
/// let y = [0, 1, 1, 0, 1];
/// let x: [f64; 0] = [];
/// let mut model = DefmModel::new(&ids, &y, &x, 1, 0, DefmOptions::new(1))?;
/// model.add_ones(None)?;
/// model.init()?;
///
/// let out = maximize(&model, array![0.0], &(), &MLEOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::HagerZhang => {
            run_lbfgs(theta0, opts, problem, build_optimizer_hager_zhang(opts)?)
        }
        LineSearcher::MoreThuente => {
            run_lbfgs(theta0, opts, problem, build_optimizer_more_thuente(opts)?)
        }
    }
}
