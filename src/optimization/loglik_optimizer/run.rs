//! Solver execution: run an L-BFGS solver on an [`ArgMinAdapter`] and turn the
//! final `argmin` state into an [`OptimOutcome`].
//!
//! The runner is shared by both line-search variants. It seeds the executor
//! with `θ₀`, applies the iteration cap from [`MLEOptions`], optionally
//! attaches the terminal observer (feature `obs_slog`, when
//! `opts.verbose` is set) and reports the run through `tracing`.
use argmin::core::{Executor, IterState, Solver, State};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient, observers::ObserverMode};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;
use tracing::debug;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};

/// `argmin` state used by every L-BFGS run in this crate.
pub type LbfgsState = IterState<Theta, Grad, (), (), (), f64>;

/// Run `solver` on `problem` from `theta0` (consumed).
///
/// # Returns
/// The best parameters, `ℓ(θ̂)` (the negated best cost), the termination
/// status, iteration and evaluation counts, and the norm of the last
/// gradient when the solver kept one.
///
/// # Errors
/// - `argmin` runtime errors (line-search failures, model errors raised
///   inside `cost`/`gradient`), converted through `From<argmin::core::Error>`.
/// - Validation errors from [`OptimOutcome::new`] when the best parameters
///   or value are not finite.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, LbfgsState> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        report_start(&theta0, &problem);
    }

    let max_iter = opts.tols.max_iter;
    let executor = Executor::new(problem, solver).configure(|state| match max_iter {
        Some(n) => state.param(theta0).max_iters(n as u64),
        None => state.param(theta0),
    });
    #[cfg(feature = "obs_slog")]
    let executor = if opts.verbose {
        executor.add_observer(argmin_observer_slog::SlogLogger::term_noblock(), ObserverMode::Always)
    } else {
        executor
    };

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter();
    let status = state.get_termination_status().clone();
    debug!(iterations, status = ?status, best_cost = state.get_best_cost(), "L-BFGS run finished");
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        status,
        iterations,
        state.get_func_counts().clone(),
        state.take_gradient(),
    )
}

// ---- Helper methods ----

#[cfg(feature = "obs_slog")]
fn report_start<F: LogLikelihood>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) {
    let loglik = problem.cost(theta0).map(|c| -c).ok();
    let grad_norm = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    tracing::info!(?loglik, ?grad_norm, n_params = theta0.len(), "starting L-BFGS");
}
