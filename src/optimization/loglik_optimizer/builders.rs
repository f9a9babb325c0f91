//! L-BFGS solver construction for both supported line searches.
//!
//! Only the solver-side stopping rules (gradient norm, cost change) are set
//! here. `max_iter` belongs to the executor state and is applied by
//! [`run_lbfgs`](super::run::run_lbfgs).
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    with_line_search(HagerZhangLS::new(), opts)
}

pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    with_line_search(MoreThuenteLS::new(), opts)
}

fn with_line_search<L>(line_search: L, opts: &MLEOptions) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    let memory = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LBFGS::new(line_search, memory), opts)
}

/// Apply `opts.tols.tol_grad` / `opts.tols.tol_cost` when set.
///
/// # Errors
/// `argmin` rejecting a tolerance, converted into `OptError`.
pub fn configure_lbfgs<L>(
    solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    let solver = match opts.tols.tol_grad {
        Some(tol) => solver.with_tolerance_grad(tol)?,
        None => solver,
    };
    Ok(match opts.tols.tol_cost {
        Some(tol) => solver.with_tolerance_cost(tol)?,
        None => solver,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction of both L-BFGS variants with default and explicit memory.
    // - Tolerance wiring when only an iteration cap is configured.
    // -------------------------------------------------------------------------

    fn opts(ls: LineSearcher, tol_cost: Option<f64>, mem: Option<usize>) -> MLEOptions {
        let tols = Tolerances::new(Some(1e-6), tol_cost, Some(50)).unwrap();
        MLEOptions::new(tols, ls, false, mem).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Both builders succeed with the default memory and with an explicit one.
    fn builders_accept_default_and_explicit_memory() {
        for (tol_cost, mem) in [(None, None), (Some(1e-8), Some(11))] {
            assert!(build_optimizer_hager_zhang(&opts(LineSearcher::HagerZhang, tol_cost, mem)).is_ok());
            assert!(
                build_optimizer_more_thuente(&opts(LineSearcher::MoreThuente, tol_cost, mem)).is_ok()
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // `configure_lbfgs` leaves the solver untouched when no tolerance is set.
    fn configure_lbfgs_respects_absent_tolerances() {
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).unwrap();
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).unwrap();

        assert!(configure_lbfgs(raw, &opts).is_ok());
    }
}
