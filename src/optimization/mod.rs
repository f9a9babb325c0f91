//! optimization — fitting DEFM models by maximum likelihood.
//!
//! Purpose
//! -------
//! Models expose `ℓ(θ)` and its score; `argmin` does the optimizing. This
//! module holds that seam together with the stable exp/log reductions the
//! support sets use to normalize scores.
//!
//! Key behaviors
//! -------------
//! - [`loglik_optimizer`]: [`LogLikelihood`](loglik_optimizer::LogLikelihood),
//!   the `argmin` adapter, L-BFGS construction and execution.
//! - [`numerical_stability`]: max-shifted `log_sum_exp` / `softmax` and the
//!   tolerances shared with inference.
//! - [`errors`]: [`OptError`](errors::OptError), lifted from `argmin` and
//!   `DefmError` failures.
//!
//! Conventions
//! -----------
//! - Values reported to callers are log-likelihoods, never costs.
//! - Runs log a `tracing` debug event on completion; the terminal observer
//!   is opt-in through the `obs_slog` feature and `MLEOptions::verbose`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
