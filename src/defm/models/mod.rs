//! models — the user-facing DEFM model and its internals.
//!
//! Purpose
//! -------
//! Assemble `defm::core` into [`DefmModel`]: construction over a panel
//! dataset, term and rule registration, initialization of windows and
//! supports, exact likelihood / gradient / information, maximum-likelihood
//! fitting through the optimizer seam, simulation and diagnostics.
//!
//! Key behaviors
//! -------------
//! - [`DefmModel`] implements [`LogLikelihood`] with `Data = ()`, so it plugs
//!   directly into `optimization::loglik_optimizer::maximize`.
//! - [`model_internals`] keeps per-window bookkeeping, traversal and
//!   sampling helpers out of the model type.
//!
//! Invariants & assumptions
//! ------------------------
//! - Terms and rules are frozen by `init`; scoring and sampling require it.
//! - A model instance is single-owner and not shared across threads while
//!   simulating, since simulation may extend the support cache and advances
//!   the model's generator.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the model; the end-to-end pipeline is covered in
//!   `tests/integration_defm_pipeline.rs`.
//!
//! [`LogLikelihood`]: crate::optimization::loglik_optimizer::LogLikelihood

pub mod defm;
pub mod model_internals;

pub use self::defm::{DefmModel, SimulationResult};

pub mod prelude {
    pub use super::defm::{DefmModel, SimulationResult};
}
