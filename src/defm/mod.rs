//! defm — discrete exponential family models for panel binary data.
//!
//! Purpose
//! -------
//! Model each subject's sequence of binary outcome vectors as a fixed-order
//! Markov process whose transition probabilities form an exponential family
//! in a set of user-chosen sufficient statistics ("terms"), optionally
//! weighted by real-valued covariates.
//!
//! Key behaviors
//! -------------
//! - [`core`] implements the windowed array engine: segmentation, windows,
//!   structural keys, counters, support rules, enumerated supports with a
//!   key-shared cache, and the motif census.
//! - [`models`] exposes [`DefmModel`](models::DefmModel): likelihood,
//!   gradient, observed information, fitting, simulation and log-odds.
//! - [`errors`] defines [`DefmError`](errors::DefmError) and its conversion
//!   into the optimizer error type.
//!
//! Invariants & assumptions
//! ------------------------
//! - Rows are grouped contiguously by subject id; every subject has at least
//!   `order + 1` rows.
//! - Outcomes are 0/1, covariates finite; both are validated on construction.
//! - Execution is single-threaded and synchronous.
//!
//! Conventions
//! -----------
//! - A window has `order + 1` rows; row `order` is the current state and the
//!   others are history, oldest first.
//! - The parameter vector θ is ordered like the registered terms.
//! - Non-finite log-likelihoods are reported as `-inf`.
//!
//! Downstream usage
//! ----------------
//! - Import the common surface with `use defm::defm::prelude::*;`.

pub mod core;
pub mod errors;
pub mod models;

pub mod prelude {
    pub use super::core::{
        census::MotifCensus,
        counters::MotifCell,
        data::{CovariateRef, Layout, Storage},
        key::KeyPolicy,
        options::{DefmOptions, SimOpts},
    };
    pub use super::errors::{DefmError, DefmResult};
    pub use super::models::{DefmModel, SimulationResult};
}
