//! defm — discrete exponential family models for longitudinal binary data.
//!
//! Purpose
//! -------
//! Serve as the crate root. The crate fits and simulates Discrete Exponential
//! Family Models (DEFMs): fixed-order Markov models over vectors of binary
//! outcomes, grouped by subject, with optional real-valued covariates.
//!
//! Key behaviors
//! -------------
//! - [`defm`]: the windowed array engine and the `DefmModel` type.
//! - [`optimization`]: the `LogLikelihood` seam to `argmin`'s L-BFGS, with
//!   options, tolerances and error types.
//! - [`inference`]: standard errors from the observed information matrix.
//!
//! Conventions
//! -----------
//! - Indices are 0-based everywhere.
//! - Errors are returned as `DefmResult` / `OptResult`; the library never
//!   panics on invalid input.
//! - Logging goes through `tracing`; no subscriber is installed here.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/integration_defm_pipeline.rs`
//!   runs construction, scoring, simulation, re-scoring and fitting end to
//!   end.

pub mod defm;
pub mod inference;
pub mod optimization;
