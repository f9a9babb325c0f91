//! inference — uncertainty quantification for fitted DEFMs.
//!
//! Purpose
//! -------
//! Map the closed-form observed information of a fitted model into a
//! covariance matrix and standard errors.
//!
//! Key behaviors
//! -------------
//! - [`information::covariance`] returns the eigen-based pseudoinverse of the
//!   observed information.
//! - [`information::standard_errors`] returns the square roots of its
//!   diagonal.
//!
//! Conventions
//! -----------
//! - Functions return `OptResult<T>`; shape and finiteness problems surface
//!   as `OptError::InformationDimMismatch` / `OptError::InvalidInformation`.
//!
//! Downstream usage
//! ----------------
//! - `DefmModel::standard_errors` evaluates the information at `θ̂` and calls
//!   into this module.

pub mod information;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::information::{covariance, standard_errors};

// ---- Optional convenience prelude for downstream crates ------------------
//
// Downstream crates can `use defm::inference::prelude::*;` to import the
// primary inference surface in a single line.

pub mod prelude {
    pub use super::information::{covariance, standard_errors};
}
