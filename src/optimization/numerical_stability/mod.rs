//! Stable exponential-family reductions.
//!
//! Support sets turn linear scores `θ·s` into normalizers and
//! probabilities; [`log_sum_exp`] and [`softmax`] do it with a max-shift so
//! large scores never overflow. `-inf` scores carry zero mass and `NaN`
//! propagates. [`EIGEN_EPS`] and [`GENERAL_TOL`] are the cutoffs shared
//! with `inference`.

pub mod transformations;

pub use self::transformations::{EIGEN_EPS, GENERAL_TOL, log_sum_exp, softmax};

pub mod prelude {
    pub use super::transformations::{EIGEN_EPS, GENERAL_TOL, log_sum_exp, softmax};
}
