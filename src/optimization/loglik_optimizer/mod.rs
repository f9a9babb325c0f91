//! Maximum-likelihood fitting through `argmin`.
//!
//! A model implements [`LogLikelihood`] (value, parameter check, optional
//! score) and [`maximize`] runs L-BFGS on the negated log-likelihood:
//!
//! - [`adapter`]: `ℓ(θ)` → `argmin` cost `-ℓ(θ)`, with a `finitediff`
//!   fallback for models without a score.
//! - [`builders`] / [`run`]: solver construction and execution.
//! - [`traits`]: the model trait plus [`MLEOptions`], [`Tolerances`],
//!   [`LineSearcher`] and [`OptimOutcome`].
//! - [`validation`]: finiteness and shape checks on everything crossing the
//!   seam.
//!
//! Parameters are unconstrained; DEFM coefficients live on the whole real
//! line. `DefmModel` implements the trait with `Data = ()` and calls
//! [`maximize`] from `DefmModel::fit`.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Information, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
