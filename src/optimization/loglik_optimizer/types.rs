//! Numeric aliases shared by the optimizer seam.
//!
//! Parameter vectors, gradients and the observed information are plain
//! `ndarray` containers over `f64`; the solver aliases pin `argmin`'s
//! L-BFGS and line-search generics to those shapes so the rest of the
//! module never spells them out. A DEFM parameter vector has one entry per
//! registered term, in registration order.
use std::collections::HashMap;

use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};

/// Parameter vector `θ`, one entry per model term.
pub type Theta = Array1<f64>;

/// Gradient of the log-likelihood or of the cost, same length as `θ`.
pub type Grad = Array1<f64>;

/// Observed information `I(θ)`, `k × k` for `k` terms.
pub type Information = Array2<f64>;

/// Cost handed to `argmin`: `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// `argmin` function-evaluation counters keyed by name (`"cost_count"`, ...).
pub type FnEvalMap = HashMap<String, u64>;

/// L-BFGS history length used when `MLEOptions::lbfgs_mem` is `None`.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
