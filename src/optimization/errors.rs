//! Optimizer error type.
//!
//! [`OptError`] covers configuration mistakes (tolerances, line search,
//! L-BFGS memory), malformed numerical output (gradients, information
//! matrices, estimates), failures reported by `argmin`, and model errors
//! lifted from [`DefmError`]. Model errors raised inside `cost`/`gradient`
//! travel through `argmin::core::Error` and are recovered unchanged by the
//! `From<Error>` conversion.
use std::fmt;

use argmin::core::{ArgminError, Error};

use crate::defm::errors::DefmError;

pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// The model has no analytic score; the adapter differentiates numerically.
    GradientNotImplemented,
    GradientDimMismatch { expected: usize, found: usize },
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- Configuration ----
    InvalidTolGrad { tol: f64, reason: &'static str },
    InvalidTolCost { tol: f64, reason: &'static str },
    InvalidMaxIter { max_iter: usize, reason: &'static str },
    NoTolerancesProvided,
    InvalidLineSearch { name: String, reason: &'static str },
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    // ---- Evaluation and outcome ----
    NonFiniteCost { value: f64 },
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },
    MissingThetaHat,

    // ---- Information matrix ----
    InformationDimMismatch { expected: usize, found: (usize, usize) },
    InvalidInformation { row: usize, col: usize, value: f64 },

    // ---- Model ----
    ThetaLengthMismatch { expected: usize, actual: usize },
    InvalidThetaInput { index: usize, value: f64 },
    /// No terms registered, or `init` not called yet.
    ModelNotReady { text: String },
    ModelError { text: String },

    // ---- argmin ----
    /// A typed `ArgminError`; `kind` names its variant.
    Argmin { kind: &'static str, text: String },
    /// Any other error surfaced by the solver.
    BackendError { text: String },
}

impl std::error::Error for OptError {}

impl fmt::Display for OptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use OptError::*;
        match self {
            GradientNotImplemented => write!(f, "Model provides no analytic gradient"),
            GradientDimMismatch { expected, found } => {
                write!(f, "Gradient has {found} entries, expected {expected}")
            }
            InvalidGradient { index, value, reason } => {
                write!(f, "Gradient entry {index} is {value}: {reason}")
            }
            InvalidTolGrad { tol, reason } => write!(f, "Gradient tolerance {tol}: {reason}"),
            InvalidTolCost { tol, reason } => write!(f, "Cost tolerance {tol}: {reason}"),
            InvalidMaxIter { max_iter, reason } => write!(f, "max_iter {max_iter}: {reason}"),
            NoTolerancesProvided => write!(f, "At least one stopping rule must be set"),
            InvalidLineSearch { name, reason } => write!(f, "Unknown line search '{name}': {reason}"),
            InvalidLBFGSMem { mem, reason } => write!(f, "L-BFGS memory {mem}: {reason}"),
            NonFiniteCost { value } => write!(f, "Log-likelihood evaluated to {value}"),
            InvalidThetaHat { index, value, reason } => {
                write!(f, "Estimate entry {index} is {value}: {reason}")
            }
            MissingThetaHat => write!(f, "Solver returned no parameter estimate"),
            InformationDimMismatch { expected, found } => write!(
                f,
                "Information matrix is {}x{}, expected {expected}x{expected}",
                found.0, found.1
            ),
            InvalidInformation { row, col, value } => {
                write!(f, "Information entry ({row}, {col}) is {value}, must be finite")
            }
            ThetaLengthMismatch { expected, actual } => {
                write!(f, "Expected {expected} parameters, got {actual}")
            }
            InvalidThetaInput { index, value } => {
                write!(f, "Parameter {index} is {value}, must be finite")
            }
            ModelNotReady { text } => write!(f, "Model not ready: {text}"),
            ModelError { text } => write!(f, "Model error: {text}"),
            Argmin { kind, text } => write!(f, "argmin {kind}: {text}"),
            BackendError { text } => write!(f, "Solver error: {text}"),
        }
    }
}

impl From<Error> for OptError {
    fn from(err: Error) -> Self {
        let err = match err.downcast::<OptError>() {
            Ok(own) => return own,
            Err(err) => err,
        };
        let argmin_err = match err.downcast::<ArgminError>() {
            Ok(argmin_err) => argmin_err,
            Err(err) => return OptError::BackendError { text: err.to_string() },
        };
        let text = argmin_err.to_string();
        let kind = match argmin_err {
            ArgminError::InvalidParameter { .. } => "InvalidParameter",
            ArgminError::NotImplemented { .. } => "NotImplemented",
            ArgminError::NotInitialized { .. } => "NotInitialized",
            ArgminError::ConditionViolated { .. } => "ConditionViolated",
            ArgminError::CheckpointNotFound { .. } => "CheckpointNotFound",
            ArgminError::PotentialBug { .. } => "PotentialBug",
            ArgminError::ImpossibleError { .. } => "ImpossibleError",
            _ => "Other",
        };
        OptError::Argmin { kind, text }
    }
}

impl From<DefmError> for OptError {
    fn from(err: DefmError) -> Self {
        match err {
            DefmError::ParamLengthMismatch { expected, actual } => {
                OptError::ThetaLengthMismatch { expected, actual }
            }
            DefmError::NotInitialized | DefmError::NoTerms => {
                OptError::ModelNotReady { text: err.to_string() }
            }
            other => OptError::ModelError { text: other.to_string() },
        }
    }
}
