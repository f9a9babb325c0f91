//! Errors for DEFM models (dataset validation, term/rule configuration,
//! lifecycle ordering, and sampling failures).
//!
//! This module defines the model error type, [`DefmError`], used across the
//! windowed array engine. It implements `Display`/`Error` and converts into
//! the optimizer's [`OptError`](crate::optimization::errors::OptError) so a
//! model can be driven by the `argmin` seam without leaking its own enum.
//!
//! ## Conventions
//! - **Indices are 0-based**: rows, outcome columns, covariate columns, term
//!   indices, and window ordinals.
//! - Length errors (too-short segments, name/parameter counts) and range
//!   errors (cell, column, term indices out of bounds) are raised at the
//!   call that introduced the mismatch and are never clamped.
//! - Non-finite log-likelihoods are **not** errors: they are mapped to
//!   `-inf` at the model boundary.

/// Crate-wide result alias for DEFM operations that may produce [`DefmError`].
pub type DefmResult<T> = Result<T, DefmError>;

/// Unified error type for DEFM modeling.
#[derive(Debug, Clone, PartialEq)]
pub enum DefmError {
    // ---- Dataset validation ----
    /// Dataset has no rows.
    EmptyDataset,

    /// A buffer length disagrees with the declared dimensions.
    LengthMismatch { what: &'static str, expected: usize, actual: usize },

    /// An outcome cell is not 0 or 1.
    NonBinaryOutcome { row: usize, col: usize, value: i32 },

    /// A covariate cell is NaN/±inf.
    NonFiniteCovariate { row: usize, col: usize, value: f64 },

    /// A subject has fewer rows than the Markov order requires.
    SegmentTooShort { id: i64, row: usize, rows: usize, needed: usize },

    // ---- Names ----
    /// Names vector does not match the number of columns.
    NameCountMismatch { what: &'static str, expected: usize, actual: usize },

    /// Names were already attached to this model.
    NamesAlreadySet,

    // ---- Terms / rules ----
    /// A motif cell lies outside the `(order + 1) × n_outcomes` window.
    CellOutOfRange { row: usize, col: usize, n_rows: usize, n_cols: usize },

    /// An outcome column index is out of range.
    OutcomeIndexOutOfRange { index: usize, n_outcomes: usize },

    /// A covariate column index is out of range.
    CovariateIndexOutOfRange { index: usize, n_covariates: usize },

    /// A covariate name does not match any column.
    UnknownCovariate { name: String },

    /// A motif pattern value is not `None`, 0, or 1.
    InvalidPatternValue { row: usize, col: usize, value: u8 },

    /// A term index is out of range.
    TermIndexOutOfRange { index: usize, n_terms: usize },

    /// Support bounds must be finite-or-infinite with `lb <= ub`.
    InvalidBounds { lb: f64, ub: f64 },

    // ---- Lifecycle ----
    /// The model must be initialized before scoring or sampling.
    NotInitialized,

    /// Terms and rules cannot change once windows are built.
    AlreadyInitialized,

    /// At least one term is required before initialization.
    NoTerms,

    /// Parameter vector has the wrong length.
    ParamLengthMismatch { expected: usize, actual: usize },

    /// Window ordinal is out of range.
    WindowIndexOutOfRange { index: usize, n_windows: usize },

    // ---- Sampling ----
    /// The support has no assignment with positive finite weight.
    DegenerateSupport { window: usize, reason: String },

    /// Model hasn't been fitted yet.
    ModelNotFitted,
}

impl std::error::Error for DefmError {}

impl std::fmt::Display for DefmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Dataset validation ----
            DefmError::EmptyDataset => write!(f, "Dataset must have at least one row."),
            DefmError::LengthMismatch { what, expected, actual } => {
                write!(f, "Length mismatch for {what}: expected {expected}, got {actual}")
            }
            DefmError::NonBinaryOutcome { row, col, value } => {
                write!(f, "Outcome at row {row}, column {col} must be 0 or 1; got: {value}")
            }
            DefmError::NonFiniteCovariate { row, col, value } => {
                write!(f, "Covariate at row {row}, column {col} must be finite; got: {value}")
            }
            DefmError::SegmentTooShort { id, row, rows, needed } => {
                write!(
                    f,
                    "Obs. id: {id} (row {row}) has fewer rows ({rows}) than those needed ({needed}) for the Markov model."
                )
            }
            // ---- Names ----
            DefmError::NameCountMismatch { what, expected, actual } => {
                write!(f, "The length of {what} names ({actual}) doesn't match the number of columns ({expected})")
            }
            DefmError::NamesAlreadySet => write!(f, "Names can only be set once per model."),
            // ---- Terms / rules ----
            DefmError::CellOutOfRange { row, col, n_rows, n_cols } => {
                write!(
                    f,
                    "Cell ({row}, {col}) is outside the window of {n_rows} rows and {n_cols} columns"
                )
            }
            DefmError::OutcomeIndexOutOfRange { index, n_outcomes } => {
                write!(f, "Outcome index {index} is out of range; model has {n_outcomes} outcomes")
            }
            DefmError::CovariateIndexOutOfRange { index, n_covariates } => {
                write!(
                    f,
                    "Covariate index {index} is out of range; model has {n_covariates} covariates"
                )
            }
            DefmError::UnknownCovariate { name } => {
                write!(f, "Covariate '{name}' not found among the covariate names")
            }
            DefmError::InvalidPatternValue { row, col, value } => {
                write!(f, "Valid motif values are None, 0, or 1; cell ({row}, {col}) has {value}")
            }
            DefmError::TermIndexOutOfRange { index, n_terms } => {
                write!(f, "Term index {index} is out of range; model has {n_terms} terms")
            }
            DefmError::InvalidBounds { lb, ub } => {
                write!(f, "Support bounds must satisfy lb <= ub and not be NaN; got [{lb}, {ub}]")
            }
            // ---- Lifecycle ----
            DefmError::NotInitialized => write!(f, "Model hasn't been initialized yet."),
            DefmError::AlreadyInitialized => {
                write!(f, "Model is already initialized; terms and rules are frozen.")
            }
            DefmError::NoTerms => write!(f, "Model has no terms."),
            DefmError::ParamLengthMismatch { expected, actual } => {
                write!(f, "Parameter length mismatch: expected {expected}, got {actual}")
            }
            DefmError::WindowIndexOutOfRange { index, n_windows } => {
                write!(f, "Window index {index} is out of range; model has {n_windows} windows")
            }
            // ---- Sampling ----
            DefmError::DegenerateSupport { window, reason } => {
                write!(f, "Cannot sample window {window}: {reason}")
            }
            DefmError::ModelNotFitted => write!(f, "Model hasn't been fitted yet."),
        }
    }
}
