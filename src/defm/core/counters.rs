//! Counters — sufficient statistics evaluated over a window.
//!
//! Purpose
//! -------
//! Define the terms of a DEFM. Each [`Counter`] maps a [`Window`] to one real
//! number; the ordered list of counters in a [`Counters`] collection maps a
//! window to the model's statistic vector, which is dotted with θ to score
//! the window in both likelihood and sampling.
//!
//! Key behaviors
//! -------------
//! - Four kinds of terms: `Ones`, `FixedEffect`, `Motif` (generic transition)
//!   and `LogitIntercept`, each optionally weighted by one covariate of the
//!   window's current row.
//! - Motif cells are validated against the `(order + 1) × n_outcomes` window
//!   at registration; coordinates can be given as cells, as column-major
//!   linear indices, or as a pattern matrix of `Option<u8>`.
//! - Every counter carries a human-readable name and description derived
//!   from the term unless replaced later.
//!
//! Invariants & assumptions
//! ------------------------
//! - Evaluation is pure: a counter never mutates the window or shared state,
//!   so support enumeration can score many candidate current rows.
//! - Covariate indices stored in counters have already been resolved and
//!   range-checked against the dataset.
//!
//! Conventions
//! -----------
//! - Linear cell coordinates are column-major across the window:
//!   `index = row + col * n_rows`.
//! - Cell labels in names are `y1` when the model has order 0 and
//!   `y1_0`, `y1_1`, ... otherwise; a leading `0` marks a cell pinned to 0.
use std::fmt;

use ndarray::{Array1, ArrayView2, ArrayViewMut1};

use crate::defm::{
    core::window::Window,
    errors::{DefmError, DefmResult},
};

/// One pinned cell of a motif.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotifCell {
    pub row: usize,
    pub col: usize,
    pub value: bool,
}

impl MotifCell {
    pub fn new(row: usize, col: usize, value: bool) -> Self {
        MotifCell { row, col, value }
    }

    /// Cell from a column-major linear index into a window with `n_rows` rows.
    pub fn from_linear(index: usize, value: bool, n_rows: usize) -> Self {
        MotifCell { row: index % n_rows, col: index / n_rows, value }
    }

    pub fn linear(&self, n_rows: usize) -> usize {
        self.row + self.col * n_rows
    }
}

/// What a counter computes before covariate weighting.
#[derive(Debug, Clone, PartialEq)]
pub enum CounterKind {
    /// Number of ones in the current row.
    Ones,
    /// `x^k` of the weighting covariate (1 when unweighted).
    FixedEffect { k: f64 },
    /// 1 when every pinned cell matches, 0 otherwise.
    Motif { cells: Vec<MotifCell> },
    /// Current-row value of `col`, or the number of ones when `col` is `None`.
    LogitIntercept { col: Option<usize> },
}

/// Shape and labels a counter is registered against.
#[derive(Debug, Clone, Copy)]
pub struct TermContext<'n> {
    pub n_rows: usize,
    pub n_cols: usize,
    pub y_names: &'n [String],
    pub x_names: &'n [String],
}

impl TermContext<'_> {
    fn cell_label(&self, cell: &MotifCell) -> String {
        let zero = if cell.value { "" } else { "0" };
        if self.n_rows == 1 {
            format!("{zero}{}", self.y_names[cell.col])
        } else {
            format!("{zero}{}_{}", self.y_names[cell.col], cell.row)
        }
    }

    fn cell_list<'c>(&self, cells: impl Iterator<Item = &'c MotifCell>) -> String {
        cells.map(|c| self.cell_label(c)).collect::<Vec<_>>().join(", ")
    }

    fn covariate_suffix(&self, covariate: Option<usize>) -> String {
        covariate.map(|c| format!(" x {}", self.x_names[c])).unwrap_or_default()
    }

    fn check_cell(&self, row: usize, col: usize) -> DefmResult<()> {
        if row >= self.n_rows || col >= self.n_cols {
            return Err(DefmError::CellOutOfRange {
                row,
                col,
                n_rows: self.n_rows,
                n_cols: self.n_cols,
            });
        }
        Ok(())
    }
}

/// A single named sufficient statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    kind: CounterKind,
    covariate: Option<usize>,
    name: String,
    description: String,
}

impl Counter {
    /// Number of ones in the current row, optionally times a covariate.
    pub fn ones(covariate: Option<usize>, ctx: &TermContext<'_>) -> Self {
        Counter {
            kind: CounterKind::Ones,
            covariate,
            name: format!("Num. of ones{}", ctx.covariate_suffix(covariate)),
            description: "Number of ones in the current row".to_string(),
        }
    }

    /// Fixed effect `x^k`. Constant within a support, so it only matters
    /// for covariate-driven baselines.
    pub fn fixed_effect(k: f64, covariate: Option<usize>, ctx: &TermContext<'_>) -> Self {
        let base = covariate.map(|c| ctx.x_names[c].as_str()).unwrap_or("1");
        Counter {
            kind: CounterKind::FixedEffect { k },
            covariate,
            name: format!("Fixed effect feature ({base})^{k}"),
            description: "Covariate raised to a fixed power".to_string(),
        }
    }

    /// Generic motif over explicit cells.
    ///
    /// Errors
    /// ------
    /// - `DefmError::CellOutOfRange` if any cell lies outside the window.
    pub fn motif(
        cells: Vec<MotifCell>, covariate: Option<usize>, ctx: &TermContext<'_>,
    ) -> DefmResult<Self> {
        for cell in &cells {
            ctx.check_cell(cell.row, cell.col)?;
        }
        let last = ctx.n_rows - 1;
        let current = ctx.cell_list(cells.iter().filter(|c| c.row == last));
        let history = ctx.cell_list(cells.iter().filter(|c| c.row < last));
        let body = if history.is_empty() {
            format!("{{{current}}}")
        } else {
            format!("{{{history}}} > {{{current}}}")
        };
        Ok(Counter {
            kind: CounterKind::Motif { cells },
            covariate,
            name: format!("Motif {body}{}", ctx.covariate_suffix(covariate)),
            description: "Indicator of a pinned pattern across the window".to_string(),
        })
    }

    /// Motif from column-major linear coordinates and their pinned values.
    ///
    /// Errors
    /// ------
    /// - `DefmError::LengthMismatch` if `coords` and `signs` differ in length.
    /// - `DefmError::CellOutOfRange` for coordinates beyond the window.
    pub fn motif_from_coords(
        coords: &[usize], signs: &[bool], covariate: Option<usize>, ctx: &TermContext<'_>,
    ) -> DefmResult<Self> {
        if coords.len() != signs.len() {
            return Err(DefmError::LengthMismatch {
                what: "motif signs",
                expected: coords.len(),
                actual: signs.len(),
            });
        }
        let size = ctx.n_rows * ctx.n_cols;
        let mut cells = Vec::with_capacity(coords.len());
        for (&index, &value) in coords.iter().zip(signs) {
            if index >= size {
                return Err(DefmError::CellOutOfRange {
                    row: index % ctx.n_rows,
                    col: index / ctx.n_rows,
                    n_rows: ctx.n_rows,
                    n_cols: ctx.n_cols,
                });
            }
            cells.push(MotifCell::from_linear(index, value, ctx.n_rows));
        }
        Counter::motif(cells, covariate, ctx)
    }

    /// Motif from an `(order + 1) × n_outcomes` pattern: `None` leaves a cell
    /// free, `Some(0)` / `Some(1)` pins it.
    ///
    /// Errors
    /// ------
    /// - `DefmError::LengthMismatch` if the pattern has the wrong shape.
    /// - `DefmError::InvalidPatternValue` for values other than 0 or 1.
    pub fn motif_from_pattern(
        pattern: ArrayView2<'_, Option<u8>>, covariate: Option<usize>, ctx: &TermContext<'_>,
    ) -> DefmResult<Self> {
        if pattern.nrows() != ctx.n_rows {
            return Err(DefmError::LengthMismatch {
                what: "motif pattern rows",
                expected: ctx.n_rows,
                actual: pattern.nrows(),
            });
        }
        if pattern.ncols() != ctx.n_cols {
            return Err(DefmError::LengthMismatch {
                what: "motif pattern columns",
                expected: ctx.n_cols,
                actual: pattern.ncols(),
            });
        }
        let mut cells = Vec::new();
        // column-major walk keeps the linearized ordering
        for col in 0..ctx.n_cols {
            for row in 0..ctx.n_rows {
                match pattern[[row, col]] {
                    None => {}
                    Some(v @ (0 | 1)) => cells.push(MotifCell::new(row, col, v == 1)),
                    Some(value) => return Err(DefmError::InvalidPatternValue { row, col, value }),
                }
            }
        }
        Counter::motif(cells, covariate, ctx)
    }

    /// Logit intercept for outcome `col`, or over all outcomes when `None`.
    ///
    /// Errors
    /// ------
    /// - `DefmError::OutcomeIndexOutOfRange` if `col >= n_outcomes`.
    pub fn logit_intercept(
        col: Option<usize>, covariate: Option<usize>, ctx: &TermContext<'_>,
    ) -> DefmResult<Self> {
        let target = match col {
            Some(c) if c >= ctx.n_cols => {
                return Err(DefmError::OutcomeIndexOutOfRange { index: c, n_outcomes: ctx.n_cols });
            }
            Some(c) => format!(" {}", ctx.y_names[c]),
            None => String::new(),
        };
        Ok(Counter {
            kind: CounterKind::LogitIntercept { col },
            covariate,
            name: format!("Logit intercept{target}{}", ctx.covariate_suffix(covariate)),
            description: "Equivalent to a logistic regression intercept".to_string(),
        })
    }

    /// Statistic for `window`.
    pub fn evaluate(&self, window: &Window<'_>) -> f64 {
        let weight = self.covariate.map(|c| window.covariate(c));
        let base = match &self.kind {
            CounterKind::FixedEffect { k } => return weight.map_or(1.0, |x| x.powf(*k)),
            CounterKind::Ones | CounterKind::LogitIntercept { col: None } => {
                window.current_ones() as f64
            }
            CounterKind::LogitIntercept { col: Some(c) } => {
                f64::from(window.cell(window.n_rows() - 1, *c))
            }
            CounterKind::Motif { cells } => {
                let hit = cells.iter().all(|c| (window.cell(c.row, c.col) == 1) == c.value);
                if hit { 1.0 } else { 0.0 }
            }
        };
        base * weight.unwrap_or(1.0)
    }

    pub fn kind(&self) -> &CounterKind {
        &self.kind
    }

    pub fn covariate(&self) -> Option<usize> {
        self.covariate
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replace name and/or description; empty strings keep the current value.
    pub fn set_info(&mut self, name: &str, description: &str) {
        if !name.is_empty() {
            self.name = name.to_string();
        }
        if !description.is_empty() {
            self.description = description.to_string();
        }
    }

    pub fn is_motif(&self) -> bool {
        matches!(self.kind, CounterKind::Motif { .. })
    }
}

/// Ordered collection of counters; its order is the statistic-vector order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Counters {
    terms: Vec<Counter>,
}

impl Counters {
    pub fn new() -> Self {
        Counters::default()
    }

    pub fn push(&mut self, counter: Counter) {
        self.terms.push(counter);
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Counter> {
        self.terms.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Counter> {
        self.terms.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Counter> {
        self.terms.get_mut(index)
    }

    pub fn names(&self) -> Vec<String> {
        self.terms.iter().map(|t| t.name.clone()).collect()
    }

    /// Sorted, deduplicated covariate columns any counter reads.
    pub fn consumed_covariates(&self) -> Vec<usize> {
        let mut consumed: Vec<usize> = self.terms.iter().filter_map(|t| t.covariate).collect();
        consumed.sort_unstable();
        consumed.dedup();
        consumed
    }

    /// Write the statistic vector of `window` into `out`.
    ///
    /// Panics
    /// ------
    /// - If `out.len() != self.len()`.
    pub fn stats_into(&self, window: &Window<'_>, mut out: ArrayViewMut1<'_, f64>) {
        assert_eq!(out.len(), self.terms.len(), "statistic buffer length must equal term count");
        for (slot, term) in out.iter_mut().zip(&self.terms) {
            *slot = term.evaluate(window);
        }
    }

    pub fn stats(&self, window: &Window<'_>) -> Array1<f64> {
        let mut out = Array1::zeros(self.terms.len());
        self.stats_into(window, out.view_mut());
        out
    }
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Num. of counters: {}", self.terms.len())?;
        for (i, term) in self.terms.iter().enumerate() {
            writeln!(f, "[{i}] {}: {}", term.name, term.description)?;
        }
        Ok(())
    }
}
