//! Support-restriction rules.
//!
//! Only the current row of a window is ever free; history cells are fixed
//! by construction of the support. On top of that, rules prune individual
//! assignments of the current row before their statistics are cached:
//!
//! - [`SupportRule::NotOneToZero`]: an outcome that was 1 in the previous row
//!   may not become 0 (absorbing states).
//! - [`SupportRule::ConstrainSupport`]: a term's statistic must stay within
//!   `[lb, ub]`.
//!
//! Rules are pure predicates over `(candidate window, candidate statistics)`.
use ndarray::ArrayView1;

use crate::defm::{
    core::window::Window,
    errors::{DefmError, DefmResult},
};

#[derive(Debug, Clone, PartialEq)]
pub enum SupportRule {
    NotOneToZero { cols: Vec<usize> },
    ConstrainSupport { term: usize, lb: f64, ub: f64 },
}

impl SupportRule {
    /// Forbid 1 -> 0 transitions on `cols`.
    ///
    /// Errors
    /// ------
    /// - `DefmError::OutcomeIndexOutOfRange` for a column beyond `n_outcomes`.
    pub fn not_one_to_zero(cols: Vec<usize>, n_outcomes: usize) -> DefmResult<Self> {
        if let Some(&index) = cols.iter().find(|&&c| c >= n_outcomes) {
            return Err(DefmError::OutcomeIndexOutOfRange { index, n_outcomes });
        }
        Ok(SupportRule::NotOneToZero { cols })
    }

    /// Keep statistic `term` within `[lb, ub]`. Infinite bounds are allowed.
    ///
    /// Errors
    /// ------
    /// - `DefmError::InvalidBounds` if either bound is NaN or `lb > ub`.
    pub fn constrain_support(term: usize, lb: f64, ub: f64) -> DefmResult<Self> {
        if lb.is_nan() || ub.is_nan() || lb > ub {
            return Err(DefmError::InvalidBounds { lb, ub });
        }
        Ok(SupportRule::ConstrainSupport { term, lb, ub })
    }

    /// `true` when the candidate assignment is allowed.
    pub fn admits(&self, window: &Window<'_>, stats: ArrayView1<'_, f64>) -> bool {
        match self {
            SupportRule::NotOneToZero { cols } => {
                let n_rows = window.n_rows();
                if n_rows < 2 {
                    return true;
                }
                cols.iter().all(|&c| {
                    !(window.cell(n_rows - 2, c) == 1 && window.cell(n_rows - 1, c) == 0)
                })
            }
            SupportRule::ConstrainSupport { term, lb, ub } => {
                let value = stats[*term];
                value >= *lb && value <= *ub
            }
        }
    }

    /// Term index this rule reads, if any.
    pub fn term(&self) -> Option<usize> {
        match self {
            SupportRule::ConstrainSupport { term, .. } => Some(*term),
            SupportRule::NotOneToZero { .. } => None,
        }
    }
}

/// Ordered list of active rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupportRules {
    rules: Vec<SupportRule>,
}

impl SupportRules {
    pub fn push(&mut self, rule: SupportRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SupportRule> {
        self.rules.iter()
    }

    pub fn admits(&self, window: &Window<'_>, stats: ArrayView1<'_, f64>) -> bool {
        self.rules.iter().all(|r| r.admits(window, stats))
    }

    /// Check every term reference against the final number of terms.
    pub fn check_terms(&self, n_terms: usize) -> DefmResult<()> {
        match self.rules.iter().filter_map(SupportRule::term).find(|&t| t >= n_terms) {
            Some(index) => Err(DefmError::TermIndexOutOfRange { index, n_terms }),
            None => Ok(()),
        }
    }
}
