//! Support sets and the structural-key cache.
//!
//! Purpose
//! -------
//! Enumerate, for one window structure, every admissible assignment of the
//! current row together with its statistic vector, and cache these
//! enumerations so windows with equal [`StructuralKey`]s pay for the
//! enumeration once.
//!
//! Key behaviors
//! -------------
//! - [`SupportSet::enumerate`] walks the `2^n_outcomes` assignments of the
//!   current row in binary order (bit `j` of the counter is outcome `j`),
//!   evaluates the counters on each candidate window and keeps the ones all
//!   support rules admit. Pruning happens before anything is stored.
//! - Scores `θ·s`, the log-normalizer, assignment probabilities and the
//!   first two moments of `s` are computed from the cached statistics with
//!   max-shifted exponentials.
//! - [`SupportCache`] is a get-or-insert map from key to support index that
//!   owns its sets for the model's lifetime; unique (non-shared) sets bypass
//!   the map.
//! - [`SupportCache::log_normalizers`] and [`SupportCache::moments`] evaluate
//!   each cached set once per `θ`; windows then read their support's entry,
//!   so a shared support also shares its normalizing constant.
//!
//! Invariants & assumptions
//! ------------------------
//! - `assignments.nrows() == stats.nrows()`, `assignments.ncols() == n_outcomes`,
//!   `stats.ncols() == n_terms`.
//! - Support size is exponential in `n_outcomes`. This is a capacity limit of
//!   the model class, not a trapped error; `n_outcomes` must stay well below
//!   the pointer width.
//!
//! Downstream usage
//! ----------------
//! - The model resolves each window to a support index at initialization
//!   and reuses it for likelihood, gradient, information and sampling.
use std::ops::Index;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{
    defm::core::{counters::Counters, key::StructuralKey, rules::SupportRules, window::Window},
    optimization::numerical_stability::transformations::{log_sum_exp, softmax},
};

/// Enumerated admissible current-row assignments and their statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportSet {
    assignments: Array2<u8>,
    stats: Array2<f64>,
}

impl SupportSet {
    /// Enumerate the support of `window`'s current row.
    ///
    /// Parameters
    /// ----------
    /// - `window`: template window; its current row is ignored.
    /// - `counters`: statistics evaluated for every candidate.
    /// - `rules`: predicates pruning candidates before caching.
    pub fn enumerate(window: &Window<'_>, counters: &Counters, rules: &SupportRules) -> SupportSet {
        let n_cols = window.n_cols();
        let n_total = 1_usize << n_cols;
        let mut assignments = Array2::<u8>::zeros((n_total, n_cols));
        let mut stats = Array2::<f64>::zeros((n_total, counters.len()));
        let mut candidate = window.clone();
        let mut row = Array1::<u8>::zeros(n_cols);
        let mut kept = 0;

        for mask in 0..n_total {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = ((mask >> j) & 1) as u8;
            }
            candidate.set_current(row.view());
            counters.stats_into(&candidate, stats.row_mut(kept));
            if !rules.admits(&candidate, stats.row(kept)) {
                continue;
            }
            assignments.row_mut(kept).assign(&row);
            kept += 1;
        }

        SupportSet {
            assignments: assignments.slice(s![..kept, ..]).to_owned(),
            stats: stats.slice(s![..kept, ..]).to_owned(),
        }
    }

    pub fn len(&self) -> usize {
        self.assignments.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.nrows() == 0
    }

    pub fn assignments(&self) -> ArrayView2<'_, u8> {
        self.assignments.view()
    }

    pub fn stats(&self) -> ArrayView2<'_, f64> {
        self.stats.view()
    }

    /// Index of `assignment` in this support, if admissible.
    pub fn position(&self, assignment: ArrayView1<'_, u8>) -> Option<usize> {
        self.assignments.rows().into_iter().position(|row| row == assignment)
    }

    /// Linear scores `θ·s_k` for every assignment.
    pub fn scores(&self, theta: ArrayView1<'_, f64>) -> Array1<f64> {
        self.stats.dot(&theta)
    }

    /// `ln Σ_k exp(θ·s_k)`; `-inf` for an empty support.
    pub fn log_normalizer(&self, theta: ArrayView1<'_, f64>) -> f64 {
        log_sum_exp(self.scores(theta).view())
    }

    /// Conditional probability of every assignment.
    pub fn probabilities(&self, theta: ArrayView1<'_, f64>) -> Array1<f64> {
        softmax(self.scores(theta).view())
    }

    /// Mean and covariance of the statistic vector under `θ`.
    pub fn moments(&self, theta: ArrayView1<'_, f64>) -> (Array1<f64>, Array2<f64>) {
        let probs = self.probabilities(theta);
        let mean = self.stats.t().dot(&probs);
        let n_terms = self.stats.ncols();
        let mut cov = Array2::<f64>::zeros((n_terms, n_terms));
        for (row, &p) in self.stats.rows().into_iter().zip(probs.iter()) {
            if p == 0.0 {
                continue;
            }
            let centered = &row - &mean;
            for a in 0..n_terms {
                for b in 0..n_terms {
                    cov[[a, b]] += p * centered[a] * centered[b];
                }
            }
        }
        (mean, cov)
    }
}

/// Support sets owned for the model's lifetime, indexed by structural key.
#[derive(Debug, Clone, Default)]
pub struct SupportCache {
    index: FxHashMap<StructuralKey, usize>,
    sets: Vec<SupportSet>,
}

impl SupportCache {
    pub fn new() -> Self {
        SupportCache::default()
    }

    /// Index of the set stored under `key`, building it on first encounter.
    pub fn get_or_insert_with<F>(&mut self, key: StructuralKey, build: F) -> usize
    where
        F: FnOnce() -> SupportSet,
    {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let set = build();
        trace!(key_len = key.as_slice().len(), support_size = set.len(), "built support set");
        let idx = self.sets.len();
        self.sets.push(set);
        self.index.insert(key, idx);
        idx
    }

    /// Store a set that is never shared.
    pub fn insert_unique(&mut self, set: SupportSet) -> usize {
        self.sets.push(set);
        self.sets.len() - 1
    }

    pub fn get(&self, idx: usize) -> Option<&SupportSet> {
        self.sets.get(idx)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// `ln Z(θ)` of every cached set, indexed like the cache.
    pub fn log_normalizers(&self, theta: ArrayView1<'_, f64>) -> Vec<f64> {
        self.sets.iter().map(|set| set.log_normalizer(theta)).collect()
    }

    /// `(E[s], Cov(s))` of every cached set, indexed like the cache.
    pub fn moments(&self, theta: ArrayView1<'_, f64>) -> Vec<(Array1<f64>, Array2<f64>)> {
        self.sets.iter().map(|set| set.moments(theta)).collect()
    }

    /// Number of distinct keys (unique sets excluded).
    pub fn n_keys(&self) -> usize {
        self.index.len()
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.sets.clear();
    }
}

impl Index<usize> for SupportCache {
    type Output = SupportSet;

    fn index(&self, idx: usize) -> &SupportSet {
        &self.sets[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defm::core::{
        counters::{Counter, TermContext},
        rules::SupportRule,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Full and rule-pruned enumeration of the current row.
    // - Normalizer, probabilities and moments against hand computations.
    // - Get-or-insert semantics of the cache.
    // - Per-support evaluation indexed like the cache.
    // -------------------------------------------------------------------------

    fn ones_counters(n_rows: usize, n_cols: usize) -> Counters {
        let y: Vec<String> = (0..n_cols).map(|j| format!("y{j}")).collect();
        let ctx = TermContext { n_rows, n_cols, y_names: &y, x_names: &[] };
        let mut counters = Counters::new();
        counters.push(Counter::ones(None, &ctx));
        counters
    }

    #[test]
    // Purpose
    // -------
    // Verify unrestricted enumeration size and binary ordering.
    //
    // Given
    // -----
    // - 2 outcomes, order 0, a single `ones` counter.
    //
    // Expect
    // ------
    // - 4 assignments [00, 10, 01, 11] with stats [0, 1, 1, 2].
    fn enumerates_all_assignments_in_binary_order() {
        // Arrange
        let cov = Array1::<f64>::zeros(0);
        let window = Window::from_parts(array![[1_u8, 1]], cov.view(), 0);
        let counters = ones_counters(1, 2);

        // Act
        let support = SupportSet::enumerate(&window, &counters, &SupportRules::default());

        // Assert
        assert_eq!(support.assignments(), array![[0_u8, 0], [1, 0], [0, 1], [1, 1]]);
        assert_eq!(support.stats().column(0).to_vec(), vec![0.0, 1.0, 1.0, 2.0]);
        assert_eq!(support.position(array![0_u8, 1].view()), Some(2));
    }

    #[test]
    // Purpose
    // -------
    // Ensure rules prune before statistics are stored.
    //
    // Given
    // -----
    // - History row [1, 0], not-one-to-zero on column 0.
    //
    // Expect
    // ------
    // - Only assignments with y0 = 1 survive: [10, 11].
    fn rules_prune_before_caching() {
        let cov = Array1::<f64>::zeros(0);
        let window = Window::from_parts(array![[1_u8, 0], [0, 0]], cov.view(), 1);
        let counters = ones_counters(2, 2);
        let mut rules = SupportRules::default();
        rules.push(SupportRule::not_one_to_zero(vec![0], 2).unwrap());

        let support = SupportSet::enumerate(&window, &counters, &rules);

        assert_eq!(support.assignments(), array![[1_u8, 0], [1, 1]]);
        assert_eq!(support.position(array![0_u8, 1].view()), None);
    }

    #[test]
    // Purpose
    // -------
    // Check normalizer, probabilities and moments for one binary outcome.
    //
    // Given
    // -----
    // - Support {0, 1} with stats {0, 1}, θ = ln 3.
    //
    // Expect
    // ------
    // - Z = 1 + 3 = 4; p = [0.25, 0.75]; mean 0.75; variance 0.1875.
    fn moments_match_bernoulli() {
        let cov = Array1::<f64>::zeros(0);
        let window = Window::from_parts(array![[0_u8]], cov.view(), 0);
        let support = SupportSet::enumerate(&window, &ones_counters(1, 1), &SupportRules::default());
        let theta = array![3f64.ln()];

        let (mean, var) = support.moments(theta.view());

        assert_relative_eq!(support.log_normalizer(theta.view()), 4f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(support.probabilities(theta.view())[1], 0.75, epsilon = 1e-12);
        assert_relative_eq!(mean[0], 0.75, epsilon = 1e-12);
        assert_relative_eq!(var[[0, 0]], 0.1875, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Equal keys resolve to one stored set; unique inserts never share.
    fn cache_builds_once_per_key() {
        let cov = Array1::<f64>::zeros(0);
        let counters = ones_counters(2, 1);
        let rules = SupportRules::default();
        let w1 = Window::from_parts(array![[1_u8], [0]], cov.view(), 1);
        let w2 = Window::from_parts(array![[1_u8], [1]], cov.view(), 2);
        let mut cache = SupportCache::new();

        let a = cache.get_or_insert_with(StructuralKey::of(&w1, &[]), || {
            SupportSet::enumerate(&w1, &counters, &rules)
        });
        let mut built = false;
        let b = cache.get_or_insert_with(StructuralKey::of(&w2, &[]), || {
            built = true;
            SupportSet::enumerate(&w2, &counters, &rules)
        });
        let c = cache.insert_unique(SupportSet::enumerate(&w2, &counters, &rules));

        assert_eq!(a, b);
        assert!(!built);
        assert_ne!(a, c);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.n_keys(), 1);
    }

    #[test]
    // Purpose
    // -------
    // Per-support normalizers and moments come back one entry per stored
    // set, in cache order.
    //
    // Given
    // -----
    // - One outcome, order 1, a `ones` counter and not-one-to-zero.
    // - Set 0 from history [0] (support {0, 1}); set 1 from history [1]
    //   (support {1}); θ = 0.5.
    //
    // Expect
    // ------
    // - ln Z = [ln(1 + e^0.5), 0.5]; set 1 has mean 1 and zero variance.
    fn per_support_evaluation_follows_cache_order() {
        // Arrange
        let cov = Array1::<f64>::zeros(0);
        let counters = ones_counters(2, 1);
        let mut rules = SupportRules::default();
        rules.push(SupportRule::not_one_to_zero(vec![0], 1).unwrap());
        let free = Window::from_parts(array![[0_u8], [1]], cov.view(), 1);
        let pinned = Window::from_parts(array![[1_u8], [1]], cov.view(), 2);
        let mut cache = SupportCache::new();
        for w in [&free, &pinned, &free] {
            cache.get_or_insert_with(StructuralKey::of(w, &[]), || {
                SupportSet::enumerate(w, &counters, &rules)
            });
        }
        let theta = array![0.5];

        // Act
        let log_z = cache.log_normalizers(theta.view());
        let moments = cache.moments(theta.view());

        // Assert
        assert_eq!(log_z.len(), 2);
        assert_eq!(moments.len(), 2);
        assert_relative_eq!(log_z[0], 0.5_f64.exp().ln_1p(), epsilon = 1e-12);
        assert_relative_eq!(log_z[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(moments[1].0[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(moments[1].1[[0, 0]], 0.0, epsilon = 1e-12);
    }
}
