//! DEFM model: windowed likelihood, gradient, simulation and diagnostics.
//!
//! This module wires the `defm::core` building blocks into one model object
//! and exposes it to the optimizer through the `LogLikelihood` trait.
//!
//! Key ideas:
//! - Construction validates the dataset and segments it eagerly; terms and
//!   rules are registered next; `init` then materializes every observed
//!   window, resolves its structural key and caches its support set.
//! - Each window contributes `θ·s_obs − ln Σ_k exp(θ·s_k)`; the gradient is
//!   `Σ_w (s_obs − E_w[s])` and the observed information `Σ_w Cov_w(s)`,
//!   both computed exactly from the enumerated supports. Normalizers and
//!   moments are evaluated once per cached support and per call, then read
//!   by every window sharing that support.
//! - Simulation draws every current row from its enumerated conditional
//!   distribution and chains windows forward with [`Window::shift`], using
//!   a model-owned, explicitly seeded `StdRng`.
//!
//! Capacity: a support has up to `2^n_outcomes` assignments, so time and
//! memory grow exponentially in the number of outcomes. This is a limit of
//! the model class and is not guarded.
use std::fmt;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};
use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::{
    defm::{
        core::{
            census::MotifCensus,
            counters::{Counter, Counters, MotifCell, TermContext},
            data::{CovariateRef, PanelData},
            key::{KeyPolicy, StructuralKey},
            options::{DefmOptions, SimOpts},
            rules::{SupportRule, SupportRules},
            segments::{Segment, Segments},
            support::{SupportCache, SupportSet},
            window::Window,
        },
        errors::{DefmError, DefmResult},
        models::model_internals::{WindowEntry, check_theta, draw_assignment, walk_windows},
    },
    inference::information,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Grad, Information, LogLikelihood, OptimOutcome, Theta, maximize},
    },
};

/// Output of [`DefmModel::simulate`].
///
/// - `y`: `rows × n_outcomes`; each subject's first `order` rows hold the
///   observed baseline or `-1`, depending on [`SimOpts::fill_baseline`].
/// - `stats`: `rows × n_terms` statistic vectors of the drawn windows, aligned
///   like [`DefmModel::stats_matrix`] (`NaN` on baseline rows).
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub y: Array2<i32>,
    pub stats: Array2<f64>,
}

/// Discrete exponential family model over fixed-order binary Markov windows.
///
/// Holds the validated dataset (`'a` ties borrowed buffers to the caller),
/// its segments, the registered counters and rules, the support cache and
/// the per-window records built by [`DefmModel::init`]. After fitting,
/// [`DefmModel::results`] stores the last optimization outcome.
#[derive(Debug, Clone)]
pub struct DefmModel<'a> {
    data: PanelData<'a>,
    segments: Segments,
    options: DefmOptions,
    counters: Counters,
    rules: SupportRules,
    cache: SupportCache,
    windows: Vec<WindowEntry>,
    initialized: bool,
    rng: StdRng,
    /// Fit results (populated after `fit`).
    pub results: Option<OptimOutcome>,
}

impl<'a> DefmModel<'a> {
    /// Construct a model over flat `(ids, Y, X)` buffers.
    ///
    /// # Arguments
    /// - `ids`: subject id per row, grouped contiguously.
    /// - `y`: `rows × n_outcomes` binary outcomes in `options.layout`.
    /// - `x`: `rows × n_covariates` covariates in `options.layout`.
    /// - `options`: Markov order, layout, storage, key policy, seed and
    ///   optimizer options.
    ///
    /// # Errors
    /// - Dataset validation errors from [`PanelData::new`].
    /// - [`DefmError::SegmentTooShort`] for a subject with fewer than
    ///   `order + 1` rows.
    pub fn new(
        ids: &'a [i64], y: &'a [i32], x: &'a [f64], n_outcomes: usize, n_covariates: usize,
        options: DefmOptions,
    ) -> DefmResult<DefmModel<'a>> {
        let data =
            PanelData::new(ids, y, x, n_outcomes, n_covariates, options.layout, options.storage)?;
        let segments = Segments::from_ids(data.ids(), options.order)?;
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(DefmModel {
            data,
            segments,
            options,
            counters: Counters::new(),
            rules: SupportRules::default(),
            cache: SupportCache::new(),
            windows: Vec::new(),
            initialized: false,
            rng,
            results: None,
        })
    }

    // ---- Accessors ----

    pub fn n_rows(&self) -> usize {
        self.data.n_rows()
    }

    pub fn n_outcomes(&self) -> usize {
        self.data.n_outcomes()
    }

    pub fn n_covariates(&self) -> usize {
        self.data.n_covariates()
    }

    /// Number of subjects (segments).
    pub fn n_subjects(&self) -> usize {
        self.segments.len()
    }

    pub fn order(&self) -> usize {
        self.options.order
    }

    /// Number of observed windows, `Σ_i (L_i − order)`.
    pub fn n_windows(&self) -> usize {
        self.segments.total_windows()
    }

    pub fn nterms(&self) -> usize {
        self.counters.len()
    }

    pub fn data(&self) -> &PanelData<'a> {
        &self.data
    }

    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    pub fn options(&self) -> &DefmOptions {
        &self.options
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn rules(&self) -> &SupportRules {
        &self.rules
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of support sets held by the cache.
    pub fn n_supports(&self) -> usize {
        self.cache.len()
    }

    /// Support-cache index of window `w`, once initialized.
    pub fn support_index(&self, w: usize) -> DefmResult<usize> {
        Ok(self.entry(w)?.support)
    }

    pub fn term_names(&self) -> Vec<String> {
        self.counters.names()
    }

    /// Whether each term is a motif / transition term.
    pub fn is_motif(&self) -> Vec<bool> {
        self.counters.iter().map(Counter::is_motif).collect()
    }

    /// Attach outcome and covariate names. Allowed once.
    pub fn set_names(&mut self, y_names: Vec<String>, x_names: Vec<String>) -> DefmResult<()> {
        self.data.set_names(y_names, x_names)
    }

    /// Replace the name and/or description of term `index`; empty strings
    /// keep the current value.
    pub fn set_term_info(&mut self, index: usize, name: &str, description: &str) -> DefmResult<()> {
        let n_terms = self.counters.len();
        let counter =
            self.counters.get_mut(index).ok_or(DefmError::TermIndexOutOfRange { index, n_terms })?;
        counter.set_info(name, description);
        Ok(())
    }

    /// Reseed the simulation generator.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // ---- Term registration ----

    /// Number of ones in the current row, optionally covariate-weighted.
    pub fn add_ones(&mut self, covariate: Option<CovariateRef<'_>>) -> DefmResult<()> {
        let cov = self.resolve_covariate(covariate)?;
        let counter = Counter::ones(cov, &self.term_context());
        self.push_counter(counter)
    }

    /// Fixed effect `x^k` of the current row's covariate (1 without one).
    pub fn add_fixed_effect(
        &mut self, k: f64, covariate: Option<CovariateRef<'_>>,
    ) -> DefmResult<()> {
        let cov = self.resolve_covariate(covariate)?;
        let counter = Counter::fixed_effect(k, cov, &self.term_context());
        self.push_counter(counter)
    }

    /// Motif over explicit window cells.
    pub fn add_motif(
        &mut self, cells: Vec<MotifCell>, covariate: Option<CovariateRef<'_>>,
    ) -> DefmResult<()> {
        let cov = self.resolve_covariate(covariate)?;
        let counter = Counter::motif(cells, cov, &self.term_context())?;
        self.push_counter(counter)
    }

    /// Motif from column-major linear coordinates and pinned values.
    pub fn add_motif_coords(
        &mut self, coords: &[usize], signs: &[bool], covariate: Option<CovariateRef<'_>>,
    ) -> DefmResult<()> {
        let cov = self.resolve_covariate(covariate)?;
        let counter = Counter::motif_from_coords(coords, signs, cov, &self.term_context())?;
        self.push_counter(counter)
    }

    /// Motif from an `(order + 1) × n_outcomes` pattern of `Option<u8>`.
    pub fn add_motif_pattern(
        &mut self, pattern: ArrayView2<'_, Option<u8>>, covariate: Option<CovariateRef<'_>>,
    ) -> DefmResult<()> {
        let cov = self.resolve_covariate(covariate)?;
        let counter = Counter::motif_from_pattern(pattern, cov, &self.term_context())?;
        self.push_counter(counter)
    }

    /// One logit intercept per outcome column in `cols`, or a single overall
    /// intercept when `cols` is empty. Nothing is registered if any column
    /// is out of range.
    pub fn add_logit_intercept(
        &mut self, cols: &[usize], covariate: Option<CovariateRef<'_>>,
    ) -> DefmResult<()> {
        let cov = self.resolve_covariate(covariate)?;
        let ctx = self.term_context();
        let counters = if cols.is_empty() {
            vec![Counter::logit_intercept(None, cov, &ctx)?]
        } else {
            cols.iter()
                .map(|&c| Counter::logit_intercept(Some(c), cov, &ctx))
                .collect::<DefmResult<Vec<_>>>()?
        };
        for counter in counters {
            self.push_counter(counter)?;
        }
        Ok(())
    }

    // ---- Rule registration ----

    /// Forbid 1 → 0 transitions on `cols` (all outcomes when empty).
    pub fn add_rule_not_one_to_zero(&mut self, cols: Vec<usize>) -> DefmResult<()> {
        self.ensure_open()?;
        let cols = if cols.is_empty() { (0..self.n_outcomes()).collect() } else { cols };
        let rule = SupportRule::not_one_to_zero(cols, self.n_outcomes())?;
        self.rules.push(rule);
        Ok(())
    }

    /// Keep term `term` within `[lb, ub]` on every support. The term index
    /// is checked against the registered terms at `init`.
    pub fn add_rule_constrain_support(&mut self, term: usize, lb: f64, ub: f64) -> DefmResult<()> {
        self.ensure_open()?;
        let rule = SupportRule::constrain_support(term, lb, ub)?;
        self.rules.push(rule);
        Ok(())
    }

    // ---- Initialization ----

    /// Materialize every observed window and its support set.
    ///
    /// ## Steps
    /// 1. Require at least one term and valid rule term indices.
    /// 2. For each subject and offset, build the observed window.
    /// 3. Resolve its support: shared by structural key (extended with the
    ///    covariates consumed by terms) or unique per window, following
    ///    `options.key_policy`.
    /// 4. Record the observed assignment's position and its statistics.
    ///
    /// ## Errors
    /// - [`DefmError::AlreadyInitialized`], [`DefmError::NoTerms`],
    ///   [`DefmError::TermIndexOutOfRange`].
    pub fn init(&mut self) -> DefmResult<()> {
        self.ensure_open()?;
        if self.counters.is_empty() {
            return Err(DefmError::NoTerms);
        }
        self.rules.check_terms(self.counters.len())?;

        let order = self.options.order;
        let consumed = self.counters.consumed_covariates();
        self.cache.clear();
        self.windows.clear();
        self.windows.reserve(self.segments.total_windows());

        for (i, segment) in self.segments.iter().enumerate() {
            for p in 0..segment.n_windows(order) {
                let window = Window::observed(&self.data, segment, p, order)?;
                let build = || SupportSet::enumerate(&window, &self.counters, &self.rules);
                let support = match self.options.key_policy {
                    KeyPolicy::Shared => {
                        self.cache.get_or_insert_with(StructuralKey::of(&window, &consumed), build)
                    }
                    KeyPolicy::Unique => self.cache.insert_unique(build()),
                };
                let observed = self.cache[support].position(window.current());
                self.windows.push(WindowEntry {
                    segment: i,
                    offset: p,
                    row: window.row(),
                    support,
                    observed,
                    stats: self.counters.stats(&window),
                });
            }
        }

        self.initialized = true;
        let excluded = self.windows.iter().filter(|e| e.observed.is_none()).count();
        debug!(
            windows = self.windows.len(),
            supports = self.cache.len(),
            terms = self.counters.len(),
            excluded,
            "DEFM initialized"
        );
        Ok(())
    }

    // ---- Likelihood ----

    /// Total likelihood (`as_log = false`) or log-likelihood at `θ`.
    ///
    /// A non-finite log-likelihood is reported as `-inf` (likelihood `0`),
    /// never as `NaN`.
    ///
    /// ## Errors
    /// - [`DefmError::NotInitialized`], [`DefmError::ParamLengthMismatch`].
    pub fn likelihood_total(&self, theta: ArrayView1<'_, f64>, as_log: bool) -> DefmResult<f64> {
        self.ready(theta)?;
        let log_z = self.cache.log_normalizers(theta);
        let mut total = 0.0;
        walk_windows(&self.windows, &log_z, |_, entry, &lz| {
            total += entry.log_contribution(lz, theta);
        });
        if !total.is_finite() {
            total = f64::NEG_INFINITY;
        }
        Ok(if as_log { total } else { total.exp() })
    }

    /// Per-window log-likelihood contributions, in window order.
    pub fn loglik_contributions(&self, theta: ArrayView1<'_, f64>) -> DefmResult<Array1<f64>> {
        self.ready(theta)?;
        let log_z = self.cache.log_normalizers(theta);
        let mut out = Array1::<f64>::zeros(self.windows.len());
        walk_windows(&self.windows, &log_z, |w, entry, &lz| {
            out[w] = entry.log_contribution(lz, theta);
        });
        Ok(out)
    }

    /// `∇ℓ(θ) = Σ_w (s_obs − E_w[s])`.
    pub fn gradient(&self, theta: ArrayView1<'_, f64>) -> DefmResult<Array1<f64>> {
        self.ready(theta)?;
        let moments = self.cache.moments(theta);
        let mut grad = Array1::<f64>::zeros(self.counters.len());
        walk_windows(&self.windows, &moments, |_, entry, (mean, _)| {
            grad += &(&entry.stats - mean);
        });
        Ok(grad)
    }

    /// Observed information `I(θ) = Σ_w Cov_w(s)`.
    pub fn observed_information(&self, theta: ArrayView1<'_, f64>) -> DefmResult<Information> {
        self.ready(theta)?;
        let n_terms = self.counters.len();
        let moments = self.cache.moments(theta);
        let mut info = Array2::<f64>::zeros((n_terms, n_terms));
        walk_windows(&self.windows, &moments, |_, _, (_, cov)| {
            info += cov;
        });
        Ok(info)
    }

    /// `rows × n_terms` matrix of observed statistic vectors, each on the row
    /// its window's current state sits on. The first `order` rows of every
    /// subject are `NaN`.
    pub fn stats_matrix(&self) -> DefmResult<Array2<f64>> {
        if !self.initialized {
            return Err(DefmError::NotInitialized);
        }
        let mut out = Array2::<f64>::from_elem((self.n_rows(), self.counters.len()), f64::NAN);
        for entry in &self.windows {
            out.row_mut(entry.row).assign(&entry.stats);
        }
        Ok(out)
    }

    // ---- Fitting ----

    /// Fit by maximum likelihood (consumes `theta0`) and cache the outcome in
    /// `self.results`.
    ///
    /// ## Errors
    /// - Optimizer errors from [`maximize`], including model errors raised
    ///   by [`LogLikelihood::check`] on `theta0`.
    pub fn fit(&mut self, theta0: Array1<f64>) -> OptResult<()> {
        let outcome = maximize(&*self, theta0, &(), &self.options.mle_opts)?;
        debug!(
            loglik = outcome.value,
            converged = outcome.converged,
            iterations = outcome.iterations,
            "DEFM fit finished"
        );
        self.results = Some(outcome);
        Ok(())
    }

    /// Standard errors at the fitted `θ̂` from the observed information.
    ///
    /// ## Errors
    /// - [`DefmError::ModelNotFitted`] (as `OptError`) before `fit`.
    /// - Information validation errors from `inference::information`.
    pub fn standard_errors(&self) -> OptResult<Array1<f64>> {
        let theta_hat = &self.results.as_ref().ok_or(DefmError::ModelNotFitted)?.theta_hat;
        let info = self.observed_information(theta_hat.view())?;
        information::standard_errors(&info)
    }

    // ---- Simulation ----

    /// Simulate every subject forward from its observed baseline.
    ///
    /// ## Steps
    /// 1. Start each subject from its first observed window.
    /// 2. Draw the current row from the window's support with probability
    ///    proportional to `exp(θ·s)`.
    /// 3. Shift the window (drop the oldest row, keep the drawn one as
    ///    history, attach the next covariate row) and repeat.
    ///
    /// Supports for chained windows whose key was never observed are built
    /// on first encounter and cached like observed ones.
    ///
    /// ## Errors
    /// - [`DefmError::NotInitialized`], [`DefmError::ParamLengthMismatch`].
    /// - [`DefmError::DegenerateSupport`] if a window cannot be sampled.
    pub fn simulate(
        &mut self, theta: ArrayView1<'_, f64>, opts: SimOpts,
    ) -> DefmResult<SimulationResult> {
        self.ready(theta)?;
        let order = self.options.order;
        let consumed = self.counters.consumed_covariates();
        let mut y = Array2::<i32>::from_elem((self.n_rows(), self.n_outcomes()), -1);
        let mut stats = Array2::<f64>::from_elem((self.n_rows(), self.counters.len()), f64::NAN);
        let mut w = 0;

        for segment in self.segments.iter() {
            if opts.fill_baseline && order > 0 {
                let (start, end) = (segment.start, segment.start + order);
                y.slice_mut(s![start..end, ..]).assign(&self.data.y().slice(s![start..end, ..]));
            }
            let mut window = Window::observed(&self.data, segment, 0, order)?;
            for p in 0..segment.n_windows(order) {
                if p > 0 {
                    window = window.shift(&self.data);
                }
                let unique;
                let set = match self.options.key_policy {
                    KeyPolicy::Shared => {
                        let idx = self.cache.get_or_insert_with(
                            StructuralKey::of(&window, &consumed),
                            || SupportSet::enumerate(&window, &self.counters, &self.rules),
                        );
                        &self.cache[idx]
                    }
                    KeyPolicy::Unique => {
                        unique = SupportSet::enumerate(&window, &self.counters, &self.rules);
                        &unique
                    }
                };
                let k = draw_assignment(set, theta, w, &mut self.rng)?;
                window.set_current(set.assignments().row(k));
                y.row_mut(window.row()).assign(&window.current().mapv(i32::from));
                stats.row_mut(window.row()).assign(&set.stats().row(k));
                w += 1;
            }
        }

        debug!(windows = w, supports = self.cache.len(), "DEFM simulation finished");
        Ok(SimulationResult { y, stats })
    }

    /// Conditional log-odds of cell `(i, j)` being 1 in every observed
    /// window: `θ·(s[cell = 1] − s[cell = 0])`. One value per dataset row;
    /// baseline rows are `NaN`.
    ///
    /// ## Errors
    /// - [`DefmError::CellOutOfRange`] if `i > order` or `j >= n_outcomes`.
    /// - [`DefmError::NotInitialized`], [`DefmError::ParamLengthMismatch`].
    pub fn logodds(&self, theta: ArrayView1<'_, f64>, i: usize, j: usize) -> DefmResult<Array1<f64>> {
        self.ready(theta)?;
        let n_rows = self.options.order + 1;
        if i >= n_rows || j >= self.n_outcomes() {
            return Err(DefmError::CellOutOfRange { row: i, col: j, n_rows, n_cols: self.n_outcomes() });
        }
        let mut out = Array1::<f64>::from_elem(self.n_rows(), f64::NAN);
        for (w, entry) in self.windows.iter().enumerate() {
            let mut window = self.observed_window(w, entry)?;
            window.set_cell(i, j, 1);
            let on = self.counters.stats(&window);
            window.set_cell(i, j, 0);
            let off = self.counters.stats(&window);
            out[entry.row] = (on - off).dot(&theta);
        }
        Ok(out)
    }

    /// Frequency table of observed window patterns projected on `cols`
    /// (all outcomes when empty). Does not require `init`.
    ///
    /// ## Errors
    /// - [`DefmError::OutcomeIndexOutOfRange`] for a column beyond the data.
    pub fn census(&self, cols: &[usize]) -> DefmResult<MotifCensus> {
        let n_outcomes = self.n_outcomes();
        if let Some(&index) = cols.iter().find(|&&c| c >= n_outcomes) {
            return Err(DefmError::OutcomeIndexOutOfRange { index, n_outcomes });
        }
        let cols: Vec<usize> = if cols.is_empty() { (0..n_outcomes).collect() } else { cols.to_vec() };
        let order = self.options.order;
        let mut census = MotifCensus::new(&cols, order + 1, self.data.y_names());
        for segment in self.segments.iter() {
            let windows = (0..segment.n_windows(order))
                .map(|p| Window::observed(&self.data, segment, p, order))
                .collect::<DefmResult<Vec<_>>>()?;
            census.tabulate(&cols, &windows);
        }
        Ok(census)
    }

    /// Human-readable support set of window `w`: history, then every
    /// admissible current row with its statistics. The observed row is
    /// marked with `*`.
    pub fn support_table(&self, w: usize) -> DefmResult<String> {
        let entry = self.entry(w)?;
        let window = self.observed_window(w, entry)?;
        let set = &self.cache[entry.support];
        let mut out = format!(
            "Support of window {w} (row {}, {} assignments)\nHistory:\n",
            entry.row,
            set.len()
        );
        for row in window.history().rows() {
            out.push_str(&format!("  {}\n", join(row.iter())));
        }
        out.push_str(&format!("Current | {}\n", self.term_names().join(" | ")));
        for (k, (assignment, stats)) in
            set.assignments().rows().into_iter().zip(set.stats().rows()).enumerate()
        {
            let mark = if entry.observed == Some(k) { "*" } else { " " };
            out.push_str(&format!("{mark} {} | {}\n", join(assignment.iter()), join(stats.iter())));
        }
        Ok(out)
    }

    // ---- Helper methods ----

    fn ensure_open(&self) -> DefmResult<()> {
        if self.initialized {
            return Err(DefmError::AlreadyInitialized);
        }
        Ok(())
    }

    fn push_counter(&mut self, counter: Counter) -> DefmResult<()> {
        self.ensure_open()?;
        self.counters.push(counter);
        Ok(())
    }

    fn ready(&self, theta: ArrayView1<'_, f64>) -> DefmResult<()> {
        if !self.initialized {
            return Err(DefmError::NotInitialized);
        }
        check_theta(theta, self.counters.len())
    }

    fn term_context(&self) -> TermContext<'_> {
        TermContext {
            n_rows: self.options.order + 1,
            n_cols: self.n_outcomes(),
            y_names: self.data.y_names(),
            x_names: self.data.x_names(),
        }
    }

    fn resolve_covariate(&self, covariate: Option<CovariateRef<'_>>) -> DefmResult<Option<usize>> {
        covariate.map(|c| self.data.covariate_index(c)).transpose()
    }

    fn entry(&self, w: usize) -> DefmResult<&WindowEntry> {
        if !self.initialized {
            return Err(DefmError::NotInitialized);
        }
        self.windows
            .get(w)
            .ok_or(DefmError::WindowIndexOutOfRange { index: w, n_windows: self.windows.len() })
    }

    fn observed_window(&self, w: usize, entry: &WindowEntry) -> DefmResult<Window<'_>> {
        let segment: &Segment = self
            .segments
            .get(entry.segment)
            .ok_or(DefmError::WindowIndexOutOfRange { index: w, n_windows: self.windows.len() })?;
        Window::observed(&self.data, segment, entry.offset, self.options.order)
    }
}

fn join<T: fmt::Display>(values: impl Iterator<Item = T>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
}

impl fmt::Display for DefmModel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Discrete exponential family model")?;
        writeln!(f, "Num. of obs.       : {}", self.n_rows())?;
        writeln!(f, "Num. of subjects   : {}", self.n_subjects())?;
        writeln!(f, "Markov order       : {}", self.order())?;
        writeln!(f, "Num. of outcomes   : {}", self.n_outcomes())?;
        writeln!(f, "Num. of covariates : {}", self.n_covariates())?;
        writeln!(f, "Num. of windows    : {}", self.n_windows())?;
        if self.initialized {
            writeln!(f, "Num. of supports   : {}", self.cache.len())?;
        } else {
            writeln!(f, "Not initialized")?;
        }
        write!(f, "{}", self.counters)?;
        if !self.rules.is_empty() {
            writeln!(f, "Num. of support rules: {}", self.rules.len())?;
        }
        Ok(())
    }
}

impl LogLikelihood for DefmModel<'_> {
    type Data = ();

    /// Log-likelihood `ℓ(θ)`; `-inf` when an observation lies outside its
    /// support or the sum is otherwise non-finite.
    fn value(&self, theta: &Theta, _data: &Self::Data) -> OptResult<f64> {
        Ok(self.likelihood_total(theta.view(), true)?)
    }

    /// Validate `θ`: the model is initialized, `θ.len() == nterms()` and
    /// every entry is finite.
    fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        self.ready(theta.view())?;
        if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::InvalidThetaInput { index, value });
        }
        Ok(())
    }

    /// Analytic gradient `Σ_w (s_obs − E_w[s])`.
    fn grad(&self, theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Ok(self.gradient(theta.view())?)
    }
}
