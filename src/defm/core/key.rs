//! Structural keys for support sharing.
//!
//! Two windows may share one enumerated support set when everything that
//! determines their sufficient statistics, except the free current row,
//! agrees. The default key is `[n_rows, n_cols, history cells...]` with the
//! history read row-major. When a term consumes covariates, the bit patterns
//! of those covariate values are appended as well, since two windows with the
//! same history but different covariates have different statistics.
use crate::defm::core::window::Window;

/// Opaque, hashable description of a window's structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuralKey(Vec<u64>);

impl StructuralKey {
    /// Key for `window`, extended with the covariates in `consumed`.
    pub fn of(window: &Window<'_>, consumed: &[usize]) -> Self {
        let mut key = Vec::with_capacity(2 + window.history().len() + consumed.len());
        key.push(window.n_rows() as u64);
        key.push(window.n_cols() as u64);
        key.extend(window.history_cells().map(u64::from));
        key.extend(consumed.iter().map(|&c| window.covariate(c).to_bits()));
        StructuralKey(key)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }
}

/// How windows are mapped onto support sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Windows with equal [`StructuralKey`]s share one support set.
    #[default]
    Shared,
    /// Every window gets its own support set.
    Unique,
}
