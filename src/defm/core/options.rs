//! Model configuration.
//!
//! [`DefmOptions`] collects everything fixed at model construction: Markov
//! order, buffer layout, copy-vs-borrow storage, support sharing policy, the
//! RNG seed and the optimizer options used by `fit`. [`SimOpts`] controls how
//! simulation output is shaped.
use crate::{
    defm::core::{
        data::{Layout, Storage},
        key::KeyPolicy,
    },
    optimization::loglik_optimizer::MLEOptions,
};

/// DefmOptions — construction-time configuration of a `DefmModel`.
///
/// Fields
/// ------
/// - `order`: Markov order `m`; windows have `m + 1` rows.
/// - `layout`: layout of the flat `Y` / `X` buffers (default column-major).
/// - `storage`: copy the buffers or borrow them (default copy).
/// - `key_policy`: share support sets by structural key (default) or build
///   one per window.
/// - `seed`: RNG seed; `None` seeds from OS entropy.
/// - `mle_opts`: optimizer options used by `fit`.
#[derive(Debug, Clone, PartialEq)]
pub struct DefmOptions {
    pub order: usize,
    pub layout: Layout,
    pub storage: Storage,
    pub key_policy: KeyPolicy,
    pub seed: Option<u64>,
    pub mle_opts: MLEOptions,
}

impl DefmOptions {
    pub fn new(order: usize) -> Self {
        DefmOptions {
            order,
            layout: Layout::default(),
            storage: Storage::default(),
            key_policy: KeyPolicy::default(),
            seed: None,
            mle_opts: MLEOptions::default(),
        }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_mle_opts(mut self, mle_opts: MLEOptions) -> Self {
        self.mle_opts = mle_opts;
        self
    }
}

/// Shape of simulation output.
///
/// - `fill_baseline`: copy each subject's first `order` observed rows into
///   the simulated outcome matrix; otherwise they are `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimOpts {
    pub fill_baseline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_setters_override_defaults() {
        let opts = DefmOptions::new(2)
            .with_layout(Layout::RowMajor)
            .with_storage(Storage::Borrow)
            .with_key_policy(KeyPolicy::Unique)
            .with_seed(42);

        assert_eq!(opts.order, 2);
        assert_eq!(opts.layout, Layout::RowMajor);
        assert_eq!(opts.storage, Storage::Borrow);
        assert_eq!(opts.key_policy, KeyPolicy::Unique);
        assert_eq!(opts.seed, Some(42));
        assert_eq!(DefmOptions::new(1).layout, Layout::ColumnMajor);
    }
}
