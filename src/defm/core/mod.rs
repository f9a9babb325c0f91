//! defm::core — the windowed array engine.
//!
//! Purpose
//! -------
//! Hold every building block a DEFM is assembled from, leaves first:
//! validated panel data, per-subject segments, Markov windows, structural
//! keys, counters (sufficient statistics), support rules, enumerated support
//! sets with their cache, configuration, and the motif census.
//!
//! Key behaviors
//! -------------
//! - [`data`]: `(id, Y, X)` with an explicit copy/borrow choice and a layout
//!   resolved once into `ndarray` strides.
//! - [`segments`]: contiguous per-subject row ranges, validated eagerly.
//! - [`window`]: `(order + 1) × n_outcomes` windows, observed or chained.
//! - [`key`]: exact-equality structural keys for support sharing.
//! - [`counters`] / [`rules`]: statistics and admissibility predicates.
//! - [`support`]: enumeration, normalizers, moments and the key cache.
//! - [`census`]: parameter-free tabulation of observed patterns.
//! - [`options`]: construction-time configuration.
//!
//! Invariants & assumptions
//! ------------------------
//! - Single-threaded: the support cache is mutated without locking, only
//!   through `&mut` access from the owning model.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its local contract; the model
//!   and integration tests exercise the composition.

pub mod census;
pub mod counters;
pub mod data;
pub mod key;
pub mod options;
pub mod rules;
pub mod segments;
pub mod support;
pub mod window;
