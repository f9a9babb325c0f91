//! Panel data — validated (id, Y, X) triple with explicit ownership and layout.
//!
//! Purpose
//! -------
//! Hold the longitudinal dataset a DEFM is fitted to: one subject id per row,
//! a binary outcome matrix `Y` (`rows × n_outcomes`) and a real covariate
//! matrix `X` (`rows × n_covariates`). The caller decides once whether the
//! buffers are copied into the model or borrowed from the caller, and whether
//! the flat buffers are row-major or column-major.
//!
//! Key behaviors
//! -------------
//! - Resolve the memory layout once at construction by building `ndarray`
//!   views with the matching strides; every later read is a plain
//!   `y[[row, col]]` with no layout branching.
//! - Keep the ownership decision explicit through [`Storage`]: `Copy` owns
//!   its buffers, `Borrow` keeps views whose lifetime `'a` is the caller's
//!   obligation.
//! - Validate that row counts agree, outcomes are 0/1 and covariates are
//!   finite before any downstream sizing happens.
//! - Carry outcome / covariate names (defaults `y0..`, `X0..`) that can be
//!   replaced exactly once.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ids.len() == rows >= 1`, `y.len() == rows * n_outcomes`,
//!   `x.len() == rows * n_covariates`.
//! - Rows are grouped contiguously by id; grouping itself is checked by the
//!   segmenter, not here.
//! - The dataset is immutable after construction except for names.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; `y()` and `x()` are always indexed `[[row, col]]`
//!   regardless of the source [`Layout`].
use ndarray::{ArrayView1, ArrayView2, Axis, CowArray, Ix1, Ix2, ShapeBuilder};

use crate::defm::errors::{DefmError, DefmResult};

/// Whether the dataset buffers are copied into the model or borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Storage {
    /// Copy the caller's buffers; the model owns its data.
    #[default]
    Copy,
    /// Keep views into the caller's buffers for the model's lifetime.
    Borrow,
}

/// Memory layout of the flat `Y` and `X` buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Element `(r, c)` lives at `c + r * n_cols`.
    RowMajor,
    /// Element `(r, c)` lives at `r + c * n_rows`.
    #[default]
    ColumnMajor,
}

impl Layout {
    pub fn is_column_major(self) -> bool {
        matches!(self, Layout::ColumnMajor)
    }
}

/// Reference to a covariate column, by position or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CovariateRef<'n> {
    Index(usize),
    Name(&'n str),
}

impl From<usize> for CovariateRef<'_> {
    fn from(index: usize) -> Self {
        CovariateRef::Index(index)
    }
}

impl<'n> From<&'n str> for CovariateRef<'n> {
    fn from(name: &'n str) -> Self {
        CovariateRef::Name(name)
    }
}

/// PanelData — validated longitudinal dataset.
///
/// Fields
/// ------
/// - `ids`: subject id per row.
/// - `y`: binary outcomes, `rows × n_outcomes`.
/// - `x`: covariates, `rows × n_covariates`.
/// - `storage` / `layout`: the construction-time choices.
/// - `y_names` / `x_names`: column labels; `names_locked` once replaced.
#[derive(Debug, Clone)]
pub struct PanelData<'a> {
    ids: CowArray<'a, i64, Ix1>,
    y: CowArray<'a, i32, Ix2>,
    x: CowArray<'a, f64, Ix2>,
    storage: Storage,
    layout: Layout,
    y_names: Vec<String>,
    x_names: Vec<String>,
    names_locked: bool,
}

impl<'a> PanelData<'a> {
    /// Build a dataset over flat caller buffers.
    ///
    /// Parameters
    /// ----------
    /// - `ids`: subject id per row; its length defines `rows`.
    /// - `y`: outcome buffer of length `rows * n_outcomes`, values in {0, 1}.
    /// - `x`: covariate buffer of length `rows * n_covariates`, finite values.
    /// - `n_outcomes`, `n_covariates`: column counts.
    /// - `layout`: how `y` and `x` are laid out.
    /// - `storage`: copy into the model or borrow for `'a`.
    ///
    /// Errors
    /// ------
    /// - `DefmError::EmptyDataset` when `ids` is empty.
    /// - `DefmError::LengthMismatch` when a buffer length disagrees.
    /// - `DefmError::NonBinaryOutcome` / `DefmError::NonFiniteCovariate`
    ///   for the first offending cell.
    pub fn new(
        ids: &'a [i64], y: &'a [i32], x: &'a [f64], n_outcomes: usize, n_covariates: usize,
        layout: Layout, storage: Storage,
    ) -> DefmResult<PanelData<'a>> {
        let rows = ids.len();
        if rows == 0 {
            return Err(DefmError::EmptyDataset);
        }
        check_len("Y", rows * n_outcomes, y.len())?;
        check_len("X", rows * n_covariates, x.len())?;

        let f_order = layout.is_column_major();
        let ids_view = ArrayView1::from(ids);
        let y_view = ArrayView2::from_shape((rows, n_outcomes).set_f(f_order), y).map_err(|_| {
            DefmError::LengthMismatch { what: "Y", expected: rows * n_outcomes, actual: y.len() }
        })?;
        let x_view =
            ArrayView2::from_shape((rows, n_covariates).set_f(f_order), x).map_err(|_| {
                DefmError::LengthMismatch {
                    what: "X",
                    expected: rows * n_covariates,
                    actual: x.len(),
                }
            })?;

        for ((row, col), &value) in y_view.indexed_iter() {
            if value != 0 && value != 1 {
                return Err(DefmError::NonBinaryOutcome { row, col, value });
            }
        }
        for ((row, col), &value) in x_view.indexed_iter() {
            if !value.is_finite() {
                return Err(DefmError::NonFiniteCovariate { row, col, value });
            }
        }

        let (ids, y, x) = match storage {
            Storage::Copy => (
                CowArray::from(ids_view.to_owned()),
                CowArray::from(y_view.to_owned()),
                CowArray::from(x_view.to_owned()),
            ),
            Storage::Borrow => {
                (CowArray::from(ids_view), CowArray::from(y_view), CowArray::from(x_view))
            }
        };

        Ok(PanelData {
            ids,
            y,
            x,
            storage,
            layout,
            y_names: (0..n_outcomes).map(|j| format!("y{j}")).collect(),
            x_names: (0..n_covariates).map(|j| format!("X{j}")).collect(),
            names_locked: false,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.ids.len()
    }

    pub fn n_outcomes(&self) -> usize {
        self.y.ncols()
    }

    pub fn n_covariates(&self) -> usize {
        self.x.ncols()
    }

    pub fn ids(&self) -> ArrayView1<'_, i64> {
        self.ids.view()
    }

    pub fn y(&self) -> ArrayView2<'_, i32> {
        self.y.view()
    }

    pub fn x(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    /// Covariate row `row` as a view tied to this dataset's borrow.
    pub fn x_row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.x.view().index_axis_move(Axis(0), row)
    }

    pub fn storage(&self) -> Storage {
        self.storage
    }

    /// `true` when the dataset views caller-owned buffers.
    pub fn is_borrowed(&self) -> bool {
        self.y.is_view()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn y_names(&self) -> &[String] {
        &self.y_names
    }

    pub fn x_names(&self) -> &[String] {
        &self.x_names
    }

    /// Replace outcome and covariate names. Allowed once.
    ///
    /// Errors
    /// ------
    /// - `DefmError::NamesAlreadySet` on a second call.
    /// - `DefmError::NameCountMismatch` if either vector has the wrong length.
    pub fn set_names(&mut self, y_names: Vec<String>, x_names: Vec<String>) -> DefmResult<()> {
        if self.names_locked {
            return Err(DefmError::NamesAlreadySet);
        }
        if y_names.len() != self.n_outcomes() {
            return Err(DefmError::NameCountMismatch {
                what: "Y",
                expected: self.n_outcomes(),
                actual: y_names.len(),
            });
        }
        if x_names.len() != self.n_covariates() {
            return Err(DefmError::NameCountMismatch {
                what: "X",
                expected: self.n_covariates(),
                actual: x_names.len(),
            });
        }
        self.y_names = y_names;
        self.x_names = x_names;
        self.names_locked = true;
        Ok(())
    }

    /// Resolve a covariate reference into a column index.
    pub fn covariate_index(&self, covariate: CovariateRef<'_>) -> DefmResult<usize> {
        match covariate {
            CovariateRef::Index(index) if index < self.n_covariates() => Ok(index),
            CovariateRef::Index(index) => Err(DefmError::CovariateIndexOutOfRange {
                index,
                n_covariates: self.n_covariates(),
            }),
            CovariateRef::Name(name) => self
                .x_names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| DefmError::UnknownCovariate { name: name.to_string() }),
        }
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> DefmResult<()> {
    if expected != actual {
        return Err(DefmError::LengthMismatch { what, expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Layout resolution (row-major vs column-major) for `y()` / `x()`.
    // - Copy vs borrow storage.
    // - Validation of lengths, binary outcomes, finite covariates, names.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the same logical matrix is read identically from a
    // row-major and a column-major buffer.
    //
    // Given
    // -----
    // - 3 rows × 2 outcomes: [[0, 1], [1, 1], [1, 0]].
    //
    // Expect
    // ------
    // - `y()[[r, c]]` agrees for both layouts.
    fn layouts_resolve_to_same_logical_matrix() {
        // Arrange
        let ids = [1_i64, 1, 1];
        let y_row = [0, 1, 1, 1, 1, 0];
        let y_col = [0, 1, 1, 1, 1, 0];
        let x: [f64; 0] = [];

        // Act
        let row_major =
            PanelData::new(&ids, &y_row, &x, 2, 0, Layout::RowMajor, Storage::Copy).unwrap();
        let col_major =
            PanelData::new(&ids, &y_col, &x, 2, 0, Layout::ColumnMajor, Storage::Copy).unwrap();

        // Assert
        let expected = [[0, 1], [1, 1], [1, 0]];
        for r in 0..3 {
            for c in 0..2 {
                assert_eq!(row_major.y()[[r, c]], expected[r][c]);
            }
        }
        // column-major buffer [0,1,1 | 1,1,0] means col0 = (0,1,1), col1 = (1,1,0)
        assert_eq!(col_major.y().column(0).to_vec(), vec![0, 1, 1]);
        assert_eq!(col_major.y().column(1).to_vec(), vec![1, 1, 0]);
    }

    #[test]
    // Purpose
    // -------
    // Check that `Storage::Borrow` keeps views and `Storage::Copy` owns data.
    fn storage_flag_controls_ownership() {
        let ids = [1_i64, 1];
        let y = [0, 1];
        let x = [0.5, 1.5];

        let borrowed =
            PanelData::new(&ids, &y, &x, 1, 1, Layout::ColumnMajor, Storage::Borrow).unwrap();
        let copied =
            PanelData::new(&ids, &y, &x, 1, 1, Layout::ColumnMajor, Storage::Copy).unwrap();

        assert!(borrowed.is_borrowed());
        assert!(!copied.is_borrowed());
        assert_eq!(copied.x_row(1)[0], 1.5);
    }

    #[test]
    // Purpose
    // -------
    // Ensure invalid outcome values and buffer lengths are rejected.
    //
    // Given
    // -----
    // - An outcome buffer containing a 2.
    // - A covariate buffer one element short.
    //
    // Expect
    // ------
    // - `NonBinaryOutcome` and `LengthMismatch` respectively.
    fn invalid_inputs_are_rejected() {
        let ids = [1_i64, 1];
        let x = [0.0, 0.0];

        let err =
            PanelData::new(&ids, &[0, 2], &x, 1, 1, Layout::ColumnMajor, Storage::Copy).unwrap_err();
        assert_eq!(err, DefmError::NonBinaryOutcome { row: 1, col: 0, value: 2 });

        let err = PanelData::new(&ids, &[0, 1], &x[..1], 1, 1, Layout::ColumnMajor, Storage::Copy)
            .unwrap_err();
        assert_eq!(err, DefmError::LengthMismatch { what: "X", expected: 2, actual: 1 });

        let err = PanelData::new(&[], &[], &[], 1, 1, Layout::ColumnMajor, Storage::Copy)
            .unwrap_err();
        assert_eq!(err, DefmError::EmptyDataset);
    }

    #[test]
    // Purpose
    // -------
    // Verify default names, a single successful rename, and name lookup.
    fn names_are_settable_once_and_resolve_covariates() {
        let ids = [1_i64, 1];
        let y = [0, 1];
        let x = [0.0, 1.0, 2.0, 3.0];
        let mut data =
            PanelData::new(&ids, &y, &x, 1, 2, Layout::ColumnMajor, Storage::Copy).unwrap();
        assert_eq!(data.x_names(), &["X0".to_string(), "X1".to_string()]);

        let err = data.set_names(vec!["smoke".into()], vec!["age".into()]).unwrap_err();
        assert_eq!(err, DefmError::NameCountMismatch { what: "X", expected: 2, actual: 1 });

        data.set_names(vec!["smoke".into()], vec!["age".into(), "female".into()]).unwrap();
        assert_eq!(data.covariate_index(CovariateRef::Name("female")).unwrap(), 1);
        assert_eq!(
            data.covariate_index(CovariateRef::Name("height")).unwrap_err(),
            DefmError::UnknownCovariate { name: "height".into() }
        );
        assert_eq!(
            data.set_names(vec!["a".into()], vec!["b".into(), "c".into()]).unwrap_err(),
            DefmError::NamesAlreadySet
        );
    }
}
