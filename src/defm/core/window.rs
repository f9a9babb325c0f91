//! Window — an `(order + 1) × n_outcomes` binary slice of one subject.
//!
//! Purpose
//! -------
//! Represent the unit every DEFM computation is defined on: `order` history
//! rows followed by one "current" row, together with the covariate row the
//! window is aligned to. Windows are built from the observed data or chained
//! from a previously sampled window during simulation.
//!
//! Key behaviors
//! -------------
//! - [`Window::observed`] copies outcome cells `start + p ..= start + p + order`
//!   of a segment and attaches the covariate row of the current (last) row.
//! - [`Window::with_current`] replaces the last row, which is how support
//!   enumeration and log-odds build candidate windows.
//! - [`Window::shift`] drops the oldest row, moves every row up by one and
//!   leaves a zeroed current row aligned to the next covariate row.
//!
//! Invariants & assumptions
//! ------------------------
//! - `cells` always has `order + 1` rows and `n_outcomes` columns with values
//!   in {0, 1}.
//! - `covariates` is the dataset row with index `row()`; the current row of
//!   the window is data row `row()`.
//!
//! Conventions
//! -----------
//! - Cell `(r, c)` is history row `r` (0 = oldest) and outcome column `c`.
//! - Linearized coordinates, where used, are column-major: `r + c * n_rows`.
use ndarray::{Array2, ArrayView1, ArrayView2, s};

use crate::defm::{
    core::{data::PanelData, segments::Segment},
    errors::{DefmError, DefmResult},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Window<'d> {
    cells: Array2<u8>,
    covariates: ArrayView1<'d, f64>,
    row: usize,
}

impl<'d> Window<'d> {
    /// Window `p` (0-based) of `segment` for a model of the given `order`.
    ///
    /// Errors
    /// ------
    /// - `DefmError::WindowIndexOutOfRange` if `p` does not fit in the segment.
    pub fn observed(
        data: &'d PanelData<'_>, segment: &Segment, p: usize, order: usize,
    ) -> DefmResult<Window<'d>> {
        let n_windows = segment.n_windows(order);
        if p >= n_windows {
            return Err(DefmError::WindowIndexOutOfRange { index: p, n_windows });
        }
        let first = segment.start + p;
        let last = first + order;
        let cells = data.y().slice(s![first..=last, ..]).mapv(|v| v as u8);
        Ok(Window { cells, covariates: data.x_row(last), row: last })
    }

    /// Build a window from explicit cells. Used by tests and by callers that
    /// assemble synthetic histories.
    pub fn from_parts(cells: Array2<u8>, covariates: ArrayView1<'d, f64>, row: usize) -> Self {
        Window { cells, covariates, row }
    }

    pub fn n_rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Data row the current (last) window row is aligned to.
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.cells[[row, col]]
    }

    pub fn cells(&self) -> ArrayView2<'_, u8> {
        self.cells.view()
    }

    /// Every row except the last.
    pub fn history(&self) -> ArrayView2<'_, u8> {
        self.cells.slice(s![..self.n_rows() - 1, ..])
    }

    pub fn current(&self) -> ArrayView1<'_, u8> {
        self.cells.row(self.n_rows() - 1)
    }

    pub fn covariates(&self) -> ArrayView1<'d, f64> {
        self.covariates
    }

    pub fn covariate(&self, index: usize) -> f64 {
        self.covariates[index]
    }

    /// Number of ones in the current row.
    pub fn current_ones(&self) -> usize {
        self.current().iter().filter(|&&v| v == 1).count()
    }

    /// Replace the current row in place.
    pub fn set_current(&mut self, assignment: ArrayView1<'_, u8>) {
        let last = self.n_rows() - 1;
        self.cells.row_mut(last).assign(&assignment);
    }

    /// Copy of this window with the current row replaced.
    pub fn with_current(&self, assignment: ArrayView1<'_, u8>) -> Window<'d> {
        let mut next = self.clone();
        next.set_current(assignment);
        next
    }

    /// Set a single cell in place.
    pub fn set_cell(&mut self, row: usize, col: usize, value: u8) {
        self.cells[[row, col]] = value;
    }

    /// Slide one row forward: history loses its oldest row, the previous
    /// current row becomes history, and the new current row starts zeroed.
    ///
    /// Panics
    /// ------
    /// - If `row() + 1` is not a valid row of `data`.
    pub fn shift(&self, data: &'d PanelData<'_>) -> Window<'d> {
        let n_rows = self.n_rows();
        let mut cells = Array2::<u8>::zeros(self.cells.raw_dim());
        if n_rows > 1 {
            cells.slice_mut(s![..n_rows - 1, ..]).assign(&self.cells.slice(s![1.., ..]));
        }
        let row = self.row + 1;
        Window { cells, covariates: data.x_row(row), row }
    }

    /// Row-major copy of the history cells.
    pub fn history_cells(&self) -> impl Iterator<Item = u8> + '_ {
        self.history().into_iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defm::core::data::{Layout, Storage};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Extraction of observed windows and their covariate alignment.
    // - Replacement of the current row.
    // - Shifting a window forward during simulation.
    // -------------------------------------------------------------------------

    fn fixture() -> (Vec<i64>, Vec<i32>, Vec<f64>) {
        // one subject, 4 rows, 2 outcomes, 1 covariate (row-major Y)
        let ids = vec![1, 1, 1, 1];
        let y = vec![0, 1, 1, 1, 1, 0, 0, 0];
        let x = vec![10.0, 11.0, 12.0, 13.0];
        (ids, y, x)
    }

    #[test]
    // Purpose
    // -------
    // Verify that window `p` covers rows `p..=p+order` and uses the covariate
    // row of its last row.
    //
    // Given
    // -----
    // - Y rows: [0,1], [1,1], [1,0], [0,0]; X = [10, 11, 12, 13]; order = 1.
    //
    // Expect
    // ------
    // - Window 1 cells = [[1,1],[1,0]], covariate 12, row 2.
    fn observed_window_aligns_to_last_row() {
        // Arrange
        let (ids, y, x) = fixture();
        let data =
            PanelData::new(&ids, &y, &x, 2, 1, Layout::RowMajor, Storage::Borrow).unwrap();
        let segment = Segment { id: 1, start: 0, end: 3 };

        // Act
        let window = Window::observed(&data, &segment, 1, 1).unwrap();

        // Assert
        assert_eq!(window.cells(), array![[1_u8, 1], [1, 0]]);
        assert_eq!(window.covariate(0), 12.0);
        assert_eq!(window.row(), 2);
        assert_eq!(window.current_ones(), 1);
        assert!(Window::observed(&data, &segment, 3, 1).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Check that shifting keeps the last `order` rows as history and moves
    // the covariate row forward.
    fn shift_moves_current_into_history() {
        let (ids, y, x) = fixture();
        let data =
            PanelData::new(&ids, &y, &x, 2, 1, Layout::RowMajor, Storage::Borrow).unwrap();
        let segment = Segment { id: 1, start: 0, end: 3 };
        let window = Window::observed(&data, &segment, 0, 1).unwrap();

        let drawn = window.with_current(array![0_u8, 1].view());
        let next = drawn.shift(&data);

        assert_eq!(next.cells(), array![[0_u8, 1], [0, 0]]);
        assert_eq!(next.row(), 2);
        assert_eq!(next.covariate(0), 12.0);
    }
}
