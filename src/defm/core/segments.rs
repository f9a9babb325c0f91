//! Segmenter — contiguous per-subject row ranges.
//!
//! A segment is the inclusive row range `[start, end]` shared by one subject
//! id. The dataset is scanned once; a segment closes whenever the id changes
//! and at the end of the data. Every segment must be able to host at least
//! one window of `order + 1` rows, otherwise segmentation fails immediately
//! with [`DefmError::SegmentTooShort`]. Ids are never sorted: a subject that
//! reappears later in the data opens a new segment.
use ndarray::ArrayView1;

use crate::defm::errors::{DefmError, DefmResult};

/// Inclusive row range for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub id: i64,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    /// Rows in the segment; always at least `order + 1` once validated.
    pub fn n_rows(&self) -> usize {
        self.end - self.start + 1
    }

    /// Number of windows of `order + 1` rows that fit in this segment.
    pub fn n_windows(&self, order: usize) -> usize {
        self.n_rows().saturating_sub(order)
    }
}

/// Ordered list of segments covering every row of the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    segments: Vec<Segment>,
    order: usize,
}

impl Segments {
    /// Scan `ids` once and split it into per-subject segments.
    ///
    /// Errors
    /// ------
    /// - `DefmError::EmptyDataset` when `ids` is empty.
    /// - `DefmError::SegmentTooShort` for the first segment with fewer than
    ///   `order + 1` rows.
    pub fn from_ids(ids: ArrayView1<'_, i64>, order: usize) -> DefmResult<Segments> {
        if ids.is_empty() {
            return Err(DefmError::EmptyDataset);
        }
        let mut segments = Vec::new();
        let mut start = 0;
        for row in 1..=ids.len() {
            if row < ids.len() && ids[row] == ids[start] {
                continue;
            }
            let segment = Segment { id: ids[start], start, end: row - 1 };
            if segment.n_rows() < order + 1 {
                return Err(DefmError::SegmentTooShort {
                    id: segment.id,
                    row: segment.end,
                    rows: segment.n_rows(),
                    needed: order + 1,
                });
            }
            segments.push(segment);
            start = row;
        }
        Ok(Segments { segments, order })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Flat boundary list `[start_0, end_0, start_1, end_1, ...]`.
    pub fn boundaries(&self) -> Vec<usize> {
        self.segments.iter().flat_map(|s| [s.start, s.end]).collect()
    }

    /// Total number of windows over all segments.
    pub fn total_windows(&self) -> usize {
        self.segments.iter().map(|s| s.n_windows(self.order)).sum()
    }
}
