//! Motif census — frequency table of observed window patterns.
//!
//! Every observed window is projected onto a set of outcome columns across
//! all `order + 1` rows; the resulting 0/1 tuple is tabulated by exact match.
//! Tuples are ordered row by row (oldest row first, then the requested
//! columns in the given order), and the table keeps them in first-seen order. The census does not depend on parameters.
use std::fmt;

use rustc_hash::FxHashMap;

use crate::defm::core::window::Window;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotifCensus {
    labels: Vec<String>,
    patterns: Vec<Vec<u8>>,
    counts: Vec<usize>,
}

impl MotifCensus {
    /// Empty census for `cols`; labels read `<y_name>_<row>`.
    pub fn new(cols: &[usize], n_rows: usize, y_names: &[String]) -> Self {
        let labels = (0..n_rows)
            .flat_map(|r| cols.iter().map(move |&c| format!("{}_{r}", y_names[c])))
            .collect();
        MotifCensus { labels, patterns: Vec::new(), counts: Vec::new() }
    }

    /// Tabulate a stream of windows projected onto `cols`.
    pub fn tabulate<'w, 'd: 'w, I>(&mut self, cols: &[usize], windows: I)
    where
        I: IntoIterator<Item = &'w Window<'d>>,
    {
        let mut seen: FxHashMap<Vec<u8>, usize> =
            self.patterns.iter().cloned().enumerate().map(|(i, p)| (p, i)).collect();
        for window in windows {
            let pattern: Vec<u8> = (0..window.n_rows())
                .flat_map(|r| cols.iter().map(move |&c| window.cell(r, c)))
                .collect();
            match seen.get(&pattern) {
                Some(&i) => self.counts[i] += 1,
                None => {
                    seen.insert(pattern.clone(), self.patterns.len());
                    self.patterns.push(pattern);
                    self.counts.push(1);
                }
            }
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// `(pattern, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], usize)> + '_ {
        self.patterns.iter().map(Vec::as_slice).zip(self.counts.iter().copied())
    }

    /// Count of `pattern`, 0 if never observed.
    pub fn count(&self, pattern: &[u8]) -> usize {
        self.patterns.iter().position(|p| p == pattern).map_or(0, |i| self.counts[i])
    }

    /// Number of windows tabulated.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl fmt::Display for MotifCensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} | count", self.labels.join(" "))?;
        for (pattern, count) in self.iter() {
            let cells: Vec<String> = pattern.iter().map(u8::to_string).collect();
            writeln!(f, "{} | {count}", cells.join(" "))?;
        }
        Ok(())
    }
}
