//! Result shapes handed to the chart renderer.
//!
//! - `LabeledSeries`: one value per label (single-key results)
//! - `CrossTab`: a two-key result unstacked into rows × columns, sparse
//! - `CooccurrenceMatrix`: dense, symmetric genre × genre counts

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

/// Numeric cell types that can be plotted.
pub trait CellValue: Copy {
    fn to_f64(self) -> f64;
}

impl CellValue for u64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl CellValue for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

/// Ordered `(label, value)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledSeries<V> {
    pub entries: Vec<(String, V)>,
}

impl<V: CellValue> LabeledSeries<V> {
    pub fn new(entries: Vec<(String, V)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<V> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn to_f64(&self) -> LabeledSeries<f64> {
        LabeledSeries {
            entries: self
                .entries
                .iter()
                .map(|(l, v)| (l.clone(), v.to_f64()))
                .collect(),
        }
    }
}

/// A two-key result: rows are the first key, columns the second.
///
/// Cells for combinations that never occurred are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab<V> {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub cells: Vec<Vec<Option<V>>>,
}

impl<V: CellValue> CrossTab<V> {
    /// Unstack a map keyed by `(row, column)`.
    ///
    /// Row and column order follow the keys' own ordering, so numeric keys
    /// such as years sort numerically rather than as text.
    pub fn from_grouped<R, C>(grouped: &BTreeMap<(R, C), V>) -> Self
    where
        R: Ord + Display,
        C: Ord + Display,
    {
        let row_keys: BTreeSet<&R> = grouped.keys().map(|(r, _)| r).collect();
        let col_keys: BTreeSet<&C> = grouped.keys().map(|(_, c)| c).collect();

        let row_pos: BTreeMap<&R, usize> = row_keys.iter().enumerate().map(|(i, r)| (*r, i)).collect();
        let col_pos: BTreeMap<&C, usize> = col_keys.iter().enumerate().map(|(i, c)| (*c, i)).collect();

        let mut cells = vec![vec![None; col_keys.len()]; row_keys.len()];
        for ((r, c), v) in grouped {
            cells[row_pos[r]][col_pos[c]] = Some(*v);
        }

        Self {
            rows: row_keys.iter().map(|r| r.to_string()).collect(),
            columns: col_keys.iter().map(|c| c.to_string()).collect(),
            cells,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Value at the named row and column, if that combination occurred
    pub fn get(&self, row: &str, column: &str) -> Option<V> {
        let r = self.rows.iter().position(|x| x == row)?;
        let c = self.columns.iter().position(|x| x == column)?;
        self.cells[r][c]
    }

    /// Number of observed (non-empty) cells
    pub fn observed(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn to_f64(&self) -> CrossTab<f64> {
        CrossTab {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            cells: self
                .cells
                .iter()
                .map(|row| row.iter().map(|c| c.map(CellValue::to_f64)).collect())
                .collect(),
        }
    }
}

/// Symmetric genre × genre co-occurrence counts with a zero diagonal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CooccurrenceMatrix {
    pub genres: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl CooccurrenceMatrix {
    /// Materialize a dense matrix over `genres` from sparse pair counts.
    ///
    /// Pairs are keyed with the lexicographically smaller genre first.
    /// Pairs naming a genre outside `genres` are ignored.
    pub fn from_pairs(genres: &[String], pairs: &BTreeMap<(String, String), u64>) -> Self {
        let pos: BTreeMap<&str, usize> = genres
            .iter()
            .enumerate()
            .map(|(i, g)| (g.as_str(), i))
            .collect();

        let mut counts = vec![vec![0; genres.len()]; genres.len()];
        for ((a, b), n) in pairs {
            if let (Some(&i), Some(&j)) = (pos.get(a.as_str()), pos.get(b.as_str())) {
                counts[i][j] = *n;
                counts[j][i] = *n;
            }
        }

        Self {
            genres: genres.to_vec(),
            counts,
        }
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// Count for a pair of genres; 0 for unknown genres
    pub fn get(&self, a: &str, b: &str) -> u64 {
        let i = self.genres.iter().position(|g| g == a);
        let j = self.genres.iter().position(|g| g == b);
        match (i, j) {
            (Some(i), Some(j)) => self.counts[i][j],
            _ => 0,
        }
    }

    /// Largest off-diagonal count
    pub fn max(&self) -> u64 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}
