//! Backend-neutral chart descriptions and the rendering seam.
//!
//! A `ChartSpec` says what to draw (kind, labels, axis clamp, data). A
//! `ChartBackend` turns a validated spec into a `ChartHandle`, a finished
//! drawing ready to be placed on a report page.

use crate::error::{ReportError, Result};
use analytics::{CooccurrenceMatrix, CrossTab, LabeledSeries};
use std::fmt;

/// Shape used to draw an aggregation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// One bar per column, side by side within each row
    GroupedBar,
    /// Columns stacked on top of each other within each row
    StackedBar,
    Pie,
    /// Strictly-lower triangle of a square matrix
    MaskedHeatmap,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::GroupedBar => "grouped bar chart",
            ChartKind::StackedBar => "stacked bar chart",
            ChartKind::Pie => "pie chart",
            ChartKind::MaskedHeatmap => "masked heatmap",
        };
        f.write_str(name)
    }
}

/// The numbers behind a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Table(CrossTab<f64>),
    Series(LabeledSeries<f64>),
    Matrix(CooccurrenceMatrix),
}

impl ChartData {
    /// A single-column table from a series, for plain bar charts
    pub fn bars(series: &LabeledSeries<f64>, column: &str) -> Self {
        ChartData::Table(CrossTab {
            rows: series.labels().map(str::to_string).collect(),
            columns: vec![column.to_string()],
            cells: series.entries.iter().map(|(_, v)| vec![Some(*v)]).collect(),
        })
    }
}

/// Everything needed to draw one report page.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: Option<String>,
    /// Fixed value-axis range; computed from the data when `None`
    pub y_range: Option<(f64, f64)>,
    pub data: ChartData,
}

impl ChartSpec {
    pub fn new(title: &str, kind: ChartKind, data: ChartData) -> Self {
        Self {
            title: title.to_string(),
            kind,
            x_label: String::new(),
            y_label: String::new(),
            legend_title: None,
            y_range: None,
            data,
        }
    }

    pub fn x_label(mut self, label: &str) -> Self {
        self.x_label = label.to_string();
        self
    }

    pub fn y_label(mut self, label: &str) -> Self {
        self.y_label = label.to_string();
        self
    }

    pub fn legend_title(mut self, title: &str) -> Self {
        self.legend_title = Some(title.to_string());
        self
    }

    pub fn y_range(mut self, low: f64, high: f64) -> Self {
        self.y_range = Some((low, high));
        self
    }

    fn empty(&self) -> ReportError {
        ReportError::EmptyChart {
            title: self.title.clone(),
        }
    }

    fn mismatch(&self) -> ReportError {
        ReportError::KindMismatch {
            title: self.title.clone(),
            kind: self.kind,
        }
    }

    /// Check that the data can be drawn as the requested kind.
    pub fn validate(&self) -> Result<()> {
        match (&self.data, self.kind) {
            (ChartData::Table(table), ChartKind::GroupedBar | ChartKind::StackedBar) => {
                let has_value = table.cells.iter().flatten().flatten().any(|v| v.is_finite());
                if table.is_empty() || !has_value {
                    return Err(self.empty());
                }
                Ok(())
            }
            (ChartData::Series(series), ChartKind::Pie) => {
                let total: f64 = series.entries.iter().map(|(_, v)| v.max(0.0)).sum();
                if series.is_empty() || total <= 0.0 {
                    return Err(self.empty());
                }
                Ok(())
            }
            (ChartData::Matrix(matrix), ChartKind::MaskedHeatmap) => {
                if matrix.len() < 2 {
                    return Err(self.empty());
                }
                Ok(())
            }
            _ => Err(self.mismatch()),
        }
    }

    /// Value-axis range for bar charts.
    ///
    /// The fixed clamp wins when set. Otherwise the axis runs from zero to a
    /// little above the tallest bar (or stack).
    pub fn value_range(&self) -> (f64, f64) {
        if let Some(range) = self.y_range {
            return range;
        }
        let top = match &self.data {
            ChartData::Table(table) => match self.kind {
                ChartKind::StackedBar => table
                    .cells
                    .iter()
                    .map(|row| row.iter().flatten().sum::<f64>())
                    .fold(0.0, f64::max),
                _ => table.cells.iter().flatten().flatten().copied().fold(0.0, f64::max),
            },
            _ => 1.0,
        };
        if top > 0.0 { (0.0, top * 1.1) } else { (0.0, 1.0) }
    }
}

/// Stacked segments for one table row: `(column, bottom, top)`.
///
/// Missing cells contribute nothing.
pub fn stack_row(row: &[Option<f64>]) -> Vec<(usize, f64, f64)> {
    let mut base = 0.0;
    let mut segments = Vec::new();
    for (col, cell) in row.iter().enumerate() {
        if let Some(v) = cell {
            segments.push((col, base, base + v));
            base += v;
        }
    }
    segments
}

/// Cells of the strictly-lower triangle: `(row, column, count)` with
/// `row > column`. The diagonal and upper triangle are masked.
pub fn lower_triangle(matrix: &CooccurrenceMatrix) -> Vec<(usize, usize, u64)> {
    let mut cells = Vec::new();
    for (i, row) in matrix.counts.iter().enumerate() {
        for (j, &count) in row.iter().enumerate().take(i) {
            cells.push((i, j, count));
        }
    }
    cells
}

/// A rendered chart, ready to be placed on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHandle {
    pub title: String,
    /// Standalone SVG document
    pub svg: String,
}

impl ChartHandle {
    pub fn new(title: &str, svg: String) -> Self {
        Self {
            title: title.to_string(),
            svg,
        }
    }
}

/// A plotting toolkit that can draw a chart spec.
pub trait ChartBackend {
    /// Returns the name of this backend (for logging/debugging)
    fn name(&self) -> &str;

    /// Draw an already-validated spec.
    fn draw(&self, spec: &ChartSpec) -> Result<ChartHandle>;
}

/// Validate `spec` and draw it with `backend`.
pub fn render(spec: &ChartSpec, backend: &dyn ChartBackend) -> Result<ChartHandle> {
    spec.validate()?;
    backend.draw(spec)
}
