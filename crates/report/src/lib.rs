//! Chart rendering and report writing for the MovieLens 1M report.
//!
//! This crate provides:
//! - `ChartSpec`, a backend-neutral description of one chart
//! - The `ChartBackend` trait and a plotters-based `SvgChartBackend`
//! - `build_figures`, the eleven report figures in order
//! - `ReportWriter`, which writes the charts as pages of one PDF
//!
//! ## Example Usage
//! ```ignore
//! use report::{ReportWriter, SvgChartBackend, build_figures, render_all};
//!
//! let specs = build_figures(&data);
//! let charts = render_all(&specs, &SvgChartBackend::new())?;
//! ReportWriter::default().write(&charts, Path::new("ML1M-report.pdf"))?;
//! ```

pub mod chart;
pub mod error;
pub mod figures;
pub mod svg;
pub mod writer;

pub use chart::{ChartBackend, ChartData, ChartHandle, ChartKind, ChartSpec, render};
pub use error::{ReportError, Result};
pub use figures::{build_figures, render_all};
pub use svg::SvgChartBackend;
pub use writer::ReportWriter;
