//! Aggregations over the joined MovieLens relations.
//!
//! This crate provides:
//! - Accumulator trait and the Count / Mean / Distinct accumulators
//! - `group_by` over any ordered relation
//! - The eleven report aggregations
//! - `ReportData`, which computes all of them in report order
//!
//! ## Architecture
//! Every aggregation is a group-by from a composite key to an accumulator.
//! Keys live in a `BTreeMap`, so results come out in sorted key order and
//! do not depend on row order. Two-key results are unstacked into a
//! `CrossTab` for the chart renderer.
//!
//! ## Example Usage
//! ```ignore
//! use analytics::ReportData;
//! use data_loader::{Dataset, DataPaths, YearBasis};
//!
//! let dataset = Dataset::load_from_files(&DataPaths::default(), YearBasis::Local)?;
//! let data = ReportData::from_dataset(&dataset);
//! println!("{}", data.to_json()?);
//! ```

pub mod aggregations;
pub mod group;
pub mod report_data;
pub mod tables;
pub mod traits;

// Re-export main types
pub use aggregations::{BEST_RATED_MIN_RATINGS, TOP_N};
pub use group::group_by;
pub use report_data::ReportData;
pub use tables::{CellValue, CooccurrenceMatrix, CrossTab, LabeledSeries};
pub use traits::{Accumulator, Count, Distinct, Mean};
