//! Error types for chart rendering and report writing.

use crate::chart::ChartKind;
use thiserror::Error;

/// Errors raised while turning aggregation results into a report
#[derive(Error, Debug)]
pub enum ReportError {
    /// The aggregation produced nothing drawable
    #[error("Chart '{title}' has no data to draw")]
    EmptyChart { title: String },

    /// The data shape does not fit the requested chart kind
    #[error("Chart '{title}' cannot be drawn as a {kind}")]
    KindMismatch { title: String, kind: ChartKind },

    /// The plotting backend failed
    #[error("Failed to render chart '{title}': {reason}")]
    Render { title: String, reason: String },

    /// A rendered chart could not be turned into a PDF page
    #[error("Failed to convert chart '{title}' to PDF: {reason}")]
    Convert { title: String, reason: String },

    #[error("No charts to write")]
    NoCharts,

    /// The output document could not be written
    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ReportError>;
