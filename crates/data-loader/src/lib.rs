//! # Data Loader Crate
//!
//! This crate loads the MovieLens 1M dataset and shapes it into the
//! relations the report is computed from.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Rating, Movie, User, JoinedRecord, ExplodedRecord)
//! - **parser**: Parse `::`-delimited .dat files into Rust structs
//! - **normalize**: Resolve age/occupation codes to labels, split genre lists
//! - **join**: Inner join of the three relations and the genre explode
//! - **dataset**: Sequential loading of all three files
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Dataset, DataPaths, YearBasis, explode};
//!
//! let dataset = Dataset::load_from_files(&DataPaths::default(), YearBasis::Local)?;
//! let joined = dataset.join();
//! let exploded = explode(&joined.records);
//!
//! println!("{} rows joined, {} dropped", joined.records.len(), joined.dropped);
//! ```

// Public modules
pub mod dataset;
pub mod error;
pub mod join;
pub mod normalize;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use dataset::{DataPaths, Dataset};
pub use error::{DataLoadError, Result};
pub use join::{explode, genre_set, join, JoinOutcome};
pub use parser::YearBasis;
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Rating,
    Movie,
    RawUser,
    User,
    Gender,
    // Derived relations
    JoinedRecord,
    ExplodedRecord,
};
