//! # Quake Analytics
//!
//! Batch descriptive-statistics engine for earthquake catalogues.
//! Each report is a pure function of a read-only snapshot of the catalogue.
//!
//! ## Features
//!
//! - Calendar feature extraction (year, month, day of month, day of week)
//! - Null-skipping grouped aggregation (count, mean, sample standard deviation)
//! - Coordinate binning and hotspot ranking
//! - Pairwise-complete Pearson correlation, including ordinal-encoded categories
//! - A catalogue of nine reports returning structured result sets
//! - DuckDB-backed storage with CSV ingestion

#![forbid(unsafe_code)]
#![warn(clippy::all, missing_docs)]

pub mod aggregate;
pub mod context;
pub mod correlation;
pub mod error;
pub mod ingest;
pub mod reports;
pub mod result;
pub mod source;
pub mod spatial;
pub mod store;
pub mod temporal;

pub use context::ExecutionContext;
pub use correlation::Correlation;
pub use error::AnalyticsError;
pub use reports::{ReportDriver, ReportId, ReportOutput, ReportParams, Selection};
pub use result::{ResultSet, Value};
pub use source::{DataSource, MemorySource};
pub use store::DuckDbSource;
