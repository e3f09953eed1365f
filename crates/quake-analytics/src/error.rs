//! Analytics error types.

use thiserror::Error;

/// Analytics errors.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// DuckDB error
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// CSV read error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Stored table does not match the catalogue schema
    #[error("Schema mismatch in table '{table}': missing columns {missing:?}")]
    SchemaMismatch {
        /// Table that was inspected
        table: String,
        /// Catalogue columns not found
        missing: Vec<String>,
    },

    /// Domain validation error
    #[error("Domain error: {0}")]
    Domain(#[from] quake_domain::DomainError),

    /// Data conversion error
    #[error("Data conversion error: {0}")]
    Conversion(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use quake_domain::{DomainError, TableName};

    #[test]
    fn test_invalid_identifier_converts() {
        let err: AnalyticsError = TableName::parse("quakes; DROP TABLE x").unwrap_err().into();
        assert!(matches!(
            err,
            AnalyticsError::Domain(DomainError::InvalidIdentifier(_))
        ));
        assert!(err.to_string().starts_with("Domain error:"));
    }
}
