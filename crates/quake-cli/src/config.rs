//! # Configuration
//!
//! Environment-based configuration; command-line flags override it.

use clap::ValueEnum;
use quake_domain::DEFAULT_TABLE;
use std::env;
use std::path::PathBuf;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// DuckDB database file; in-memory when absent
    pub database: Option<PathBuf>,

    /// Catalogue table name
    pub table: String,

    /// CSV file ingested before reporting
    pub csv: Option<PathBuf>,

    /// Report output format
    pub format: OutputFormat,

    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Log line format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            database: env::var("QUAKE_DATABASE").ok().map(PathBuf::from),

            table: env::var("QUAKE_TABLE").unwrap_or_else(|_| DEFAULT_TABLE.to_string()),

            csv: env::var("QUAKE_CSV").ok().map(PathBuf::from),

            format: env::var("QUAKE_FORMAT")
                .ok()
                .and_then(|v| OutputFormat::from_str(&v, true).ok())
                .unwrap_or_default(),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            log_format: env::var("LOG_FORMAT")
                .ok()
                .and_then(|v| LogFormat::from_str(&v, true).ok())
                .unwrap_or_default(),
        }
    }
}
