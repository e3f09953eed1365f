//! Data source abstraction.
//!
//! The engine reads one complete snapshot of the catalogue per run and never
//! writes back. Implementations may sit on any storage.

use crate::error::Result;
use quake_domain::EarthquakeRecord;

/// Provider of catalogue snapshots.
pub trait DataSource {
    /// Short human-readable description, used in logs.
    fn describe(&self) -> String;

    /// Read every record. Any failure aborts the run.
    fn snapshot(&self) -> Result<Vec<EarthquakeRecord>>;
}

/// Records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<EarthquakeRecord>,
}

impl MemorySource {
    /// Source serving a copy of `records` on every snapshot.
    pub fn new(records: Vec<EarthquakeRecord>) -> Self {
        Self { records }
    }
}

impl From<Vec<EarthquakeRecord>> for MemorySource {
    fn from(records: Vec<EarthquakeRecord>) -> Self {
        Self::new(records)
    }
}

impl DataSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }

    fn snapshot(&self) -> Result<Vec<EarthquakeRecord>> {
        Ok(self.records.clone())
    }
}
