//! Per-run execution context.

use crate::error::Result;
use crate::source::DataSource;
use chrono::{DateTime, Utc};
use quake_domain::EarthquakeRecord;
use std::sync::Arc;
use uuid::Uuid;

/// Everything one batch run reads: an immutable snapshot of the catalogue
/// plus run identity. Created at the start of a run and passed explicitly to
/// every report; dropping it ends the run.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    records: Arc<[EarthquakeRecord]>,
}

impl ExecutionContext {
    /// Read the full snapshot from `source`. A read failure is returned before
    /// any report can run.
    pub fn load(source: &dyn DataSource) -> Result<Self> {
        let records = source.snapshot()?;
        let ctx = Self::from_records(records);
        tracing::info!(
            run_id = %ctx.run_id,
            source = %source.describe(),
            records = ctx.records.len(),
            "Loaded catalogue snapshot"
        );
        Ok(ctx)
    }

    /// Context over records already in memory.
    pub fn from_records(records: Vec<EarthquakeRecord>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            records: records.into(),
        }
    }

    /// Identifier of this run, attached to its log events.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// When the context was created.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The read-only snapshot.
    pub fn records(&self) -> &[EarthquakeRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use crate::source::MemorySource;

    struct FailingSource;

    impl DataSource for FailingSource {
        fn describe(&self) -> String {
            "failing".to_string()
        }

        fn snapshot(&self) -> Result<Vec<EarthquakeRecord>> {
            Err(AnalyticsError::Io(std::io::Error::other("connection refused")))
        }
    }

    #[test]
    fn test_load_from_memory() {
        let source = MemorySource::new(vec![EarthquakeRecord::default(); 3]);
        let ctx = ExecutionContext::load(&source).unwrap();
        assert_eq!(ctx.records().len(), 3);
        assert!(ctx.started_at() <= Utc::now());
    }

    #[test]
    fn test_load_failure_is_fatal() {
        let err = ExecutionContext::load(&FailingSource).unwrap_err();
        assert!(matches!(err, AnalyticsError::Io(_)));
    }

    #[test]
    fn test_runs_are_distinct() {
        let a = ExecutionContext::from_records(Vec::new());
        let b = ExecutionContext::from_records(Vec::new());
        assert_ne!(a.run_id(), b.run_id());
    }
}
