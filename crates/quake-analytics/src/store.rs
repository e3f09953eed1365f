//! DuckDB-backed catalogue store.
//!
//! Table and column identifiers come only from the [`Column`] descriptor and
//! a validated [`TableName`]; every value travels as a bound parameter.

use crate::error::{AnalyticsError, Result};
use crate::ingest::{CsvSummary, read_csv};
use crate::source::DataSource;
use duckdb::{Connection, Statement, params};
use quake_domain::{Column, ColumnKind, EarthquakeRecord, TableName, parse_date, parse_time};
use std::collections::HashSet;
use std::path::Path;

/// Catalogue table in a DuckDB database.
pub struct DuckDbSource {
    conn: Connection,
    table: TableName,
}

impl DuckDbSource {
    /// Open an in-memory database.
    pub fn new_in_memory(table: TableName) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, table })
    }

    /// Open (or create) a database file.
    pub fn new_persistent<P: AsRef<Path>>(path: P, table: TableName) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn, table })
    }

    /// Catalogue table this source reads and writes.
    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Create the catalogue table if it does not exist.
    pub fn initialize_schema(&self) -> Result<()> {
        let columns = Column::ALL
            .iter()
            .map(|c| format!("{} {}", c.quoted(), c.kind().sql_type()))
            .collect::<Vec<_>>()
            .join(",\n    ");
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.table.quoted(),
            columns
        );
        self.conn.execute_batch(&ddl)?;
        tracing::debug!(table = %self.table, "Catalogue schema ready");
        Ok(())
    }

    fn insert_sql(&self) -> String {
        let names = Column::ALL
            .iter()
            .map(Column::quoted)
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = Column::ALL
            .iter()
            .map(|c| match c.kind() {
                ColumnKind::Date => "CAST(? AS DATE)",
                ColumnKind::Time => "CAST(? AS TIME)",
                _ => "?",
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table.quoted(),
            names,
            placeholders
        )
    }

    fn select_sql(&self) -> String {
        let projections = Column::ALL
            .iter()
            .map(|c| {
                let target = match c.kind() {
                    ColumnKind::Decimal => "DOUBLE",
                    ColumnKind::Integer => "BIGINT",
                    ColumnKind::Date | ColumnKind::Time | ColumnKind::Text => "VARCHAR",
                };
                format!("CAST({} AS {})", c.quoted(), target)
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("SELECT {} FROM {}", projections, self.table.quoted())
    }

    /// Insert one record.
    pub fn ingest_record(&self, record: &EarthquakeRecord) -> Result<()> {
        self.initialize_schema()?;
        let mut stmt = self.conn.prepare(&self.insert_sql())?;
        insert(&mut stmt, record)
    }

    /// Insert records in one transaction.
    pub fn ingest_batch(&mut self, records: &[EarthquakeRecord]) -> Result<usize> {
        self.initialize_schema()?;
        let sql = self.insert_sql();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for record in records {
                insert(&mut stmt, record)?;
            }
        }
        tx.commit()?;
        tracing::info!(table = %self.table, rows = records.len(), "Ingested records");
        Ok(records.len())
    }

    /// Read a catalogue CSV file and insert every row.
    pub fn import_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<CsvSummary> {
        let (records, summary) = read_csv(path)?;
        self.ingest_batch(&records)?;
        Ok(summary)
    }

    /// Number of stored rows.
    pub fn row_count(&self) -> Result<i64> {
        self.check_schema()?;
        let sql = format!("SELECT COUNT(*) FROM {}", self.table.quoted());
        let count = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Fail unless the table exists with every catalogue column.
    fn check_schema(&self) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("SELECT column_name FROM information_schema.columns WHERE table_name = ?")?;
        let present = stmt
            .query_map(params![self.table.as_str()], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<HashSet<_>, _>>()?;

        let missing: Vec<String> = Column::ALL
            .iter()
            .map(Column::name)
            .filter(|name| !present.contains(*name))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AnalyticsError::SchemaMismatch {
                table: self.table.to_string(),
                missing,
            })
        }
    }
}

fn insert(stmt: &mut Statement<'_>, r: &EarthquakeRecord) -> Result<()> {
    let date = r.date.map(|d| d.format("%Y-%m-%d").to_string());
    let time = r.time.map(|t| t.format("%H:%M:%S%.f").to_string());
    stmt.execute(params![
        date,
        time,
        r.latitude,
        r.longitude,
        r.event_type,
        r.depth,
        r.depth_error,
        r.depth_seismic_stations,
        r.magnitude,
        r.magnitude_type,
        r.magnitude_error,
        r.magnitude_seismic_stations,
        r.azimuthal_gap,
        r.horizontal_distance,
        r.horizontal_error,
        r.root_mean_square,
        r.id,
        r.source,
        r.location_source,
        r.magnitude_source,
        r.status,
    ])?;
    Ok(())
}

impl DataSource for DuckDbSource {
    fn describe(&self) -> String {
        format!("duckdb table {}", self.table)
    }

    fn snapshot(&self) -> Result<Vec<EarthquakeRecord>> {
        self.check_schema()?;

        let mut stmt = self.conn.prepare(&self.select_sql())?;
        let rows = stmt.query_map([], |row| {
            Ok(EarthquakeRecord {
                date: row.get::<_, Option<String>>(0)?.as_deref().and_then(parse_date),
                time: row.get::<_, Option<String>>(1)?.as_deref().and_then(parse_time),
                latitude: row.get(2)?,
                longitude: row.get(3)?,
                event_type: row.get(4)?,
                depth: row.get(5)?,
                depth_error: row.get(6)?,
                depth_seismic_stations: row.get(7)?,
                magnitude: row.get(8)?,
                magnitude_type: row.get(9)?,
                magnitude_error: row.get(10)?,
                magnitude_seismic_stations: row.get(11)?,
                azimuthal_gap: row.get(12)?,
                horizontal_distance: row.get(13)?,
                horizontal_error: row.get(14)?,
                root_mean_square: row.get(15)?,
                id: row.get(16)?,
                source: row.get(17)?,
                location_source: row.get(18)?,
                magnitude_source: row.get(19)?,
                status: row.get(20)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AnalyticsError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn sample() -> EarthquakeRecord {
        EarthquakeRecord {
            date: NaiveDate::from_ymd_opt(2016, 12, 28),
            time: NaiveTime::from_hms_opt(8, 22, 12),
            latitude: Some(38.3917),
            longitude: Some(-118.8941),
            event_type: Some("Earthquake".to_string()),
            depth: Some(12.3),
            depth_seismic_stations: Some(40),
            magnitude: Some(5.6),
            magnitude_type: Some("ML".to_string()),
            root_mean_square: Some(0.1898),
            id: Some("NN00570710".to_string()),
            source: Some("NN".to_string()),
            status: Some("Reviewed".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_ingest_and_snapshot() {
        let mut store = DuckDbSource::new_in_memory(TableName::default()).unwrap();
        let records = vec![sample(), EarthquakeRecord::default()];
        assert_eq!(store.ingest_batch(&records).unwrap(), 2);
        assert_eq!(store.row_count().unwrap(), 2);

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains(&sample()));
        assert!(snapshot.contains(&EarthquakeRecord::default()));
    }

    #[test]
    fn test_single_insert() {
        let store = DuckDbSource::new_in_memory(TableName::parse("quakes").unwrap()).unwrap();
        assert_eq!(store.table().as_str(), "quakes");
        store.ingest_record(&sample()).unwrap();
        assert_eq!(store.snapshot().unwrap(), vec![sample()]);
    }

    #[test]
    fn test_missing_table_is_schema_mismatch() {
        let store = DuckDbSource::new_in_memory(TableName::default()).unwrap();
        match store.snapshot().unwrap_err() {
            AnalyticsError::SchemaMismatch { missing, .. } => assert_eq!(missing.len(), 21),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_partial_table_is_schema_mismatch() {
        let store = DuckDbSource::new_in_memory(TableName::default()).unwrap();
        store
            .conn
            .execute_batch("CREATE TABLE neic_earthquakes (\"Date\" DATE, \"Magnitude\" DOUBLE)")
            .unwrap();
        match store.snapshot().unwrap_err() {
            AnalyticsError::SchemaMismatch { missing, .. } => {
                assert_eq!(missing.len(), 19);
                assert!(missing.contains(&"Root Mean Square".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
