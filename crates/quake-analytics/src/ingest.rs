//! CSV ingestion of the NEIC catalogue.
//!
//! Cells that are empty or fail to parse become missing values; they are never
//! replaced by zero or any other default.

use crate::error::{AnalyticsError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use quake_domain::{Column, EarthquakeRecord, parse_date, parse_time};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// What happened while reading a CSV file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvSummary {
    /// Data rows read.
    pub rows: usize,
    /// Rows whose date was missing or unparseable.
    pub missing_dates: usize,
    /// Non-empty cells that could not be parsed and were read as missing.
    pub coerced_cells: usize,
}

/// Read a catalogue CSV file.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<(Vec<EarthquakeRecord>, CsvSummary)> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    tracing::info!(path = %path.display(), "Reading catalogue CSV");
    read_csv_from(file, &path.display().to_string())
}

/// Read catalogue CSV from any reader. `origin` names the input in errors.
pub fn read_csv_from<R: Read>(reader: R, origin: &str) -> Result<(Vec<EarthquakeRecord>, CsvSummary)> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let positions = header_positions(rdr.headers()?, origin)?;
    let mut summary = CsvSummary::default();
    let mut records = Vec::new();

    for row in rdr.records() {
        let row = row?;
        let mut cells = Cells {
            row: &row,
            positions: &positions,
            coerced: 0,
            line: summary.rows + 2,
        };
        let record = cells.record();

        summary.rows += 1;
        summary.coerced_cells += cells.coerced;
        if record.date.is_none() {
            summary.missing_dates += 1;
        }
        records.push(record);
    }

    if summary.coerced_cells > 0 {
        tracing::warn!(
            origin,
            coerced = summary.coerced_cells,
            "Unparseable cells read as missing values"
        );
    }
    tracing::debug!(origin, rows = summary.rows, missing_dates = summary.missing_dates, "CSV read");

    Ok((records, summary))
}

/// Index of every catalogue column within the header row.
fn header_positions(headers: &StringRecord, origin: &str) -> Result<[usize; 21]> {
    let mut positions = [usize::MAX; 21];
    for (idx, name) in headers.iter().enumerate() {
        if let Some(col) = Column::from_name(name) {
            positions[col as usize] = idx;
        }
    }

    let missing: Vec<String> = Column::ALL
        .iter()
        .filter(|c| positions[**c as usize] == usize::MAX)
        .map(|c| c.name().to_string())
        .collect();

    if missing.is_empty() {
        Ok(positions)
    } else {
        Err(AnalyticsError::SchemaMismatch {
            table: origin.to_string(),
            missing,
        })
    }
}

struct Cells<'r> {
    row: &'r StringRecord,
    positions: &'r [usize; 21],
    coerced: usize,
    line: usize,
}

impl<'r> Cells<'r> {
    fn raw(&self, col: Column) -> Option<&'r str> {
        self.row
            .get(self.positions[col as usize])
            .filter(|s| !s.is_empty())
    }

    fn text(&self, col: Column) -> Option<String> {
        self.raw(col).map(str::to_string)
    }

    fn parsed<T>(&mut self, col: Column, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let raw = self.raw(col)?;
        let value = parse(raw);
        if value.is_none() {
            tracing::debug!(line = self.line, column = col.name(), raw, "Unparseable cell");
            self.coerced += 1;
        }
        value
    }

    fn decimal(&mut self, col: Column) -> Option<f64> {
        self.parsed(col, |s| s.parse::<f64>().ok().filter(|v| v.is_finite()))
    }

    fn integer(&mut self, col: Column) -> Option<i64> {
        self.parsed(col, |s| {
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && v.fract() == 0.0)
                    .map(|v| v as i64)
            })
        })
    }

    fn record(&mut self) -> EarthquakeRecord {
        EarthquakeRecord {
            date: self.parsed(Column::Date, parse_date),
            time: self.parsed(Column::Time, parse_time),
            latitude: self.decimal(Column::Latitude),
            longitude: self.decimal(Column::Longitude),
            event_type: self.text(Column::Type),
            depth: self.decimal(Column::Depth),
            depth_error: self.decimal(Column::DepthError),
            depth_seismic_stations: self.integer(Column::DepthSeismicStations),
            magnitude: self.decimal(Column::Magnitude),
            magnitude_type: self.text(Column::MagnitudeType),
            magnitude_error: self.decimal(Column::MagnitudeError),
            magnitude_seismic_stations: self.integer(Column::MagnitudeSeismicStations),
            azimuthal_gap: self.decimal(Column::AzimuthalGap),
            horizontal_distance: self.decimal(Column::HorizontalDistance),
            horizontal_error: self.decimal(Column::HorizontalError),
            root_mean_square: self.decimal(Column::RootMeanSquare),
            id: self.text(Column::Id),
            source: self.text(Column::Source),
            location_source: self.text(Column::LocationSource),
            magnitude_source: self.text(Column::MagnitudeSource),
            status: self.text(Column::Status),
        }
    }
}
