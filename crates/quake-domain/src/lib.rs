//! # Earthquake Reports - Domain Model
//!
//! Event records, the fixed 21-column schema they are stored under, and the
//! category encodings used by the analytics layer. These types are shared by
//! the storage, engine and presentation layers.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// =============================================================================
// EVENT RECORD
// =============================================================================

/// One row of the NEIC significant-earthquake catalogue.
///
/// Every field except the identifier may be missing; a missing value means
/// "not measured" and is never replaced by a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeRecord {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub event_type: Option<String>,
    pub depth: Option<f64>,
    pub depth_error: Option<f64>,
    pub depth_seismic_stations: Option<i64>,
    pub magnitude: Option<f64>,
    pub magnitude_type: Option<String>,
    pub magnitude_error: Option<f64>,
    pub magnitude_seismic_stations: Option<i64>,
    pub azimuthal_gap: Option<f64>,
    pub horizontal_distance: Option<f64>,
    pub horizontal_error: Option<f64>,
    pub root_mean_square: Option<f64>,
    pub id: Option<String>,
    pub source: Option<String>,
    pub location_source: Option<String>,
    pub magnitude_source: Option<String>,
    pub status: Option<String>,
}

impl EarthquakeRecord {
    /// Latitude/longitude pair, present only when both are measured.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Check that any present coordinate lies inside its geographic range.
    pub fn validate_coordinates(&self) -> Result<(), DomainError> {
        let lat_ok = self.latitude.is_none_or(|lat| (-90.0..=90.0).contains(&lat));
        let lon_ok = self
            .longitude
            .is_none_or(|lon| (-180.0..=180.0).contains(&lon));

        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(DomainError::InvalidCoordinates {
                lat: self.latitude,
                lon: self.longitude,
            })
        }
    }
}

// =============================================================================
// SCHEMA DESCRIPTOR
// =============================================================================

/// Storage type of a catalogue column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnKind {
    Date,
    Time,
    Decimal,
    Integer,
    Text,
}

impl ColumnKind {
    /// SQL type used when the column is materialised in a table.
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Decimal => "DOUBLE",
            Self::Integer => "BIGINT",
            Self::Text => "VARCHAR",
        }
    }
}

/// The 21 catalogue columns, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Date,
    Time,
    Latitude,
    Longitude,
    Type,
    Depth,
    DepthError,
    DepthSeismicStations,
    Magnitude,
    MagnitudeType,
    MagnitudeError,
    MagnitudeSeismicStations,
    AzimuthalGap,
    HorizontalDistance,
    HorizontalError,
    RootMeanSquare,
    Id,
    Source,
    LocationSource,
    MagnitudeSource,
    Status,
}

impl Column {
    /// All columns in storage order.
    pub const ALL: [Self; 21] = [
        Self::Date,
        Self::Time,
        Self::Latitude,
        Self::Longitude,
        Self::Type,
        Self::Depth,
        Self::DepthError,
        Self::DepthSeismicStations,
        Self::Magnitude,
        Self::MagnitudeType,
        Self::MagnitudeError,
        Self::MagnitudeSeismicStations,
        Self::AzimuthalGap,
        Self::HorizontalDistance,
        Self::HorizontalError,
        Self::RootMeanSquare,
        Self::Id,
        Self::Source,
        Self::LocationSource,
        Self::MagnitudeSource,
        Self::Status,
    ];

    /// Column name as it appears in the catalogue header and in storage.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Latitude => "Latitude",
            Self::Longitude => "Longitude",
            Self::Type => "Type",
            Self::Depth => "Depth",
            Self::DepthError => "Depth Error",
            Self::DepthSeismicStations => "Depth Seismic Stations",
            Self::Magnitude => "Magnitude",
            Self::MagnitudeType => "Magnitude Type",
            Self::MagnitudeError => "Magnitude Error",
            Self::MagnitudeSeismicStations => "Magnitude Seismic Stations",
            Self::AzimuthalGap => "Azimuthal Gap",
            Self::HorizontalDistance => "Horizontal Distance",
            Self::HorizontalError => "Horizontal Error",
            Self::RootMeanSquare => "Root Mean Square",
            Self::Id => "ID",
            Self::Source => "Source",
            Self::LocationSource => "Location Source",
            Self::MagnitudeSource => "Magnitude Source",
            Self::Status => "Status",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Date => ColumnKind::Date,
            Self::Time => ColumnKind::Time,
            Self::DepthSeismicStations | Self::MagnitudeSeismicStations => ColumnKind::Integer,
            Self::Type
            | Self::MagnitudeType
            | Self::Id
            | Self::Source
            | Self::LocationSource
            | Self::MagnitudeSource
            | Self::Status => ColumnKind::Text,
            _ => ColumnKind::Decimal,
        }
    }

    /// Double-quoted SQL identifier. Names come from this fixed table only.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.name())
    }

    /// Look a column up by its header name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name.trim())
    }
}

/// Validated table identifier.
///
/// Accepts `[A-Za-z_][A-Za-z0-9_]*` up to 63 characters; anything else is
/// rejected before it can reach query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableName(String);

impl TableName {
    pub const MAX_LEN: usize = 63;

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let mut chars = raw.chars();
        let first_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if first_ok && rest_ok && raw.len() <= Self::MAX_LEN {
            Ok(Self(raw.to_string()))
        } else {
            Err(DomainError::InvalidIdentifier(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted SQL identifier.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(DEFAULT_TABLE.to_string())
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Table the catalogue is loaded into unless configured otherwise.
pub const DEFAULT_TABLE: &str = "neic_earthquakes";

// =============================================================================
// CATEGORY ENCODINGS
// =============================================================================

/// Finite category → ordinal mapping with a default for unlisted labels.
///
/// The ordinals carry no real ordering; they exist so categorical columns can
/// be fed to a numeric correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdinalEncoding {
    pub entries: &'static [(&'static str, i32)],
    pub default: i32,
}

impl OrdinalEncoding {
    /// Encode a label. Missing and unlisted labels both map to `default`.
    #[must_use]
    pub fn encode(&self, label: Option<&str>) -> i32 {
        label
            .and_then(|l| {
                self.entries
                    .iter()
                    .find(|(name, _)| *name == l)
                    .map(|(_, ordinal)| *ordinal)
            })
            .unwrap_or(self.default)
    }
}

/// `Magnitude Type`: ML = 1, MW = 2, anything else 0.
pub const MAGNITUDE_TYPE_ORDINALS: OrdinalEncoding = OrdinalEncoding {
    entries: &[("ML", 1), ("MW", 2)],
    default: 0,
};

/// `Status`: Reviewed = 1, Automatic = 2, anything else 0.
pub const STATUS_ORDINALS: OrdinalEncoding = OrdinalEncoding {
    entries: &[("Reviewed", 1), ("Automatic", 2)],
    default: 0,
};

// =============================================================================
// CELL PARSING
// =============================================================================

/// Parse a catalogue date cell.
///
/// Accepts `MM/DD/YYYY`, `YYYY-MM-DD` and RFC 3339 timestamps (date part).
/// Anything else is treated as unmeasured.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Parse a catalogue time cell.
///
/// Accepts `HH:MM:SS` with optional fraction and RFC 3339 timestamps (time
/// part). Anything else is treated as unmeasured.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.time()))
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid coordinates: lat={lat:?}, lon={lon:?}")]
    InvalidCoordinates { lat: Option<f64>, lon: Option<f64> },

    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1965, 1, 2);
        assert_eq!(parse_date("01/02/1965"), expected);
        assert_eq!(parse_date("1965-01-02"), expected);
        assert_eq!(
            parse_date("1975-02-23T02:58:41.000Z"),
            NaiveDate::from_ymd_opt(1975, 2, 23)
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("13/45/2001"), None);
    }

    #[test]
    fn test_parse_time_formats() {
        assert_eq!(parse_time("13:44:18"), NaiveTime::from_hms_opt(13, 44, 18));
        assert_eq!(
            parse_time("1975-02-23T02:58:41.000Z"),
            NaiveTime::from_hms_opt(2, 58, 41)
        );
        assert_eq!(parse_time("not a time"), None);
    }

    #[test]
    fn test_ordinal_encodings() {
        assert_eq!(MAGNITUDE_TYPE_ORDINALS.encode(Some("ML")), 1);
        assert_eq!(MAGNITUDE_TYPE_ORDINALS.encode(Some("MW")), 2);
        assert_eq!(MAGNITUDE_TYPE_ORDINALS.encode(Some("MB")), 0);
        assert_eq!(MAGNITUDE_TYPE_ORDINALS.encode(None), 0);
        assert_eq!(STATUS_ORDINALS.encode(Some("Reviewed")), 1);
        assert_eq!(STATUS_ORDINALS.encode(Some("Automatic")), 2);
        assert_eq!(STATUS_ORDINALS.encode(Some("reviewed")), 0);
    }

    #[test]
    fn test_table_name_allow_list() {
        assert!(TableName::parse("neic_earthquakes").is_ok());
        assert!(TableName::parse("_staging2").is_ok());
        assert!(TableName::parse("").is_err());
        assert!(TableName::parse("2quakes").is_err());
        assert!(TableName::parse("quakes; DROP TABLE x").is_err());
        assert!(TableName::parse("q\"uakes").is_err());
        assert!(TableName::parse(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_schema_descriptor() {
        assert_eq!(Column::ALL.len(), 21);
        assert_eq!(Column::from_name("Root Mean Square"), Some(Column::RootMeanSquare));
        assert_eq!(Column::DepthSeismicStations.kind(), ColumnKind::Integer);
        assert_eq!(Column::Status.kind(), ColumnKind::Text);
        assert_eq!(Column::DepthError.quoted(), "\"Depth Error\"");
    }

    #[test]
    fn test_coordinate_validation() {
        let mut record = EarthquakeRecord {
            latitude: Some(19.246),
            longitude: Some(145.616),
            ..Default::default()
        };
        assert!(record.validate_coordinates().is_ok());
        assert_eq!(record.coordinates(), Some((19.246, 145.616)));

        record.longitude = None;
        assert!(record.validate_coordinates().is_ok());
        assert_eq!(record.coordinates(), None);

        record.latitude = Some(91.0);
        assert!(record.validate_coordinates().is_err());
    }

    #[test]
    fn test_record_serialization() {
        let record = EarthquakeRecord {
            date: NaiveDate::from_ymd_opt(2016, 12, 30),
            magnitude: Some(5.5),
            magnitude_type: Some("MW".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: EarthquakeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
