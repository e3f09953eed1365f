//! Calendar features derived from an event date.
//!
//! Day-of-week numbering is fixed at 1 = Sunday through 7 = Saturday.

use chrono::{Datelike, NaiveDate};
use quake_domain::{EarthquakeRecord, parse_date};
use serde::{Deserialize, Serialize};

/// Calendar features of one event date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemporalFeatures {
    /// Calendar year.
    pub year: i32,
    /// Month, 1..=12.
    pub month: u32,
    /// Day of month, 1..=31.
    pub day_of_month: u32,
    /// Day of week, 1 = Sunday .. 7 = Saturday.
    pub day_of_week: u32,
}

impl TemporalFeatures {
    /// Derive the features of a date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day_of_month: date.day(),
            day_of_week: day_of_week(date),
        }
    }
}

/// Features of an optional date; a missing date yields no features.
#[must_use]
pub fn extract(date: Option<NaiveDate>) -> Option<TemporalFeatures> {
    date.map(TemporalFeatures::from_date)
}

/// Features of a raw date cell; unparseable text yields no features.
#[must_use]
pub fn extract_str(raw: &str) -> Option<TemporalFeatures> {
    extract(parse_date(raw))
}

/// Day of week with Sunday = 1.
#[must_use]
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().number_from_sunday()
}

/// Features of a record's `Date` column.
#[must_use]
pub fn features(record: &EarthquakeRecord) -> Option<TemporalFeatures> {
    extract(record.date)
}

/// Year of a record, if dated.
#[must_use]
pub fn year(record: &EarthquakeRecord) -> Option<i32> {
    features(record).map(|f| f.year)
}

/// Month of a record, if dated.
#[must_use]
pub fn month(record: &EarthquakeRecord) -> Option<u32> {
    features(record).map(|f| f.month)
}

/// Day of month of a record, if dated.
#[must_use]
pub fn day_of_month(record: &EarthquakeRecord) -> Option<u32> {
    features(record).map(|f| f.day_of_month)
}

/// Day of week of a record, if dated.
#[must_use]
pub fn record_day_of_week(record: &EarthquakeRecord) -> Option<u32> {
    record.date.map(day_of_week)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_week_convention() {
        // 2016-12-25 was a Sunday, 2016-12-31 a Saturday.
        let sunday = NaiveDate::from_ymd_opt(2016, 12, 25).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2016, 12, 31).unwrap();
        assert_eq!(day_of_week(sunday), 1);
        assert_eq!(day_of_week(saturday), 7);
    }

    #[test]
    fn test_extract_features() {
        let f = extract_str("01/02/1965").unwrap();
        assert_eq!(
            f,
            TemporalFeatures {
                year: 1965,
                month: 1,
                day_of_month: 2,
                day_of_week: 7,
            }
        );
    }

    #[test]
    fn test_missing_and_unparseable_dates() {
        assert!(extract(None).is_none());
        assert!(extract_str("").is_none());
        assert!(extract_str("02/30/2001").is_none());

        let record = EarthquakeRecord::default();
        assert!(year(&record).is_none());
        assert!(month(&record).is_none());
        assert!(day_of_month(&record).is_none());
        assert!(record_day_of_week(&record).is_none());
    }
}
