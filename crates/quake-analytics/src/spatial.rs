//! Coordinate binning.
//!
//! Coordinates are rounded to two decimal places, half away from zero, on
//! their shortest decimal representation, so `1.005` rounds to `1.01` even
//! though the nearest double is slightly below it. Bin keys are held as
//! integer hundredths to keep grouping exact.

use crate::aggregate::{Direction, limit, order_by};
use quake_domain::EarthquakeRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Records sharing a rounded latitude/longitude cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialBin {
    /// Latitude rounded to two decimals.
    pub lat_rounded: f64,
    /// Longitude rounded to two decimals.
    pub lon_rounded: f64,
    /// Number of records in the cell.
    pub count: usize,
}

/// Records sharing a rounded latitude, regardless of longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatitudeBand {
    /// Latitude rounded to two decimals.
    pub lat_rounded: f64,
    /// Number of records in the band.
    pub count: usize,
}

/// Round to integer hundredths, half away from zero. `None` for non-finite
/// or out-of-range input.
#[must_use]
pub fn hundredths(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let text = value.abs().to_string();
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut digits = frac
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(3)
        .map(|b| i64::from(b - b'0'));
    let tenths = digits.next()?;
    let hundredths = digits.next()?;
    let thousandths = digits.next()?;

    let mut scaled = whole
        .parse::<i64>()
        .ok()?
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths)?;
    if thousandths >= 5 {
        scaled = scaled.checked_add(1)?;
    }

    Some(if value.is_sign_negative() { -scaled } else { scaled })
}

/// Round to two decimals, half away from zero.
#[must_use]
pub fn round2(value: f64) -> Option<f64> {
    hundredths(value).map(from_hundredths)
}

fn from_hundredths(h: i64) -> f64 {
    h as f64 / 100.0
}

/// Rounded cell keys of every located record. Coordinates too large for
/// integer hundredths are skipped and counted in a debug event.
fn cells<'a, I>(records: I) -> Vec<(i64, i64)>
where
    I: IntoIterator<Item = &'a EarthquakeRecord>,
{
    let mut unbinnable = 0usize;
    let keys = records
        .into_iter()
        .filter_map(|r| {
            let (lat, lon) = r.coordinates()?;
            let key = hundredths(lat).zip(hundredths(lon));
            if key.is_none() {
                unbinnable += 1;
            }
            key
        })
        .collect();
    if unbinnable > 0 {
        tracing::debug!(unbinnable, "Skipped coordinates outside the binnable range");
    }
    keys
}

/// Count records per rounded latitude/longitude cell, cells in ascending
/// (latitude, longitude) order. Records missing either coordinate, or with a
/// coordinate beyond the range of integer hundredths, are skipped.
pub fn bin<'a, I>(records: I) -> Vec<SpatialBin>
where
    I: IntoIterator<Item = &'a EarthquakeRecord>,
{
    let mut cells: BTreeMap<(i64, i64), usize> = BTreeMap::new();
    for key in cells(records) {
        *cells.entry(key).or_default() += 1;
    }
    cells
        .into_iter()
        .map(|((lat, lon), count)| SpatialBin {
            lat_rounded: from_hundredths(lat),
            lon_rounded: from_hundredths(lon),
            count,
        })
        .collect()
}

/// Count records per rounded latitude, bands in ascending order. Records
/// missing either coordinate are skipped, as for [`bin`].
pub fn bin_by_latitude<'a, I>(records: I) -> Vec<LatitudeBand>
where
    I: IntoIterator<Item = &'a EarthquakeRecord>,
{
    let mut bands: BTreeMap<i64, usize> = BTreeMap::new();
    for (lat, _) in cells(records) {
        *bands.entry(lat).or_default() += 1;
    }
    bands
        .into_iter()
        .map(|(lat, count)| LatitudeBand {
            lat_rounded: from_hundredths(lat),
            count,
        })
        .collect()
}

/// Order cells by count descending. Equal counts keep their incoming order.
#[must_use]
pub fn rank(mut rows: Vec<SpatialBin>) -> Vec<SpatialBin> {
    order_by(&mut rows, |r| r.count, Direction::Descending);
    rows
}

/// Order latitude bands by count descending. Equal counts keep their
/// incoming order.
#[must_use]
pub fn rank_bands(mut rows: Vec<LatitudeBand>) -> Vec<LatitudeBand> {
    order_by(&mut rows, |r| r.count, Direction::Descending);
    rows
}

/// The `k` most populated cells.
#[must_use]
pub fn top_k(rows: Vec<SpatialBin>, k: usize) -> Vec<SpatialBin> {
    limit(rank(rows), k)
}
