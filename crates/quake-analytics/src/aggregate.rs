//! Grouped aggregation primitives.
//!
//! Groups are keyed by a projection of the record; a projection that yields
//! `None` drops the record from that aggregation only. Numeric statistics skip
//! missing values and are built on [`Moments`], which merges associatively so
//! partial aggregates over any partitioning combine to the same result.

use quake_domain::{EarthquakeRecord, MAGNITUDE_TYPE_ORDINALS, STATUS_ORDINALS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric projection of a record.
pub type NumericField = fn(&EarthquakeRecord) -> Option<f64>;

/// Numeric projections used by the reports.
pub mod fields {
    use super::{EarthquakeRecord, MAGNITUDE_TYPE_ORDINALS, STATUS_ORDINALS};

    /// `Magnitude`
    pub fn magnitude(r: &EarthquakeRecord) -> Option<f64> {
        r.magnitude
    }

    /// `Root Mean Square`
    pub fn root_mean_square(r: &EarthquakeRecord) -> Option<f64> {
        r.root_mean_square
    }

    /// `Latitude`
    pub fn latitude(r: &EarthquakeRecord) -> Option<f64> {
        r.latitude
    }

    /// `Longitude`
    pub fn longitude(r: &EarthquakeRecord) -> Option<f64> {
        r.longitude
    }

    /// `Magnitude Type` as its ordinal; never missing.
    pub fn magnitude_type_ordinal(r: &EarthquakeRecord) -> Option<f64> {
        Some(f64::from(
            MAGNITUDE_TYPE_ORDINALS.encode(r.magnitude_type.as_deref()),
        ))
    }

    /// `Status` as its ordinal; never missing.
    pub fn status_ordinal(r: &EarthquakeRecord) -> Option<f64> {
        Some(f64::from(STATUS_ORDINALS.encode(r.status.as_deref())))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Smallest key first
    #[default]
    Ascending,
    /// Largest key first
    Descending,
}

// =============================================================================
// MOMENTS
// =============================================================================

/// Running count, mean and sum of squared deviations of a numeric sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Moments {
    /// Number of observed values.
    pub count: u64,
    mean: f64,
    m2: f64,
}

impl Moments {
    /// Moments of an iterator of values.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut moments = Self::default();
        for v in values {
            moments.push(v);
        }
        moments
    }

    /// Add one observation.
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Combine with moments computed over a disjoint sample.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        if self.count == 0 {
            return other;
        }
        if other.count == 0 {
            return self;
        }
        let count = self.count + other.count;
        let n = count as f64;
        let delta = other.mean - self.mean;
        let mean = self.mean + delta * other.count as f64 / n;
        let m2 = self.m2
            + other.m2
            + delta * delta * self.count as f64 * other.count as f64 / n;
        Self { count, mean, m2 }
    }

    /// Arithmetic mean, `None` for an empty sample.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Sample (n-1) variance, `None` below two observations.
    #[must_use]
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| (self.m2 / (self.count - 1) as f64).max(0.0))
    }

    /// Sample (n-1) standard deviation, `None` below two observations.
    #[must_use]
    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }
}

// =============================================================================
// GROUPING
// =============================================================================

/// Records partitioned by key, keys in ascending order.
pub type Groups<'a, K> = BTreeMap<K, Vec<&'a EarthquakeRecord>>;

/// Partition records by the projected key. Records whose key is `None` are
/// left out.
pub fn group_by<'a, K, I, F>(records: I, key: F) -> Groups<'a, K>
where
    K: Ord,
    I: IntoIterator<Item = &'a EarthquakeRecord>,
    F: Fn(&EarthquakeRecord) -> Option<K>,
{
    let mut groups: Groups<'a, K> = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            groups.entry(k).or_default().push(record);
        }
    }
    groups
}

/// Number of records in a group.
#[must_use]
pub fn count(group: &[&EarthquakeRecord]) -> usize {
    group.len()
}

/// Moments of a field over the non-missing values of a group.
pub fn moments<'a, I>(group: I, field: NumericField) -> Moments
where
    I: IntoIterator<Item = &'a EarthquakeRecord>,
{
    Moments::from_values(group.into_iter().filter_map(field))
}

/// Mean of a field, skipping missing values. `None` when nothing is present.
#[must_use]
pub fn average(group: &[&EarthquakeRecord], field: NumericField) -> Option<f64> {
    moments(group.iter().copied(), field).mean()
}

/// Sample standard deviation of a field, skipping missing values. `None`
/// with fewer than two present values.
#[must_use]
pub fn stddev(group: &[&EarthquakeRecord], field: NumericField) -> Option<f64> {
    moments(group.iter().copied(), field).sample_std_dev()
}

/// Stable sort of rows by a key.
pub fn order_by<T, K, F>(rows: &mut [T], mut key: F, direction: Direction)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    match direction {
        Direction::Ascending => rows.sort_by(|a, b| key(a).cmp(&key(b))),
        Direction::Descending => rows.sort_by(|a, b| key(b).cmp(&key(a))),
    }
}

/// Keep the first `n` rows.
pub fn limit<T>(mut rows: Vec<T>, n: usize) -> Vec<T> {
    rows.truncate(n);
    rows
}

// =============================================================================
// PARTITIONED AGGREGATION
// =============================================================================

/// Per-key moments of a field.
pub fn aggregate_by<'a, K, I, F>(records: I, key: F, field: NumericField) -> BTreeMap<K, Moments>
where
    K: Ord,
    I: IntoIterator<Item = &'a EarthquakeRecord>,
    F: Fn(&EarthquakeRecord) -> Option<K>,
{
    let mut acc: BTreeMap<K, Moments> = BTreeMap::new();
    for record in records {
        let Some(k) = key(record) else { continue };
        let entry = acc.entry(k).or_default();
        if let Some(v) = field(record) {
            entry.push(v);
        }
    }
    acc
}

/// Merge two per-key partial aggregates.
pub fn merge_partials<K: Ord>(
    mut left: BTreeMap<K, Moments>,
    right: BTreeMap<K, Moments>,
) -> BTreeMap<K, Moments> {
    for (k, m) in right {
        let merged = left.remove(&k).unwrap_or_default().merge(m);
        left.insert(k, merged);
    }
    left
}

/// Per-key moments computed as `partitions` partial aggregates on scoped
/// threads and merged. Agrees with [`aggregate_by`] up to float rounding.
pub fn aggregate_partitioned<K, F>(
    records: &[EarthquakeRecord],
    partitions: usize,
    key: F,
    field: NumericField,
) -> BTreeMap<K, Moments>
where
    K: Ord + Send,
    F: Fn(&EarthquakeRecord) -> Option<K> + Sync,
{
    if records.is_empty() {
        return BTreeMap::new();
    }
    let chunk = records.len().div_ceil(partitions.max(1));
    let key = &key;

    std::thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(chunk)
            .map(|part| scope.spawn(move || aggregate_by(part, key, field)))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .fold(BTreeMap::new(), merge_partials)
    })
}
