//! Pearson correlation over pairwise-complete observations.

use crate::aggregate::NumericField;
use quake_domain::EarthquakeRecord;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Outcome of a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correlation {
    /// Pearson coefficient in [-1, 1].
    Coefficient(f64),
    /// Fewer than two paired observations, or a series with no variance.
    NotAvailable,
}

impl Correlation {
    /// Coefficient, if defined.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Coefficient(r) => Some(*r),
            Self::NotAvailable => None,
        }
    }

    /// Whether a coefficient was computed.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Coefficient(_))
    }
}

/// Pearson correlation of paired observations. Pairs with a missing side are
/// dropped before anything is computed.
pub fn pearson_pairs<I>(pairs: I) -> Correlation
where
    I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
{
    let (xs, ys): (Vec<f64>, Vec<f64>) = pairs
        .into_iter()
        .filter_map(|(x, y)| x.zip(y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .unzip();

    if xs.len() < 2 {
        return Correlation::NotAvailable;
    }

    let mean_x = xs.iter().mean();
    let mean_y = ys.iter().mean();
    let (sxy, sxx, syy) = xs.iter().zip(&ys).fold(
        (0.0, 0.0, 0.0),
        |(sxy, sxx, syy), (x, y)| {
            let dx = x - mean_x;
            let dy = y - mean_y;
            (dx.mul_add(dy, sxy), dx.mul_add(dx, sxx), dy.mul_add(dy, syy))
        },
    );
    if sxx <= 0.0 || syy <= 0.0 {
        return Correlation::NotAvailable;
    }

    let r = sxy / (sxx * syy).sqrt();
    if r.is_finite() {
        Correlation::Coefficient(r.clamp(-1.0, 1.0))
    } else {
        Correlation::NotAvailable
    }
}

/// Pearson correlation of two equally long series. Extra trailing entries of
/// the longer series are ignored.
#[must_use]
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Correlation {
    pearson_pairs(a.iter().copied().zip(b.iter().copied()))
}

/// Pearson correlation of two record fields.
#[must_use]
pub fn pearson_fields(records: &[EarthquakeRecord], a: NumericField, b: NumericField) -> Correlation {
    pearson_pairs(records.iter().map(|r| (a(r), b(r))))
}
