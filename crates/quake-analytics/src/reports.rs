//! The report catalogue.
//!
//! Nine fixed reports, each a pure function of the execution context plus
//! [`ReportParams`], returning ordered result sets. Formatting is left to the
//! caller.

use crate::aggregate::{average, count, fields, group_by, stddev, Moments};
use crate::context::ExecutionContext;
use crate::correlation::{Correlation, pearson_fields};
use crate::error::{AnalyticsError, Result};
use crate::result::{ResultSet, Value};
use crate::spatial::{bin, bin_by_latitude, rank, rank_bands, top_k};
use crate::temporal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Year examined by the day-of-month report unless overridden.
pub const DEFAULT_YEAR_OF_INTEREST: i32 = 2015;

/// Years covered by the monthly frequency report.
pub const MONTHLY_FREQUENCY_YEARS: RangeInclusive<i32> = 1965..=2016;

/// Number of locations kept by the location report.
pub const TOP_LOCATIONS: usize = 10;

/// Text placed in a correlation cell that could not be computed.
pub const NOT_AVAILABLE: &str = "not available";

/// Report identifiers, numbered 1 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportId {
    /// R1: quakes and average magnitude per day of week
    DayOfWeek,
    /// R2: quakes per day of month in one year
    DayOfMonth,
    /// R3: monthly frequency over 1965..=2016
    MonthlyFrequency,
    /// R4: quakes per year
    QuakesPerYear,
    /// R5: average magnitude per year
    AverageMagnitudePerYear,
    /// R6: magnitude standard deviation per year
    MagnitudeStdDevPerYear,
    /// R7: coordinate statistics and top locations
    Location,
    /// R8: every location ranked by count
    Hotspots,
    /// R9: RMS correlations
    MagnitudeRmsCorrelation,
}

impl ReportId {
    /// All reports in run order.
    pub const ALL: [Self; 9] = [
        Self::DayOfWeek,
        Self::DayOfMonth,
        Self::MonthlyFrequency,
        Self::QuakesPerYear,
        Self::AverageMagnitudePerYear,
        Self::MagnitudeStdDevPerYear,
        Self::Location,
        Self::Hotspots,
        Self::MagnitudeRmsCorrelation,
    ];

    /// 1-based report number.
    pub fn number(&self) -> u8 {
        match self {
            Self::DayOfWeek => 1,
            Self::DayOfMonth => 2,
            Self::MonthlyFrequency => 3,
            Self::QuakesPerYear => 4,
            Self::AverageMagnitudePerYear => 5,
            Self::MagnitudeStdDevPerYear => 6,
            Self::Location => 7,
            Self::Hotspots => 8,
            Self::MagnitudeRmsCorrelation => 9,
        }
    }

    /// Report by number; `None` outside 1..=9.
    pub fn from_number(n: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|id| i64::from(id.number()) == n)
    }

    /// The question the report answers.
    pub fn title(&self) -> &'static str {
        match self {
            Self::DayOfWeek => "How does the day of the week affect the number of earthquakes?",
            Self::DayOfMonth => {
                "What is the relation between day of the month and number of earthquakes in a year?"
            }
            Self::MonthlyFrequency => {
                "What does the average monthly frequency of earthquakes from 1965 to 2016 tell us?"
            }
            Self::QuakesPerYear => {
                "What is the relation between year and number of earthquakes in that year?"
            }
            Self::AverageMagnitudePerYear => "How has the average magnitude varied over the years?",
            Self::MagnitudeStdDevPerYear => {
                "How does year impact the standard deviation of magnitudes?"
            }
            Self::Location => "Does geographic location have anything to do with earthquakes?",
            Self::Hotspots => "Where do earthquakes occur very frequently?",
            Self::MagnitudeRmsCorrelation => {
                "What is the relation between magnitude, magnitude type, status and RMS?"
            }
        }
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}", self.number())
    }
}

/// Caller-supplied report parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportParams {
    /// Year examined by the day-of-month report.
    pub year_of_interest: i32,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            year_of_interest: DEFAULT_YEAR_OF_INTEREST,
        }
    }
}

/// Which reports to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Every report, 1 through 9.
    All,
    /// A single report by number. Numbers outside 1..=9 run nothing.
    Report(i64),
    /// Nothing selected.
    Nothing,
}

impl Selection {
    /// Selection from an "all" flag and an optional report number. The flag
    /// wins when both are given.
    pub fn from_flags(all: bool, number: Option<i64>) -> Self {
        match (all, number) {
            (true, _) => Self::All,
            (false, Some(n)) => Self::Report(n),
            (false, None) => Self::Nothing,
        }
    }

    /// Reports to run, in order.
    pub fn reports(&self) -> Vec<ReportId> {
        match self {
            Self::All => ReportId::ALL.to_vec(),
            Self::Report(n) => ReportId::from_number(*n).into_iter().collect(),
            Self::Nothing => Vec::new(),
        }
    }
}

/// Output of one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOutput {
    /// Which report produced this output.
    pub id: ReportId,
    /// Report number, 1 through 9.
    pub number: u8,
    /// The question the report answers.
    pub title: String,
    /// Result sets in their fixed order.
    pub result_sets: Vec<ResultSet>,
}

impl ReportOutput {
    fn new(id: ReportId, result_sets: Vec<ResultSet>) -> Self {
        Self {
            id,
            number: id.number(),
            title: id.title().to_string(),
            result_sets,
        }
    }

    /// Result set by name.
    pub fn result_set(&self, name: &str) -> Option<&ResultSet> {
        self.result_sets.iter().find(|rs| rs.name == name)
    }
}

/// Runs selected reports against an execution context.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportDriver {
    params: ReportParams,
}

impl ReportDriver {
    /// Driver with the given parameters.
    pub fn new(params: ReportParams) -> Self {
        Self { params }
    }

    /// Parameters passed to every report.
    #[must_use]
    pub fn params(&self) -> ReportParams {
        self.params
    }

    /// Run the selection in order. An unknown report number yields no output.
    pub fn run(&self, ctx: &ExecutionContext, selection: Selection) -> Vec<ReportOutput> {
        let ids = selection.reports();
        if ids.is_empty() {
            tracing::debug!(?selection, "No report selected");
        }
        ids.into_iter().map(|id| self.run_report(ctx, id)).collect()
    }

    /// Run the selection with one scoped thread per report. Output order and
    /// content match [`ReportDriver::run`].
    pub fn run_parallel(&self, ctx: &ExecutionContext, selection: Selection) -> Vec<ReportOutput> {
        let ids = selection.reports();
        std::thread::scope(|scope| {
            let handles: Vec<_> = ids
                .into_iter()
                .map(|id| scope.spawn(move || self.run_report(ctx, id)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    /// Run one report.
    pub fn run_report(&self, ctx: &ExecutionContext, id: ReportId) -> ReportOutput {
        let output = match id {
            ReportId::DayOfWeek => day_of_week(ctx),
            ReportId::DayOfMonth => day_of_month(ctx, self.params.year_of_interest),
            ReportId::MonthlyFrequency => monthly_frequency(ctx),
            ReportId::QuakesPerYear => quakes_per_year(ctx),
            ReportId::AverageMagnitudePerYear => average_magnitude_per_year(ctx),
            ReportId::MagnitudeStdDevPerYear => magnitude_stddev_per_year(ctx),
            ReportId::Location => location(ctx),
            ReportId::Hotspots => hotspots(ctx),
            ReportId::MagnitudeRmsCorrelation => magnitude_rms_correlation(ctx),
        };
        tracing::debug!(
            run_id = %ctx.run_id(),
            report = %id,
            rows = output.result_sets.iter().map(ResultSet::len).sum::<usize>(),
            "Report computed"
        );
        output
    }
}

// =============================================================================
// REPORTS
// =============================================================================

/// R1: quakes and average magnitude per day of week (1 = Sunday).
pub fn day_of_week(ctx: &ExecutionContext) -> ReportOutput {
    let groups = group_by(ctx.records(), temporal::record_day_of_week);

    let mut counts = ResultSet::new("quakes_by_day_of_week", &["DayOfWeek", "count"]);
    let mut averages = ResultSet::new(
        "average_magnitude_by_day_of_week",
        &["DayOfWeek", "avg(Magnitude)"],
    );
    for (day, group) in &groups {
        counts.push(vec![(*day).into(), count(group).into()]);
        averages.push(vec![(*day).into(), average(group, fields::magnitude).into()]);
    }

    ReportOutput::new(ReportId::DayOfWeek, vec![counts, averages])
}

/// R2: quakes per day of month within one year.
pub fn day_of_month(ctx: &ExecutionContext, year_of_interest: i32) -> ReportOutput {
    let groups = group_by(ctx.records(), |r| {
        temporal::features(r)
            .filter(|f| f.year == year_of_interest)
            .map(|f| (f.year, f.day_of_month))
    });

    let mut quakes = ResultSet::new("quakes_by_day_of_month", &["Year", "DayOfMonth", "Quakes"]);
    for ((year, day), group) in &groups {
        quakes.push(vec![(*year).into(), (*day).into(), count(group).into()]);
    }

    ReportOutput::new(ReportId::DayOfMonth, vec![quakes])
}

/// R3: quakes per month over 1965..=2016, and their mean over the months
/// actually present.
pub fn monthly_frequency(ctx: &ExecutionContext) -> ReportOutput {
    let groups = group_by(ctx.records(), |r| {
        temporal::features(r)
            .filter(|f| MONTHLY_FREQUENCY_YEARS.contains(&f.year))
            .map(|f| f.month)
    });

    let mut by_month = ResultSet::new("quakes_by_month", &["Month", "count"]);
    let mut total = 0usize;
    for (month, group) in &groups {
        total += count(group);
        by_month.push(vec![(*month).into(), count(group).into()]);
    }
    let months_present = groups.len();
    let average = (months_present > 0).then(|| total as f64 / months_present as f64);

    let mut frequency = ResultSet::new("average_frequency", &["AverageFrequency"]);
    frequency.push(vec![average.into()]);

    ReportOutput::new(ReportId::MonthlyFrequency, vec![frequency, by_month])
}

/// R4: quakes per year.
pub fn quakes_per_year(ctx: &ExecutionContext) -> ReportOutput {
    let groups = group_by(ctx.records(), temporal::year);

    let mut per_year = ResultSet::new("quakes_by_year", &["Year", "count"]);
    for (year, group) in &groups {
        per_year.push(vec![(*year).into(), count(group).into()]);
    }

    ReportOutput::new(ReportId::QuakesPerYear, vec![per_year])
}

/// R5: average magnitude per year.
pub fn average_magnitude_per_year(ctx: &ExecutionContext) -> ReportOutput {
    let groups = group_by(ctx.records(), temporal::year);

    let mut per_year = ResultSet::new("average_magnitude_by_year", &["Year", "AverageMagnitude"]);
    for (year, group) in &groups {
        per_year.push(vec![(*year).into(), average(group, fields::magnitude).into()]);
    }

    ReportOutput::new(ReportId::AverageMagnitudePerYear, vec![per_year])
}

/// R6: sample standard deviation of magnitude per year.
pub fn magnitude_stddev_per_year(ctx: &ExecutionContext) -> ReportOutput {
    let groups = group_by(ctx.records(), temporal::year);

    let mut per_year = ResultSet::new("magnitude_stddev_by_year", &["Year", "MagnitudeStdDev"]);
    for (year, group) in &groups {
        per_year.push(vec![(*year).into(), stddev(group, fields::magnitude).into()]);
    }

    ReportOutput::new(ReportId::MagnitudeStdDevPerYear, vec![per_year])
}

/// R7: coordinate statistics, the ten most active rounded locations, and the
/// number of distinct raw locations.
pub fn location(ctx: &ExecutionContext) -> ReportOutput {
    let records = ctx.records();

    let lat = Moments::from_values(records.iter().filter_map(fields::latitude));
    let lon = Moments::from_values(records.iter().filter_map(fields::longitude));
    let mut stats = ResultSet::new(
        "coordinate_statistics",
        &["avg_lat", "std_lat", "avg_lon", "std_lon"],
    );
    stats.push(vec![
        lat.mean().into(),
        lat.sample_std_dev().into(),
        lon.mean().into(),
        lon.sample_std_dev().into(),
    ]);

    let mut top = ResultSet::new("top_locations", &["LatRounded", "LonRounded", "count"]);
    for cell in top_k(bin(records), TOP_LOCATIONS) {
        top.push(vec![cell.lat_rounded.into(), cell.lon_rounded.into(), cell.count.into()]);
    }

    // -0.0 and 0.0 are the same location.
    let distinct: HashSet<(u64, u64)> = records
        .iter()
        .filter_map(|r| r.coordinates())
        .map(|(lat, lon)| ((lat + 0.0).to_bits(), (lon + 0.0).to_bits()))
        .collect();
    let mut locations = ResultSet::new("distinct_locations", &["DistinctLocations"]);
    locations.push(vec![distinct.len().into()]);

    ReportOutput::new(ReportId::Location, vec![stats, top, locations])
}

/// R8: every rounded location and every rounded latitude, busiest first.
pub fn hotspots(ctx: &ExecutionContext) -> ReportOutput {
    let records = ctx.records();

    let mut cells = ResultSet::new("quakes_by_location", &["LatRounded", "LonRounded", "count"]);
    for cell in rank(bin(records)) {
        cells.push(vec![cell.lat_rounded.into(), cell.lon_rounded.into(), cell.count.into()]);
    }

    let mut bands = ResultSet::new("quakes_by_latitude", &["LatRounded", "count"]);
    for band in rank_bands(bin_by_latitude(records)) {
        bands.push(vec![band.lat_rounded.into(), band.count.into()]);
    }

    ReportOutput::new(ReportId::Hotspots, vec![cells, bands])
}

/// Correlations reported by R9, labelled.
pub fn rms_correlations(ctx: &ExecutionContext) -> [(&'static str, Correlation); 3] {
    let records = ctx.records();
    [
        (
            "Magnitude & RMS",
            pearson_fields(records, fields::magnitude, fields::root_mean_square),
        ),
        (
            "Magnitude Type & RMS",
            pearson_fields(records, fields::magnitude_type_ordinal, fields::root_mean_square),
        ),
        (
            "Status & RMS",
            pearson_fields(records, fields::status_ordinal, fields::root_mean_square),
        ),
    ]
}

/// R9: correlation of RMS with magnitude and the ordinal-encoded magnitude
/// type and status.
pub fn magnitude_rms_correlation(ctx: &ExecutionContext) -> ReportOutput {
    let mut correlations = ResultSet::new("correlations", &["Pair", "Correlation"]);
    for (pair, corr) in rms_correlations(ctx) {
        if !corr.is_available() {
            tracing::debug!(run_id = %ctx.run_id(), pair, "Correlation not available");
        }
        let cell = corr.value().map_or_else(|| NOT_AVAILABLE.into(), Value::Float);
        correlations.push(vec![pair.into(), cell]);
    }

    ReportOutput::new(ReportId::MagnitudeRmsCorrelation, vec![correlations])
}

/// Serialize report outputs as pretty JSON.
pub fn to_json(outputs: &[ReportOutput]) -> Result<String> {
    serde_json::to_string_pretty(outputs).map_err(|e| AnalyticsError::Conversion(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use quake_domain::EarthquakeRecord;

    fn dated(y: i32, m: u32, d: u32, magnitude: Option<f64>) -> EarthquakeRecord {
        EarthquakeRecord {
            date: NaiveDate::from_ymd_opt(y, m, d),
            magnitude,
            ..Default::default()
        }
    }

    fn ints(rs: &ResultSet, column: &str) -> Vec<i64> {
        rs.column(column).filter_map(Value::as_i64).collect()
    }

    #[test]
    fn test_report_numbers() {
        for (i, id) in ReportId::ALL.iter().enumerate() {
            assert_eq!(usize::from(id.number()), i + 1);
            assert_eq!(ReportId::from_number(i64::from(id.number())), Some(*id));
        }
        assert_eq!(ReportId::from_number(0), None);
        assert_eq!(ReportId::from_number(10), None);
        assert_eq!(ReportId::MagnitudeRmsCorrelation.to_string(), "R9");
    }

    #[test]
    fn test_selection() {
        assert_eq!(Selection::from_flags(true, Some(3)), Selection::All);
        assert_eq!(Selection::from_flags(false, Some(3)), Selection::Report(3));
        assert_eq!(Selection::from_flags(false, None), Selection::Nothing);
        assert_eq!(Selection::All.reports().len(), 9);
        assert!(Selection::Report(42).reports().is_empty());
        assert!(Selection::Nothing.reports().is_empty());
    }

    #[test]
    fn test_unknown_report_is_noop() {
        let ctx = ExecutionContext::from_records(vec![dated(2015, 1, 1, Some(5.0))]);
        let driver = ReportDriver::default();
        assert!(driver.run(&ctx, Selection::Report(12)).is_empty());
        assert!(driver.run(&ctx, Selection::Report(-1)).is_empty());
        assert!(driver.run(&ctx, Selection::Nothing).is_empty());
    }

    #[test]
    fn test_day_of_week_counts_and_averages() {
        // 2016-12-25 Sunday, 2016-12-26 Monday.
        let ctx = ExecutionContext::from_records(vec![
            dated(2016, 12, 25, Some(5.0)),
            dated(2016, 12, 25, Some(6.0)),
            dated(2016, 12, 26, None),
            EarthquakeRecord::default(),
        ]);
        let out = day_of_week(&ctx);

        let counts = out.result_set("quakes_by_day_of_week").unwrap();
        assert_eq!(ints(counts, "DayOfWeek"), vec![1, 2]);
        assert_eq!(ints(counts, "count"), vec![2, 1]);

        let averages = out.result_set("average_magnitude_by_day_of_week").unwrap();
        let avg: Vec<_> = averages.column("avg(Magnitude)").cloned().collect();
        assert_eq!(avg, vec![Value::Float(5.5), Value::Null]);
    }

    #[test]
    fn test_day_of_month_filters_year() {
        let records = vec![
            dated(2015, 3, 4, None),
            dated(2015, 5, 4, None),
            dated(2015, 1, 1, None),
            dated(2014, 1, 1, None),
        ];
        let ctx = ExecutionContext::from_records(records);

        let out = day_of_month(&ctx, 2015);
        let rs = &out.result_sets[0];
        assert_eq!(rs.columns, vec!["Year", "DayOfMonth", "Quakes"]);
        assert_eq!(ints(rs, "DayOfMonth"), vec![1, 4]);
        assert_eq!(ints(rs, "Quakes"), vec![1, 2]);

        let other = day_of_month(&ctx, 2014);
        assert_eq!(other.result_sets[0].columns, rs.columns);
        assert_eq!(ints(&other.result_sets[0], "Year"), vec![2014]);

        let none = day_of_month(&ctx, 1999);
        assert!(none.result_sets[0].is_empty());
    }

    #[test]
    fn test_monthly_frequency_divides_by_months_present() {
        let mut records = Vec::new();
        for (month, n) in [(1u32, 10), (4, 20), (7, 30)] {
            for i in 0..n {
                records.push(dated(1990 + (i % 3), month, 1, None));
            }
        }
        records.push(dated(1964, 2, 1, None));
        records.push(dated(2017, 2, 1, None));
        let ctx = ExecutionContext::from_records(records);

        let out = monthly_frequency(&ctx);
        let avg = out.result_set("average_frequency").unwrap().rows[0][0]
            .as_f64()
            .unwrap();
        assert_relative_eq!(avg, 20.0);

        let by_month = out.result_set("quakes_by_month").unwrap();
        assert_eq!(ints(by_month, "Month"), vec![1, 4, 7]);
        assert_eq!(ints(by_month, "count").iter().sum::<i64>(), 60);
    }

    #[test]
    fn test_monthly_frequency_empty_range() {
        let ctx = ExecutionContext::from_records(vec![dated(1950, 1, 1, None)]);
        let out = monthly_frequency(&ctx);
        assert!(out.result_set("average_frequency").unwrap().rows[0][0].is_null());
        assert!(out.result_set("quakes_by_month").unwrap().is_empty());
    }

    #[test]
    fn test_yearly_reports() {
        let records = vec![
            dated(2000, 1, 1, Some(5.0)),
            dated(2000, 6, 1, Some(7.0)),
            dated(2001, 1, 1, Some(4.0)),
            dated(2001, 2, 1, Some(6.0)),
            dated(2001, 3, 1, Some(8.0)),
            dated(2002, 3, 1, Some(8.0)),
        ];
        let ctx = ExecutionContext::from_records(records);

        let counts = quakes_per_year(&ctx);
        assert_eq!(ints(&counts.result_sets[0], "count"), vec![2, 3, 1]);

        let sd = magnitude_stddev_per_year(&ctx);
        let values: Vec<_> = sd.result_sets[0].column("MagnitudeStdDev").cloned().collect();
        assert_relative_eq!(values[0].as_f64().unwrap(), std::f64::consts::SQRT_2);
        assert_relative_eq!(values[1].as_f64().unwrap(), 2.0);
        assert!(values[2].is_null());
    }

    #[test]
    fn test_correlation_report_marks_not_available() {
        let ctx = ExecutionContext::from_records(vec![
            EarthquakeRecord {
                magnitude: Some(5.0),
                root_mean_square: Some(1.0),
                status: Some("Reviewed".to_string()),
                ..Default::default()
            },
            EarthquakeRecord {
                magnitude: Some(6.0),
                root_mean_square: Some(2.0),
                status: Some("Reviewed".to_string()),
                ..Default::default()
            },
        ]);
        let out = magnitude_rms_correlation(&ctx);
        let cells: Vec<_> = out.result_sets[0].column("Correlation").cloned().collect();
        assert_relative_eq!(cells[0].as_f64().unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(cells[1], Value::Text(NOT_AVAILABLE.to_string()));
        assert_eq!(cells[2], Value::Text(NOT_AVAILABLE.to_string()));
    }

    #[test]
    fn test_location_statistics_use_each_column() {
        let located = |lat: f64, lon: Option<f64>| EarthquakeRecord {
            latitude: Some(lat),
            longitude: lon,
            ..Default::default()
        };
        let ctx = ExecutionContext::from_records(vec![
            located(10.0, Some(20.0)),
            located(20.0, None),
            located(30.0, Some(40.0)),
        ]);
        let out = location(&ctx);

        let stats = out.result_set("coordinate_statistics").unwrap();
        assert_eq!(stats.columns, vec!["avg_lat", "std_lat", "avg_lon", "std_lon"]);
        let row: Vec<f64> = stats.rows[0].iter().filter_map(Value::as_f64).collect();
        assert_eq!(row.len(), 4);
        assert_relative_eq!(row[0], 20.0);
        assert_relative_eq!(row[1], 10.0);
        assert_relative_eq!(row[2], 30.0);
        assert_relative_eq!(row[3], 200f64.sqrt(), epsilon = 1e-12);

        let distinct = out.result_set("distinct_locations").unwrap();
        assert_eq!(ints(distinct, "DistinctLocations"), vec![2]);

        let top = out.result_set("top_locations").unwrap();
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_status_correlation_is_defined() {
        let graded = |status: &str, rms: f64| EarthquakeRecord {
            status: Some(status.to_string()),
            root_mean_square: Some(rms),
            ..Default::default()
        };
        let ctx = ExecutionContext::from_records(vec![
            graded("Reviewed", 1.0),
            graded("Automatic", 2.0),
            graded("Other", 0.0),
        ]);

        let [magnitude, magnitude_type, status] = rms_correlations(&ctx);
        assert_eq!(magnitude.1, Correlation::NotAvailable);
        assert_eq!(magnitude_type.1, Correlation::NotAvailable);
        assert_eq!(status.0, "Status & RMS");
        assert_relative_eq!(status.1.value().unwrap(), 1.0, epsilon = 1e-12);

        let out = magnitude_rms_correlation(&ctx);
        let cells: Vec<_> = out.result_sets[0].column("Correlation").cloned().collect();
        assert_relative_eq!(cells[2].as_f64().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_driver_passes_year_of_interest() {
        let driver = ReportDriver::new(ReportParams {
            year_of_interest: 1965,
        });
        assert_eq!(driver.params().year_of_interest, 1965);

        let ctx = ExecutionContext::from_records(vec![
            dated(1965, 1, 2, Some(6.0)),
            dated(2015, 4, 25, Some(7.8)),
        ]);
        let out = driver.run(&ctx, Selection::Report(2));
        let quakes = &out[0].result_sets[0];
        assert_eq!(ints(quakes, "Year"), vec![1965]);
        assert_eq!(ints(quakes, "DayOfMonth"), vec![2]);
    }

    #[test]
    fn test_json_output() {
        let ctx = ExecutionContext::from_records(vec![dated(2015, 1, 1, Some(5.0))]);
        let outputs = ReportDriver::default().run(&ctx, Selection::Report(4));
        let json = to_json(&outputs).unwrap();
        assert!(json.contains("\"quakes_per_year\""));
        assert!(json.contains("\"quakes_by_year\""));
    }
}
