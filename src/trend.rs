//! Historical monthly consumption data and the fixed problem dimensions.

use crate::error::{ForecastError, Result};
use crate::io::rates::RateTables;

/// Number of historical years the forecast is built from.
pub const HISTORICAL_YEARS: usize = 4;
/// Zones covered by trend data and predictions (`z1..z7`).
pub const ZONE_COUNT: usize = 7;
/// Zones keyed by the rate and penalty tables (`z1..z11`).
pub const EXTENDED_ZONE_COUNT: usize = 11;
/// Monthly records per historical year.
pub const MONTH_COUNT: usize = 12;
/// Default degree of the per-zone monthly curve.
pub const CURVE_DEGREE: usize = 10;
/// Earliest year of the bundled history.
pub const BASELINE_YEAR: i32 = 2015;

/// Calendar month labels in row order.
pub const MONTH_LABELS: [&str; MONTH_COUNT] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Returns the external identifier (`z1`, `z2`, ...) for a zero-based zone index.
pub fn zone_label(zone: usize) -> String {
    format!("z{}", zone + 1)
}

/// Consumption values for one month, indexed by zone.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthRecord {
    values: Vec<f64>,
}

impl MonthRecord {
    /// Creates a record from per-zone values in zone index order.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Consumption for `zone`, or `None` if the record has no such zone.
    pub fn value(&self, zone: usize) -> Option<f64> {
        self.values.get(zone).copied()
    }

    /// Number of zones present in this record.
    pub fn zone_count(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// One historical year of monthly records in calendar order.
///
/// Construction accepts any number of records; the shape is checked when a
/// zone series is extracted for fitting, so malformed input surfaces as
/// [`ForecastError::DataShape`] instead of being padded or truncated.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalTrend {
    year: i32,
    months: Vec<MonthRecord>,
}

impl HistoricalTrend {
    /// Creates a trend for `year` from its monthly records.
    pub fn new(year: i32, months: Vec<MonthRecord>) -> Self {
        Self { year, months }
    }

    /// Creates a trend from rows of per-zone values.
    pub fn from_rows(year: i32, rows: Vec<Vec<f64>>) -> Self {
        Self::new(year, rows.into_iter().map(MonthRecord::new).collect())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn months(&self) -> &[MonthRecord] {
        &self.months
    }

    /// Number of zones in the first monthly record.
    pub fn zone_count(&self) -> usize {
        self.months.first().map_or(0, MonthRecord::zone_count)
    }

    /// Extracts the twelve monthly values of `zone`.
    ///
    /// # Errors
    ///
    /// Returns `DataShape` if the trend does not hold exactly [`MONTH_COUNT`]
    /// records and `InvalidZoneIndex` if any record lacks the zone.
    pub fn zone_series(&self, zone: usize) -> Result<Vec<f64>> {
        if self.months.len() != MONTH_COUNT {
            return Err(ForecastError::DataShape {
                year: self.year,
                expected: MONTH_COUNT,
                got: self.months.len(),
            });
        }

        self.months
            .iter()
            .map(|record| {
                record.value(zone).ok_or(ForecastError::InvalidZoneIndex {
                    zone,
                    zone_count: record.zone_count(),
                })
            })
            .collect()
    }
}

/// Immutable bundle of historical trends (and optionally rate tables).
///
/// Built once by the caller and passed explicitly into model building.
/// Trends are kept in chronological order; the earliest year is the
/// baseline year.
#[derive(Debug, Clone)]
pub struct TrendRepository {
    trends: Vec<HistoricalTrend>,
    rates: Option<RateTables>,
}

impl TrendRepository {
    /// Creates a repository from trends in any order.
    ///
    /// # Errors
    ///
    /// * `EmptyRepository` if `trends` is empty
    /// * `ZoneCount` if any monthly record does not hold exactly
    ///   [`ZONE_COUNT`] values
    /// * `NonContiguousYears` if the sorted years have a gap or a duplicate
    pub fn new(mut trends: Vec<HistoricalTrend>) -> Result<Self> {
        if trends.is_empty() {
            return Err(ForecastError::EmptyRepository);
        }
        for trend in &trends {
            for (month, record) in trend.months().iter().enumerate() {
                if record.zone_count() != ZONE_COUNT {
                    return Err(ForecastError::ZoneCount {
                        year: trend.year(),
                        month,
                        expected: ZONE_COUNT,
                        got: record.zone_count(),
                    });
                }
            }
        }
        trends.sort_by_key(HistoricalTrend::year);

        for pair in trends.windows(2) {
            let expected = pair[0].year() + 1;
            if pair[1].year() != expected {
                return Err(ForecastError::NonContiguousYears {
                    expected,
                    got: pair[1].year(),
                });
            }
        }

        Ok(Self {
            trends,
            rates: None,
        })
    }

    /// Attaches read-only rate tables for downstream consumers.
    pub fn with_rates(mut self, rates: RateTables) -> Self {
        self.rates = Some(rates);
        self
    }

    /// Earliest historical year; year offsets are measured from it.
    pub fn baseline_year(&self) -> i32 {
        self.trends[0].year()
    }

    /// Trends in chronological order.
    pub fn trends(&self) -> &[HistoricalTrend] {
        &self.trends
    }

    pub fn year_count(&self) -> usize {
        self.trends.len()
    }

    /// Number of zones; every record holds exactly [`ZONE_COUNT`] values.
    pub fn zone_count(&self) -> usize {
        ZONE_COUNT
    }

    pub fn rates(&self) -> Option<&RateTables> {
        self.rates.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_trend(year: i32, months: usize) -> HistoricalTrend {
        HistoricalTrend::from_rows(year, vec![vec![1.0; ZONE_COUNT]; months])
    }

    #[test]
    fn zone_series_returns_twelve_values() {
        let rows: Vec<Vec<f64>> = (0..MONTH_COUNT)
            .map(|m| (0..ZONE_COUNT).map(|z| (m * 10 + z) as f64).collect())
            .collect();
        let trend = HistoricalTrend::from_rows(2015, rows);
        let series = trend.zone_series(3);
        assert_eq!(
            series.ok(),
            Some((0..MONTH_COUNT).map(|m| (m * 10 + 3) as f64).collect())
        );
    }

    #[test]
    fn zone_series_rejects_short_and_long_trends() {
        for months in [11, 13] {
            let err = flat_trend(2017, months).zone_series(0);
            assert_eq!(
                err,
                Err(ForecastError::DataShape {
                    year: 2017,
                    expected: MONTH_COUNT,
                    got: months,
                })
            );
        }
    }

    #[test]
    fn zone_series_rejects_missing_zone() {
        let err = flat_trend(2015, MONTH_COUNT).zone_series(ZONE_COUNT);
        assert!(matches!(
            err,
            Err(ForecastError::InvalidZoneIndex { zone: 7, .. })
        ));
    }

    #[test]
    fn repository_sorts_years() {
        let repo = TrendRepository::new(vec![
            flat_trend(2017, 12),
            flat_trend(2015, 12),
            flat_trend(2016, 12),
        ]);
        let repo = repo.ok();
        assert_eq!(repo.as_ref().map(TrendRepository::baseline_year), Some(2015));
        let years: Vec<i32> = repo
            .as_ref()
            .map(|r| r.trends().iter().map(HistoricalTrend::year).collect())
            .unwrap_or_default();
        assert_eq!(years, vec![2015, 2016, 2017]);
    }

    #[test]
    fn repository_rejects_gaps_and_empty_input() {
        let err = TrendRepository::new(vec![flat_trend(2015, 12), flat_trend(2017, 12)]);
        assert!(matches!(
            err,
            Err(ForecastError::NonContiguousYears {
                expected: 2016,
                got: 2017
            })
        ));
        assert!(matches!(
            TrendRepository::new(Vec::new()),
            Err(ForecastError::EmptyRepository)
        ));
    }

    #[test]
    fn repository_rejects_six_and_eight_zones() {
        for zones in [6, 8] {
            let narrow = HistoricalTrend::from_rows(2016, vec![vec![1.0; zones]; MONTH_COUNT]);
            let err = TrendRepository::new(vec![flat_trend(2015, 12), narrow]);
            assert_eq!(
                err.err(),
                Some(ForecastError::ZoneCount {
                    year: 2016,
                    month: 0,
                    expected: ZONE_COUNT,
                    got: zones,
                })
            );
        }
    }

    #[test]
    fn repository_rejects_one_ragged_month() {
        let mut rows = vec![vec![1.0; ZONE_COUNT]; MONTH_COUNT];
        rows[9].pop();
        let err = TrendRepository::new(vec![HistoricalTrend::from_rows(2015, rows)]);
        assert!(matches!(
            err,
            Err(ForecastError::ZoneCount { month: 9, got: 6, .. })
        ));
    }

    #[test]
    fn zone_labels_are_one_based() {
        assert_eq!(zone_label(0), "z1");
        assert_eq!(zone_label(6), "z7");
    }
}
