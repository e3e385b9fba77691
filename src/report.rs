//! Month-by-zone forecast tables for a target year.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::model::bundle::{ModelBundle, build_model_bundle};
use crate::trend::{MONTH_COUNT, MONTH_LABELS, TrendRepository, ZONE_COUNT, zone_label};

/// Forecast table: 12 rows (calendar months) by one column per zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    /// Forecast year.
    pub year: i32,
    /// Column labels in zone index order (`z1..`).
    pub zones: Vec<String>,
    /// Row labels in calendar order (`Jan..Dec`).
    pub months: Vec<String>,
    /// `rows[month][zone]` consumption estimate.
    pub rows: Vec<Vec<f64>>,
}

impl PredictionReport {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.zones.len()
    }

    /// Estimate for `month` and `zone`, if both are in the table.
    pub fn value(&self, month: usize, zone: usize) -> Option<f64> {
        self.rows.get(month).and_then(|row| row.get(zone)).copied()
    }

    /// Annual total per zone, in zone order.
    pub fn zone_totals(&self) -> Vec<f64> {
        (0..self.column_count())
            .map(|zone| self.rows.iter().filter_map(|row| row.get(zone)).sum())
            .collect()
    }

    /// Sum over every cell of the table.
    pub fn grand_total(&self) -> f64 {
        self.rows.iter().flatten().sum()
    }
}

impl fmt::Display for PredictionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Forecast {} ---", self.year)?;
        write!(f, "{:<6}", "month")?;
        for zone in &self.zones {
            write!(f, "{zone:>12}")?;
        }
        writeln!(f)?;

        for (label, row) in self.months.iter().zip(&self.rows) {
            write!(f, "{label:<6}")?;
            for value in row {
                write!(f, "{value:>12.2}")?;
            }
            writeln!(f)?;
        }

        write!(f, "{:<6}", "total")?;
        for total in self.zone_totals() {
            write!(f, "{total:>12.2}")?;
        }
        Ok(())
    }
}

/// Builds the full forecast table for `target_year` from a fitted bundle.
///
/// All-or-nothing: the first failing cell fails the whole report.
///
/// # Errors
///
/// Propagates any prediction error.
pub fn build_report(bundle: &ModelBundle, target_year: i32) -> Result<PredictionReport> {
    let started = Instant::now();
    let zone_count = ZONE_COUNT;

    let rows = (0..MONTH_COUNT)
        .map(|month| {
            (0..zone_count)
                .map(|zone| bundle.predict(zone, target_year, month))
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        year = target_year,
        zones = zone_count,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "built prediction report"
    );

    Ok(PredictionReport {
        year: target_year,
        zones: (0..zone_count).map(zone_label).collect(),
        months: MONTH_LABELS.iter().map(|m| (*m).to_string()).collect(),
        rows,
    })
}

/// Fits `repository` and builds the report for `target_year` in one call.
///
/// Prefer building a [`ModelBundle`] once when several years are needed.
pub fn forecast(
    repository: &TrendRepository,
    config: &ModelConfig,
    target_year: i32,
) -> Result<PredictionReport> {
    let bundle = build_model_bundle(repository, config)?;
    build_report(&bundle, target_year)
}
