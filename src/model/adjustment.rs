//! Year-over-year adjustment functions, one per zone and calendar month.

use serde::Serialize;

use crate::error::{ForecastError, Result};
use crate::trend::MONTH_COUNT;

use super::curve::ZoneCurve;
use super::polynomial::{Polynomial, fit_polynomial};

/// Linear correction for one month, relative to the baseline year's curve.
///
/// `evaluate(offset) = trend_line(offset) - baseline_value`, where
/// `baseline_value` is the baseline-year curve evaluated at this month. The
/// month index is stored by value, so each function is independent of how
/// the set was built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustmentFunction {
    month: usize,
    trend_line: Polynomial,
    baseline_value: f64,
}

impl AdjustmentFunction {
    /// Creates the adjustment for `month` from a fitted year trend line.
    pub fn new(month: usize, trend_line: Polynomial, baseline_value: f64) -> Self {
        Self {
            month,
            trend_line,
            baseline_value,
        }
    }

    /// Consumption delta at `year_offset` years after the baseline year.
    pub fn evaluate(&self, year_offset: f64) -> f64 {
        self.trend_line.evaluate(year_offset) - self.baseline_value
    }

    pub fn month(&self) -> usize {
        self.month
    }

    /// Degree-1 fit of the month's curve values against year offset.
    pub fn trend_line(&self) -> &Polynomial {
        &self.trend_line
    }

    /// Baseline-year curve value at this month.
    pub fn baseline_value(&self) -> f64 {
        self.baseline_value
    }
}

/// Builds the twelve monthly adjustment functions for one zone.
///
/// For each month, every year's curve is evaluated at that month, a line is
/// fitted to those values against year offset (`0..N`), and the result is
/// anchored to the first (baseline) curve's value at the month.
///
/// # Arguments
///
/// * `zone_curves` - One curve per historical year for a single zone, in
///   chronological order starting at the baseline year
///
/// # Errors
///
/// Returns `FitFailure` if fewer than two curves are given or a line fit fails.
pub fn synthesize(zone_curves: &[ZoneCurve]) -> Result<Vec<AdjustmentFunction>> {
    let Some(baseline) = zone_curves.first() else {
        return Err(ForecastError::FitFailure(
            "no zone curves to synthesize adjustments from".to_string(),
        ));
    };
    let offsets: Vec<f64> = (0..zone_curves.len()).map(|i| i as f64).collect();

    (0..MONTH_COUNT)
        .map(|month| {
            let m = month as f64;
            let values: Vec<f64> = zone_curves.iter().map(|c| c.evaluate(m)).collect();
            let line = fit_polynomial(&offsets, &values, 1).map_err(|e| {
                ForecastError::FitFailure(format!(
                    "year trend for zone {} month {month}: {e}",
                    baseline.zone
                ))
            })?;
            Ok(AdjustmentFunction::new(
                month,
                line.polynomial,
                baseline.evaluate(m),
            ))
        })
        .collect()
}
