//! Point predictions from a baseline curve plus a monthly year adjustment.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::trend::{MONTH_COUNT, ZONE_COUNT};

use super::adjustment::AdjustmentFunction;
use super::curve::ZoneCurve;

/// A single (zone, year, month) forecast query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Zero-based zone index (`0..7`).
    pub zone: usize,
    /// Calendar year; any value, extrapolation is expected.
    pub year: i32,
    /// Zero-based month index (`0..12`).
    pub month: usize,
}

impl PredictionRequest {
    pub fn new(zone: usize, year: i32, month: usize) -> Self {
        Self { zone, year, month }
    }
}

/// Predicts consumption for `zone` in `year` and `month`.
///
/// `result = baseline_curve(month) + adjustments[month](year - baseline_year)`.
/// The year is unconstrained. Pure function of its inputs: repeated calls
/// return bit-identical results.
///
/// # Arguments
///
/// * `zone` - Zero-based zone index
/// * `year` - Target calendar year
/// * `month` - Zero-based month index
/// * `baseline_year` - Earliest historical year (year offset 0)
/// * `baseline_curve` - The zone's curve for the baseline year
/// * `adjustments` - The zone's twelve monthly adjustment functions
///
/// # Errors
///
/// Returns `InvalidZoneIndex` if `zone >= 7` and `InvalidMonthIndex` if
/// `month >= 12` or no adjustment exists for it.
pub fn predict(
    zone: usize,
    year: i32,
    month: usize,
    baseline_year: i32,
    baseline_curve: &ZoneCurve,
    adjustments: &[AdjustmentFunction],
) -> Result<f64> {
    if zone >= ZONE_COUNT {
        return Err(ForecastError::InvalidZoneIndex {
            zone,
            zone_count: ZONE_COUNT,
        });
    }
    if month >= MONTH_COUNT {
        return Err(ForecastError::InvalidMonthIndex { month });
    }
    let adjustment = adjustments
        .get(month)
        .ok_or(ForecastError::InvalidMonthIndex { month })?;

    let year_offset = f64::from(year) - f64::from(baseline_year);
    Ok(baseline_curve.evaluate(month as f64) + adjustment.evaluate(year_offset))
}
