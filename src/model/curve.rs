//! Monthly consumption curves fitted per zone and historical year.

use serde::Serialize;
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use crate::trend::{HistoricalTrend, MONTH_COUNT};

use super::polynomial::{FitDiagnostics, Polynomial, fit_polynomial};

/// Polynomial in month index (`0..12`) fitted to one zone's year of consumption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneCurve {
    /// Zero-based zone index.
    pub zone: usize,
    /// Historical year the curve was fitted to.
    pub year: i32,
    /// Fitted polynomial, coefficients highest degree first.
    pub polynomial: Polynomial,
    /// Residual and conditioning diagnostics of the fit.
    pub diagnostics: FitDiagnostics,
}

impl ZoneCurve {
    /// Evaluates the curve at a (possibly fractional) month index.
    pub fn evaluate(&self, month: f64) -> f64 {
        self.polynomial.evaluate(month)
    }
}

/// Fits fixed-degree least-squares curves to a zone's twelve monthly values.
///
/// With the default degree of [`CURVE_DEGREE`](crate::trend::CURVE_DEGREE)
/// on 12 points the fit is near-interpolating, leaving one residual degree
/// of freedom. Fits whose conditioning estimate exceeds `max_condition` are
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneCurveFitter {
    degree: usize,
    max_condition: f64,
}

impl Default for ZoneCurveFitter {
    fn default() -> Self {
        Self::from_config(&ModelConfig::default())
    }
}

impl ZoneCurveFitter {
    /// Creates a fitter with an explicit degree and conditioning limit.
    pub fn new(degree: usize, max_condition: f64) -> Self {
        Self {
            degree,
            max_condition,
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.degree, config.max_condition)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Fits the curve for `zone` in `trend`.
    ///
    /// # Errors
    ///
    /// * `DataShape` if the trend does not hold exactly twelve months
    /// * `InvalidZoneIndex` if the trend has no such zone
    /// * `FitFailure` if the solve fails or is too ill-conditioned
    pub fn fit(&self, trend: &HistoricalTrend, zone: usize) -> Result<ZoneCurve> {
        let values = trend.zone_series(zone)?;
        let months: Vec<f64> = (0..MONTH_COUNT).map(|m| m as f64).collect();

        let fit = fit_polynomial(&months, &values, self.degree)?;
        if fit.diagnostics.condition_estimate > self.max_condition {
            return Err(ForecastError::FitFailure(format!(
                "zone {zone} year {}: condition estimate {:.3e} exceeds limit {:.3e}",
                trend.year(),
                fit.diagnostics.condition_estimate,
                self.max_condition
            )));
        }

        debug!(
            zone,
            year = trend.year(),
            residual_rms = fit.diagnostics.residual_rms,
            condition = fit.diagnostics.condition_estimate,
            "fitted zone curve"
        );

        Ok(ZoneCurve {
            zone,
            year: trend.year(),
            polynomial: fit.polynomial,
            diagnostics: fit.diagnostics,
        })
    }

    /// Fits curves for zones `0..zone_count` of one trend, in zone order.
    pub fn fit_all(&self, trend: &HistoricalTrend, zone_count: usize) -> Result<Vec<ZoneCurve>> {
        (0..zone_count).map(|zone| self.fit(trend, zone)).collect()
    }
}

/// Fits `zone` of `trend` with the default degree-10 fitter.
pub fn fit_zone_curve(trend: &HistoricalTrend, zone: usize) -> Result<ZoneCurve> {
    ZoneCurveFitter::default().fit(trend, zone)
}
