//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::model::ModelBundle;

/// Query parameters for the single-prediction endpoint.
#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    /// Zero-based zone index.
    pub zone: usize,
    /// Target calendar year.
    pub year: i32,
    /// Zero-based month index (0 = January).
    pub month: usize,
}

/// One predicted consumption value.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub zone: usize,
    pub year: i32,
    pub month: usize,
    /// Predicted consumption (MW).
    pub value: f64,
}

/// Fit quality of one zone curve.
#[derive(Debug, Serialize)]
pub struct CurveSummary {
    pub zone: usize,
    pub year: i32,
    /// Root mean square residual of the fit (MW).
    pub residual_rms: f64,
    /// Ratio of the largest to smallest pivot of the fit.
    pub condition_estimate: f64,
}

/// Summary of the fitted model.
#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub baseline_year: i32,
    pub degree: usize,
    pub zone_count: usize,
    /// One entry per (zone, year), zone-major.
    pub curves: Vec<CurveSummary>,
}

impl From<&ModelBundle> for ModelSummary {
    fn from(bundle: &ModelBundle) -> Self {
        let curves = bundle
            .zones()
            .iter()
            .flat_map(|zone| zone.curves().iter())
            .map(|curve| CurveSummary {
                zone: curve.zone,
                year: curve.year,
                residual_rms: curve.diagnostics.residual_rms,
                condition_estimate: curve.diagnostics.condition_estimate,
            })
            .collect();
        Self {
            baseline_year: bundle.baseline_year(),
            degree: bundle.degree(),
            zone_count: bundle.zone_count(),
            curves,
        }
    }
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
