//! Fitted model bundle: built once from history, evaluated per request.

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use crate::trend::{MONTH_COUNT, TrendRepository, ZONE_COUNT};

use super::adjustment::{AdjustmentFunction, synthesize};
use super::curve::{ZoneCurve, ZoneCurveFitter};
use super::predict::{PredictionRequest, predict};

/// Fitted curves and adjustment functions for one zone.
///
/// Only built by [`ModelBundle::build`], which guarantees at least two
/// curves and twelve adjustment functions.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneModel {
    zone: usize,
    curves: Vec<ZoneCurve>,
    adjustments: Vec<AdjustmentFunction>,
}

impl ZoneModel {
    /// Zero-based zone index.
    pub fn zone(&self) -> usize {
        self.zone
    }

    /// One curve per historical year, chronological.
    pub fn curves(&self) -> &[ZoneCurve] {
        &self.curves
    }

    /// Twelve monthly adjustment functions, indexed by month.
    pub fn adjustments(&self) -> &[AdjustmentFunction] {
        &self.adjustments
    }

    /// The zone's curve for the baseline year.
    pub fn baseline_curve(&self) -> Option<&ZoneCurve> {
        self.curves.first()
    }
}

/// Immutable set of fitted zone models.
///
/// Building is the expensive phase (one curve fit per zone and year, plus
/// twelve line fits per zone); [`ModelBundle::predict`] only evaluates
/// polynomials. The bundle holds no interior mutability and can be shared
/// freely across threads.
#[derive(Debug, Clone, Serialize)]
pub struct ModelBundle {
    baseline_year: i32,
    degree: usize,
    zones: Vec<ZoneModel>,
}

impl ModelBundle {
    /// Fits every zone of `repository` using the given model configuration.
    ///
    /// # Errors
    ///
    /// Propagates the first `DataShape`, `InvalidZoneIndex`, or `FitFailure`
    /// encountered; no partial bundle is returned.
    pub fn build(repository: &TrendRepository, config: &ModelConfig) -> Result<Self> {
        let started = Instant::now();
        let fitter = ZoneCurveFitter::from_config(config);

        for trend in repository.trends() {
            if trend.months().len() != MONTH_COUNT {
                return Err(ForecastError::DataShape {
                    year: trend.year(),
                    expected: MONTH_COUNT,
                    got: trend.months().len(),
                });
            }
        }

        let zones = (0..ZONE_COUNT)
            .map(|zone| {
                let curves = repository
                    .trends()
                    .iter()
                    .map(|trend| fitter.fit(trend, zone))
                    .collect::<Result<Vec<_>>>()?;
                let adjustments = synthesize(&curves)?;
                Ok(ZoneModel {
                    zone,
                    curves,
                    adjustments,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            zones = zones.len(),
            years = repository.year_count(),
            degree = fitter.degree(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "built model bundle"
        );

        Ok(Self {
            baseline_year: repository.baseline_year(),
            degree: fitter.degree(),
            zones,
        })
    }

    /// Year offset 0 for every adjustment function.
    pub fn baseline_year(&self) -> i32 {
        self.baseline_year
    }

    /// Degree of the fitted monthly curves.
    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn zones(&self) -> &[ZoneModel] {
        &self.zones
    }

    /// Returns the model for `zone`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidZoneIndex` if the bundle has no such zone.
    pub fn zone(&self, zone: usize) -> Result<&ZoneModel> {
        self.zones.get(zone).ok_or(ForecastError::InvalidZoneIndex {
            zone,
            zone_count: self.zones.len(),
        })
    }

    /// Predicts consumption for `zone` in `year` and `month`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidZoneIndex` or `InvalidMonthIndex` for out-of-range indices.
    pub fn predict(&self, zone: usize, year: i32, month: usize) -> Result<f64> {
        let model = self.zone(zone)?;
        let baseline_curve = model.baseline_curve().ok_or_else(|| {
            ForecastError::FitFailure(format!("zone {zone} has no fitted curves"))
        })?;
        predict(
            zone,
            year,
            month,
            self.baseline_year,
            baseline_curve,
            model.adjustments(),
        )
    }

    pub fn predict_request(&self, request: &PredictionRequest) -> Result<f64> {
        self.predict(request.zone, request.year, request.month)
    }
}

/// Builds a [`ModelBundle`] from `repository`; see [`ModelBundle::build`].
pub fn build_model_bundle(repository: &TrendRepository, config: &ModelConfig) -> Result<ModelBundle> {
    ModelBundle::build(repository, config)
}
