//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, ModelSummary, PredictQuery, PredictResponse};
use crate::error::ForecastError;
use crate::report::{PredictionReport, build_report};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(err: &ForecastError) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Returns the twelve-month forecast for every zone.
///
/// `GET /report/{year}` → 200 + `PredictionReport` JSON
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> Result<Json<PredictionReport>, ApiError> {
    build_report(&state.bundle, year)
        .map(Json)
        .map_err(|e| bad_request(&e))
}

/// Returns a single prediction.
///
/// `GET /predict?zone=0&year=2019&month=0` → 200 + `PredictResponse` JSON
/// `GET /predict?zone=7&year=2019&month=0` → 400 + `ErrorResponse`
pub async fn get_predict(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PredictQuery>,
) -> impl IntoResponse {
    match state.bundle.predict(query.zone, query.year, query.month) {
        Ok(value) => Ok(Json(PredictResponse {
            zone: query.zone,
            year: query.year,
            month: query.month,
            value,
        })),
        Err(e) => Err(bad_request(&e)),
    }
}

/// Returns the baseline year, curve degree, and per-curve diagnostics.
///
/// `GET /model` → 200 + `ModelSummary` JSON
pub async fn get_model(State(state): State<Arc<AppState>>) -> Json<ModelSummary> {
    Json(ModelSummary::from(&state.bundle))
}
