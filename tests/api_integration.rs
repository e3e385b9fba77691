//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use nb_power_forecast::api::{AppState, router};
use nb_power_forecast::config::ModelConfig;
use nb_power_forecast::model::build_model_bundle;
use nb_power_forecast::report::build_report;

fn build_api_state() -> Arc<AppState> {
    let repo = common::synthetic_repository(common::seasonal_config(0.02));
    let bundle = build_model_bundle(&repo, &ModelConfig::default()).unwrap();
    Arc::new(AppState::new(bundle))
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn report_endpoint_matches_library_report() {
    let state = build_api_state();
    let expected = build_report(&state.bundle, 2019).unwrap();

    let (status, json) = get(state, "/report/2019").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["zones"][6], "z7");
    assert_eq!(json["months"][11], "Dec");
    for (month, row) in expected.rows.iter().enumerate() {
        for (zone, value) in row.iter().enumerate() {
            let served = json["rows"][month][zone].as_f64().unwrap();
            assert_relative_eq!(served, *value, max_relative = 1e-12);
        }
    }
}

#[tokio::test]
async fn predict_endpoint_agrees_with_report() {
    let state = build_api_state();
    let expected = build_report(&state.bundle, 2021).unwrap();

    let (status, json) = get(state, "/predict?zone=4&year=2021&month=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_relative_eq!(
        json["value"].as_f64().unwrap(),
        expected.value(9, 4).unwrap(),
        max_relative = 1e-12
    );
}

#[tokio::test]
async fn predict_endpoint_rejects_bad_month() {
    let (status, json) = get(build_api_state(), "/predict?zone=0&year=2019&month=12").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}
