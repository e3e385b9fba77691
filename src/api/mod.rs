//! REST API over a fitted model bundle.
//!
//! Provides three GET endpoints:
//! - `/report/{year}` - twelve-month forecast for every zone
//! - `/predict?zone=&year=&month=` - a single prediction
//! - `/model` - baseline year, curve degree, and fit diagnostics

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::model::ModelBundle;

/// Immutable application state shared across all request handlers.
///
/// The bundle is built before the server starts and never mutated, so
/// handlers read it without locking.
pub struct AppState {
    /// Fitted model served by every endpoint.
    pub bundle: ModelBundle,
}

impl AppState {
    pub fn new(bundle: ModelBundle) -> Self {
        Self { bundle }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/report/{year}", get(handlers::get_report))
        .route("/predict", get(handlers::get_predict))
        .route("/model", get(handlers::get_model))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
