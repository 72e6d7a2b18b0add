//! Service root and health check endpoints

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// GET / response
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "BIS Alumni Network API".to_string(),
    })
}

/// GET /health
///
/// Health check endpoint for monitoring.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "alumni-map".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build root and health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
