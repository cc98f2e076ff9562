//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::app::AppState;

/// GET /api/health
///
/// Basic health check.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/health/live
///
/// Liveness probe: the process is up.
pub async fn live() -> StatusCode {
    StatusCode::OK
}

/// GET /api/health/ready
///
/// Readiness probe: verifies database connectivity.
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
