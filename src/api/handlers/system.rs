//! System endpoints: health check and hub statistics.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{HealthResponse, StatsResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, HarnessError};

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /stats` — Live connection count and churn counters.
///
/// # Errors
///
/// Returns [`HarnessError::HubClosed`] if the hub loop has stopped.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "System",
    summary = "Hub statistics",
    description = "Returns the live connection count, connect/disconnect totals, and broadcast delivery counters, together with the configured load shape.",
    responses(
        (status = 200, description = "Current hub counters", body = StatsResponse),
        (status = 503, description = "Hub is not running", body = ErrorResponse),
    )
)]
pub async fn stats_handler(State(state): State<AppState>) -> Result<impl IntoResponse, HarnessError> {
    let hub = state.hub.stats().await?;
    Ok((StatusCode::OK, Json(StatsResponse::new(hub, &state.config))))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
}
