//! Health handlers

use axum::{extract::State, http::StatusCode, Json};
use medassist_domain::ports::DocumentStore;
use tracing::warn;

use crate::{
    dto::{
        error::ErrorEnvelope,
        health::{HealthResponse, ReadinessResponse},
    },
    error::ApiError,
    AppState,
};

pub const SERVICE_NAME: &str = "Healthcare AI Assistant";

/// Liveness probe. Never touches downstream services.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// Readiness probe: the document store must answer
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Dependencies are reachable", body = ReadinessResponse),
        (status = 503, description = "Document store unreachable", body = ErrorEnvelope)
    ),
    tag = "health"
)]
pub async fn readiness(State(state): State<AppState>) -> Result<Json<ReadinessResponse>, ApiError> {
    state.store.verify_connection().await.map_err(|err| {
        warn!(error = %err, "Readiness check failed");
        ApiError::http(StatusCode::SERVICE_UNAVAILABLE, "Document store unavailable")
    })?;

    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
    }))
}
