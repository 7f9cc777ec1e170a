use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

use crate::startup::AppState;

/// Liveness probe. Never calls the completion provider.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "campus-service",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.provider.name(),
    }))
}

/// Readiness probe: the provider must be able to serve requests.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.provider.health_check().await.map_err(|e| {
        tracing::warn!(provider = state.provider.name(), error = %e, "Provider not ready");
        AppError::ServiceUnavailable(e.to_string())
    })?;
    Ok(StatusCode::OK)
}
