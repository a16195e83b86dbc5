//! HTTP handlers for avatar-session-service.

pub mod session;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

use crate::AppState;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "avatar-session-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Ready once both mandatory LiveAvatar values are present.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    if !state.broker.is_configured() {
        return Err(AppError::ServiceUnavailable);
    }
    Ok(Json(json!({ "status": "ready" })))
}

pub async fn metrics() -> impl IntoResponse {
    crate::services::metrics::get_metrics()
}
