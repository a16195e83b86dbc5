use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::error::SessionError;
use crate::models::{ClientCredentials, ErrorEnvelope};
use crate::AppState;

/// `POST /api/session`
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<ClientCredentials>, SessionError> {
    let credentials = state.broker.create_session().await?;
    Ok(Json(credentials))
}

/// Any verb on `/api/session` other than `POST` (preflight is answered by the CORS layer).
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorEnvelope::bare("Method not allowed")),
    )
}
