use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorEnvelope;
use crate::services::liveavatar::UpstreamError;

/// Failures of the session broker, each mapped to the body the browser sees.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A mandatory deployment value is absent. Carries the variable name.
    #[error("{0} not configured")]
    MissingConfig(&'static str),

    #[error("{0}")]
    TokenRejected(String),

    #[error("{0}")]
    StartRejected(String),

    /// Transport, decoding or shape failures. Never shown to the caller.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl SessionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SessionError::MissingConfig(_) | SessionError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            SessionError::TokenRejected(_) | SessionError::StartRejected(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            SessionError::Upstream(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        if let SessionError::Upstream(err) = &self {
            tracing::error!(error = %err, "LiveAvatar error");
        }

        (
            self.status_code(),
            Json(ErrorEnvelope::failure(self.public_message())),
        )
            .into_response()
    }
}
