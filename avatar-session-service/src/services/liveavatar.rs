//! LiveAvatar API client.
//!
//! Wraps the two calls needed to open a streaming session: minting a
//! short-lived session token with the server-held API key, then starting the
//! session with that token to obtain LiveKit room credentials.

use reqwest::{header, Client};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `code` value LiveAvatar uses for a successful call.
pub const SUCCESS_CODE: i64 = 1000;

const TOKEN_PATH: &str = "/v1/sessions/token";
const START_PATH: &str = "/v1/sessions/start";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{step} request failed: {source}")]
    Transport {
        step: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{step} response is not valid JSON: {source}")]
    Decode {
        step: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} response reported success without data")]
    MissingData(&'static str),
}

/// Body for `POST /v1/sessions/token`.
#[derive(Debug, Serialize)]
pub struct CreateTokenRequest<'a> {
    pub mode: &'static str,
    pub avatar_id: &'a str,
    pub avatar_persona: AvatarPersona<'a>,
}

#[derive(Debug, Serialize)]
pub struct AvatarPersona<'a> {
    pub voice_id: &'a str,
    pub context_id: &'a str,
    pub language: &'static str,
}

impl<'a> CreateTokenRequest<'a> {
    /// Full-mode session with an English persona.
    pub fn full(avatar_id: &'a str, voice_id: &'a str, context_id: &'a str) -> Self {
        Self {
            mode: "FULL",
            avatar_id,
            avatar_persona: AvatarPersona {
                voice_id,
                context_id,
                language: "en",
            },
        }
    }
}

/// Response envelope shared by every LiveAvatar endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Absent or `null` counts as a rejection, like any other non-success code.
    #[serde(default)]
    pub code: Option<i64>,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == Some(SUCCESS_CODE)
    }

    /// Upstream message, if it carried a non-empty one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    /// Payload of a successful response.
    pub fn into_data(self, step: &'static str) -> Result<T, UpstreamError> {
        self.data.ok_or(UpstreamError::MissingData(step))
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionTokenData {
    pub session_token: Secret<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionStartData {
    pub livekit_url: String,
    pub livekit_client_token: String,
}

pub type SessionTokenResponse = ApiResponse<SessionTokenData>;
pub type SessionStartResponse = ApiResponse<SessionStartData>;

/// Client for the LiveAvatar session API.
#[derive(Clone)]
pub struct LiveAvatarClient {
    client: Client,
    base_url: String,
}

impl LiveAvatarClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Mint a session token using the account API key.
    pub async fn create_session_token(
        &self,
        api_key: &Secret<String>,
        request: &CreateTokenRequest<'_>,
    ) -> Result<SessionTokenResponse, UpstreamError> {
        const STEP: &str = "token";
        let url = format!("{}{}", self.base_url, TOKEN_PATH);

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { step: STEP, source })?;

        Self::decode(STEP, response).await
    }

    /// Start the session authorized by `session_token`.
    pub async fn start_session(
        &self,
        session_token: &Secret<String>,
    ) -> Result<SessionStartResponse, UpstreamError> {
        const STEP: &str = "start";
        let url = format!("{}{}", self.base_url, START_PATH);

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(session_token.expose_secret())
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { step: STEP, source })?;

        Self::decode(STEP, response).await
    }

    // The HTTP status is ignored: LiveAvatar reports outcomes through `code`.
    async fn decode<T: DeserializeOwned>(
        step: &'static str,
        response: reqwest::Response,
    ) -> Result<ApiResponse<T>, UpstreamError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| UpstreamError::Transport { step, source })?;

        tracing::debug!(step, status = %status, bytes = body.len(), "LiveAvatar response");

        serde_json::from_str(&body).map_err(|source| UpstreamError::Decode { step, source })
    }
}
