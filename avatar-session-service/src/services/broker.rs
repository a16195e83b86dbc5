//! Session broker: turns a browser request into LiveKit credentials.

use metrics::counter;

use crate::config::LiveAvatarSettings;
use crate::error::SessionError;
use crate::models::ClientCredentials;
use crate::services::liveavatar::{CreateTokenRequest, LiveAvatarClient};

const TOKEN_FALLBACK: &str = "Token creation failed";
const START_FALLBACK: &str = "Session start failed";

pub struct SessionBroker {
    client: LiveAvatarClient,
    settings: LiveAvatarSettings,
}

impl SessionBroker {
    pub fn new(client: LiveAvatarClient, settings: LiveAvatarSettings) -> Self {
        Self { client, settings }
    }

    /// Whether both mandatory values are present.
    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    /// Run the token exchange followed by session start.
    ///
    /// Configuration is checked before any outbound call. A rejection at
    /// either step is final; nothing is retried.
    pub async fn create_session(&self) -> Result<ClientCredentials, SessionError> {
        let api_key = self
            .settings
            .api_key
            .as_ref()
            .ok_or(SessionError::MissingConfig("LIVEAVATAR_API_KEY"))?;
        let context_id = self
            .settings
            .context_id
            .as_deref()
            .ok_or(SessionError::MissingConfig("CONTEXT_ID"))?;

        let request = CreateTokenRequest::full(
            &self.settings.avatar_id,
            &self.settings.voice_id,
            context_id,
        );

        let token = self
            .client
            .create_session_token(api_key, &request)
            .await
            .inspect_err(|_| record_call("token", "error"))?;

        if !token.is_success() {
            record_call("token", "rejected");
            tracing::warn!(code = ?token.code, "LiveAvatar rejected token request");
            return Err(SessionError::TokenRejected(
                token.message().unwrap_or(TOKEN_FALLBACK).to_string(),
            ));
        }
        let token = token
            .into_data("token")
            .inspect_err(|_| record_call("token", "error"))?;
        record_call("token", "ok");

        tracing::info!(avatar_id = %self.settings.avatar_id, "LiveAvatar session token created");

        let started = self
            .client
            .start_session(&token.session_token)
            .await
            .inspect_err(|_| record_call("start", "error"))?;

        if !started.is_success() {
            record_call("start", "rejected");
            tracing::warn!(code = ?started.code, "LiveAvatar rejected session start");
            return Err(SessionError::StartRejected(
                started.message().unwrap_or(START_FALLBACK).to_string(),
            ));
        }
        let started = started
            .into_data("start")
            .inspect_err(|_| record_call("start", "error"))?;
        record_call("start", "ok");

        tracing::info!("LiveAvatar session started");

        Ok(ClientCredentials::new(started.livekit_url, started.livekit_client_token))
    }
}

fn record_call(step: &'static str, outcome: &'static str) {
    counter!("liveavatar_upstream_calls_total", "step" => step, "outcome" => outcome)
        .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    // An address nothing listens on; any outbound call would fail with 500 instead.
    const UNREACHABLE: &str = "http://127.0.0.1:1";

    fn broker(api_key: Option<&str>, context_id: Option<&str>) -> SessionBroker {
        SessionBroker::new(
            LiveAvatarClient::new(UNREACHABLE),
            LiveAvatarSettings::new(api_key, context_id).with_api_base_url(UNREACHABLE),
        )
    }

    #[tokio::test]
    async fn test_api_key_checked_first() {
        let err = broker(None, None).create_session().await.unwrap_err();
        assert!(matches!(err, SessionError::MissingConfig("LIVEAVATAR_API_KEY")));
    }

    #[tokio::test]
    async fn test_context_id_required() {
        let err = broker(Some("key"), None).create_session().await.unwrap_err();
        assert!(matches!(err, SessionError::MissingConfig("CONTEXT_ID")));
    }

    #[tokio::test]
    async fn test_transport_failure_is_upstream_error() {
        let err = broker(Some("key"), Some("ctx"))
            .create_session()
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Upstream(_)));
    }
}
