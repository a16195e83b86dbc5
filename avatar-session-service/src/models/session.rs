//! Bodies returned to the browser by the session endpoint.

use serde::{Deserialize, Serialize};

/// LiveKit credentials that are safe to hand to an untrusted caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientCredentials {
    /// Always `true`; lets the frontend branch on a single field.
    pub success: bool,
    pub livekit_url: String,
    pub livekit_client_token: String,
}

impl ClientCredentials {
    pub fn new(livekit_url: String, livekit_client_token: String) -> Self {
        Self {
            success: true,
            livekit_url,
            livekit_client_token,
        }
    }
}

/// Error body for every failure path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// Omitted for method errors, `false` everywhere else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: error.into(),
        }
    }

    pub fn bare(error: impl Into<String>) -> Self {
        Self {
            success: None,
            error: error.into(),
        }
    }
}
