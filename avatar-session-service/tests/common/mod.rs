#![allow(dead_code)]

use avatar_session_service::config::LiveAvatarSettings;
use avatar_session_service::services::{LiveAvatarClient, SessionBroker};
use avatar_session_service::startup::{build_router, SESSION_PATH};
use avatar_session_service::AppState;
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_CONTEXT_ID: &str = "test-context";

/// Router wired to `base_url` as the LiveAvatar API.
pub fn router(base_url: &str, api_key: Option<&str>, context_id: Option<&str>) -> Router {
    let settings = LiveAvatarSettings::new(api_key, context_id).with_api_base_url(base_url);
    let client = LiveAvatarClient::new(&settings.api_base_url);
    let broker = Arc::new(SessionBroker::new(client, settings));
    build_router(AppState::new(broker))
}

pub fn configured_router(base_url: &str) -> Router {
    router(base_url, Some(TEST_API_KEY), Some(TEST_CONTEXT_ID))
}

pub async fn send(app: Router, method: Method) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(SESSION_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn assert_cors_headers<B>(response: &Response<B>) {
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
}
