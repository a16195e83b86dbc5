//! Health and readiness endpoints, exercised both in-process and over a real socket.

mod common;

use avatar_session_service::config::{LiveAvatarSettings, Settings};
use avatar_session_service::startup::Application;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{body_json, configured_router, router};
use reqwest::Client;
use service_core::config::ServerConfig;
use std::time::Duration;
use tokio::sync::oneshot;
use tower::ServiceExt;

async fn get(app: axum::Router, uri: &str) -> axum::http::Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn health_reports_service_name() {
    let response = get(router("http://127.0.0.1:1", None, None), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "avatar-session-service");
}

#[tokio::test]
async fn readiness_requires_liveavatar_configuration() {
    let response = get(router("http://127.0.0.1:1", Some("key"), None), "/ready").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = get(configured_router("http://127.0.0.1:1"), "/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ready");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let response = get(configured_router("http://127.0.0.1:1"), "/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn incoming_request_id_is_echoed() {
    let response = configured_router("http://127.0.0.1:1")
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn application_serves_over_tcp() {
    let settings = Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        liveavatar: LiveAvatarSettings::new(None, None),
    };

    let app = Application::build(settings)
        .await
        .expect("Failed to build application");
    let port = app.port();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        app.run_with_shutdown(async {
            stop_rx.await.ok();
        })
        .await
    });

    let client = Client::new();
    let response = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let response = client
        .post(format!("http://127.0.0.1:{}/api/session", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    drop(client);
    stop_tx.send(()).ok();
    server
        .await
        .expect("server task panicked")
        .expect("server error");
}
