//! Router construction and server lifecycle.

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    cors::cors_middleware,
    metrics::metrics_middleware,
    tracing::{request_id_middleware, RequestId},
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::handlers::{
    health_check, metrics, readiness_check,
    session::{create_session, method_not_allowed},
};
use crate::services::{LiveAvatarClient, SessionBroker};
use crate::AppState;

pub const SESSION_PATH: &str = "/api/session";

pub fn build_router(state: AppState) -> Router {
    // CORS wraps the fallback too, so 405s and preflights carry the headers.
    let session_route = post(create_session)
        .fallback(method_not_allowed)
        .layer(from_fn(cors_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .route(SESSION_PATH, session_route)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

// `request_id_middleware` is the outer layer, so the id is already attached here.
fn request_span(request: &axum::extract::Request) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.as_str())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
    )
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Wire the broker from `settings` and bind the listener (port 0 picks a free port).
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let liveavatar = settings.liveavatar;
        let client = LiveAvatarClient::new(&liveavatar.api_base_url);

        if liveavatar.is_configured() {
            tracing::info!(
                base_url = %client.base_url(),
                avatar_id = %liveavatar.avatar_id,
                "LiveAvatar client initialized"
            );
        } else {
            tracing::warn!("LiveAvatar credentials not configured - session requests will fail");
        }

        let broker = Arc::new(SessionBroker::new(client, liveavatar));
        let router = build_router(AppState::new(broker));

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self.listener.local_addr()?;
        tracing::info!(address = %addr, "Listening");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
