// Web server — Axum backend for the portfolio contact form.
//
// All routes live under /api and serve JSON. The submission pipeline runs
// inside the POST /api/contact handler: validation, rate limiting, spam
// classification, persistence, then a fire-and-forget email notification.
//
// No auth: the portfolio frontend is the only intended caller, and the
// admin surface is read-only listings.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::notify::EmailNotifier;
use crate::ratelimit::SlidingWindowLimiter;
use crate::spam::{SpamClassifier, SpamRules};

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub classifier: Arc<SpamClassifier>,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub notifier: Option<Arc<EmailNotifier>>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(
    config: Config,
    db: Arc<dyn Database>,
    port: u16,
    bind: &str,
) -> Result<()> {
    let notifier = EmailNotifier::from_config(&config)?.map(Arc::new);
    if notifier.is_none() {
        info!("SMTP not configured — email notifications disabled");
    }

    let state = AppState {
        db,
        classifier: Arc::new(SpamClassifier::new(SpamRules::default())?),
        limiter: Arc::new(SlidingWindowLimiter::new(
            Duration::seconds(config.rate_limit_window_secs),
            config.rate_limit_max,
        )),
        notifier,
    };

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Postbox API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(root))
        .route(
            "/api/contact",
            get(handlers::contact::list_messages).post(handlers::contact::submit_message),
        )
        .route(
            "/api/status",
            get(handlers::status::list_status_checks).post(handlers::status::create_status_check),
        )
        .route("/api/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api — service banner.
async fn root() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "message": "Portfolio contact API — ready"
    }))
}

/// GET /api/health — health check, always 200 OK.
async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "service": "postbox",
    }))
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, detail: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "detail": detail }))).into_response()
}

/// The submitting client's identifier for rate limiting.
///
/// Behind a reverse proxy the peer address is the proxy, so the first
/// X-Forwarded-For entry wins when present. Falls back to the connection
/// peer, or "unknown" when neither is available (e.g. in router tests).
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(forwarded) = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
        {
            if let Some(first) = forwarded.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return Ok(ClientIp(first.to_string()));
                }
            }
        }

        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(ClientIp(ip))
    }
}
