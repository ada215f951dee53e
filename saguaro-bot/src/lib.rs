pub mod config;
pub mod helpers;

use std::time::Duration;

use axum::{Router, http::StatusCode, routing::get};
use tower_http::timeout::TimeoutLayer;

/// Create the keepalive application router.
///
/// Free hosting platforms idle-kill processes that receive no inbound
/// traffic; an uptime pinger hitting `/` keeps the bot process alive. The
/// `/health` route exists for probes.
pub fn create_app(request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(|| async { "saguaro is running 🚀" }))
        .route("/health", get(|| async { StatusCode::OK }))
        .layer(TimeoutLayer::new(request_timeout))
}
