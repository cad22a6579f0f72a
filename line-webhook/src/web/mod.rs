//! Web server module for handling inbound LINE webhooks.
//!
//! Routes:
//! - `GET /` health check
//! - `POST /webhook` signed event delivery
//! - anything else is 404

pub mod handlers;
pub mod signature;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use handlers::{
    health, not_found, webhook, AckResponse, AppState, WebhookError, HEALTH_MESSAGE,
};
pub use signature::{compute_signature, verify, SIGNATURE_HEADER};

/// Build the router. Body size and read timeout come from the state's
/// config; requests exceeding them get 413 and 408 respectively.
pub fn router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    let read_timeout = state.config.read_timeout();

    Router::new()
        .route("/", get(health).fallback(not_found))
        .route("/webhook", post(webhook).fallback(not_found))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TimeoutLayer::new(read_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
