//! Webhook endpoint handlers.
//!
//! `POST /webhook` runs the whole pipeline synchronously:
//! 1. Verify the `x-line-signature` header against the raw body
//! 2. Decode the envelope
//! 3. Dispatch every event to the reporter, in order
//! 4. Acknowledge with `{"status":"ok"}`
//!
//! Decode failures are still acknowledged with 200 so the platform does
//! not keep redelivering a payload that will never parse.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::process::{dispatch, EventReporter};
use crate::web::signature::{verify, SIGNATURE_HEADER};
use crate::webhook::decode;
use crate::Config;

/// Body of the health check response.
pub const HEALTH_MESSAGE: &str = "LINE Webhook Server is running";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub reporter: Arc<dyn EventReporter>,
}

impl AppState {
    pub fn new(config: Config, reporter: Arc<dyn EventReporter>) -> Self {
        Self {
            config: Arc::new(config),
            reporter,
        }
    }
}

/// Reasons a webhook is refused before its body is decoded.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("signature does not match request body")]
    InvalidSignature,
    #[error("signature header required but absent")]
    MissingSignature,
    #[error("signature required but no channel secret is configured")]
    SecretNotConfigured,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (StatusCode::FORBIDDEN, "Invalid signature").into_response()
    }
}

/// Webhook acknowledgment.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub status: &'static str,
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], HEALTH_MESSAGE)
}

/// Fallback for every unrouted method/path combination.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

// =============================================================================
// LINE Webhook
// =============================================================================

/// Decide whether the request may proceed to decoding.
///
/// A missing or empty header is let through unless `require_signature`
/// is set. A non-empty header is always checked, and fails closed on
/// mismatch.
fn authenticate(config: &Config, headers: &HeaderMap, body: &[u8]) -> Result<(), WebhookError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .filter(|value| !value.is_empty());

    let Some(signature) = signature else {
        if config.require_signature {
            return Err(WebhookError::MissingSignature);
        }
        warn!("line_signature_header_absent_skipping_verification");
        return Ok(());
    };

    if !config.has_channel_secret() {
        if config.require_signature {
            return Err(WebhookError::SecretNotConfigured);
        }
        // Accepted, but the operator should know nothing was checked
        warn!("line_signature_present_but_unverifiable");
    }

    // A non-ASCII header can never equal a base64 digest
    let signature = signature.to_str().unwrap_or_default();

    if verify(config.channel_secret.as_bytes(), body, signature) {
        Ok(())
    } else {
        Err(WebhookError::InvalidSignature)
    }
}

/// LINE webhook endpoint.
pub async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    info!(
        body_length = body.len(),
        has_signature = headers.contains_key(SIGNATURE_HEADER),
        "line_webhook_received"
    );

    if let Err(e) = authenticate(&state.config, &headers, &body) {
        error!(error = %e, "line_webhook_rejected");
        return e.into_response();
    }

    match decode(&body) {
        Ok(envelope) => {
            let signals = dispatch(&envelope.events, state.reporter.as_ref());
            info!(
                destination = %envelope.destination,
                event_count = envelope.events.len(),
                signal_count = signals.len(),
                "line_webhook_processed"
            );
        }
        Err(e) => {
            error!(error = %e, body_length = body.len(), "line_webhook_decode_failed");
        }
    }

    (StatusCode::OK, Json(AckResponse { status: "ok" })).into_response()
}
