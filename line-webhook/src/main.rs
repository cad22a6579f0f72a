//! LINE Webhook Server - receives and reports LINE Messaging API events.
//!
//! This binary:
//! - Loads configuration from the environment (and an optional `.env`)
//! - Verifies `x-line-signature` on every webhook
//! - Logs follow / unfollow / message events as structured records
//! - Acknowledges each delivery immediately

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use line_webhook::{router, AppState, Config, TracingReporter};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real deployments set the environment directly
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!(dotenv_loaded, "web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        bind_address = %config.bind_address,
        channel_secret_configured = config.has_channel_secret(),
        require_signature = config.require_signature,
        read_timeout_ms = config.read_timeout_ms,
        max_body_bytes = config.max_body_bytes,
        "config_loaded"
    );

    if !config.has_channel_secret() {
        warn!("LINE_CHANNEL_SECRET is not set; signature verification is disabled");
    }

    let addr = SocketAddr::new(config.bind_address, config.port);
    let state = AppState::new(config.clone(), Arc::new(TracingReporter));
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");
    log_setup_steps(config.port);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Print the operator checklist for wiring the channel to this receiver.
fn log_setup_steps(port: u16) {
    info!(webhook_url = %format!("http://localhost:{}/webhook", port), "webhook_url");
    info!(step = 1, "Expose the server publicly, e.g. `ngrok http {}`", port);
    info!(step = 2, "Copy the public HTTPS URL");
    info!(
        step = 3,
        "LINE Developers console → Messaging API → set Webhook URL to <https-url>/webhook"
    );
    info!(step = 4, "Press \"Verify\" to check connectivity");
    info!(step = 5, "Add the bot as a friend; the user ID is logged here");
    info!("waiting_for_events");
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
