//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup and shared read-only with the
//! request handlers afterwards.

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use tracing::warn;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Address to bind the listener to
    pub bind_address: IpAddr,

    /// LINE channel secret used as the HMAC key. Empty means open mode.
    pub channel_secret: String,

    /// Reject webhooks that cannot be verified (no header, or no secret)
    pub require_signature: bool,

    /// Upper bound on handling a single request, body accumulation included
    pub read_timeout_ms: u64,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3000,
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            channel_secret: String::new(),
            require_signature: false,
            read_timeout_ms: 10_000,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            port: parse_var("WEBHOOK_PORT", defaults.port),

            bind_address: parse_var("WEBHOOK_BIND_ADDRESS", defaults.bind_address),

            channel_secret: env::var("LINE_CHANNEL_SECRET").unwrap_or_default(),

            require_signature: parse_bool("LINE_REQUIRE_SIGNATURE", defaults.require_signature),

            read_timeout_ms: parse_var("WEBHOOK_READ_TIMEOUT_MS", defaults.read_timeout_ms),

            max_body_bytes: parse_var("WEBHOOK_MAX_BODY_BYTES", defaults.max_body_bytes),
        }
    }

    /// Whether a channel secret is available for signature verification.
    pub fn has_channel_secret(&self) -> bool {
        !self.channel_secret.is_empty()
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Parse an environment variable, falling back to `default` when it is
/// unset or malformed.
fn parse_var<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

/// Parse a boolean flag. Accepts true/false, 1/0, yes/no and on/off.
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean, using default");
            default
        }
    }
}
