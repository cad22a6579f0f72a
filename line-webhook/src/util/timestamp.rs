//! Event timestamp rendering.

use chrono::{DateTime, SecondsFormat};

/// Marker used when an epoch value is outside the representable range.
pub const INVALID_TIMESTAMP: &str = "invalid-timestamp";

/// Render epoch milliseconds as an ISO-8601 UTC instant with millisecond
/// precision, e.g. `2023-11-14T22:13:20.000Z`.
pub fn format_epoch_millis(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(instant) => instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => INVALID_TIMESTAMP.to_string(),
    }
}
