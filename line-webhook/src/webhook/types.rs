//! Webhook payload types for the LINE Messaging API.
//!
//! Only `events`, each event's `type` and its `timestamp` are required.
//! Everything else is optional, and a value of the wrong shape decodes as
//! absent instead of failing the whole delivery.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Decode an optional field, treating a mistyped value as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Top-level webhook body delivered to `POST /webhook`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// Bot user ID of the channel receiving the events
    #[serde(default)]
    pub destination: String,
    /// Events in delivery order
    pub events: Vec<Event>,
}

/// A single user-interaction event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Epoch milliseconds
    pub timestamp: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<Source>,
    /// Present for user-triggered events
    #[serde(default, deserialize_with = "lenient")]
    pub reply_token: Option<String>,
    /// Present for `message` events
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<MessageContent>,
    #[serde(default, deserialize_with = "lenient")]
    pub webhook_event_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub delivery_context: Option<DeliveryContext>,
    /// `active` or `standby`
    #[serde(default, deserialize_with = "lenient")]
    pub mode: Option<String>,
}

impl Event {
    /// User ID of the event source, if the source carries one.
    pub fn user_id(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.user_id.as_deref())
    }

    /// Whether the platform flagged this delivery as a redelivery.
    pub fn is_redelivery(&self) -> bool {
        self.delivery_context
            .as_ref()
            .map(|c| c.is_redelivery)
            .unwrap_or(false)
    }
}

/// Event discriminant. Unrecognized types are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum EventKind {
    Follow,
    Unfollow,
    Message,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Follow => "follow",
            EventKind::Unfollow => "unfollow",
            EventKind::Message => "message",
            EventKind::Other(other) => other,
        }
    }
}

impl From<String> for EventKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "follow" => EventKind::Follow,
            "unfollow" => EventKind::Unfollow,
            "message" => EventKind::Message,
            _ => EventKind::Other(value),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who triggered an event.
///
/// Which identifier is meaningful depends on `source_type` (`user`,
/// `group` or `room`), but all of them are optional on the wire. Keys
/// not modelled here are kept in `extra` and serialized back out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(rename = "type", default, deserialize_with = "lenient_or_default")]
    pub source_type: String,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub room_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Message object attached to `message` events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub message_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    /// Only set for text messages
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryContext {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub is_redelivery: bool,
}
