//! Signals produced by event dispatch.

use std::fmt;

use crate::webhook::Source;

/// Rendered in place of an optional field the platform did not send.
pub const ABSENT: &str = "<absent>";

/// One dispatched event, reduced to what its type guarantees.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub kind: SignalKind,
    /// ISO-8601 rendering of the event timestamp
    pub occurred_at: String,
    pub reply_token: Option<String>,
    pub redelivery: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignalKind {
    /// A user added the bot as a friend
    NewSubscriber { user_id: Option<String> },
    /// A user blocked the bot
    Unsubscribed { user_id: Option<String> },
    MessageReceived {
        user_id: Option<String>,
        message_type: Option<String>,
        text: Option<String>,
    },
    /// Any event type without a dedicated handler
    Unhandled {
        event_type: String,
        source: Option<Source>,
    },
}

impl Signal {
    /// Short snake_case name, used as the log event name.
    pub fn name(&self) -> &'static str {
        match self.kind {
            SignalKind::NewSubscriber { .. } => "new_subscriber",
            SignalKind::Unsubscribed { .. } => "unsubscribed",
            SignalKind::MessageReceived { .. } => "message_received",
            SignalKind::Unhandled { .. } => "unhandled_event",
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match &self.kind {
            SignalKind::NewSubscriber { user_id }
            | SignalKind::Unsubscribed { user_id }
            | SignalKind::MessageReceived { user_id, .. } => user_id.as_deref(),
            SignalKind::Unhandled { source, .. } => {
                source.as_ref().and_then(|s| s.user_id.as_deref())
            }
        }
    }

    /// User ID or the absence marker.
    pub fn user_id_or_absent(&self) -> &str {
        self.user_id().unwrap_or(ABSENT)
    }

    /// Config line an operator can paste to target the new subscriber.
    /// Only follow events with a known user ID produce one.
    pub fn onboarding_hint(&self) -> Option<String> {
        match &self.kind {
            SignalKind::NewSubscriber { user_id: Some(id) } => {
                Some(format!("LINE_USER_ID={}", id))
            }
            _ => None,
        }
    }
}

/// Render a source as compact JSON, or the absence marker.
pub fn render_source(source: Option<&Source>) -> String {
    source
        .and_then(|s| serde_json::to_string(s).ok())
        .unwrap_or_else(|| ABSENT.to_string())
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SignalKind::NewSubscriber { .. } => {
                write!(f, "new subscriber user_id={}", self.user_id_or_absent())?
            }
            SignalKind::Unsubscribed { .. } => {
                write!(f, "unsubscribed user_id={}", self.user_id_or_absent())?
            }
            SignalKind::MessageReceived { message_type, .. } => write!(
                f,
                "message received user_id={} message_type={}",
                self.user_id_or_absent(),
                message_type.as_deref().unwrap_or(ABSENT)
            )?,
            SignalKind::Unhandled { event_type, source } => write!(
                f,
                "unhandled event type={} source={}",
                event_type,
                render_source(source.as_ref())
            )?,
        }
        write!(f, " at {}", self.occurred_at)
    }
}
