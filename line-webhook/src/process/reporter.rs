//! Output sinks for dispatched signals.

use tracing::info;

use super::signal::{render_source, Signal, SignalKind, ABSENT};

/// Receives every signal produced by dispatch, in delivery order.
pub trait EventReporter: Send + Sync {
    fn report(&self, signal: &Signal);
}

/// Default reporter: one structured log record per signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl EventReporter for TracingReporter {
    fn report(&self, signal: &Signal) {
        let user_id = signal.user_id_or_absent();

        match &signal.kind {
            SignalKind::NewSubscriber { .. } => {
                info!(
                    signal = signal.name(),
                    user_id = %user_id,
                    occurred_at = %signal.occurred_at,
                    redelivery = signal.redelivery,
                    summary = %signal,
                    "line_follow"
                );
                if let Some(hint) = signal.onboarding_hint() {
                    info!(hint = %hint, "line_follow_user_id_hint");
                }
            }
            SignalKind::Unsubscribed { .. } => {
                info!(
                    signal = signal.name(),
                    user_id = %user_id,
                    occurred_at = %signal.occurred_at,
                    redelivery = signal.redelivery,
                    summary = %signal,
                    "line_unfollow"
                );
            }
            SignalKind::MessageReceived {
                message_type, text, ..
            } => {
                info!(
                    signal = signal.name(),
                    user_id = %user_id,
                    message_type = message_type.as_deref().unwrap_or(ABSENT),
                    text_length = text.as_ref().map(|t| t.chars().count()).unwrap_or(0),
                    has_reply_token = signal.reply_token.is_some(),
                    occurred_at = %signal.occurred_at,
                    redelivery = signal.redelivery,
                    summary = %signal,
                    "line_message"
                );
            }
            SignalKind::Unhandled { event_type, source } => {
                info!(
                    signal = signal.name(),
                    event_type = %event_type,
                    source = %render_source(source.as_ref()),
                    occurred_at = %signal.occurred_at,
                    redelivery = signal.redelivery,
                    summary = %signal,
                    "line_event_unhandled"
                );
            }
        }
    }
}
