//! Event dispatch module.
//!
//! Turns decoded webhook events into signals and hands each one to an
//! [`EventReporter`].
//!
//! ## Processing Flow
//!
//! ```text
//! Envelope.events → dispatch() → Signal per event → EventReporter::report()
//! ```

pub mod reporter;
pub mod signal;

use tracing::debug;

use crate::util::timestamp::format_epoch_millis;
use crate::webhook::{Event, EventKind};

pub use reporter::{EventReporter, TracingReporter};
pub use signal::{Signal, SignalKind, ABSENT};

/// Dispatch events strictly in input order.
///
/// Each signal is reported before the next event is looked at, so the
/// reporter observes the same order the platform delivered.
pub fn dispatch(events: &[Event], reporter: &dyn EventReporter) -> Vec<Signal> {
    events
        .iter()
        .map(|event| {
            let signal = to_signal(event);
            reporter.report(&signal);
            signal
        })
        .collect()
}

/// Extract the fields an event's type guarantees. Never fails; missing
/// optional fields stay `None`.
pub fn to_signal(event: &Event) -> Signal {
    debug!(
        event_type = %event.kind,
        timestamp = event.timestamp,
        webhook_event_id = ?event.webhook_event_id,
        mode = ?event.mode,
        "event_dispatch"
    );

    let user_id = event.user_id().map(str::to_string);

    let kind = match &event.kind {
        EventKind::Follow => SignalKind::NewSubscriber { user_id },
        EventKind::Unfollow => SignalKind::Unsubscribed { user_id },
        EventKind::Message => {
            let message = event.message.as_ref();
            SignalKind::MessageReceived {
                user_id,
                message_type: message.and_then(|m| m.message_type.clone()),
                text: message.and_then(|m| m.text.clone()),
            }
        }
        EventKind::Other(event_type) => SignalKind::Unhandled {
            event_type: event_type.clone(),
            source: event.source.clone(),
        },
    };

    Signal {
        kind,
        occurred_at: format_epoch_millis(event.timestamp),
        reply_token: event.reply_token.clone(),
        redelivery: event.is_redelivery(),
    }
}

#[cfg(test)]
mod tests {
    use super::reporter::testing::RecordingReporter;
    use super::*;
    use crate::webhook::decode;

    fn events(json: &str) -> Vec<Event> {
        decode(json.as_bytes()).unwrap().events
    }

    #[test]
    fn test_follow_extracts_user_id() {
        let events = events(
            r#"{"destination":"d1","events":[{"type":"follow","source":{"type":"user","userId":"U123"},"timestamp":1700000000000,"replyToken":"rt"}]}"#,
        );
        let reporter = RecordingReporter::default();

        let signals = dispatch(&events, &reporter);

        assert_eq!(signals.len(), 1);
        assert_eq!(
            signals[0].kind,
            SignalKind::NewSubscriber {
                user_id: Some("U123".to_string())
            }
        );
        assert_eq!(signals[0].occurred_at, "2023-11-14T22:13:20.000Z");
        assert_eq!(signals[0].reply_token.as_deref(), Some("rt"));
        assert_eq!(reporter.signals(), signals);
    }

    #[test]
    fn test_follow_without_user_id() {
        let events = events(
            r#"{"events":[{"type":"follow","source":{"type":"user"},"timestamp":1700000000000}]}"#,
        );
        let reporter = RecordingReporter::default();

        let signals = dispatch(&events, &reporter);

        assert_eq!(signals[0].kind, SignalKind::NewSubscriber { user_id: None });
        assert_eq!(signals[0].user_id_or_absent(), ABSENT);
    }

    #[test]
    fn test_missing_source_entirely() {
        let events = events(r#"{"events":[{"type":"message","timestamp":0}]}"#);

        let signals = dispatch(&events, &RecordingReporter::default());

        assert_eq!(
            signals[0].kind,
            SignalKind::MessageReceived {
                user_id: None,
                message_type: None,
                text: None
            }
        );
    }

    #[test]
    fn test_message_extracts_content() {
        let events = events(
            r#"{"events":[{"type":"message","timestamp":0,"source":{"type":"user","userId":"U9"},"message":{"type":"text","id":"1","text":"hello"}}]}"#,
        );

        let signal = to_signal(&events[0]);

        assert_eq!(
            signal.kind,
            SignalKind::MessageReceived {
                user_id: Some("U9".to_string()),
                message_type: Some("text".to_string()),
                text: Some("hello".to_string()),
            }
        );
    }

    #[test]
    fn test_other_type_carries_source() {
        let events = events(
            r#"{"events":[{"type":"join","timestamp":0,"source":{"type":"group","groupId":"C1"}}]}"#,
        );

        let signal = to_signal(&events[0]);

        match signal.kind {
            SignalKind::Unhandled { event_type, source } => {
                assert_eq!(event_type, "join");
                let source = source.unwrap();
                assert_eq!(source.source_type, "group");
                assert_eq!(source.group_id.as_deref(), Some("C1"));
            }
            other => panic!("Expected Unhandled, got {:?}", other),
        }
    }

    #[test]
    fn test_follow_onboarding_hint() {
        let events = events(
            r#"{"events":[
                {"type":"follow","timestamp":0,"source":{"type":"user","userId":"U7"}},
                {"type":"follow","timestamp":0,"source":{"type":"user"}}
            ]}"#,
        );

        let signals = dispatch(&events, &RecordingReporter::default());

        assert_eq!(signals[0].onboarding_hint().as_deref(), Some("LINE_USER_ID=U7"));
        assert!(signals[1].onboarding_hint().is_none());
    }

    #[test]
    fn test_other_type_keeps_unmodelled_source_keys() {
        let events = events(
            r#"{"events":[{"type":"beacon","timestamp":0,"source":{"type":"user","userId":"U1","beaconHwid":"d41d8c"}}]}"#,
        );

        let signal = to_signal(&events[0]);

        assert!(signal
            .to_string()
            .contains(r#""beaconHwid":"d41d8c""#));
    }

    #[test]
    fn test_mistyped_message_keeps_delivery() {
        let events = events(
            r#"{"events":[
                {"type":"follow","timestamp":0,"source":{"type":"user","userId":"U1"}},
                {"type":"message","timestamp":0,"source":{"type":"user","userId":"U2"},"message":{"type":"text","id":123}}
            ]}"#,
        );

        let signals = dispatch(&events, &RecordingReporter::default());

        assert_eq!(signals.len(), 2);
        assert_eq!(
            signals[1].kind,
            SignalKind::MessageReceived {
                user_id: Some("U2".to_string()),
                message_type: Some("text".to_string()),
                text: None,
            }
        );
    }

    #[test]
    fn test_order_preserved() {
        let events = events(
            r#"{"events":[
                {"type":"unfollow","timestamp":1,"source":{"type":"user","userId":"U1"}},
                {"type":"follow","timestamp":2,"source":{"type":"user","userId":"U2"}},
                {"type":"message","timestamp":3,"source":{"type":"user","userId":"U3"}}
            ]}"#,
        );
        let reporter = RecordingReporter::default();

        dispatch(&events, &reporter);

        let reported: Vec<_> = reporter
            .signals()
            .iter()
            .map(|s| (s.name(), s.user_id().map(str::to_string)))
            .collect();
        assert_eq!(
            reported,
            vec![
                ("unsubscribed", Some("U1".to_string())),
                ("new_subscriber", Some("U2".to_string())),
                ("message_received", Some("U3".to_string())),
            ]
        );
    }

    #[test]
    fn test_empty_events_is_noop() {
        let reporter = RecordingReporter::default();

        let signals = dispatch(&[], &reporter);

        assert!(signals.is_empty());
        assert!(reporter.signals().is_empty());
    }

    #[test]
    fn test_redelivery_flag() {
        let events = events(
            r#"{"events":[{"type":"follow","timestamp":0,"deliveryContext":{"isRedelivery":true}}]}"#,
        );

        assert!(to_signal(&events[0]).redelivery);
    }
}
