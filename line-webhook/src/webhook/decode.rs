//! Envelope decoding from the raw request body.

use thiserror::Error;

use super::types::Envelope;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed webhook body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a raw webhook body into an [`Envelope`].
///
/// The bytes are read as-is; callers verify the signature over the same
/// slice before calling this.
pub fn decode(body: &[u8]) -> Result<Envelope, DecodeError> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::EventKind;

    #[test]
    fn test_decode_follow_envelope() {
        let body = br#"{"destination":"d1","events":[{"type":"follow","source":{"type":"user","userId":"U123"},"timestamp":1700000000000}]}"#;

        let envelope = decode(body).unwrap();

        assert_eq!(envelope.destination, "d1");
        assert_eq!(envelope.events.len(), 1);
        assert_eq!(envelope.events[0].kind, EventKind::Follow);
        assert_eq!(envelope.events[0].user_id(), Some("U123"));
    }

    #[test]
    fn test_decode_empty_events() {
        let envelope = decode(br#"{"destination":"d1","events":[]}"#).unwrap();
        assert!(envelope.events.is_empty());
    }

    #[test]
    fn test_decode_missing_destination_is_allowed() {
        let envelope = decode(br#"{"events":[]}"#).unwrap();
        assert_eq!(envelope.destination, "");
    }

    #[test]
    fn test_decode_not_json() {
        assert!(matches!(decode(b"not valid json"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_missing_events() {
        assert!(decode(br#"{"destination":"d1"}"#).is_err());
    }

    #[test]
    fn test_decode_events_type_mismatch() {
        assert!(decode(br#"{"destination":"d1","events":"nope"}"#).is_err());
        assert!(decode(br#"[]"#).is_err());
    }

    #[test]
    fn test_decode_event_without_timestamp() {
        assert!(decode(br#"{"events":[{"type":"follow"}]}"#).is_err());
    }

    #[test]
    fn test_decode_empty_body() {
        assert!(decode(b"").is_err());
    }
}
