//! Frame classification and event extraction for firehose messages

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// One indicator observation as published by a provider.
///
/// The payload arrives embedded as a JSON string inside the outer envelope's
/// `message` field. `tags` is a comma-separated token list; `lasttime` falls
/// back to processing time when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub provider: String,
    pub indicator: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub lasttime: Option<DateTime<Utc>>,
}

/// Classification of one inbound frame.
#[derive(Debug, Clone)]
pub enum Decoded {
    /// Control-plane traffic (keepalives, subscription acks) and our own
    /// submissions echoed back - never touches correlation state.
    Admin,
    Data(RawEvent),
    Malformed,
}

pub struct MessageDecoder {
    origin: String,
}

impl MessageDecoder {
    /// `origin` is the local `{user}/{feed}` identity; events carrying it as
    /// their provider are dropped to avoid a feedback loop with our own
    /// submissions.
    pub fn new(origin: String) -> Self {
        Self { origin }
    }

    pub fn decode(&self, raw: &str) -> Decoded {
        let envelope: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => return Decoded::Malformed,
        };

        if is_admin_envelope(&envelope) {
            return Decoded::Admin;
        }

        let payload = match envelope.get("message").and_then(Value::as_str) {
            Some(payload) => payload,
            None => return Decoded::Malformed,
        };

        let event: RawEvent = match serde_json::from_str(payload) {
            Ok(event) => event,
            Err(_) => return Decoded::Malformed,
        };

        if event.provider == self.origin {
            log::debug!("dropping self-origin event for {}", event.indicator);
            return Decoded::Admin;
        }

        Decoded::Data(event)
    }
}

/// Keepalives carry a `type` marker, subscription acks a `status` field.
fn is_admin_envelope(envelope: &Value) -> bool {
    if envelope.get("status").is_some() {
        return true;
    }

    matches!(
        envelope.get("type").and_then(Value::as_str),
        Some("keepalive") | Some("ping")
    )
}
