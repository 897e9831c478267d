//! Chat message record and inbound payload parsing

use chrono::Utc;
use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

/// Display name attributed to payloads that carry no sender
pub const REMOTE_USER: &str = "Remote";

/// Length of the random suffix in client-generated ids
const ID_SUFFIX_LEN: usize = 6;

/// Error encoding a message for the wire
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A single chat message as it crosses the wire
///
/// One JSON object per message. `time` is epoch milliseconds. `id` is
/// absent only on synthetic records wrapped from plain-text payloads;
/// messages built for sending always carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub user: String,
    pub text: String,
    #[serde(default)]
    pub time: i64,
}

impl ChatMessage {
    /// Build a message ready to send: fresh client id, current time
    pub fn outgoing(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Some(generate_id()),
            user: user.into(),
            text: text.into(),
            time: now_millis(),
        }
    }

    /// Wrap a plain-text payload as a synthetic record from the remote
    pub fn wrapped(raw: impl Into<String>) -> Self {
        Self {
            id: None,
            user: REMOTE_USER.to_string(),
            text: raw.into(),
            time: now_millis(),
        }
    }

    /// Encode as a JSON text frame
    pub fn to_wire(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Sender display name, defaulting to the remote placeholder
    pub fn display_user(&self) -> &str {
        if self.user.is_empty() {
            REMOTE_USER
        } else {
            &self.user
        }
    }

    /// Timestamp, substituting `fallback` when the payload carried none
    pub fn time_or(&self, fallback: i64) -> i64 {
        if self.time > 0 {
            self.time
        } else {
            fallback
        }
    }
}

/// Result of parsing an inbound payload
///
/// Parsing is total: payloads that are not a structured record are
/// wrapped, never dropped and never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    /// Payload parsed as a structured message record
    Record(ChatMessage),
    /// Plain-text payload wrapped as a synthetic record
    Wrapped(ChatMessage),
}

impl InboundPayload {
    pub fn message(&self) -> &ChatMessage {
        match self {
            Self::Record(msg) | Self::Wrapped(msg) => msg,
        }
    }

    pub fn into_message(self) -> ChatMessage {
        match self {
            Self::Record(msg) | Self::Wrapped(msg) => msg,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Self::Wrapped(_))
    }
}

/// Parse an inbound text frame
///
/// JSON objects with at least a `text` field parse as records; anything
/// else becomes a synthetic record attributed to [`REMOTE_USER`].
pub fn parse_inbound(raw: &str) -> InboundPayload {
    match serde_json::from_str::<ChatMessage>(raw) {
        Ok(msg) => InboundPayload::Record(msg),
        Err(_) => InboundPayload::Wrapped(ChatMessage::wrapped(raw)),
    }
}

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a client-side message id
///
/// Base-36 epoch-ms prefix plus a random alphanumeric suffix. Collisions
/// among concurrently pending sends are accepted as negligible; no global
/// uniqueness is enforced.
pub fn generate_id() -> String {
    let millis = now_millis().max(0) as u64;
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{}-{}", to_base36(millis), suffix.to_lowercase())
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    // DIGITS is ASCII
    String::from_utf8(out).unwrap_or_default()
}
