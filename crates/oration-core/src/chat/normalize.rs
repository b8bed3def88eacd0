//! Send-message payload normalization.
//!
//! Transports deliver the send-message payload in several wrappers depending
//! on batching: a bare object, a one-element array, an object nested under a
//! wrapper key, or a JSON document encoded as a string. [`PayloadShape`]
//! names those shapes and [`normalize_payload`] reduces any of them to a
//! [`SendMessageInput`].

use oration_types::chat::SendMessageInput;
use oration_types::error::ChatError;
use serde_json::{Map, Value};

/// Wrapper keys, in the order they are checked.
pub const WRAPPER_KEYS: [&str; 3] = ["input", "json", "0"];

/// The outer shape of a raw send-message payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    /// A JSON array; carries its first element, if any.
    Sequence(Option<&'a Value>),
    /// An object holding the real payload under one of [`WRAPPER_KEYS`].
    Wrapped { key: &'static str, inner: &'a Value },
    /// A JSON document encoded as a string.
    Encoded(&'a str),
    /// A plain `{sessionId?, content}` object.
    Record(&'a Map<String, Value>),
    /// Numbers, booleans and null.
    Unsupported,
}

impl<'a> PayloadShape<'a> {
    /// Classify a payload. Arrays win over wrapper keys, wrapper keys over
    /// plain records.
    pub fn detect(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => PayloadShape::Sequence(items.first()),
            Value::Object(map) => WRAPPER_KEYS
                .iter()
                .find_map(|&key| {
                    map.get(key)
                        .map(|inner| PayloadShape::Wrapped { key, inner })
                })
                .unwrap_or(PayloadShape::Record(map)),
            Value::String(text) => PayloadShape::Encoded(text),
            _ => PayloadShape::Unsupported,
        }
    }
}

/// Reduce a raw payload to its canonical `{sessionId?, content}` form.
///
/// Sequences and wrappers are peeled exactly once. `content` must be a string
/// with at least one non-whitespace character. A missing, null, empty or
/// non-string `sessionId` means "start a new session".
pub fn normalize_payload(payload: &Value) -> Result<SendMessageInput, ChatError> {
    let shape = PayloadShape::detect(payload);
    tracing::debug!(?shape, "normalizing send-message payload");

    let inner = match shape {
        PayloadShape::Sequence(Some(first)) => first,
        PayloadShape::Sequence(None) => return Err(invalid("payload sequence is empty")),
        PayloadShape::Wrapped { inner, .. } => inner,
        PayloadShape::Encoded(_) | PayloadShape::Record(_) => payload,
        PayloadShape::Unsupported => return Err(invalid("unsupported payload type")),
    };

    match inner {
        Value::String(text) => {
            let decoded: Value = serde_json::from_str(text)
                .map_err(|e| invalid(format!("payload string is not valid JSON: {e}")))?;
            read_fields(&decoded)
        }
        other => read_fields(other),
    }
}

fn read_fields(value: &Value) -> Result<SendMessageInput, ChatError> {
    let Value::Object(record) = value else {
        return Err(invalid("payload is not an object"));
    };

    let content = match record.get("content") {
        Some(Value::String(content)) if !content.trim().is_empty() => content.clone(),
        _ => return Err(invalid("content must be a non-empty string")),
    };

    let session_id = match record.get("sessionId") {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        _ => None,
    };

    Ok(SendMessageInput {
        session_id,
        content,
    })
}

fn invalid(reason: impl Into<String>) -> ChatError {
    ChatError::InvalidInput(reason.into())
}
