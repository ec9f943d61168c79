use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FeedError;

/// A single feed entry as served by `GET /messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

/// A successfully decoded response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Messages(Vec<Message>),
    /// Empty array, or a body that is not an array at all
    Empty,
}

impl Payload {
    pub fn len(&self) -> usize {
        match self {
            Payload::Messages(messages) => messages.len(),
            Payload::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode a raw response body.
pub fn parse_payload(body: &str) -> Result<Payload, FeedError> {
    let value: Value = serde_json::from_str(body)?;
    payload_from_value(value)
}

/// Validate an already parsed body. The network payload is not trusted:
/// every element of the list must be an object with a string `text`.
pub fn payload_from_value(value: Value) -> Result<Payload, FeedError> {
    if let Some(message) = value.get("error").and_then(error_text) {
        return Err(FeedError::ServerReported(message));
    }

    let items = match value {
        Value::Array(items) if !items.is_empty() => items,
        _ => return Ok(Payload::Empty),
    };

    let messages = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| message_from_value(i, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Payload::Messages(messages))
}

fn message_from_value(index: usize, item: Value) -> Result<Message, FeedError> {
    let Value::Object(mut fields) = item else {
        return Err(FeedError::MalformedPayload(format!(
            "елемент {} не є об'єктом",
            index
        )));
    };

    let text = match fields.remove("text") {
        Some(Value::String(text)) => text,
        _ => {
            return Err(FeedError::MalformedPayload(format!(
                "елемент {} не містить тексту",
                index
            )))
        }
    };

    // Anything but a non-empty string counts as "no timestamp"
    let timestamp = match fields.remove("timestamp") {
        Some(Value::String(ts)) if !ts.is_empty() => Some(ts),
        _ => None,
    };

    Ok(Message { text, timestamp })
}

/// Only truthy `error` values signal a failure.
fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
