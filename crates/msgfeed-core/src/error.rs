//! Error types for the message feed

use thiserror::Error;

/// Everything that can go wrong between issuing a request and having a
/// renderable list. All variants end up in the same error block on screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("{0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("Сервер повернув помилку: {0}")]
    HttpStatus(u16),

    /// The payload carried an `error` field
    #[error("{0}")]
    ServerReported(String),

    /// The body was not JSON, or not shaped like a message list
    #[error("Некоректна відповідь сервера: {0}")]
    MalformedPayload(String),

    /// Refused before any request was made
    #[error("{0}")]
    Rejected(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FeedError::HttpStatus(status.as_u16()),
            None => FeedError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::MalformedPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_message_contains_code() {
        let err = FeedError::HttpStatus(500);
        assert_eq!(err.to_string(), "Сервер повернув помилку: 500");
    }

    #[test]
    fn test_server_reported_is_verbatim() {
        let err = FeedError::ServerReported("database is down".to_string());
        assert_eq!(err.to_string(), "database is down");
    }

    #[test]
    fn test_rejected_is_verbatim() {
        let err = FeedError::Rejected("Порожнє повідомлення".to_string());
        assert_eq!(err.to_string(), "Порожнє повідомлення");
    }

    #[test]
    fn test_json_error_becomes_malformed_payload() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: FeedError = parse_err.into();
        assert!(matches!(err, FeedError::MalformedPayload(_)));
    }
}
