use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::FeedError;
use crate::message::{parse_payload, Payload};

const UNKNOWN_ERROR: &str = "Невідома помилка";

/// Where the feed view gets its messages from.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// `GET /messages?limit=<limit>`
    async fn fetch_messages(&self, limit: u32) -> Result<Payload, FeedError>;

    /// `POST /messages` with a new message text.
    async fn post_message(&self, text: &str) -> Result<(), FeedError>;
}

#[derive(Serialize)]
struct NewMessage<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct PostReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the messages API.
#[derive(Clone)]
pub struct MessagesApi {
    client: Client,
    base_url: String,
}

impl MessagesApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url)
    }
}

#[async_trait]
impl MessageSource for MessagesApi {
    async fn fetch_messages(&self, limit: u32) -> Result<Payload, FeedError> {
        let response = self
            .client
            .get(self.messages_url())
            .query(&[("limit", limit)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::HttpStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_payload(&body)
    }

    async fn post_message(&self, text: &str) -> Result<(), FeedError> {
        let response = self
            .client
            .post(self.messages_url())
            .json(&NewMessage { text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::HttpStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        let reply: PostReply = serde_json::from_str(&body)?;

        if reply.success {
            Ok(())
        } else {
            Err(FeedError::ServerReported(
                reply
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ))
        }
    }
}
