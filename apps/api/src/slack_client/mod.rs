//! Reply delivery: posts composed replies back to the chat platform.
//!
//! Handlers only see `Arc<dyn ReplySink>`. `SlackClient` talks to the Slack
//! Web API; `LogSink` stands in when no API token is configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Slack rejected the message: {0}")]
    Rejected(String),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

/// A reply ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundReply {
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    pub text: String,
}

#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn post_reply(&self, reply: &OutboundReply) -> Result<(), SlackError>;
}

// ────────────────────────────────────────────────────────────────────────────
// SlackClient
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_ts: Option<&'a str>,
    text: &'a str,
    link_names: bool,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Slack Web API client with retry on 429 and 5xx.
#[derive(Clone)]
pub struct SlackClient {
    client: Client,
    api_url: String,
    token: String,
}

impl SlackClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self, SlackError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn post_message_url(&self) -> String {
        format!("{}/chat.postMessage", self.api_url)
    }
}

#[async_trait]
impl ReplySink for SlackClient {
    async fn post_reply(&self, reply: &OutboundReply) -> Result<(), SlackError> {
        let request_body = PostMessageRequest {
            channel: &reply.channel,
            thread_ts: reply.thread_ts.as_deref(),
            text: &reply.text,
            link_names: true,
        };
        let url = self.post_message_url();

        let mut last_error: Option<SlackError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "chat.postMessage attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&url)
                .bearer_auth(&self.token)
                .json(&request_body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(SlackError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Slack API returned {}: {}", status, body);
                last_error = Some(SlackError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(SlackError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let body: PostMessageResponse = response.json().await?;
            if !body.ok {
                return Err(SlackError::Rejected(
                    body.error.unwrap_or_else(|| "unknown_error".to_string()),
                ));
            }

            debug!(channel = %reply.channel, "Reply posted");
            return Ok(());
        }

        Err(last_error.unwrap_or(SlackError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LogSink
// ────────────────────────────────────────────────────────────────────────────

/// Logs replies instead of delivering them. Used when no token is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl ReplySink for LogSink {
    async fn post_reply(&self, reply: &OutboundReply) -> Result<(), SlackError> {
        info!(
            channel = %reply.channel,
            thread_ts = reply.thread_ts.as_deref().unwrap_or(""),
            chars = reply.text.chars().count(),
            "No Slack token configured; reply not delivered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_message_url_strips_trailing_slash() {
        let client = SlackClient::new("https://slack.example/api/", "xoxb-test").unwrap();
        assert_eq!(
            client.post_message_url(),
            "https://slack.example/api/chat.postMessage"
        );
    }

    #[test]
    fn test_request_omits_missing_thread() {
        let body = PostMessageRequest {
            channel: "C1",
            thread_ts: None,
            text: "hi",
            link_names: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("thread_ts").is_none());
        assert_eq!(json["link_names"], true);
    }

    #[test]
    fn test_response_error_deserializes() {
        let body: PostMessageResponse =
            serde_json::from_str(r#"{"ok": false, "error": "channel_not_found"}"#).unwrap();
        assert!(!body.ok);
        assert_eq!(body.error.as_deref(), Some("channel_not_found"));
    }

    #[tokio::test]
    async fn test_log_sink_accepts_everything() {
        let reply = OutboundReply {
            channel: "C1".to_string(),
            thread_ts: Some("1.0".to_string()),
            text: "hello".to_string(),
        };
        assert!(LogSink.post_reply(&reply).await.is_ok());
    }
}
