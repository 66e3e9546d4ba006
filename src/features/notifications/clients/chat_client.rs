use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::config::ChatConfig;
use crate::core::error::{AppError, Result};
use crate::features::tickets::models::ChatThreadRef;

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_ts: Option<&'a str>,
}

/// Response shape of the chat webhook. Some webhook endpoints echo back the
/// channel and message timestamp; when they do, we keep the reference so
/// later reopens can reply in-thread.
#[derive(Debug, Deserialize)]
struct WebhookResponse {
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    ts: Option<String>,
}

/// Client for the configured chat incoming webhook
pub struct ChatClient {
    http_client: reqwest::Client,
    webhook_url: Option<String>,
}

impl ChatClient {
    pub fn new(config: &ChatConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            webhook_url: config.webhook_url.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Post a top-level message. Returns a thread reference when the
    /// webhook reports one.
    pub async fn post_message(&self, text: &str) -> Result<Option<ChatThreadRef>> {
        self.post(text, None).await
    }

    /// Reply in an existing thread.
    pub async fn post_thread_reply(&self, thread: &ChatThreadRef, text: &str) -> Result<()> {
        self.post(text, Some(&thread.thread_ts)).await?;
        Ok(())
    }

    async fn post(&self, text: &str, thread_ts: Option<&str>) -> Result<Option<ChatThreadRef>> {
        let Some(url) = self.webhook_url.as_deref() else {
            return Ok(None);
        };

        let message = WebhookMessage { text, thread_ts };

        let response = self
            .http_client
            .post(url)
            .json(&message)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Chat webhook request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Chat webhook returned HTTP {}",
                response.status()
            )));
        }

        // Plain webhooks answer with a bare "ok" body; richer endpoints
        // return JSON with the posted message's coordinates.
        let parsed = response.json::<WebhookResponse>().await.ok();

        Ok(parsed.and_then(|r| match (r.channel, r.ts) {
            (Some(channel), Some(ts)) => Some(ChatThreadRef {
                channel,
                thread_ts: ts,
            }),
            _ => None,
        }))
    }
}
