//! Telegram Bot API client
//!
//! Only `setWebhook` is needed. The request is a plain GET with the target URL
//! in the query string, the same URL an operator can open in a browser.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::ProvisionError;

/// Webhook registration with the messaging API
#[async_trait]
pub trait WebhookApi: Send + Sync {
    /// Issue the prepared `setWebhook` request and return the response body
    async fn set_webhook(&self, webhook_url: &str) -> Result<Value, ProvisionError>;
}

/// Client for the Telegram Bot API
pub struct TelegramClient {
    client: Client,
}

impl Default for TelegramClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TelegramClient {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Use a preconfigured reqwest client (proxy, timeouts, TLS roots)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// Response body as JSON, or as a string when it isn't JSON
fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait]
impl WebhookApi for TelegramClient {
    async fn set_webhook(&self, webhook_url: &str) -> Result<Value, ProvisionError> {
        let response = self
            .client
            .get(webhook_url)
            .send()
            .await
            // The URL carries the bot token; keep it out of the error text
            .map_err(|e| ProvisionError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProvisionError::Network(e.without_url().to_string()))?;
        debug!("setWebhook responded {}", status);

        let body = parse_body(&text);

        if !status.is_success() {
            let description = body
                .get("description")
                .and_then(Value::as_str)
                .map(|d| format!(": {}", d))
                .unwrap_or_default();
            return Err(ProvisionError::Network(format!(
                "{} {}{}",
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                description
            )));
        }

        Ok(body)
    }
}
