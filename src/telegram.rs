//! Minimal Telegram Bot API client.
//!
//! Two endpoints: `sendMessage` for the fan-out and `getUpdates` for
//! recipient discovery. The base URL is injectable so tests can stand in a
//! local mock server.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

/// Default Bot API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Request timeout for API calls.
const TIMEOUT_MS: u64 = 15_000;

/// Payload returned by `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatesPayload {
    pub ok: bool,
    #[serde(default)]
    pub result: Vec<Update>,
}

/// A single inbound update; only message-bearing updates matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<InboundMessage>,
}

/// The message portion of an update.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub chat: Chat,
}

/// Chat a message came from; its id is the recipient identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Client for the Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    /// Client against the public Bot API.
    pub fn new(token: &str) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Client against a non-default API host (tests).
    pub fn with_base_url(token: &str, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(TIMEOUT_MS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Send one message to one chat.
    ///
    /// The provider accepts a GET with url-encoded query parameters; a
    /// non-success status is an error.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let resp = self
            .client
            .get(&url)
            .query(&[("chat_id", chat_id), ("text", text)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("sendMessage to chat {chat_id} returned status {status}"));
        }
        info!("sent message to chat {chat_id}");
        Ok(())
    }

    /// Poll the inbound updates feed.
    ///
    /// Any transport or decode failure is logged and collapses to `None`;
    /// recipient discovery just skips this run.
    pub async fn get_updates(&self) -> Option<UpdatesPayload> {
        let url = format!("{}/bot{}/getUpdates", self.base_url, self.token);
        let resp = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("getUpdates failed: {e}");
                return None;
            }
        };

        let status = resp.status();
        if !status.is_success() {
            warn!("getUpdates returned status {status}");
            return None;
        }

        match resp.json::<UpdatesPayload>().await {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!("getUpdates payload did not decode: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates_payload_decodes() {
        let raw = r#"{
            "ok": true,
            "result": [
                {"update_id": 1, "message": {"chat": {"id": 111}, "text": "hi"}},
                {"update_id": 2, "edited_message": {"chat": {"id": 222}}}
            ]
        }"#;

        let payload: UpdatesPayload = serde_json::from_str(raw).unwrap();
        assert!(payload.ok);
        assert_eq!(payload.result.len(), 2);
        assert_eq!(payload.result[0].message.as_ref().unwrap().chat.id, 111);
        // Non-message updates carry no recipient.
        assert!(payload.result[1].message.is_none());
    }

    #[test]
    fn test_empty_result_decodes() {
        let payload: UpdatesPayload = serde_json::from_str(r#"{"ok": true, "result": []}"#).unwrap();
        assert!(payload.result.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = TelegramClient::with_base_url("123:abc", "http://localhost:9999/");
        assert_eq!(client.base_url, "http://localhost:9999");
    }
}
