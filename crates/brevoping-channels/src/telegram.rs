//! Telegram channel: Bot API `sendMessage`.
//!
//! One `POST {api_base}/bot{token}/sendMessage` per notification with
//! `{ chat_id, text, parse_mode: "Markdown" }`.

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use brevoping_core::config::schema::TelegramConfig;

use crate::base::{outcome_from_response, Channel, ChannelName, SendOutcome};

/// Default Telegram Bot API base URL.
const DEFAULT_API_BASE: &str = "https://api.telegram.org";

// ─────────────────────────────────────────────
// TelegramChannel
// ─────────────────────────────────────────────

/// Telegram bot sender.
pub struct TelegramChannel {
    client: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramChannel {
    /// Create a new Telegram channel sharing `client`.
    pub fn new(config: TelegramConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    /// Full `sendMessage` URL. Contains the bot token; never log it.
    fn send_message_url(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!("{}/bot{}/sendMessage", base, self.config.bot_token)
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> ChannelName {
        ChannelName::Telegram
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn send(&self, message: &str, _hint: Option<&str>) -> anyhow::Result<SendOutcome> {
        if !self.is_configured() {
            warn!("telegram not configured (token/chat id missing)");
            return Ok(SendOutcome::missing_configuration());
        }

        debug!(chat_id = %self.config.chat_id, chars = message.len(), "sending telegram message");

        let response = self
            .client
            .post(self.send_message_url())
            .json(&json!({
                "chat_id": self.config.chat_id,
                "text": message,
                "parse_mode": "Markdown",
            }))
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("telegram request failed")?;

        outcome_from_response(self.name(), response).await
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
