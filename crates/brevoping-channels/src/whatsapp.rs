//! WhatsApp channel: Meta WhatsApp Cloud API text messages.
//!
//! `POST {api_base}/{phone_number_id}/messages` with bearer auth and
//! `{ messaging_product: "whatsapp", to, type: "text", text: { body } }`.

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use brevoping_core::config::schema::WhatsAppConfig;

use crate::base::{outcome_from_response, Channel, ChannelName, SendOutcome};

/// Default Graph API base URL (pinned version).
const DEFAULT_API_BASE: &str = "https://graph.facebook.com/v19.0";

/// WhatsApp Cloud API sender.
pub struct WhatsAppChannel {
    client: reqwest::Client,
    config: WhatsAppConfig,
}

impl WhatsAppChannel {
    pub fn new(config: WhatsAppConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    fn messages_url(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!("{}/{}/messages", base, self.config.phone_number_id)
    }
}

#[async_trait]
impl Channel for WhatsAppChannel {
    fn name(&self) -> ChannelName {
        ChannelName::WhatsApp
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn send(&self, message: &str, _hint: Option<&str>) -> anyhow::Result<SendOutcome> {
        if !self.is_configured() {
            warn!("whatsapp not configured (token/phone/recipient missing)");
            return Ok(SendOutcome::missing_configuration());
        }

        debug!(to = %self.config.recipient_number, "sending whatsapp message");

        let response = self
            .client
            .post(self.messages_url())
            .bearer_auth(&self.config.access_token)
            .json(&json!({
                "messaging_product": "whatsapp",
                "to": self.config.recipient_number,
                "type": "text",
                "text": { "body": message },
            }))
            .send()
            .await
            .context("whatsapp request failed")?;

        outcome_from_response(self.name(), response).await
    }
}
