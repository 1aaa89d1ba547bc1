//! Configuration schema.
//!
//! Hierarchy: `Config` → `ChannelsConfig` (`TelegramConfig`, `WhatsAppConfig`,
//! `EmailConfig`), `BrevoConfig`, `GatewayConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.brevoping/config.json` + env vars.
///
/// Resolved once at startup and passed by reference from then on.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub channels: ChannelsConfig,
    pub brevo: BrevoConfig,
    pub gateway: GatewayConfig,
}

/// True when the value is missing for configuration purposes.
fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

// ─────────────────────────────────────────────
// Channels
// ─────────────────────────────────────────────

/// All notification channel configurations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelsConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

impl ChannelsConfig {
    /// Snapshot of the three enable flags.
    pub fn flags(&self) -> ChannelFlags {
        ChannelFlags {
            telegram_enabled: self.telegram.enabled,
            whatsapp_enabled: self.whatsapp.enabled,
            email_enabled: self.email.enabled,
        }
    }
}

/// Which channels are logically enabled, independent of credentials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelFlags {
    pub telegram_enabled: bool,
    pub whatsapp_enabled: bool,
    pub email_enabled: bool,
}

/// Telegram Bot API config.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Bot token from @BotFather.
    #[serde(default)]
    pub bot_token: String,
    /// Chat (user, group or channel) that receives notifications.
    #[serde(default)]
    pub chat_id: String,
    /// Custom API base URL (defaults to `https://api.telegram.org`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl TelegramConfig {
    pub fn is_configured(&self) -> bool {
        !is_blank(&self.bot_token) && !is_blank(&self.chat_id)
    }
}

/// WhatsApp Cloud API config.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WhatsAppConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub access_token: String,
    /// Sending phone number ID from the Meta business dashboard.
    #[serde(default)]
    pub phone_number_id: String,
    /// Recipient number in international format, digits only.
    #[serde(default)]
    pub recipient_number: String,
    /// Custom API base URL (defaults to `https://graph.facebook.com/v19.0`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl WhatsAppConfig {
    pub fn is_configured(&self) -> bool {
        !is_blank(&self.access_token)
            && !is_blank(&self.phone_number_id)
            && !is_blank(&self.recipient_number)
    }
}

/// Brevo transactional email config.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Brevo API key used for `/smtp/email`.
    #[serde(default)]
    pub api_key: String,
    /// Verified sender address.
    #[serde(default)]
    pub from: String,
    /// Notification recipient.
    #[serde(default)]
    pub to: String,
    /// Custom API base URL (defaults to `https://api.brevo.com/v3`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl EmailConfig {
    pub fn is_configured(&self) -> bool {
        !is_blank(&self.api_key) && !is_blank(&self.from) && !is_blank(&self.to)
    }
}

// ─────────────────────────────────────────────
// Brevo (enrichment)
// ─────────────────────────────────────────────

/// Brevo contacts API settings used to enrich incoming webhooks.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrevoConfig {
    #[serde(default)]
    pub api_key: String,
    /// Fetch the full contact before formatting. Ignored without an API key.
    #[serde(default = "default_true")]
    pub enrich: bool,
    /// Custom API base URL (defaults to `https://api.brevo.com/v3`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for BrevoConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            enrich: true,
            api_base: None,
        }
    }
}

impl BrevoConfig {
    pub fn is_configured(&self) -> bool {
        !is_blank(&self.api_key)
    }
}

// ─────────────────────────────────────────────
// Gateway
// ─────────────────────────────────────────────

/// HTTP gateway configuration (inbound Brevo webhooks).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
