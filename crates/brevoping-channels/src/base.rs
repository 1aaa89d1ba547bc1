//! Channel trait: the uniform shape every notification sender implements.
//!
//! Each channel (Telegram, WhatsApp, Email) implements this trait to:
//! - `name()`: which `ChannelName` it delivers for
//! - `is_configured()`: whether all required credentials are present
//! - `send()`: deliver one formatted message, exactly one attempt

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Detail reported when a channel is enabled but lacks credentials.
pub const MISSING_CONFIGURATION: &str = "missing configuration";

// ─────────────────────────────────────────────
// ChannelName
// ─────────────────────────────────────────────

/// The fixed set of notification channels.
///
/// Declaration order is the reporting order: `Ord` follows it, so a
/// `BTreeMap<ChannelName, _>` iterates Telegram → WhatsApp → Email.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelName {
    Telegram,
    WhatsApp,
    Email,
}

impl ChannelName {
    /// Every channel, in declaration order.
    pub const ALL: [ChannelName; 3] = [ChannelName::Telegram, ChannelName::WhatsApp, ChannelName::Email];

    /// Identifier used in logs and JSON (e.g. `"whatsapp"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelName::Telegram => "telegram",
            ChannelName::WhatsApp => "whatsapp",
            ChannelName::Email => "email",
        }
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────
// SendOutcome
// ─────────────────────────────────────────────

/// Result of one delivery attempt on one channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SendOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            detail: None,
        }
    }

    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: Some(detail.into()),
        }
    }

    pub fn missing_configuration() -> Self {
        Self::failure(MISSING_CONFIGURATION)
    }
}

// ─────────────────────────────────────────────
// Channel trait
// ─────────────────────────────────────────────

/// Every notification channel implements this trait.
///
/// The `Dispatcher` holds `Arc<dyn Channel>` and invokes `send()` on each
/// enabled channel from its own task.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Which channel this sender delivers for.
    fn name(&self) -> ChannelName;

    /// Whether every required credential/identifier is present.
    fn is_configured(&self) -> bool;

    /// Send one message.
    ///
    /// Returns `Ok(SendOutcome::missing_configuration())` without any I/O
    /// when unconfigured, and `Ok(failure(body))` on a non-success HTTP
    /// status. Transport errors are returned as `Err` and turned into a
    /// failed outcome by the dispatcher.
    async fn send(&self, message: &str, hint: Option<&str>) -> anyhow::Result<SendOutcome>;
}

/// Map an HTTP response onto an outcome: 2xx is success, anything else is a
/// failure carrying the response body.
pub(crate) async fn outcome_from_response(
    channel: ChannelName,
    response: reqwest::Response,
) -> anyhow::Result<SendOutcome> {
    let status = response.status();
    if status.is_success() {
        return Ok(SendOutcome::success());
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    error!(channel = %channel, status = %status, body = %body, "send failed");
    Ok(SendOutcome::failure(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_channel_name_order_is_declaration_order() {
        let mut names = vec![ChannelName::Email, ChannelName::Telegram, ChannelName::WhatsApp];
        names.sort();
        assert_eq!(names, ChannelName::ALL.to_vec());
    }

    #[test]
    fn test_channel_name_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ChannelName::WhatsApp).unwrap(), "whatsapp");
        assert_eq!(ChannelName::Telegram.to_string(), "telegram");
    }

    #[test]
    fn test_outcome_map_serializes_in_channel_order() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(ChannelName::Email, SendOutcome::success());
        outcomes.insert(ChannelName::Telegram, SendOutcome::missing_configuration());

        let json = serde_json::to_string(&outcomes).unwrap();
        assert_eq!(
            json,
            r#"{"telegram":{"success":false,"detail":"missing configuration"},"email":{"success":true}}"#
        );
    }

    #[test]
    fn test_outcome_constructors() {
        assert!(SendOutcome::success().success);
        assert!(SendOutcome::success().detail.is_none());
        let failed = SendOutcome::failure("boom");
        assert!(!failed.success);
        assert_eq!(failed.detail.as_deref(), Some("boom"));
    }
}
