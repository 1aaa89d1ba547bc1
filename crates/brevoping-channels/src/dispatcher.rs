//! Dispatcher: formats a contact and fans it out to every enabled channel.
//!
//! Responsibilities:
//! - Format the record once
//! - Select channels from the config flags
//! - Send to all enabled channels concurrently via `tokio::spawn`
//! - Wait for every task, converting errors and panics into failed outcomes
//!
//! No channel's failure affects another: each send runs in its own task and
//! every task is awaited regardless of what its siblings did.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use brevoping_core::config::schema::ChannelsConfig;
use brevoping_core::config::ChannelFlags;
use brevoping_core::ContactRecord;

use crate::base::{Channel, ChannelName, SendOutcome};
use crate::email::EmailChannel;
use crate::formatting::format_contact_message;
use crate::registry::enabled_channels;
use crate::telegram::TelegramChannel;
use crate::whatsapp::WhatsAppChannel;

// ─────────────────────────────────────────────
// DispatchResult
// ─────────────────────────────────────────────

/// Aggregate result of one dispatch. Callers inspect `outcomes` per channel.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    /// The formatted notification text.
    pub message: String,
    /// Channels selected by the flags, in declaration order.
    pub enabled_channels: Vec<ChannelName>,
    /// One outcome per enabled channel; `None` when nothing was enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<BTreeMap<ChannelName, SendOutcome>>,
    /// The flags the selection was made from.
    pub config_snapshot: ChannelFlags,
}

impl DispatchResult {
    /// Outcome for a single channel, if it was attempted.
    pub fn outcome(&self, channel: ChannelName) -> Option<&SendOutcome> {
        self.outcomes.as_ref().and_then(|o| o.get(&channel))
    }
}

// ─────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────

/// Routes one formatted contact notification to every enabled channel.
pub struct Dispatcher {
    /// Enable flags, read once from config.
    flags: ChannelFlags,
    /// Registered senders, keyed by channel.
    channels: HashMap<ChannelName, Arc<dyn Channel>>,
}

impl Dispatcher {
    /// Create a dispatcher with no senders registered.
    pub fn new(flags: ChannelFlags) -> Self {
        Self {
            flags,
            channels: HashMap::new(),
        }
    }

    /// Build a dispatcher with the three real senders sharing one HTTP client.
    pub fn from_config(config: &ChannelsConfig) -> Self {
        let client = reqwest::Client::new();
        let mut dispatcher = Self::new(config.flags());
        dispatcher.register(Arc::new(TelegramChannel::new(
            config.telegram.clone(),
            client.clone(),
        )));
        dispatcher.register(Arc::new(WhatsAppChannel::new(
            config.whatsapp.clone(),
            client.clone(),
        )));
        dispatcher.register(Arc::new(EmailChannel::new(config.email.clone(), client)));
        dispatcher
    }

    /// Register a sender. Overwrites any previous sender for the same channel.
    pub fn register(&mut self, channel: Arc<dyn Channel>) {
        self.channels.insert(channel.name(), channel);
    }

    /// Get the registered sender for a channel.
    pub fn get(&self, name: ChannelName) -> Option<&Arc<dyn Channel>> {
        self.channels.get(&name)
    }

    pub fn flags(&self) -> ChannelFlags {
        self.flags
    }

    /// Format `record` and deliver it to every enabled channel.
    pub async fn dispatch(&self, record: &ContactRecord) -> DispatchResult {
        let message = format_contact_message(record);
        let enabled = enabled_channels(&self.flags);

        info!("formatted contact message:\n{message}");

        if enabled.is_empty() {
            info!("no channels enabled; logging only");
            return DispatchResult {
                message,
                enabled_channels: enabled,
                outcomes: None,
                config_snapshot: self.flags,
            };
        }

        info!(channels = ?enabled, "dispatching to {} channel(s)", enabled.len());

        let hint = record.email().map(str::to_string);

        // Spawn every send before awaiting any of them
        let mut handles = Vec::with_capacity(enabled.len());
        for name in &enabled {
            let name = *name;
            let Some(channel) = self.channels.get(&name).cloned() else {
                warn!(channel = %name, "no sender registered for enabled channel");
                handles.push((name, None));
                continue;
            };

            let msg = message.clone();
            let hint = match name {
                ChannelName::Email => hint.clone(),
                _ => None,
            };

            let handle =
                tokio::spawn(async move { channel.send(&msg, hint.as_deref()).await });
            handles.push((name, Some(handle)));
        }

        let mut outcomes = BTreeMap::new();
        for (name, handle) in handles {
            let outcome = match handle {
                None => SendOutcome::missing_configuration(),
                Some(handle) => match handle.await {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(e)) => {
                        error!(channel = %name, error = %e, "channel send failed");
                        SendOutcome::failure(format!("{e:#}"))
                    }
                    Err(e) => {
                        error!(channel = %name, error = %e, "channel task failed");
                        SendOutcome::failure(e.to_string())
                    }
                },
            };

            if outcome.success {
                info!(channel = %name, "notification delivered");
            } else {
                warn!(
                    channel = %name,
                    detail = outcome.detail.as_deref().unwrap_or(""),
                    "notification not delivered"
                );
            }
            outcomes.insert(name, outcome);
        }

        DispatchResult {
            message,
            enabled_channels: enabled,
            outcomes: Some(outcomes),
            config_snapshot: self.flags,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
