//! Channel selection from configuration flags.

use brevoping_core::config::ChannelFlags;

use crate::base::ChannelName;

/// Whether `channel` is switched on in `flags`.
pub fn is_enabled(flags: &ChannelFlags, channel: ChannelName) -> bool {
    match channel {
        ChannelName::Telegram => flags.telegram_enabled,
        ChannelName::WhatsApp => flags.whatsapp_enabled,
        ChannelName::Email => flags.email_enabled,
    }
}

/// The enabled channels in declaration order (Telegram, WhatsApp, Email).
///
/// Reads only the flags; a channel with missing credentials is still listed.
pub fn enabled_channels(flags: &ChannelFlags) -> Vec<ChannelName> {
    ChannelName::ALL
        .into_iter()
        .filter(|channel| is_enabled(flags, *channel))
        .collect()
}
