//! `brevoping status`: show configuration and channel status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use brevoping_channels::registry::is_enabled;
use brevoping_channels::ChannelName;
use brevoping_core::config::{get_config_path, load_config, Config};
use brevoping_core::utils::preview_secret;

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    println!();
    println!("{}", "🔔 BrevoPing Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        path.display(),
        if path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );
    println!(
        "  {:<18} {}:{}",
        "Gateway:".bold(),
        config.gateway.host,
        config.gateway.port
    );

    println!();
    println!("  {}", "Channels:".bold());
    for name in ChannelName::ALL {
        println!("    {:<20} {}", name.as_str(), channel_status(&config, name));
    }

    println!();
    let enrichment = if !config.brevo.enrich {
        format!("{}", "· disabled".dimmed())
    } else if config.brevo.is_configured() {
        format!("{} (key {})", "✓".green(), preview_secret(&config.brevo.api_key))
    } else {
        format!("{}", "· no api key".dimmed())
    };
    println!("  {:<18} {}", "Enrichment:".bold(), enrichment);
    println!();

    Ok(())
}

/// One status cell: enabled flag, credentials state, and a secret preview.
fn channel_status(config: &Config, name: ChannelName) -> String {
    let channels = &config.channels;
    let enabled = is_enabled(&channels.flags(), name);
    let configured = match name {
        ChannelName::Telegram => channels.telegram.is_configured(),
        ChannelName::WhatsApp => channels.whatsapp.is_configured(),
        ChannelName::Email => channels.email.is_configured(),
    };

    if !enabled {
        return format!("{}", "· disabled".dimmed());
    }
    if !configured {
        return format!("{} enabled, {}", "✗".red(), "missing configuration".red());
    }

    let detail = match name {
        ChannelName::Telegram => format!(
            "token {} → chat {}",
            preview_secret(&config.channels.telegram.bot_token),
            config.channels.telegram.chat_id
        ),
        ChannelName::WhatsApp => format!(
            "token {} → {}",
            preview_secret(&config.channels.whatsapp.access_token),
            config.channels.whatsapp.recipient_number
        ),
        ChannelName::Email => format!(
            "{} → {}",
            config.channels.email.from, config.channels.email.to
        ),
    };
    format!("{} {}", "✓".green(), detail.dimmed())
}
