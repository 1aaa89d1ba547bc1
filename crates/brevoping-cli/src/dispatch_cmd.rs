//! `brevoping dispatch` / `brevoping format`: run a payload through the
//! pipeline once, outside the gateway.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use brevoping_brevo::enrich;
use brevoping_channels::{format_contact_message, DispatchResult, Dispatcher};
use brevoping_core::config::Config;
use brevoping_core::contact::parse_payload;

use crate::helpers;

/// Parse, optionally enrich, and dispatch one payload; print the result as JSON.
pub async fn run(config: Config, file: Option<&Path>, enrich_contact: bool) -> Result<()> {
    let body = helpers::read_input(file)?;
    let result = dispatch_payload(&config, &body, enrich_contact).await?;

    let json = serde_json::to_string_pretty(&result).context("failed to serialize result")?;
    println!("{json}");
    Ok(())
}

/// Print the formatted notification for a payload.
pub fn format(file: Option<&Path>) -> Result<()> {
    let body = helpers::read_input(file)?;
    write_formatted(&body, &mut std::io::stdout().lock())
}

fn write_formatted(body: &[u8], out: &mut impl Write) -> Result<()> {
    let record = parse_payload(body)?;
    writeln!(out, "{}", format_contact_message(&record)).context("failed to write message")?;
    Ok(())
}

async fn dispatch_payload(config: &Config, body: &[u8], enrich_contact: bool) -> Result<DispatchResult> {
    let mut record = parse_payload(body)?;

    if enrich_contact {
        if let Some(client) = helpers::build_brevo_client(&config.brevo, reqwest::Client::new()) {
            record = enrich(&client, record).await;
        }
    }

    let dispatcher = Dispatcher::from_config(&config.channels);
    let result = dispatcher.dispatch(&record).await;

    info!(
        channels = ?result.enabled_channels,
        failed = result
            .outcomes
            .as_ref()
            .map_or(0, |o| o.values().filter(|outcome| !outcome.success).count()),
        "dispatch finished"
    );

    Ok(result)
}
