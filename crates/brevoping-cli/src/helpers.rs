//! Shared CLI helpers: payload input, client construction, banner.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use brevoping_brevo::BrevoClient;
use brevoping_core::config::schema::BrevoConfig;

/// Read a payload from `file`, or from stdin when `None`.
pub fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read payload from stdin")?;
            Ok(buf)
        }
    }
}

/// Brevo lookup client, if enrichment is switched on and an API key is set.
pub fn build_brevo_client(config: &BrevoConfig, http: reqwest::Client) -> Option<Arc<BrevoClient>> {
    if !config.enrich {
        info!("contact enrichment disabled");
        return None;
    }
    if !config.is_configured() {
        info!("no brevo api key; contact enrichment off");
        return None;
    }
    Some(Arc::new(BrevoClient::new(config, http)))
}

/// Print the startup banner.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🔔 BrevoPing".cyan().bold(), version.dimmed());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"id":1}"#).unwrap();

        let bytes = read_input(Some(file.path())).unwrap();
        assert_eq!(bytes, br#"{"id":1}"#);
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_brevo_client_requires_key_and_flag() {
        let http = reqwest::Client::new();

        let mut config = BrevoConfig::default();
        assert!(build_brevo_client(&config, http.clone()).is_none());

        config.api_key = "xkeysib-1".to_string();
        assert!(build_brevo_client(&config, http.clone()).is_some());

        config.enrich = false;
        assert!(build_brevo_client(&config, http).is_none());
    }
}
