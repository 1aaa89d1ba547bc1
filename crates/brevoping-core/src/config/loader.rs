//! Config loader: reads `~/.brevoping/config.json`, then layers the
//! deployment environment on top.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.brevoping/config.json` (or an explicit path)
//! 3. `.env` in the working directory, loaded into the process environment
//! 4. Environment variables (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path (or `path`) + `.env` + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    match dotenvy::dotenv() {
        Ok(env_path) => debug!("Loaded environment from {}", env_path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env: {}", e),
    }

    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    // Ensure parent directory exists
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply process environment overrides on top of a loaded config.
fn apply_env_overrides(config: Config) -> Config {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup.
///
/// Supported variables:
/// - `TELEGRAM_ENABLED`, `WHATSAPP_ENABLED`, `EMAIL_ENABLED` (`true` / `1`)
/// - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`
/// - `WHATSAPP_ACCESS_TOKEN`, `WHATSAPP_PHONE_NUMBER_ID`, `WHATSAPP_RECIPIENT_NUMBER`
/// - `BREVO_EMAIL_API_KEY`, `BREVO_EMAIL_FROM`, `BREVO_EMAIL_TO`
/// - `BREVO_API_KEY` (falls back to `BREVO_EMAIL_API_KEY`), `BREVO_ENRICH`
/// - `BREVOPING_GATEWAY__HOST`, `BREVOPING_GATEWAY__PORT`
fn apply_overrides<F>(mut config: Config, var: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let channels = &mut config.channels;

    // Enable flags
    if let Some(val) = var("TELEGRAM_ENABLED") {
        channels.telegram.enabled = parse_bool(&val);
    }
    if let Some(val) = var("WHATSAPP_ENABLED") {
        channels.whatsapp.enabled = parse_bool(&val);
    }
    if let Some(val) = var("EMAIL_ENABLED") {
        channels.email.enabled = parse_bool(&val);
    }

    // Telegram
    if let Some(val) = var("TELEGRAM_BOT_TOKEN") {
        channels.telegram.bot_token = val;
    }
    if let Some(val) = var("TELEGRAM_CHAT_ID") {
        channels.telegram.chat_id = val;
    }

    // WhatsApp
    if let Some(val) = var("WHATSAPP_ACCESS_TOKEN") {
        channels.whatsapp.access_token = val;
    }
    if let Some(val) = var("WHATSAPP_PHONE_NUMBER_ID") {
        channels.whatsapp.phone_number_id = val;
    }
    if let Some(val) = var("WHATSAPP_RECIPIENT_NUMBER") {
        channels.whatsapp.recipient_number = val;
    }

    // Email
    if let Some(val) = var("BREVO_EMAIL_API_KEY") {
        channels.email.api_key = val;
    }
    if let Some(val) = var("BREVO_EMAIL_FROM") {
        channels.email.from = val;
    }
    if let Some(val) = var("BREVO_EMAIL_TO") {
        channels.email.to = val;
    }

    // Brevo contacts API
    if let Some(val) = var("BREVO_API_KEY").or_else(|| var("BREVO_EMAIL_API_KEY")) {
        config.brevo.api_key = val;
    }
    if let Some(val) = var("BREVO_ENRICH") {
        config.brevo.enrich = parse_bool(&val);
    }

    // Gateway
    if let Some(val) = var("BREVOPING_GATEWAY__HOST") {
        config.gateway.host = val;
    }
    if let Some(val) = var("BREVOPING_GATEWAY__PORT") {
        match val.parse::<u16>() {
            Ok(p) => config.gateway.port = p,
            Err(_) => warn!("Ignoring invalid BREVOPING_GATEWAY__PORT: {}", val),
        }
    }

    config
}

/// `"true"` and `"1"` are true; anything else is false.
fn parse_bool(value: &str) -> bool {
    value == "true" || value == "1"
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn with_env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.gateway.port, 3000);
        assert!(!config.channels.telegram.enabled);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(r#"{
            "channels": {
                "telegram": { "enabled": true, "botToken": "123:ABC", "chatId": "42" }
            }
        }"#);

        let config = load_config_from_path(file.path());
        assert!(config.channels.telegram.enabled);
        assert!(config.channels.telegram.is_configured());
        // Defaults preserved
        assert!(!config.channels.email.enabled);
        assert_eq!(config.gateway.port, 3000);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.gateway.port, 3000);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.channels.email.enabled = true;
        config.channels.email.to = "ops@example.com".to_string();
        config.gateway.port = 4100;

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert!(reloaded.channels.email.enabled);
        assert_eq!(reloaded.channels.email.to, "ops@example.com");
        assert_eq!(reloaded.gateway.port, 4100);
    }

    #[test]
    fn test_env_enable_flags() {
        let config = apply_overrides(
            Config::default(),
            with_env(&[
                ("TELEGRAM_ENABLED", "true"),
                ("WHATSAPP_ENABLED", "1"),
                ("EMAIL_ENABLED", "yes"),
            ]),
        );
        assert!(config.channels.telegram.enabled);
        assert!(config.channels.whatsapp.enabled);
        // Only "true" / "1" count
        assert!(!config.channels.email.enabled);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let file = write_temp_json(r#"{
            "channels": { "telegram": { "enabled": true, "chatId": "from-file" } }
        }"#);
        let config = apply_overrides(
            load_config_from_path(file.path()),
            with_env(&[("TELEGRAM_ENABLED", "false"), ("TELEGRAM_CHAT_ID", "from-env")]),
        );
        assert!(!config.channels.telegram.enabled);
        assert_eq!(config.channels.telegram.chat_id, "from-env");
    }

    #[test]
    fn test_env_channel_credentials() {
        let config = apply_overrides(
            Config::default(),
            with_env(&[
                ("TELEGRAM_BOT_TOKEN", "123:ABC"),
                ("TELEGRAM_CHAT_ID", "42"),
                ("WHATSAPP_ACCESS_TOKEN", "EAAG"),
                ("WHATSAPP_PHONE_NUMBER_ID", "1098"),
                ("WHATSAPP_RECIPIENT_NUMBER", "33600000000"),
                ("BREVO_EMAIL_API_KEY", "xkeysib-email"),
                ("BREVO_EMAIL_FROM", "bot@example.com"),
                ("BREVO_EMAIL_TO", "team@example.com"),
            ]),
        );
        assert!(config.channels.telegram.is_configured());
        assert!(config.channels.whatsapp.is_configured());
        assert!(config.channels.email.is_configured());
    }

    #[test]
    fn test_brevo_api_key_falls_back_to_email_key() {
        let config = apply_overrides(
            Config::default(),
            with_env(&[("BREVO_EMAIL_API_KEY", "xkeysib-email")]),
        );
        assert_eq!(config.brevo.api_key, "xkeysib-email");

        let config = apply_overrides(
            Config::default(),
            with_env(&[
                ("BREVO_API_KEY", "xkeysib-main"),
                ("BREVO_EMAIL_API_KEY", "xkeysib-email"),
            ]),
        );
        assert_eq!(config.brevo.api_key, "xkeysib-main");
        assert_eq!(config.channels.email.api_key, "xkeysib-email");
    }

    #[test]
    fn test_env_gateway() {
        let config = apply_overrides(
            Config::default(),
            with_env(&[
                ("BREVOPING_GATEWAY__HOST", "127.0.0.1"),
                ("BREVOPING_GATEWAY__PORT", "9999"),
            ]),
        );
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.gateway.port, 9999);
    }

    #[test]
    fn test_env_invalid_port_ignored() {
        let config = apply_overrides(
            Config::default(),
            with_env(&[("BREVOPING_GATEWAY__PORT", "not-a-port")]),
        );
        assert_eq!(config.gateway.port, 3000);
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["channels"]["whatsapp"].get("accessToken").is_some());
        assert!(raw["channels"]["whatsapp"].get("access_token").is_none());
    }
}
