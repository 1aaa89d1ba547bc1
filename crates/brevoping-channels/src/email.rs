//! Email channel: Brevo transactional email API (`/smtp/email`).
//!
//! Sends the notification as a plain-text email. The dispatcher passes the
//! contact's email address as the hint, which ends up in the subject line.

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use brevoping_core::config::schema::EmailConfig;

use crate::base::{outcome_from_response, Channel, ChannelName, SendOutcome};

/// Default Brevo API base URL.
const DEFAULT_API_BASE: &str = "https://api.brevo.com/v3";

/// Subject used when no hint is available.
const SUBJECT: &str = "New Brevo contact";

/// Brevo transactional email sender.
pub struct EmailChannel {
    client: reqwest::Client,
    config: EmailConfig,
}

impl EmailChannel {
    pub fn new(config: EmailConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    fn smtp_url(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!("{base}/smtp/email")
    }
}

/// `"New Brevo contact: <hint>"`, or the bare subject without a usable hint.
fn subject_for(hint: Option<&str>) -> String {
    match hint.map(str::trim).filter(|h| !h.is_empty()) {
        Some(hint) => format!("{SUBJECT}: {hint}"),
        None => SUBJECT.to_string(),
    }
}

#[async_trait]
impl Channel for EmailChannel {
    fn name(&self) -> ChannelName {
        ChannelName::Email
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn send(&self, message: &str, hint: Option<&str>) -> anyhow::Result<SendOutcome> {
        if !self.is_configured() {
            warn!("email not configured (api key/from/to missing)");
            return Ok(SendOutcome::missing_configuration());
        }

        let subject = subject_for(hint);
        debug!(to = %self.config.to, subject = %subject, "sending notification email");

        let response = self
            .client
            .post(self.smtp_url())
            .header("api-key", &self.config.api_key)
            .json(&json!({
                "sender": { "email": self.config.from },
                "to": [{ "email": self.config.to }],
                "subject": subject,
                "textContent": message,
            }))
            .send()
            .await
            .context("email request failed")?;

        outcome_from_response(self.name(), response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(api_base: &str) -> EmailConfig {
        EmailConfig {
            enabled: true,
            api_key: "xkeysib-test".to_string(),
            from: "bot@example.com".to_string(),
            to: "team@example.com".to_string(),
            api_base: Some(api_base.to_string()),
        }
    }

    #[test]
    fn test_subject_with_and_without_hint() {
        assert_eq!(subject_for(Some("ada@example.com")), "New Brevo contact: ada@example.com");
        assert_eq!(subject_for(None), "New Brevo contact");
        assert_eq!(subject_for(Some("  ")), "New Brevo contact");
    }

    #[tokio::test]
    async fn test_send_success_with_hint() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/smtp/email"))
            .and(header("api-key", "xkeysib-test"))
            .and(body_json(json!({
                "sender": { "email": "bot@example.com" },
                "to": [{ "email": "team@example.com" }],
                "subject": "New Brevo contact: ada@example.com",
                "textContent": "body text"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"messageId": "<1@smtp>"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let channel = EmailChannel::new(make_config(&mock_server.uri()), reqwest::Client::new());
        let outcome = channel.send("body text", Some("ada@example.com")).await.unwrap();

        assert_eq!(outcome, SendOutcome::success());
    }

    #[tokio::test]
    async fn test_send_without_hint_uses_plain_subject() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/smtp/email"))
            .and(body_partial_json(json!({ "subject": "New Brevo contact" })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let channel = EmailChannel::new(make_config(&mock_server.uri()), reqwest::Client::new());
        let outcome = channel.send("body text", None).await.unwrap();
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_send_api_error_returns_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/smtp/email"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"code":"invalid_parameter","message":"sender is invalid"}"#),
            )
            .mount(&mock_server)
            .await;

        let channel = EmailChannel::new(make_config(&mock_server.uri()), reqwest::Client::new());
        let outcome = channel.send("body text", None).await.unwrap();

        assert!(!outcome.success);
        assert!(outcome.detail.unwrap().contains("sender is invalid"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_unconfigured() {
        let mut config = make_config("http://127.0.0.1:1");
        config.api_key = String::new();
        let channel = EmailChannel::new(config, reqwest::Client::new());

        let outcome = channel.send("body text", Some("x@example.com")).await.unwrap();
        assert_eq!(outcome, SendOutcome::missing_configuration());
    }
}
