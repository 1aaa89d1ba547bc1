//! HTTP client for `GET /v3/contacts/{identifier}`.

use tracing::{debug, warn};

use brevoping_core::config::schema::BrevoConfig;
use brevoping_core::ContactRecord;

/// Default Brevo API base URL.
const DEFAULT_API_BASE: &str = "https://api.brevo.com/v3";

// ─────────────────────────────────────────────
// BrevoClient
// ─────────────────────────────────────────────

/// Brevo contacts API client.
pub struct BrevoClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl std::fmt::Debug for BrevoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrevoClient")
            .field("api_base", &self.api_base)
            .field("configured", &!self.api_key.trim().is_empty())
            .finish()
    }
}

impl BrevoClient {
    pub fn new(config: &BrevoConfig, client: reqwest::Client) -> Self {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Self {
            client,
            api_base,
            api_key: config.api_key.clone(),
        }
    }

    /// Contact lookup URL with the identifier percent-encoded as one path segment.
    fn contact_url(&self, identifier: &str) -> Option<url::Url> {
        let mut url = url::Url::parse(&self.api_base)
            .map_err(|e| warn!(api_base = %self.api_base, error = %e, "invalid brevo api base"))
            .ok()?;
        url.path_segments_mut()
            .map_err(|_| warn!(api_base = %self.api_base, "brevo api base cannot hold a path"))
            .ok()?
            .pop_if_empty()
            .extend(["contacts", identifier]);
        Some(url)
    }

    /// Fetch the full contact for `contact`, looked up by `id` or `email`.
    ///
    /// Returns `None` when there is no API key, no identifier, or when the
    /// lookup fails for any reason.
    pub async fn fetch_contact_details(&self, contact: &ContactRecord) -> Option<ContactRecord> {
        if self.api_key.trim().is_empty() {
            return None;
        }

        let identifier = contact.identifier()?;
        let url = self.contact_url(&identifier)?;

        debug!(identifier = %identifier, "fetching contact details from brevo");

        let response = match self
            .client
            .get(url)
            .header("accept", "application/json")
            .header("api-key", &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "brevo contact lookup failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "failed to fetch contact details from brevo");
            return None;
        }

        match response.json::<ContactRecord>().await {
            Ok(details) => Some(details),
            Err(e) => {
                warn!(error = %e, "failed to parse brevo contact details");
                None
            }
        }
    }
}

/// Overlay Brevo's full contact onto the incoming record.
///
/// Leaves `record` unchanged when enrichment is unavailable.
pub async fn enrich(client: &BrevoClient, mut record: ContactRecord) -> ContactRecord {
    if let Some(details) = client.fetch_contact_details(&record).await {
        debug!(fields = details.len(), "enriched contact from brevo");
        record.overlay(details);
    }
    record
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
