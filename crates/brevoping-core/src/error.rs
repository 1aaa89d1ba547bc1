//! Errors raised at the edge of the core, before a record reaches dispatch.

use thiserror::Error;

/// Inbound payload errors.
///
/// Everything past payload parsing is reported per channel instead of
/// raised, so this stays small.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The webhook body is not valid JSON.
    #[error("Invalid JSON")]
    InvalidJson(#[source] serde_json::Error),

    /// The payload (or its `contact` field) is not an object.
    #[error("Missing contact payload")]
    MissingContact,
}
