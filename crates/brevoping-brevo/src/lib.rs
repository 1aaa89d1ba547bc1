//! Brevo contacts API client.
//!
//! Webhook payloads carry only part of a contact. [`BrevoClient`] looks the
//! contact up by id (or email) so the notification can show every attribute,
//! and [`enrich`] folds the result back into the incoming record. Lookup
//! problems are logged and never fail the caller.

pub mod client;

pub use client::{enrich, BrevoClient};
