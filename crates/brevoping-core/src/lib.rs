//! BrevoPing Core: contact model, configuration, and shared errors.
//!
//! This crate provides:
//! - **contact**: `ContactRecord` / `ContactValue`, the ordered semi-structured
//!   record, plus webhook payload unwrapping
//! - **config**: typed schema, JSON loader, and environment overrides
//! - **error**: `CoreError` for inbound payload problems

pub mod config;
pub mod contact;
pub mod error;
pub mod utils;

pub use contact::{ContactRecord, ContactValue};
pub use error::CoreError;
