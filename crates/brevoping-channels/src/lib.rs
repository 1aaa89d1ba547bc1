//! BrevoPing Channels: contact formatting and notification fan-out.
//!
//! This crate provides:
//! - **formatting**: `format_contact_message`: contact record → text block
//! - **base**: the `Channel` trait, `ChannelName`, and `SendOutcome`
//! - **telegram** / **whatsapp** / **email**: the three senders
//! - **registry**: `enabled_channels`: config flags → ordered channel list
//! - **dispatcher**: `Dispatcher`: concurrent, failure-isolated delivery

pub mod base;
pub mod dispatcher;
pub mod email;
pub mod formatting;
pub mod registry;
pub mod telegram;
pub mod whatsapp;

pub use base::{Channel, ChannelName, SendOutcome};
pub use dispatcher::{DispatchResult, Dispatcher};
pub use formatting::format_contact_message;
pub use registry::enabled_channels;
