//! Contact record → human-readable notification text.
//!
//! Layout:
//! - a fixed header (`🆕 New Brevo Contact`) and a blank line
//! - one `key: value` line per non-empty top-level field, in record order
//! - `attributes` expanded in place as `attributes.<KEY>: value` lines
//!
//! Scalars render as their literal text, timestamps as ISO-8601, lists and
//! nested maps as 2-space pretty-printed JSON.

use brevoping_core::contact::{iso_timestamp, ATTRIBUTES_KEY};
use brevoping_core::{ContactRecord, ContactValue};
use serde_json::Number;

/// First line of every notification.
pub const HEADER: &str = "🆕 New Brevo Contact";

/// Format a contact record. Never fails; empty values are omitted.
pub fn format_contact_message(record: &ContactRecord) -> String {
    let mut lines: Vec<String> = vec![HEADER.to_string(), String::new()];

    for (key, value) in record.iter() {
        if key == ATTRIBUTES_KEY {
            if let ContactValue::Map(attributes) = value {
                for (attr_key, attr_value) in attributes.iter() {
                    if is_empty_value(attr_value) {
                        continue;
                    }
                    lines.push(format!("{ATTRIBUTES_KEY}.{attr_key}: {}", render_value(attr_value)));
                }
                continue;
            }
        }

        if is_empty_value(value) {
            continue;
        }
        lines.push(format!("{key}: {}", render_value(value)));
    }

    lines.join("\n")
}

/// Null, blank strings, and empty collections count as "absent".
fn is_empty_value(value: &ContactValue) -> bool {
    match value {
        ContactValue::Null => true,
        ContactValue::String(s) => s.trim().is_empty(),
        ContactValue::List(items) => items.is_empty(),
        ContactValue::Map(map) => map.is_empty(),
        ContactValue::Bool(_) | ContactValue::Number(_) | ContactValue::Timestamp(_) => false,
    }
}

fn render_value(value: &ContactValue) -> String {
    match value {
        ContactValue::Null => "null".to_string(),
        ContactValue::Bool(b) => b.to_string(),
        ContactValue::Number(n) => render_number(n),
        ContactValue::String(s) => s.clone(),
        ContactValue::Timestamp(ts) => iso_timestamp(ts),
        ContactValue::List(_) | ContactValue::Map(_) => {
            serde_json::to_string_pretty(value).unwrap_or_default()
        }
    }
}

/// Integral floats print without a fraction (`1.0` → `1`).
fn render_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f + 0.0),
        _ => n.to_string(),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
