//! Contact record: the semi-structured payload Brevo sends for a new contact.
//!
//! Brevo contacts have no fixed schema: a handful of well-known fields (`id`,
//! `email`, `createdAt`, `listIds`) plus an `attributes` map of arbitrary
//! custom fields. Instead of a typed struct we keep an **ordered** map of
//! `(key, ContactValue)` pairs so the formatter can walk whatever is present,
//! in the order the sender wrote it.
//!
//! Inbound JSON is parsed through `serde_json` with `preserve_order`, so key
//! order survives the trip from the webhook body into a [`ContactRecord`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::error::CoreError;

/// Key of the nested custom-field map.
pub const ATTRIBUTES_KEY: &str = "attributes";

/// Key under which Brevo wraps the contact in webhook payloads.
pub const CONTACT_KEY: &str = "contact";

// ─────────────────────────────────────────────
// ContactValue
// ─────────────────────────────────────────────

/// A single field value inside a contact record.
#[derive(Clone, Debug, PartialEq)]
pub enum ContactValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Only produced programmatically; JSON dates arrive as plain strings.
    Timestamp(DateTime<Utc>),
    List(Vec<ContactValue>),
    Map(ContactRecord),
}

impl ContactValue {
    /// Borrow the value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContactValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the value as a nested record, if it is a map.
    pub fn as_map(&self) -> Option<&ContactRecord> {
        match self {
            ContactValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Convert back into a `serde_json::Value` (timestamps become RFC 3339 strings).
    pub fn to_json(&self) -> Value {
        match self {
            ContactValue::Null => Value::Null,
            ContactValue::Bool(b) => Value::Bool(*b),
            ContactValue::Number(n) => Value::Number(n.clone()),
            ContactValue::String(s) => Value::String(s.clone()),
            ContactValue::Timestamp(ts) => Value::String(iso_timestamp(ts)),
            ContactValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            ContactValue::Map(record) => record.to_json(),
        }
    }
}

/// Render a timestamp the way JavaScript's `Date.toISOString()` does:
/// millisecond precision, `Z` suffix.
pub fn iso_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Serialize for ContactValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContactValue::Null => serializer.serialize_unit(),
            ContactValue::Bool(b) => serializer.serialize_bool(*b),
            ContactValue::Number(n) => n.serialize(serializer),
            ContactValue::String(s) => serializer.serialize_str(s),
            ContactValue::Timestamp(ts) => serializer.serialize_str(&iso_timestamp(ts)),
            ContactValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ContactValue::Map(record) => record.serialize(serializer),
        }
    }
}

impl From<Value> for ContactValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ContactValue::Null,
            Value::Bool(b) => ContactValue::Bool(b),
            Value::Number(n) => ContactValue::Number(n),
            Value::String(s) => ContactValue::String(s),
            Value::Array(items) => ContactValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => ContactValue::Map(map.into()),
        }
    }
}

impl From<&str> for ContactValue {
    fn from(s: &str) -> Self {
        ContactValue::String(s.to_string())
    }
}

impl From<String> for ContactValue {
    fn from(s: String) -> Self {
        ContactValue::String(s)
    }
}

impl From<bool> for ContactValue {
    fn from(b: bool) -> Self {
        ContactValue::Bool(b)
    }
}

impl From<i32> for ContactValue {
    fn from(n: i32) -> Self {
        ContactValue::Number(n.into())
    }
}

impl From<i64> for ContactValue {
    fn from(n: i64) -> Self {
        ContactValue::Number(n.into())
    }
}

impl From<f64> for ContactValue {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(ContactValue::Null, ContactValue::Number)
    }
}

impl From<DateTime<Utc>> for ContactValue {
    fn from(ts: DateTime<Utc>) -> Self {
        ContactValue::Timestamp(ts)
    }
}

impl From<Vec<ContactValue>> for ContactValue {
    fn from(items: Vec<ContactValue>) -> Self {
        ContactValue::List(items)
    }
}

impl From<ContactRecord> for ContactValue {
    fn from(record: ContactRecord) -> Self {
        ContactValue::Map(record)
    }
}

// ─────────────────────────────────────────────
// ContactRecord
// ─────────────────────────────────────────────

/// An insertion-ordered mapping of field name → [`ContactValue`].
///
/// Re-inserting an existing key replaces the value **in place**, so the
/// original position is kept. Equality is order-sensitive.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(try_from = "Value")]
pub struct ContactRecord {
    fields: IndexMap<String, ContactValue>,
}

impl PartialEq for ContactRecord {
    fn eq(&self, other: &Self) -> bool {
        self.fields.iter().eq(other.fields.iter())
    }
}

impl ContactRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContactValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field. Returns the previous value, if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ContactValue>,
    ) -> Option<ContactValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Look up a field by name.
    pub fn get(&self, key: &str) -> Option<&ContactValue> {
        self.fields.get(key)
    }

    /// Remove a field, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<ContactValue> {
        self.fields.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContactValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The nested custom-attribute map, if present and a map.
    pub fn attributes(&self) -> Option<&ContactRecord> {
        self.get(ATTRIBUTES_KEY).and_then(ContactValue::as_map)
    }

    /// Guarantee an `attributes` map exists (appended empty if absent).
    pub fn ensure_attributes(&mut self) {
        self.fields
            .entry(ATTRIBUTES_KEY.to_string())
            .or_insert_with(|| ContactValue::Map(ContactRecord::new()));
    }

    /// The contact's email address, when present and non-blank.
    pub fn email(&self) -> Option<&str> {
        self.get("email")
            .and_then(ContactValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Identifier usable against the Brevo contacts API: `id`, else `email`.
    pub fn identifier(&self) -> Option<String> {
        match self.get("id") {
            Some(ContactValue::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(ContactValue::Number(n)) => Some(n.to_string()),
            _ => self.email().map(str::to_string),
        }
    }

    /// Overlay `other` on top of `self`.
    ///
    /// Top-level fields from `other` replace existing ones in place or are
    /// appended. When both sides carry an `attributes` map the two are merged
    /// key by key, with `other` winning.
    pub fn overlay(&mut self, other: ContactRecord) {
        for (key, value) in other.fields {
            if key == ATTRIBUTES_KEY {
                if let (Some(ContactValue::Map(mine)), ContactValue::Map(theirs)) =
                    (self.get_mut(ATTRIBUTES_KEY), &value)
                {
                    for (attr_key, attr_value) in theirs.iter() {
                        mine.insert(attr_key, attr_value.clone());
                    }
                    continue;
                }
            }
            self.insert(key, value);
        }
    }

    /// Convert into an ordered `serde_json::Value::Object`.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut ContactValue> {
        self.fields.get_mut(key)
    }
}

impl Serialize for ContactRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl From<Map<String, Value>> for ContactRecord {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<ContactValue>> FromIterator<(K, V)> for ContactRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = ContactRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl TryFrom<Value> for ContactRecord {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(map.into()),
            _ => Err(CoreError::MissingContact),
        }
    }
}

// ─────────────────────────────────────────────
// Webhook payload unwrapping
// ─────────────────────────────────────────────

/// Parse a raw webhook body into a contact record.
pub fn parse_payload(body: &[u8]) -> Result<ContactRecord, CoreError> {
    let value: Value = serde_json::from_slice(body).map_err(CoreError::InvalidJson)?;
    contact_from_payload(value)
}

/// Turn a webhook payload into the record handed to the formatter.
///
/// Brevo sends either `{ "contact": {...}, ...metadata }` or the contact
/// itself. In the wrapped form the metadata fields come first and the
/// contact fields overlay them. A `null` contact falls back to the bare form;
/// any other non-object contact, or a non-object payload, is rejected.
pub fn contact_from_payload(payload: Value) -> Result<ContactRecord, CoreError> {
    let Value::Object(payload) = payload else {
        return Err(CoreError::MissingContact);
    };

    let contact = match payload.get(CONTACT_KEY) {
        Some(Value::Object(contact)) => Some(contact.clone()),
        Some(Value::Null) | None => None,
        Some(_) => return Err(CoreError::MissingContact),
    };

    let mut record = match contact {
        Some(contact) => {
            let mut record: ContactRecord = payload
                .into_iter()
                .filter(|(k, _)| k != CONTACT_KEY)
                .collect();
            record.overlay(contact.into());
            record
        }
        None => payload.into(),
    };

    record.ensure_attributes();
    Ok(record)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
