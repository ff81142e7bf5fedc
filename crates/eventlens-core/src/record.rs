//! # Records
//!
//! Field-ordered records as delivered by the data source.
//!
//! [`Record`] keeps fields in the order the source produced them. That order
//! is what the diff engine renders, so it must never depend on hashing.

use crate::errors::CoreError;
use crate::identifiers::{AddressId, EventGuid};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered map of field name to JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a record from a JSON object string.
    pub fn from_json_str(raw: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Get a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a field as a string slice, if it is a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Check whether a field is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert or replace a field, keeping its original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Field names in record order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// `(name, value)` pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether every field of `other` is present here with an equal value.
    pub fn contains_all(&self, other: &Record) -> bool {
        other.iter().all(|(k, v)| self.get(k) == Some(v))
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Full detail record of an event, as returned by the detail fetch.
pub type EventDetail = Record;

/// An address belonging to a user.
///
/// Soft-deleted addresses stay in the stored list with `deleted = true`;
/// filtering them out is a read-side concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Address identifier
    pub id: AddressId,
    /// Soft-deletion flag
    #[serde(default)]
    pub deleted: bool,
    /// Remaining address fields, in source order
    #[serde(flatten)]
    pub fields: Record,
}

impl Address {
    /// Create an address with no extra fields.
    pub fn new(id: AddressId) -> Self {
        Self {
            id,
            deleted: false,
            fields: Record::new(),
        }
    }
}

/// An event recorded against an address.
///
/// Events have no server id; their identity is [`Event::guid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(Record);

impl Event {
    /// Wrap a record as an event.
    pub fn new(fields: Record) -> Self {
        Self(fields)
    }

    /// The event type (`type` field), if present.
    pub fn kind(&self) -> Option<&str> {
        self.0.get_str("type")
    }

    /// The creation timestamp (`created_at` field), if present as a string.
    pub fn created_at(&self) -> Option<&str> {
        self.0.get_str("created_at")
    }

    /// Content-derived identity of this event.
    pub fn guid(&self) -> EventGuid {
        EventGuid::derive(&self.0)
    }

    /// All fields of the event.
    pub fn fields(&self) -> &Record {
        &self.0
    }

    /// One-line label: `type | created_at`.
    pub fn label(&self) -> String {
        format!(
            "{} | {}",
            self.kind().unwrap_or("?"),
            self.created_at().unwrap_or("?")
        )
    }
}

impl From<Record> for Event {
    fn from(fields: Record) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_preserves_field_order() {
        let r = Record::from_json_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<&str> = r.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_record_rejects_non_objects() {
        assert!(Record::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_address_deleted_defaults_to_false() {
        let a: Address =
            serde_json::from_value(json!({"id": "a1", "street": "Main St"})).unwrap();
        assert_eq!(a.id.as_str(), "a1");
        assert!(!a.deleted);
        assert_eq!(a.fields.get_str("street"), Some("Main St"));
        assert!(!a.fields.contains_key("id"));
    }

    #[test]
    fn test_address_keeps_deleted_flag() {
        let a: Address = serde_json::from_value(json!({"id": 7, "deleted": true})).unwrap();
        assert_eq!(a.id.as_str(), "7");
        assert!(a.deleted);
    }

    #[test]
    fn test_event_accessors() {
        let e: Event =
            serde_json::from_value(json!({"type": "login", "created_at": "2024-03-01"})).unwrap();
        assert_eq!(e.kind(), Some("login"));
        assert_eq!(e.created_at(), Some("2024-03-01"));
        assert_eq!(e.label(), "login | 2024-03-01");
        assert_eq!(e.guid(), EventGuid::derive(e.fields()));
    }

    #[test]
    fn test_contains_all() {
        let detail = Record::from_json_str(r#"{"id": 9, "type": "login", "ip": "1.2.3.4"}"#).unwrap();
        let summary = Record::from_json_str(r#"{"type": "login"}"#).unwrap();
        let other = Record::from_json_str(r#"{"type": "logout"}"#).unwrap();
        assert!(detail.contains_all(&summary));
        assert!(!detail.contains_all(&other));
    }
}
