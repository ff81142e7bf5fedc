//! Identifier types for the user -> address -> event hierarchy
//!
//! `UserId` and `AddressId` are opaque strings assigned by the data source.
//! `EventGuid` is derived locally from an event's field values because events
//! carry no server-assigned identity.

use crate::errors::CoreError;
use crate::record::Record;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Prefix of every derived event guid.
pub const EVENT_GUID_PREFIX: &str = "evt-";

/// Number of digest bytes kept in an event guid (hex-encoded afterwards).
const EVENT_GUID_BYTES: usize = 16;

/// Opaque user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user id, rejecting blank values.
    pub fn new(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CoreError::invalid_id("user id", raw));
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = scalar_id(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Opaque address identifier.
///
/// Data sources may deliver numeric ids; they are kept in their decimal
/// string form so comparisons stay exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AddressId(String);

impl AddressId {
    /// Create an address id, rejecting blank values.
    pub fn new(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CoreError::invalid_id("address id", raw));
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AddressId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for AddressId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = scalar_id(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Accept either a JSON string or a JSON number as an identifier.
fn scalar_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
    })
}

/// Content-derived event identity.
///
/// Two events with identical field values map to the same guid. That is a
/// known limitation of deriving identity from content: the data source gives
/// events no id of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EventGuid(String);

impl EventGuid {
    /// Derive the guid of an event from its fields.
    ///
    /// Field order does not matter: keys are visited sorted, nested objects
    /// are encoded with sorted keys, and every key and value is
    /// length-prefixed before hashing so adjacent fields cannot run together.
    pub fn derive(fields: &Record) -> Self {
        let mut keys: Vec<&String> = fields.keys().collect();
        keys.sort();

        let mut hasher = blake3::Hasher::new();
        for key in keys {
            let mut value = String::new();
            if let Some(v) = fields.get(key) {
                write_canonical(v, &mut value);
            }
            hasher.update(&(key.len() as u64).to_le_bytes());
            hasher.update(key.as_bytes());
            hasher.update(&(value.len() as u64).to_le_bytes());
            hasher.update(value.as_bytes());
        }

        let digest = hasher.finalize();
        Self(format!(
            "{EVENT_GUID_PREFIX}{}",
            hex::encode(&digest.as_bytes()[..EVENT_GUID_BYTES])
        ))
    }

    /// Borrow the guid string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EventGuid {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digest = s
            .strip_prefix(EVENT_GUID_PREFIX)
            .ok_or_else(|| CoreError::invalid_id("event guid", s))?;
        if digest.len() != EVENT_GUID_BYTES * 2 || hex::decode(digest).is_err() {
            return Err(CoreError::invalid_id("event guid", s));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for EventGuid {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EventGuid> for String {
    fn from(guid: EventGuid) -> Self {
        guid.0
    }
}

/// JSON encoding with object keys sorted at every depth.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (k, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(k.clone()).to_string());
                out.push(':');
                write_canonical(v, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, v) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(v, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
