//! JSON fixture data source
//!
//! ```json
//! {
//!   "users":   {"u1": [{"id": "a1", "deleted": false, "line1": "1 Main St"}]},
//!   "events":  {"a1": [{"type": "login", "created_at": "2024-03-01T09:00:00Z"}]},
//!   "details": [{"id": 101, "type": "login", "created_at": "2024-03-01T09:00:00Z", "ip": "10.0.0.1"}]
//! }
//! ```
//!
//! A detail record belongs to a listed event when it carries every field of
//! that event with an equal value.

use anyhow::{Context, Result};
use async_trait::async_trait;
use eventlens_app::{DataSource, DataSourceError};
use eventlens_core::{Address, AddressId, Event, EventDetail, EventGuid, Record, UserId};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FixtureFile {
    users: IndexMap<String, Vec<Address>>,
    events: IndexMap<String, Vec<Event>>,
    details: Vec<Record>,
}

/// Read-only data source over a fixture document.
#[derive(Debug)]
pub struct FixtureDataSource {
    users: IndexMap<UserId, Vec<Address>>,
    events: IndexMap<AddressId, Vec<Event>>,
    details: Vec<EventDetail>,
}

impl FixtureDataSource {
    /// Parse a fixture document.
    pub fn from_json_str(raw: &str) -> Result<Self, DataSourceError> {
        let file: FixtureFile =
            serde_json::from_str(raw).map_err(|e| DataSourceError::decode(e.to_string()))?;

        let users = file
            .users
            .into_iter()
            .map(|(id, addresses)| Ok((UserId::new(id)?, addresses)))
            .collect::<Result<_, DataSourceError>>()?;
        let events = file
            .events
            .into_iter()
            .map(|(id, events)| Ok((AddressId::new(id)?, events)))
            .collect::<Result<_, DataSourceError>>()?;

        Ok(Self {
            users,
            events,
            details: file.details,
        })
    }

    /// Load a fixture file.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read fixture file {}", path.display()))?;
        let source = Self::from_json_str(&raw)
            .with_context(|| format!("Invalid fixture file {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            users = source.users.len(),
            addresses = source.events.len(),
            details = source.details.len(),
            "fixtures loaded"
        );
        Ok(source)
    }

    fn listed_event(&self, guid: &EventGuid) -> Option<&Event> {
        self.events.values().flatten().find(|e| &e.guid() == guid)
    }
}

#[async_trait]
impl DataSource for FixtureDataSource {
    async fn fetch_user_ids(&self) -> Result<Vec<UserId>, DataSourceError> {
        Ok(self.users.keys().cloned().collect())
    }

    async fn fetch_addresses_for(&self, user: &UserId) -> Result<Vec<Address>, DataSourceError> {
        self.users
            .get(user)
            .cloned()
            .ok_or_else(|| DataSourceError::not_found(format!("User {user}")))
    }

    async fn fetch_events_for(&self, address: &AddressId) -> Result<Vec<Event>, DataSourceError> {
        Ok(self.events.get(address).cloned().unwrap_or_default())
    }

    async fn fetch_event_details(&self, guid: &EventGuid) -> Result<EventDetail, DataSourceError> {
        let event = self
            .listed_event(guid)
            .ok_or_else(|| DataSourceError::not_found(format!("Event {guid}")))?;
        let detail = self
            .details
            .iter()
            .find(|d| d.contains_all(event.fields()))
            .unwrap_or_else(|| event.fields());
        Ok(detail.clone())
    }
}
