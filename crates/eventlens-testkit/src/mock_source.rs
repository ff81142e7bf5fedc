//! Scriptable in-memory data source
//!
//! Responses are scripted up front, failures can be injected per call, every
//! call is logged, and individual calls can be held at a [`Gate`] until the
//! test releases them. Holding calls is how tests make fetches complete out
//! of order.

use async_trait::async_trait;
use eventlens_app::{DataSource, DataSourceError};
use eventlens_core::{Address, AddressId, Event, EventDetail, EventGuid, UserId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// A data-source call, as recorded in the call log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Call {
    /// `fetch_user_ids`
    UserIds,
    /// `fetch_addresses_for`
    Addresses(UserId),
    /// `fetch_events_for`
    Events(AddressId),
    /// `fetch_event_details`
    Details(EventGuid),
}

/// Holds matching calls until released.
#[derive(Debug, Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    /// Let one held call through.
    pub fn release(&self) {
        self.0.add_permits(1);
    }

    async fn pass(&self) {
        // The semaphore is never closed, so acquire cannot fail.
        if let Ok(permit) = self.0.acquire().await {
            permit.forget();
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    user_ids: Vec<UserId>,
    addresses: HashMap<UserId, Vec<Address>>,
    events: HashMap<AddressId, Vec<Event>>,
    details: HashMap<EventGuid, EventDetail>,
    failures: HashMap<Call, DataSourceError>,
    gates: HashMap<Call, Gate>,
    calls: Vec<Call>,
}

/// In-memory [`DataSource`] for tests.
///
/// Clones share one script and one call log.
#[derive(Debug, Clone, Default)]
pub struct MockDataSource {
    state: Arc<Mutex<MockState>>,
}

impl MockDataSource {
    /// Empty script: no users, every lookup fails with not-found.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user and its addresses.
    pub fn with_user(self, id: &str, addresses: Vec<Address>) -> Self {
        {
            let mut state = self.state.lock();
            let id = crate::user(id);
            if !state.user_ids.contains(&id) {
                state.user_ids.push(id.clone());
            }
            state.addresses.insert(id, addresses);
        }
        self
    }

    /// Script the events of an address.
    pub fn with_events(self, address: &str, events: Vec<Event>) -> Self {
        self.state
            .lock()
            .events
            .insert(crate::address_id(address), events);
        self
    }

    /// Script the detail record of an event.
    ///
    /// Without one, the listed event's own fields are returned.
    pub fn with_detail(self, event: &Event, detail: EventDetail) -> Self {
        self.state.lock().details.insert(event.guid(), detail);
        self
    }

    /// Replace the addresses of a scripted user.
    pub fn set_addresses(&self, id: &str, addresses: Vec<Address>) {
        self.state.lock().addresses.insert(crate::user(id), addresses);
    }

    /// Fail every matching call with `error` until cleared.
    pub fn fail(&self, call: Call, error: DataSourceError) {
        self.state.lock().failures.insert(call, error);
    }

    /// Stop failing matching calls.
    pub fn clear_failure(&self, call: &Call) {
        self.state.lock().failures.remove(call);
    }

    /// Hold every matching call until the returned gate is released.
    pub fn hold(&self, call: Call) -> Gate {
        let gate = Gate(Arc::new(Semaphore::new(0)));
        self.state.lock().gates.insert(call, gate.clone());
        gate
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Number of calls matching `call`.
    pub fn call_count(&self, call: &Call) -> usize {
        self.state.lock().calls.iter().filter(|c| *c == call).count()
    }

    /// Log the call, wait at its gate, then report an injected failure.
    async fn enter(&self, call: Call) -> Result<(), DataSourceError> {
        let gate = {
            let mut state = self.state.lock();
            state.calls.push(call.clone());
            state.gates.get(&call).cloned()
        };
        if let Some(gate) = gate {
            gate.pass().await;
        }
        match self.state.lock().failures.get(&call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch_user_ids(&self) -> Result<Vec<UserId>, DataSourceError> {
        self.enter(Call::UserIds).await?;
        Ok(self.state.lock().user_ids.clone())
    }

    async fn fetch_addresses_for(&self, user: &UserId) -> Result<Vec<Address>, DataSourceError> {
        self.enter(Call::Addresses(user.clone())).await?;
        self.state
            .lock()
            .addresses
            .get(user)
            .cloned()
            .ok_or_else(|| DataSourceError::not_found(format!("user {user}")))
    }

    async fn fetch_events_for(&self, address: &AddressId) -> Result<Vec<Event>, DataSourceError> {
        self.enter(Call::Events(address.clone())).await?;
        Ok(self
            .state
            .lock()
            .events
            .get(address)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_event_details(&self, guid: &EventGuid) -> Result<EventDetail, DataSourceError> {
        self.enter(Call::Details(guid.clone())).await?;
        let state = self.state.lock();
        if let Some(detail) = state.details.get(guid) {
            return Ok(detail.clone());
        }
        state
            .events
            .values()
            .flatten()
            .find(|e| &e.guid() == guid)
            .map(|e| e.fields().clone())
            .ok_or_else(|| DataSourceError::not_found(format!("event {guid}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{address, event, record, user};
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_scripted_responses_and_call_log() {
        let login = event("login", "2024-01-01");
        let source = MockDataSource::new()
            .with_user("u1", vec![address("a1")])
            .with_events("a1", vec![login.clone()]);

        assert_eq!(source.fetch_user_ids().await.unwrap(), vec![user("u1")]);
        let addresses = source.fetch_addresses_for(&user("u1")).await.unwrap();
        assert_eq!(addresses.len(), 1);

        let detail = source.fetch_event_details(&login.guid()).await.unwrap();
        assert_eq!(&detail, login.fields());

        assert_eq!(
            source.calls(),
            vec![
                Call::UserIds,
                Call::Addresses(user("u1")),
                Call::Details(login.guid()),
            ]
        );
    }

    #[tokio::test]
    async fn test_scripted_detail_wins() {
        let login = event("login", "2024-01-01");
        let source = MockDataSource::new()
            .with_events("a1", vec![login.clone()])
            .with_detail(&login, record! { "id" => 9 });
        let detail = source.fetch_event_details(&login.guid()).await.unwrap();
        assert_eq!(detail, record! { "id" => 9 });
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let source = MockDataSource::new();
        let err = source.fetch_addresses_for(&user("nobody")).await.unwrap_err();
        assert_matches!(err, DataSourceError::NotFound { .. });
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let source = MockDataSource::new().with_user("u1", vec![]);
        source.fail(Call::UserIds, DataSourceError::network("refused"));
        assert_matches!(
            source.fetch_user_ids().await,
            Err(DataSourceError::Network { .. })
        );
        source.clear_failure(&Call::UserIds);
        assert!(source.fetch_user_ids().await.is_ok());
        assert_eq!(source.call_count(&Call::UserIds), 2);
    }
}
