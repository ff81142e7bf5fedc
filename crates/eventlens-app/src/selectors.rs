//! # Selectors
//!
//! Pure, read-only derivations over the state tree: which controls are
//! enabled, which addresses are shown, what placeholder fills an empty list.
//! Nothing here mutates a record.

use crate::diff::DiffRow;
use crate::views::{SelectedEvents, ViewState, MAX_SELECTED_EVENTS};
use eventlens_core::{Address, AddressId, Event, EventGuid};
use serde::Serialize;

/// Stable identity key of an event, derived from its fields.
///
/// Two events with identical fields share a key.
pub fn event_guid(event: &Event) -> EventGuid {
    event.guid()
}

/// Whether another event may be selected.
pub fn can_select_events(selected: &SelectedEvents) -> bool {
    selected.len() < MAX_SELECTED_EVENTS
}

/// Whether an event's checkbox is enabled.
///
/// A selected event stays enabled so it can be deselected.
pub fn is_event_enabled(selected: &SelectedEvents, guid: &EventGuid) -> bool {
    selected.contains(guid) || can_select_events(selected)
}

/// Whether the compare control is enabled.
pub fn can_compare(selected: &SelectedEvents) -> bool {
    selected.len() == MAX_SELECTED_EVENTS
}

/// Addresses that are not soft-deleted, in fetch order.
pub fn undeleted_addresses(addresses: &[Address]) -> Vec<&Address> {
    addresses.iter().filter(|a| !a.deleted).collect()
}

/// Whether `id` is the selected address.
pub fn is_address_selected(state: &ViewState, id: &AddressId) -> bool {
    state.selected_address_id() == Some(id)
}

/// Placeholder for an empty address list, `None` when there is something to show.
pub fn addresses_hint(state: &ViewState) -> Option<&'static str> {
    if !undeleted_addresses(state.addresses()).is_empty() {
        return None;
    }
    Some(if state.selected_user_id().is_some() {
        "No addresses found."
    } else {
        "Choose a user ID from the dropdown above."
    })
}

/// Placeholder for an empty event list, `None` when there is something to show.
pub fn events_hint(state: &ViewState) -> Option<&'static str> {
    if !state.events().is_empty() {
        return None;
    }
    Some(if state.selected_address_id().is_some() {
        "No events found."
    } else {
        "Select an address to see events"
    })
}

/// One line of the event list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    /// Identity key
    pub guid: EventGuid,
    /// Short description (`type | created_at`)
    pub label: String,
    /// Checkbox state
    pub selected: bool,
    /// Whether the checkbox accepts input
    pub enabled: bool,
}

/// The event list as rendered.
pub fn event_rows(state: &ViewState) -> Vec<EventRow> {
    let selected = state.selected_events();
    state
        .events()
        .iter()
        .map(|event| {
            let guid = event_guid(event);
            EventRow {
                selected: selected.contains(&guid),
                enabled: is_event_enabled(selected, &guid),
                label: event.label(),
                guid,
            }
        })
        .collect()
}

/// The comparison table, once both records have arrived.
pub fn comparison_rows(state: &ViewState) -> Option<Vec<DiffRow>> {
    if !state.comparing_events() {
        return None;
    }
    state.comparison().map(|pair| pair.rows())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{reduce, Intent};
    use eventlens_core::{Record, UserId};

    fn event(kind: &str) -> Event {
        let mut record = Record::new();
        record.insert("type", kind);
        record.insert("created_at", "2024-05-01T10:00:00Z");
        Event::new(record)
    }

    fn addr(id: &str, deleted: bool) -> Address {
        let mut address = Address::new(AddressId::new(id).unwrap());
        address.deleted = deleted;
        address
    }

    fn guid(n: u8) -> EventGuid {
        format!("evt-{}", format!("{n:02x}").repeat(16)).parse().unwrap()
    }

    #[test]
    fn test_enabled_flags() {
        let mut selected = SelectedEvents::new();
        assert!(can_select_events(&selected));
        assert!(!can_compare(&selected));

        selected.insert(guid(1));
        selected.insert(guid(2));
        assert!(!can_select_events(&selected));
        assert!(can_compare(&selected));
        assert!(is_event_enabled(&selected, &guid(1)));
        assert!(!is_event_enabled(&selected, &guid(3)));
    }

    #[test]
    fn test_undeleted_addresses_filters_without_mutating() {
        let addresses = vec![addr("a1", false), addr("a2", true), addr("a3", false)];
        let shown: Vec<_> = undeleted_addresses(&addresses)
            .into_iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(shown, vec!["a1", "a3"]);
        assert!(addresses[1].deleted);
    }

    #[test]
    fn test_hints_follow_the_cascade() {
        let mut state = ViewState::init();
        assert_eq!(
            addresses_hint(&state),
            Some("Choose a user ID from the dropdown above.")
        );
        assert_eq!(events_hint(&state), Some("Select an address to see events"));

        let u1 = UserId::new("u1").unwrap();
        state = reduce(&state, Intent::SelectUser { user_id: u1.clone() }).state;
        state = reduce(
            &state,
            Intent::AddressesFetched {
                user_id: u1,
                addresses: vec![addr("a1", true)],
            },
        )
        .state;
        assert_eq!(addresses_hint(&state), Some("No addresses found."));
    }

    #[test]
    fn test_event_rows() {
        let u1 = UserId::new("u1").unwrap();
        let a1 = AddressId::new("a1").unwrap();
        let events = vec![event("login"), event("logout"), event("purchase")];

        let mut state = reduce(&ViewState::init(), Intent::SelectUser { user_id: u1.clone() }).state;
        state = reduce(
            &state,
            Intent::AddressesFetched {
                user_id: u1,
                addresses: vec![addr("a1", false)],
            },
        )
        .state;
        state = reduce(&state, Intent::SelectAddress { address_id: a1.clone() }).state;
        assert!(is_address_selected(&state, &a1));
        state = reduce(
            &state,
            Intent::EventsFetched {
                address_id: a1,
                events: events.clone(),
            },
        )
        .state;
        assert_eq!(events_hint(&state), None);

        for e in &events[..2] {
            state = reduce(&state, Intent::ToggleEventSelection { guid: e.guid() }).state;
        }

        let rows = event_rows(&state);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].selected && rows[0].enabled);
        assert!(rows[1].selected && rows[1].enabled);
        assert!(!rows[2].selected && !rows[2].enabled);
        assert_eq!(rows[2].label, "purchase | 2024-05-01T10:00:00Z");
        assert!(comparison_rows(&state).is_none());
    }
}
