//! # Cascade Rules
//!
//! The dependency chain is
//!
//! ```text
//! User → Addresses → Address → Events → (≤2 selected) → Comparison
//! ```
//!
//! When a level changes, everything that depends on it is cleared in the
//! same transition ([`invalidate_below`]). Fetches are described by
//! [`FetchRequest`]; a fetch outcome is applied only while its request is
//! still [`is_current`] for the tree.

use crate::views::ViewState;
use eventlens_core::{AddressId, EventGuid, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A level of the selection hierarchy whose change invalidates its dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// The selected user changed: addresses and everything below are stale
    User,
    /// The selected address changed: events and everything below are stale
    Address,
    /// The selected pair changed: the comparison is stale
    Selection,
}

/// Clear every field that depends on `level`.
pub(crate) fn invalidate_below(state: &mut ViewState, level: Level) {
    if level == Level::User {
        state.addresses.clear();
        state.selected_address_id = None;
    }
    if matches!(level, Level::User | Level::Address) {
        state.events.clear();
        state.selected_events.clear();
    }
    state.comparing_events = false;
    state.comparison = None;
}

/// A fetch a transition asks the orchestrator to perform.
///
/// The same value tags the fetch outcome, so the reducer can tell whether
/// the outcome still belongs to the current tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchRequest {
    /// Fetch the selectable user ids
    UserIds,
    /// Fetch the addresses of a user
    Addresses {
        /// User whose addresses are fetched
        user_id: UserId,
    },
    /// Fetch the events of an address
    Events {
        /// Address whose events are fetched
        address_id: AddressId,
    },
    /// Fetch the detail records of the selected pair
    EventDetails {
        /// Selected pair, in selection order
        guids: [EventGuid; 2],
    },
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserIds => write!(f, "user ids"),
            Self::Addresses { user_id } => write!(f, "addresses for user {user_id}"),
            Self::Events { address_id } => write!(f, "events for address {address_id}"),
            Self::EventDetails { guids } => {
                write!(f, "details for {} and {}", guids[0], guids[1])
            }
        }
    }
}

/// Stale guard: does an outcome of `request` still belong to `state`?
pub fn is_current(state: &ViewState, request: &FetchRequest) -> bool {
    match request {
        FetchRequest::UserIds => true,
        FetchRequest::Addresses { user_id } => state.selected_user_id.as_ref() == Some(user_id),
        FetchRequest::Events { address_id } => {
            state.selected_address_id.as_ref() == Some(address_id)
        }
        FetchRequest::EventDetails { guids } => {
            state.comparing_events && state.selected_events.matches_pair(guids)
        }
    }
}
