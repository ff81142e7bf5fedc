//! The application state tree

use super::{ComparisonPair, SelectedEvents, MAX_SELECTED_EVENTS};
use eventlens_core::{Address, AddressId, Event, UserId};
use serde::Serialize;
use thiserror::Error;

/// A broken structural invariant of [`ViewState`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// More events selected than the selection limit allows
    #[error("{count} events selected, at most {MAX_SELECTED_EVENTS} allowed")]
    TooManySelected {
        /// Number of selected events
        count: usize,
    },

    /// Addresses are held while no user is selected
    #[error("addresses present without a selected user")]
    AddressesWithoutUser,

    /// An address is selected while no user is selected
    #[error("address {0} selected without a selected user")]
    AddressWithoutUser(AddressId),

    /// Events are held while no address is selected
    #[error("events present without a selected address")]
    EventsWithoutAddress,

    /// Events are selected while no address is selected
    #[error("events selected without a selected address")]
    SelectionWithoutAddress,

    /// The selected address is missing from the address list or soft-deleted
    #[error("selected address {0} is not a live address")]
    AddressNotListed(AddressId),

    /// Comparison mode is on without exactly two selected events
    #[error("comparing with {count} selected events")]
    ComparingWithoutPair {
        /// Number of selected events
        count: usize,
    },

    /// A fetched comparison is held for events that are not the selected pair
    #[error("comparison held for an unselected pair")]
    ComparisonNotSelected,
}

/// The single state tree.
///
/// Every field is replaced by its owning transition, never merged. Fields are
/// readable through accessors; only the reducer writes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub(crate) user_ids: Vec<UserId>,
    pub(crate) selected_user_id: Option<UserId>,
    pub(crate) addresses: Vec<Address>,
    pub(crate) selected_address_id: Option<AddressId>,
    pub(crate) events: Vec<Event>,
    pub(crate) selected_events: SelectedEvents,
    pub(crate) comparing_events: bool,
    pub(crate) comparison: Option<ComparisonPair>,
    pub(crate) error: Option<String>,
}

impl ViewState {
    /// The default tree: nothing loaded, nothing selected.
    pub fn init() -> Self {
        Self::default()
    }

    /// User ids offered for selection.
    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    /// Currently selected user.
    pub fn selected_user_id(&self) -> Option<&UserId> {
        self.selected_user_id.as_ref()
    }

    /// All addresses of the selected user, soft-deleted ones included.
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Currently selected address.
    pub fn selected_address_id(&self) -> Option<&AddressId> {
        self.selected_address_id.as_ref()
    }

    /// Events of the selected address.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Selected event guids.
    pub fn selected_events(&self) -> &SelectedEvents {
        &self.selected_events
    }

    /// Whether the comparison view is open.
    pub fn comparing_events(&self) -> bool {
        self.comparing_events
    }

    /// Fetched comparison records, once both have arrived.
    pub fn comparison(&self) -> Option<&ComparisonPair> {
        self.comparison.as_ref()
    }

    /// Last data-source failure message.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Check the structural invariants, reporting the first violation.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let selected = self.selected_events.len();
        if selected > MAX_SELECTED_EVENTS {
            return Err(InvariantViolation::TooManySelected { count: selected });
        }
        if self.selected_user_id.is_none() {
            if !self.addresses.is_empty() {
                return Err(InvariantViolation::AddressesWithoutUser);
            }
            if let Some(id) = &self.selected_address_id {
                return Err(InvariantViolation::AddressWithoutUser(id.clone()));
            }
        }
        if let Some(id) = &self.selected_address_id {
            if !self.addresses.iter().any(|a| &a.id == id && !a.deleted) {
                return Err(InvariantViolation::AddressNotListed(id.clone()));
            }
        }
        if self.selected_address_id.is_none() {
            if !self.events.is_empty() {
                return Err(InvariantViolation::EventsWithoutAddress);
            }
            if selected > 0 {
                return Err(InvariantViolation::SelectionWithoutAddress);
            }
        }
        if self.comparing_events && selected != 2 {
            return Err(InvariantViolation::ComparingWithoutPair { count: selected });
        }
        if let Some(pair) = &self.comparison {
            if !self.selected_events.matches_pair(pair.guids()) {
                return Err(InvariantViolation::ComparisonNotSelected);
            }
        }
        Ok(())
    }
}
