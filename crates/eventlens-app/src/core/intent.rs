//! # Intents: State-Transition Events
//!
//! An intent is either an operator action (`SelectUser`, `ToggleEventSelection`,
//! ...) or the outcome of a fetch (`AddressesFetched`, `FetchFailed`, ...).
//! Every fetch outcome carries the key it was issued for, so the reducer can
//! discard results that arrive after their context has changed.
//!
//! ## Wire form
//!
//! ```text
//! {"type": "select_user", "payload": {"user_id": "u1"}}
//! {"type": "request_comparison"}
//! ```

use super::cascade::FetchRequest;
use super::error::TransitionError;
use eventlens_core::{Address, AddressId, Event, EventDetail, EventGuid, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A state-transition event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Intent {
    // =========================================================================
    // User level
    // =========================================================================
    /// Load the list of selectable user ids
    LoadUsers,

    /// The user id list arrived
    UserIdsFetched {
        /// Selectable user ids
        user_ids: Vec<UserId>,
    },

    /// Select a user; clears everything below it and fetches its addresses
    SelectUser {
        /// User to select
        user_id: UserId,
    },

    /// Addresses for a user arrived
    AddressesFetched {
        /// User the fetch was issued for
        user_id: UserId,
        /// Full address list, soft-deleted entries included
        addresses: Vec<Address>,
    },

    // =========================================================================
    // Address level
    // =========================================================================
    /// Select an address; clears events and selections and fetches its events
    SelectAddress {
        /// Address to select
        address_id: AddressId,
    },

    /// Events for an address arrived
    EventsFetched {
        /// Address the fetch was issued for
        address_id: AddressId,
        /// Events recorded against the address
        events: Vec<Event>,
    },

    // =========================================================================
    // Selection and comparison
    // =========================================================================
    /// Select an event, or deselect it if already selected
    ToggleEventSelection {
        /// Event to toggle
        guid: EventGuid,
    },

    /// Open the comparison for the two selected events
    RequestComparison,

    /// Detail records for a comparison arrived
    ComparisonFetched {
        /// Guids the detail fetch was issued for
        guids: [EventGuid; 2],
        /// Detail records, in the same order as `guids`
        details: [EventDetail; 2],
    },

    /// Close the comparison view
    CloseComparison,

    // =========================================================================
    // Errors
    // =========================================================================
    /// A fetch failed
    FetchFailed {
        /// The fetch that failed
        request: FetchRequest,
        /// Failure message shown to the operator
        message: String,
    },

    /// Dismiss the current error message
    DismissError,
}

impl Intent {
    /// Every wire-form type name, in declaration order.
    pub const KINDS: &'static [&'static str] = &[
        "load_users",
        "user_ids_fetched",
        "select_user",
        "addresses_fetched",
        "select_address",
        "events_fetched",
        "toggle_event_selection",
        "request_comparison",
        "comparison_fetched",
        "close_comparison",
        "fetch_failed",
        "dismiss_error",
    ];

    /// Wire-form type name of this intent.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LoadUsers => "load_users",
            Self::UserIdsFetched { .. } => "user_ids_fetched",
            Self::SelectUser { .. } => "select_user",
            Self::AddressesFetched { .. } => "addresses_fetched",
            Self::SelectAddress { .. } => "select_address",
            Self::EventsFetched { .. } => "events_fetched",
            Self::ToggleEventSelection { .. } => "toggle_event_selection",
            Self::RequestComparison => "request_comparison",
            Self::ComparisonFetched { .. } => "comparison_fetched",
            Self::CloseComparison => "close_comparison",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::DismissError => "dismiss_error",
        }
    }

    /// Decode a wire-form transition.
    ///
    /// An unrecognized `type` is reported as
    /// [`TransitionError::UnknownTransition`], never dropped.
    pub fn decode(raw: &str) -> Result<Self, TransitionError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| TransitionError::Malformed {
            kind: String::from("<unparsed>"),
            reason: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Decode a wire-form transition that is already parsed.
    pub fn from_value(value: Value) -> Result<Self, TransitionError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| TransitionError::MissingType {
                content: value.to_string(),
            })?
            .to_string();

        if !Self::KINDS.contains(&kind.as_str()) {
            return Err(TransitionError::UnknownTransition { kind });
        }

        serde_json::from_value(value).map_err(|e| TransitionError::Malformed {
            kind,
            reason: e.to_string(),
        })
    }

    /// Encode to wire form.
    pub fn encode(&self) -> String {
        serde_json::to_value(self)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| format!("{{\"type\":\"{}\"}}", self.kind()))
    }
}
