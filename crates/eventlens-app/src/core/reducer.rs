//! # State Reducer
//!
//! The pure transition function:
//!
//! ```text
//! (ViewState, Intent) → [reduce] → Reduction { state, outcome, fetch }
//! ```
//!
//! `reduce` never suspends and never fails. An intent that cannot apply to
//! the current tree is `Ignored` (an operator action with nothing to do) or
//! `Discarded` (a fetch outcome whose context moved on). In both cases the
//! returned tree equals the input tree.

use super::app::AppConfig;
use super::cascade::{invalidate_below, is_current, FetchRequest, Level};
use super::intent::Intent;
use crate::views::{ComparisonPair, ViewState};
use eventlens_core::{Address, AddressId, Event, EventDetail, EventGuid, UserId};
use std::fmt;

/// Why an operator intent had no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The address is not among the selected user's undeleted addresses
    UnknownAddress(AddressId),
    /// The event is not among the selected address's events
    UnknownEvent(EventGuid),
    /// Two events are already selected
    SelectionFull,
    /// A comparison needs exactly two selected events
    NotEnoughSelected {
        /// Number of selected events
        count: usize,
    },
    /// The comparison view is not open
    NotComparing,
    /// There is no error to dismiss
    NoError,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAddress(id) => write!(f, "address {id} is not selectable"),
            Self::UnknownEvent(guid) => write!(f, "event {guid} is not listed"),
            Self::SelectionFull => write!(f, "two events are already selected"),
            Self::NotEnoughSelected { count } => {
                write!(f, "comparison needs two selected events, have {count}")
            }
            Self::NotComparing => write!(f, "comparison is not open"),
            Self::NoError => write!(f, "no error to dismiss"),
        }
    }
}

/// A fetch outcome that arrived after its context changed.
///
/// Not an error: superseded fetches are expected and simply dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleResult {
    /// The fetch the outcome was issued for
    pub request: FetchRequest,
}

impl fmt::Display for StaleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stale result for {}", self.request)
    }
}

/// What happened to an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReduceOutcome {
    /// The tree was replaced
    Applied,
    /// Operator intent with no effect on the current tree
    Ignored(IgnoreReason),
    /// Fetch outcome for a context that is no longer current
    Discarded(StaleResult),
}

impl ReduceOutcome {
    /// Whether the tree changed hands.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    /// The next tree
    pub state: ViewState,
    /// What happened to the intent
    pub outcome: ReduceOutcome,
    /// Fetch the orchestrator must now run
    pub fetch: Option<FetchRequest>,
}

/// Apply `intent` to `state` with the default configuration.
pub fn reduce(state: &ViewState, intent: Intent) -> Reduction {
    reduce_with(state, intent, &AppConfig::default())
}

/// Apply `intent` to `state`.
pub fn reduce_with(state: &ViewState, intent: Intent, config: &AppConfig) -> Reduction {
    let reports_failure = matches!(intent, Intent::FetchFailed { .. });
    let mut next = state.clone();

    match apply(&mut next, intent, config) {
        Ok(fetch) => {
            if !reports_failure {
                next.error = None;
            }
            Reduction {
                state: next,
                outcome: ReduceOutcome::Applied,
                fetch,
            }
        }
        Err(outcome) => Reduction {
            state: state.clone(),
            outcome,
            fetch: None,
        },
    }
}

type Step = Result<Option<FetchRequest>, ReduceOutcome>;

fn ignored(reason: IgnoreReason) -> ReduceOutcome {
    ReduceOutcome::Ignored(reason)
}

fn stale(request: FetchRequest) -> ReduceOutcome {
    ReduceOutcome::Discarded(StaleResult { request })
}

fn apply(state: &mut ViewState, intent: Intent, config: &AppConfig) -> Step {
    match intent {
        Intent::LoadUsers => Ok(Some(FetchRequest::UserIds)),
        Intent::UserIdsFetched { user_ids } => {
            state.user_ids = user_ids;
            Ok(None)
        }
        Intent::SelectUser { user_id } => Ok(Some(select_user(state, user_id))),
        Intent::AddressesFetched { user_id, addresses } => {
            addresses_fetched(state, user_id, addresses)
        }
        Intent::SelectAddress { address_id } => select_address(state, address_id),
        Intent::EventsFetched { address_id, events } => events_fetched(state, address_id, events),
        Intent::ToggleEventSelection { guid } => toggle_event_selection(state, guid),
        Intent::RequestComparison => request_comparison(state),
        Intent::ComparisonFetched { guids, details } => comparison_fetched(state, guids, details),
        Intent::CloseComparison => close_comparison(state, config),
        Intent::FetchFailed { request, message } => {
            if !is_current(state, &request) {
                return Err(stale(request));
            }
            state.error = Some(message);
            Ok(None)
        }
        Intent::DismissError => {
            if state.error.is_none() {
                return Err(ignored(IgnoreReason::NoError));
            }
            Ok(None)
        }
    }
}

fn select_user(state: &mut ViewState, user_id: UserId) -> FetchRequest {
    state.selected_user_id = Some(user_id.clone());
    invalidate_below(state, Level::User);
    FetchRequest::Addresses { user_id }
}

fn addresses_fetched(state: &mut ViewState, user_id: UserId, addresses: Vec<Address>) -> Step {
    let request = FetchRequest::Addresses { user_id };
    if !is_current(state, &request) {
        return Err(stale(request));
    }

    state.addresses = addresses;

    // A refetch may drop or soft-delete the selected address.
    let still_selectable = state
        .selected_address_id
        .as_ref()
        .map(|id| selectable(&state.addresses, id));
    if still_selectable == Some(false) {
        state.selected_address_id = None;
        invalidate_below(state, Level::Address);
    }
    Ok(None)
}

fn selectable(addresses: &[Address], id: &AddressId) -> bool {
    addresses.iter().any(|a| &a.id == id && !a.deleted)
}

fn select_address(state: &mut ViewState, address_id: AddressId) -> Step {
    if !selectable(&state.addresses, &address_id) {
        return Err(ignored(IgnoreReason::UnknownAddress(address_id)));
    }
    state.selected_address_id = Some(address_id.clone());
    invalidate_below(state, Level::Address);
    Ok(Some(FetchRequest::Events { address_id }))
}

fn events_fetched(state: &mut ViewState, address_id: AddressId, events: Vec<Event>) -> Step {
    let request = FetchRequest::Events { address_id };
    if !is_current(state, &request) {
        return Err(stale(request));
    }

    let listed: Vec<EventGuid> = events.iter().map(Event::guid).collect();
    state.events = events;
    state.selected_events.retain(|guid| listed.contains(guid));
    if state.selected_events.pair().is_none() {
        invalidate_below(state, Level::Selection);
    }
    Ok(None)
}

fn toggle_event_selection(state: &mut ViewState, guid: EventGuid) -> Step {
    if state.selected_events.contains(&guid) {
        state.selected_events.remove(&guid);
        // A result kept after closing the view belongs to the old pair too.
        invalidate_below(state, Level::Selection);
        return Ok(None);
    }

    if !state.events.iter().any(|e| e.guid() == guid) {
        return Err(ignored(IgnoreReason::UnknownEvent(guid)));
    }
    if !state.selected_events.insert(guid) {
        return Err(ignored(IgnoreReason::SelectionFull));
    }
    Ok(None)
}

fn request_comparison(state: &mut ViewState) -> Step {
    let Some([first, second]) = state.selected_events.pair() else {
        return Err(ignored(IgnoreReason::NotEnoughSelected {
            count: state.selected_events.len(),
        }));
    };
    let guids = [first.clone(), second.clone()];

    state.comparing_events = true;
    state.comparison = None;
    Ok(Some(FetchRequest::EventDetails { guids }))
}

fn comparison_fetched(
    state: &mut ViewState,
    guids: [EventGuid; 2],
    details: [EventDetail; 2],
) -> Step {
    if !is_current(state, &FetchRequest::EventDetails { guids: guids.clone() }) {
        return Err(stale(FetchRequest::EventDetails { guids }));
    }

    let pair = state
        .selected_events
        .pair()
        .and_then(|order| ComparisonPair::new(guids.clone(), details).ordered_as(order));
    match pair {
        Some(pair) => {
            state.comparison = Some(pair);
            Ok(None)
        }
        None => Err(stale(FetchRequest::EventDetails { guids })),
    }
}

fn close_comparison(state: &mut ViewState, config: &AppConfig) -> Step {
    if !state.comparing_events {
        return Err(ignored(IgnoreReason::NotComparing));
    }
    state.comparing_events = false;
    if config.clear_comparison_on_close {
        state.comparison = None;
    }
    Ok(None)
}
