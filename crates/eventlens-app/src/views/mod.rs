//! # View State Module
//!
//! The single state tree and the value types it is built from. These types
//! are read-only outside this crate; the reducer is their only writer.

mod comparison;
mod selection;
mod state;

pub use comparison::ComparisonPair;
pub use selection::{SelectedEvents, MAX_SELECTED_EVENTS};
pub use state::{InvariantViolation, ViewState};
