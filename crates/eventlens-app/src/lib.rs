//! # eventlens-app
//!
//! Portable, headless application core for browsing a user's addresses and
//! comparing the events recorded against them.
//!
//! ## Flow
//!
//! ```text
//! Intent → reduce (pure, cascading clears) → ViewState published
//!            └─ FetchRequest → DataSource → *Fetched / FetchFailed intent → reduce
//! ```
//!
//! - [`core`]: `AppCore` (the store), `Intent`, the reducer and the cascade rules
//! - [`views`]: the single state tree, `ViewState`
//! - [`selectors`]: derived, presentation-ready values
//! - [`diff`]: field-by-field comparison of two event records
//! - [`data_source`]: the `DataSource` trait frontends implement
//! - [`workflows`]: async operations that pair a transition with its fetch
//!
//! Frontends read snapshots and call workflows; nothing outside this crate
//! can write the tree.

pub mod core;
pub mod data_source;
pub mod diff;
pub mod errors;
pub mod selectors;
pub mod views;
pub mod workflows;

pub use crate::core::{
    reduce, AppConfig, AppCore, Dispatch, FetchRequest, IgnoreReason, Intent, ReduceOutcome,
    Reduction, StaleResult, TransitionError,
};
pub use crate::data_source::{DataSource, DataSourceError};
pub use crate::diff::{diff, DiffRow, DiffSummary};
pub use crate::errors::{AppError, ErrorCategory};
pub use crate::views::{ComparisonPair, InvariantViolation, SelectedEvents, ViewState};

pub use eventlens_core::{Address, AddressId, Event, EventDetail, EventGuid, Record, UserId};
