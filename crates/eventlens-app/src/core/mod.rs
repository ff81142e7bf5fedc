//! # Core Application Module
//!
//! - [`AppCore`]: the state store, owner of the single tree
//! - [`Intent`]: state-transition events
//! - [`reduce`]: the pure transition function
//! - [`FetchRequest`]: fetches a transition asks the orchestrator to run
//! - [`TransitionError`]: rejected wire-form transitions

mod app;
pub mod cascade;
mod error;
mod intent;
mod reducer;

pub use app::{AppConfig, AppCore, Dispatch};
pub use cascade::{FetchRequest, Level};
pub use error::TransitionError;
pub use intent::Intent;
pub use reducer::{reduce, reduce_with, IgnoreReason, ReduceOutcome, Reduction, StaleResult};
