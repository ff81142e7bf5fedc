//! # eventlens-core
//!
//! Foundation types shared by every eventlens layer:
//!
//! - [`identifiers`]: `UserId`, `AddressId` and the content-derived `EventGuid`
//! - [`record`]: ordered field records (`Record`) and the `Address` / `Event`
//!   shapes delivered by the data source
//! - [`reactive`]: `Dynamic<T>`, the versioned cell the state store publishes through
//! - [`errors`]: `CoreError`
//!
//! This crate has no async runtime dependency and no knowledge of the
//! state tree; it only describes the data flowing through it.

pub mod errors;
pub mod identifiers;
pub mod reactive;
pub mod record;

pub use errors::{CoreError, Result};
pub use identifiers::{AddressId, EventGuid, UserId};
pub use reactive::{Dynamic, Subscription};
pub use record::{Address, Event, EventDetail, Record};
