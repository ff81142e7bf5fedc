//! # Reactive Primitives
//!
//! - [`Dynamic<T>`]: a value that can be observed for changes. The state
//!   store publishes each new tree through one.
//! - [`Subscription<T>`]: a poll-based view of a `Dynamic<T>` that tracks
//!   the last version it observed.
//!
//! Both use only lock and atomic primitives, so they work with any async
//! runtime or in sync-only code. A reader never observes a half-written
//! value: `set` swaps the whole value under the write lock.

mod dynamic;

pub use dynamic::{Dynamic, Subscription};
