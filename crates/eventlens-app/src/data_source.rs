//! # DataSource: the fetch collaborator
//!
//! `eventlens-app` performs no I/O. Frontends hand `AppCore` an implementation
//! of [`DataSource`] that knows how to reach the backend (a fixture file, an
//! HTTP API, a scripted mock in tests).
//!
//! ```text
//! eventlens-app (pure)       frontend
//! ┌─────────────────┐      ┌──────────────────┐
//! │ AppCore         │      │ FixtureDataSource│
//! │   ┌──────────┐  │      │   implements     │
//! │   │DataSource│◄─┼──────│   DataSource     │
//! │   └──────────┘  │      └──────────────────┘
//! └─────────────────┘
//! ```
//!
//! Implementations report only success or failure; the reducer decides whether
//! an outcome is still wanted.

use crate::errors::ErrorCategory;
use async_trait::async_trait;
use eventlens_core::{Address, AddressId, CoreError, Event, EventDetail, EventGuid, UserId};
use thiserror::Error;

/// A failed fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSourceError {
    /// The backend could not be reached or did not answer
    #[error("Network error: {message}")]
    Network {
        /// What went wrong
        message: String,
    },

    /// The backend has no such entity
    #[error("{what} not found")]
    NotFound {
        /// Description of the missing entity
        what: String,
    },

    /// The backend answered with something that does not parse
    #[error("Could not decode response: {message}")]
    Decode {
        /// Parser message
        message: String,
    },
}

impl DataSourceError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Category for frontend treatment.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network { .. } => ErrorCategory::Network,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Decode { .. } => ErrorCategory::Data,
        }
    }
}

impl From<CoreError> for DataSourceError {
    fn from(err: CoreError) -> Self {
        Self::decode(err.to_string())
    }
}

/// Fetch operations the cascade needs.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Ids of every user the operator may pick
    async fn fetch_user_ids(&self) -> Result<Vec<UserId>, DataSourceError>;

    /// Every address of `user`, soft-deleted ones included
    async fn fetch_addresses_for(&self, user: &UserId) -> Result<Vec<Address>, DataSourceError>;

    /// Events recorded against `address`
    async fn fetch_events_for(&self, address: &AddressId) -> Result<Vec<Event>, DataSourceError>;

    /// Full detail record of one listed event
    async fn fetch_event_details(&self, guid: &EventGuid) -> Result<EventDetail, DataSourceError>;
}
