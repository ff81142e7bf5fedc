//! eventlens Testing Infrastructure
//!
//! Common setup for tests that drive `eventlens-app` end to end: a scriptable
//! [`MockDataSource`], record builders and state assertions.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! eventlens-testkit = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use eventlens_testkit::*;
//!
//! #[tokio::test]
//! async fn browse() {
//!     let source = MockDataSource::new().with_user("u1", vec![address("a1")]);
//!     let app = new_app(&source);
//!     explorer::select_user(&app, user("u1")).await.unwrap();
//!     assert_invariants(&explorer::snapshot(&app).await);
//! }
//! ```

pub mod assertions;
pub mod builders;
pub mod mock_source;

pub use assertions::*;
pub use builders::*;
pub use mock_source::{Call, Gate, MockDataSource};

#[doc(hidden)]
pub use serde_json;

#[doc(hidden)]
pub mod __private {
    pub use eventlens_app::ReduceOutcome;
}

use async_lock::RwLock;
use eventlens_app::{AppConfig, AppCore};
use std::sync::Arc;

/// Shared core wired to `source` with the default configuration.
pub fn new_app(source: &MockDataSource) -> Arc<RwLock<AppCore>> {
    new_app_with(AppConfig::default(), source)
}

/// Shared core wired to `source`.
pub fn new_app_with(config: AppConfig, source: &MockDataSource) -> Arc<RwLock<AppCore>> {
    Arc::new(RwLock::new(AppCore::with_data_source(
        config,
        Arc::new(source.clone()),
    )))
}
