//! # Workflows - Portable Business Logic
//!
//! Async operations that pair an operator intent with the fetch it triggers.
//!
//! ## Pattern
//!
//! - All workflows take `&Arc<RwLock<AppCore>>`
//! - The write lock is held only for a synchronous `dispatch`, never across a
//!   data-source call, so other callers keep reading snapshots while a fetch
//!   is in flight
//! - Every fetch ends in exactly one `*Fetched` or `FetchFailed` dispatch
//! - Return `Result<Dispatch, AppError>`; a failed fetch is also recorded in
//!   the tree's `error` field
//!
//! ## Example
//!
//! ```rust,ignore
//! let app = Arc::new(RwLock::new(AppCore::with_data_source(config, source)));
//! explorer::load_users(&app).await?;
//! explorer::select_user(&app, user_id).await?;
//! let state = explorer::snapshot(&app).await;
//! ```

pub mod explorer;
