//! Explorer Workflow - Portable Business Logic
//!
//! Drill-down from user to comparison:
//!
//! ```text
//! load_users → select_user → select_address → toggle_event ×2 → request_comparison
//! ```
//!
//! Each operation dispatches its intent with [`begin`] and then runs the
//! requested fetch with [`complete_fetch`]. The two halves are public so a
//! caller can start several operations and let their fetches finish in any
//! order; stale completions are discarded by the reducer.

use crate::core::{AppCore, Dispatch, FetchRequest, Intent};
use crate::data_source::{DataSource, DataSourceError};
use crate::errors::AppError;
use crate::views::ViewState;
use async_lock::RwLock;
use eventlens_core::{AddressId, EventGuid, UserId};
use std::sync::Arc;

/// Dispatch `intent` without running its fetch.
///
/// The returned [`Dispatch::fetch`] is what [`complete_fetch`] must be given
/// to finish the operation.
pub async fn begin(app_core: &Arc<RwLock<AppCore>>, intent: Intent) -> Dispatch {
    app_core.write().await.dispatch(intent)
}

/// Run `request` against the data source and dispatch its outcome.
///
/// On failure, including a core with no data source, a `FetchFailed` intent
/// is dispatched before the error is returned.
pub async fn complete_fetch(
    app_core: &Arc<RwLock<AppCore>>,
    request: FetchRequest,
) -> Result<Dispatch, AppError> {
    let source = app_core.read().await.require_data_source();
    let source = match source {
        Ok(source) => source,
        Err(err) => {
            tracing::warn!(request = %request, error = %err, "fetch not run");
            let message = err.to_string();
            app_core
                .write()
                .await
                .dispatch(Intent::FetchFailed { request, message });
            return Err(err);
        }
    };

    let outcome = fetch(source.as_ref(), &request).await;
    match outcome {
        Ok(intent) => Ok(app_core.write().await.dispatch(intent)),
        Err(err) => {
            tracing::warn!(request = %request, error = %err, "fetch failed");
            let message = err.to_string();
            app_core
                .write()
                .await
                .dispatch(Intent::FetchFailed { request, message });
            Err(err.into())
        }
    }
}

async fn fetch(source: &dyn DataSource, request: &FetchRequest) -> Result<Intent, DataSourceError> {
    let intent = match request {
        FetchRequest::UserIds => Intent::UserIdsFetched {
            user_ids: source.fetch_user_ids().await?,
        },
        FetchRequest::Addresses { user_id } => Intent::AddressesFetched {
            user_id: user_id.clone(),
            addresses: source.fetch_addresses_for(user_id).await?,
        },
        FetchRequest::Events { address_id } => Intent::EventsFetched {
            address_id: address_id.clone(),
            events: source.fetch_events_for(address_id).await?,
        },
        FetchRequest::EventDetails { guids } => {
            let (first, second) = futures::try_join!(
                source.fetch_event_details(&guids[0]),
                source.fetch_event_details(&guids[1]),
            )?;
            Intent::ComparisonFetched {
                guids: guids.clone(),
                details: [first, second],
            }
        }
    };
    Ok(intent)
}

async fn run(app_core: &Arc<RwLock<AppCore>>, intent: Intent) -> Result<Dispatch, AppError> {
    let dispatch = begin(app_core, intent).await;
    match dispatch.fetch.clone() {
        Some(request) => complete_fetch(app_core, request).await,
        None => Ok(dispatch),
    }
}

/// Load the selectable user ids.
#[tracing::instrument(skip(app_core))]
pub async fn load_users(app_core: &Arc<RwLock<AppCore>>) -> Result<Dispatch, AppError> {
    tracing::info!("loading user ids");
    run(app_core, Intent::LoadUsers).await
}

/// Select a user and fetch its addresses.
///
/// Clears the selected address, events, selection and comparison.
#[tracing::instrument(skip(app_core), fields(user = %user_id))]
pub async fn select_user(
    app_core: &Arc<RwLock<AppCore>>,
    user_id: UserId,
) -> Result<Dispatch, AppError> {
    tracing::info!("selecting user");
    run(app_core, Intent::SelectUser { user_id }).await
}

/// Select an address of the current user and fetch its events.
#[tracing::instrument(skip(app_core), fields(address = %address_id))]
pub async fn select_address(
    app_core: &Arc<RwLock<AppCore>>,
    address_id: AddressId,
) -> Result<Dispatch, AppError> {
    tracing::info!("selecting address");
    run(app_core, Intent::SelectAddress { address_id }).await
}

/// Select an event, or deselect it if already selected.
#[tracing::instrument(skip(app_core), fields(event = %guid))]
pub async fn toggle_event(
    app_core: &Arc<RwLock<AppCore>>,
    guid: EventGuid,
) -> Result<Dispatch, AppError> {
    run(app_core, Intent::ToggleEventSelection { guid }).await
}

/// Open the comparison and fetch both detail records.
#[tracing::instrument(skip(app_core))]
pub async fn request_comparison(app_core: &Arc<RwLock<AppCore>>) -> Result<Dispatch, AppError> {
    tracing::info!("requesting comparison");
    run(app_core, Intent::RequestComparison).await
}

/// Close the comparison view.
pub async fn close_comparison(app_core: &Arc<RwLock<AppCore>>) -> Result<Dispatch, AppError> {
    run(app_core, Intent::CloseComparison).await
}

/// Clear the error message.
pub async fn dismiss_error(app_core: &Arc<RwLock<AppCore>>) -> Result<Dispatch, AppError> {
    run(app_core, Intent::DismissError).await
}

/// Decode a wire-form transition, dispatch it and run its fetch.
///
/// An undecodable transition is returned as [`AppError::Transition`] and
/// leaves the tree untouched.
#[tracing::instrument(skip(app_core, raw))]
pub async fn dispatch_transition(
    app_core: &Arc<RwLock<AppCore>>,
    raw: &str,
) -> Result<Dispatch, AppError> {
    let dispatch = app_core.write().await.dispatch_raw(raw)?;
    match dispatch.fetch.clone() {
        Some(request) => complete_fetch(app_core, request).await,
        None => Ok(dispatch),
    }
}

/// Current tree.
pub async fn snapshot(app_core: &Arc<RwLock<AppCore>>) -> ViewState {
    app_core.read().await.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AppConfig, IgnoreReason, ReduceOutcome, TransitionError};
    use crate::errors::ErrorCategory;

    #[tokio::test]
    async fn test_missing_data_source_is_reported_in_tree() {
        let app_core = Arc::new(RwLock::new(AppCore::new(AppConfig::default())));
        let user = UserId::new("u1").unwrap();

        let err = select_user(&app_core, user.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::NoDataSource));

        let state = snapshot(&app_core).await;
        assert_eq!(state.selected_user_id(), Some(&user));
        assert_eq!(state.error(), Some("No data source attached"));
        assert_eq!(state.check_invariants(), Ok(()));
    }

    #[tokio::test]
    async fn test_missing_data_source_for_superseded_fetch_leaves_tree() {
        let app_core = Arc::new(RwLock::new(AppCore::default()));
        let dispatch = begin(
            &app_core,
            Intent::SelectUser {
                user_id: UserId::new("u1").unwrap(),
            },
        )
        .await;
        begin(
            &app_core,
            Intent::SelectUser {
                user_id: UserId::new("u2").unwrap(),
            },
        )
        .await;

        let request = dispatch.fetch.unwrap();
        let err = complete_fetch(&app_core, request).await.unwrap_err();
        assert!(matches!(err, AppError::NoDataSource));
        assert!(snapshot(&app_core).await.error().is_none());
    }

    #[tokio::test]
    async fn test_undecodable_transition_is_an_input_error() {
        let app_core = Arc::new(RwLock::new(AppCore::default()));
        let before = snapshot(&app_core).await;

        let err = dispatch_transition(&app_core, r#"{"type": "teleport"}"#)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Transition(TransitionError::UnknownTransition { .. })
        ));
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(snapshot(&app_core).await, before);
    }

    #[tokio::test]
    async fn test_decoded_transition_without_fetch_is_dispatched() {
        let app_core = Arc::new(RwLock::new(AppCore::default()));
        let dispatch = dispatch_transition(&app_core, r#"{"type": "dismiss_error"}"#)
            .await
            .unwrap();
        assert_eq!(dispatch.outcome, ReduceOutcome::Ignored(IgnoreReason::NoError));
    }

    #[tokio::test]
    async fn test_operation_without_fetch_needs_no_data_source() {
        let app_core = Arc::new(RwLock::new(AppCore::default()));
        let dispatch = close_comparison(&app_core).await.unwrap();
        assert_eq!(
            dispatch.outcome,
            ReduceOutcome::Ignored(IgnoreReason::NotComparing)
        );
        assert!(dispatch.fetch.is_none());
    }
}
