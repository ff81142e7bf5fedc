//! # AppCore: the state store
//!
//! `AppCore` owns the single [`ViewState`] inside a [`Dynamic`]. Every write
//! goes through [`AppCore::dispatch`], which runs the reducer and publishes
//! the next tree with one store, so a reader sees the old tree or the new
//! one and never anything in between.
//!
//! Writers are serialized by `&mut self`. Shared callers wrap the core in
//! `Arc<async_lock::RwLock<AppCore>>` (see [`crate::workflows`]).

use super::cascade::FetchRequest;
use super::error::TransitionError;
use super::intent::Intent;
use super::reducer::{reduce_with, ReduceOutcome};
use crate::data_source::DataSource;
use crate::errors::AppError;
use crate::views::ViewState;
use eventlens_core::{Dynamic, Subscription};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Store configuration.
///
/// The selection limit is not configurable: at most two events can ever be
/// selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Drop the fetched comparison when the comparison view closes
    pub clear_comparison_on_close: bool,
    /// Emit a `debug` record for every dispatched intent
    pub log_transitions: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clear_comparison_on_close: true,
            log_transitions: true,
        }
    }
}

/// What a dispatch did, minus the tree itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// What happened to the intent
    pub outcome: ReduceOutcome,
    /// Fetch the caller must now run
    pub fetch: Option<FetchRequest>,
}

/// The state store.
pub struct AppCore {
    config: AppConfig,
    state: Dynamic<ViewState>,
    data_source: Option<Arc<dyn DataSource>>,
}

impl AppCore {
    /// Create a store holding the default tree and no data source.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: Dynamic::new(ViewState::init()),
            data_source: None,
        }
    }

    /// Create a store that fetches through `data_source`.
    pub fn with_data_source(config: AppConfig, data_source: Arc<dyn DataSource>) -> Self {
        Self {
            data_source: Some(data_source),
            ..Self::new(config)
        }
    }

    /// Store configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The attached data source, or [`AppError::NoDataSource`].
    pub fn require_data_source(&self) -> Result<Arc<dyn DataSource>, AppError> {
        self.data_source.clone().ok_or(AppError::NoDataSource)
    }

    /// Apply one intent and publish the result.
    ///
    /// Nothing is published unless the intent was applied, so ignored and
    /// stale intents never wake subscribers.
    pub fn dispatch(&mut self, intent: Intent) -> Dispatch {
        let kind = intent.kind();
        let reduction = self
            .state
            .with(|current| reduce_with(current, intent, &self.config));

        debug_assert_eq!(reduction.state.check_invariants(), Ok(()));

        if self.config.log_transitions {
            match &reduction.outcome {
                ReduceOutcome::Applied => {
                    tracing::debug!(intent = kind, fetch = ?reduction.fetch, "transition applied");
                }
                ReduceOutcome::Ignored(reason) => {
                    tracing::debug!(intent = kind, %reason, "transition ignored");
                }
                ReduceOutcome::Discarded(stale) => {
                    tracing::debug!(intent = kind, request = %stale.request, "stale result discarded");
                }
            }
        }

        if reduction.outcome.is_applied() {
            self.state.set(reduction.state);
        }
        Dispatch {
            outcome: reduction.outcome,
            fetch: reduction.fetch,
        }
    }

    /// Decode a wire-form transition and dispatch it.
    pub fn dispatch_raw(&mut self, raw: &str) -> Result<Dispatch, TransitionError> {
        let intent = Intent::decode(raw).map_err(|e| {
            tracing::warn!(error = %e, "rejected transition");
            e
        })?;
        Ok(self.dispatch(intent))
    }

    /// A copy of the current tree.
    pub fn snapshot(&self) -> ViewState {
        self.state.get()
    }

    /// Read the current tree without copying it.
    pub fn with_state<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        self.state.with(f)
    }

    /// Number of trees published so far.
    pub fn version(&self) -> u64 {
        self.state.version()
    }

    /// Subscribe to published trees.
    pub fn subscribe(&self) -> Subscription<ViewState> {
        self.state.subscribe()
    }
}

impl Default for AppCore {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl std::fmt::Debug for AppCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCore")
            .field("config", &self.config)
            .field("version", &self.state.version())
            .field("has_data_source", &self.data_source.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IgnoreReason;
    use eventlens_core::UserId;

    #[test]
    fn test_dispatch_publishes_applied_transitions() {
        let mut core = AppCore::default();
        let mut sub = core.subscribe();
        let start = core.version();

        let dispatch = core.dispatch(Intent::SelectUser {
            user_id: UserId::new("u1").unwrap(),
        });
        assert_eq!(dispatch.outcome, ReduceOutcome::Applied);
        assert!(matches!(dispatch.fetch, Some(FetchRequest::Addresses { .. })));
        assert_eq!(core.version(), start + 1);

        let seen = sub.poll().unwrap();
        assert_eq!(seen.selected_user_id().map(UserId::as_str), Some("u1"));
        assert!(sub.poll().is_none());
    }

    #[test]
    fn test_ignored_transition_does_not_publish() {
        let mut core = AppCore::default();
        let sub = core.subscribe();
        let before = core.snapshot();

        let dispatch = core.dispatch(Intent::RequestComparison);
        assert_eq!(
            dispatch.outcome,
            ReduceOutcome::Ignored(IgnoreReason::NotEnoughSelected { count: 0 })
        );
        assert!(!sub.has_changed());
        assert_eq!(core.snapshot(), before);
    }

    #[test]
    fn test_dispatch_raw_rejects_unknown_type() {
        let mut core = AppCore::default();
        let err = core.dispatch_raw(r#"{"type": "teleport"}"#).unwrap_err();
        assert!(matches!(err, TransitionError::UnknownTransition { .. }));

        let dispatch = core
            .dispatch_raw(r#"{"type": "select_user", "payload": {"user_id": 7}}"#)
            .unwrap();
        assert!(dispatch.outcome.is_applied());
        assert_eq!(
            core.with_state(|s| s.selected_user_id().map(|u| u.to_string())),
            Some("7".to_string())
        );
    }

    #[test]
    fn test_require_data_source_without_one() {
        let core = AppCore::default();
        assert!(matches!(
            core.require_data_source(),
            Err(AppError::NoDataSource)
        ));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"log_transitions": false}"#).unwrap();
        assert!(config.clear_comparison_on_close);
        assert!(!config.log_transitions);
    }
}
