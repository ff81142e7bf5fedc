//! End-to-end drill-down scenarios through the workflow layer.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use assert_matches::assert_matches;
use eventlens_app::selectors::{can_compare, comparison_rows, undeleted_addresses};
use eventlens_app::workflows::explorer;
use eventlens_app::{AppError, DataSourceError, FetchRequest, IgnoreReason, ReduceOutcome};
use eventlens_testkit::*;

fn login() -> eventlens_app::Event {
    event("login", "2024-03-01T09:00:00Z")
}

fn purchase() -> eventlens_app::Event {
    event("purchase", "2024-03-02T17:30:00Z")
}

fn source() -> MockDataSource {
    MockDataSource::new()
        .with_user("u1", vec![address("a1"), deleted_address("a0")])
        .with_user("u2", vec![address("b1")])
        .with_events("a1", vec![login(), purchase()])
        .with_detail(
            &login(),
            detail_of(&login(), record! { "id" => 101, "ip" => "10.0.0.1", "device" => "ios" }),
        )
        .with_detail(
            &purchase(),
            detail_of(&purchase(), record! { "id" => 102, "ip" => "10.0.0.1", "amount" => 42 }),
        )
}

#[tokio::test]
async fn test_load_users() {
    let app = new_app(&source());
    explorer::load_users(&app).await.unwrap();
    let state = explorer::snapshot(&app).await;
    assert_eq!(state.user_ids(), &[user("u1"), user("u2")]);
}

#[tokio::test]
async fn test_soft_deleted_address_disappears_on_refetch() {
    let source = MockDataSource::new().with_user("u1", vec![address("a1")]);
    let app = new_app(&source);

    explorer::select_user(&app, user("u1")).await.unwrap();
    let state = explorer::snapshot(&app).await;
    assert_eq!(undeleted_addresses(state.addresses()).len(), 1);

    source.set_addresses("u1", vec![deleted_address("a1")]);
    explorer::select_user(&app, user("u1")).await.unwrap();
    let state = explorer::snapshot(&app).await;
    assert!(undeleted_addresses(state.addresses()).is_empty());
    assert_eq!(state.addresses().len(), 1);
    assert!(state.addresses()[0].deleted);
}

#[tokio::test]
async fn test_full_drill_down_and_comparison() {
    let source = source();
    let app = new_app(&source);

    explorer::select_user(&app, user("u1")).await.unwrap();
    explorer::select_address(&app, address_id("a1")).await.unwrap();
    explorer::toggle_event(&app, login().guid()).await.unwrap();
    explorer::toggle_event(&app, purchase().guid()).await.unwrap();

    let state = explorer::snapshot(&app).await;
    assert!(can_compare(state.selected_events()));
    assert_invariants(&state);

    let dispatch = explorer::request_comparison(&app).await.unwrap();
    assert_eq!(dispatch.outcome, ReduceOutcome::Applied);

    let state = explorer::snapshot(&app).await;
    assert!(state.comparing_events());
    let rows = comparison_rows(&state).unwrap();
    let flags: Vec<_> = rows.iter().map(|r| (r.key.as_str(), r.differs)).collect();
    assert_eq!(
        flags,
        vec![
            ("type", true),
            ("created_at", true),
            ("id", false),
            ("ip", false),
            ("device", true),
            ("amount", true),
        ]
    );

    explorer::close_comparison(&app).await.unwrap();
    let state = explorer::snapshot(&app).await;
    assert!(!state.comparing_events());
    assert!(state.comparison().is_none());
    assert_eq!(state.selected_events().len(), 2);
}

#[tokio::test]
async fn test_switching_user_clears_everything_below() {
    let app = new_app(&source());

    explorer::select_user(&app, user("u1")).await.unwrap();
    explorer::select_address(&app, address_id("a1")).await.unwrap();
    explorer::toggle_event(&app, login().guid()).await.unwrap();

    let dispatch = explorer::begin(
        &app,
        eventlens_app::Intent::SelectUser {
            user_id: user("u2"),
        },
    )
    .await;
    assert_eq!(
        dispatch.fetch,
        Some(FetchRequest::Addresses {
            user_id: user("u2")
        })
    );
    let state = explorer::snapshot(&app).await;
    assert_cleared_below_user(&state);
    assert_invariants(&state);
}

#[tokio::test]
async fn test_switching_address_clears_events_and_selection() {
    let source = source().with_user("u1", vec![address("a1"), address("a2")]);
    let app = new_app(&source);

    explorer::select_user(&app, user("u1")).await.unwrap();
    explorer::select_address(&app, address_id("a1")).await.unwrap();
    explorer::toggle_event(&app, login().guid()).await.unwrap();
    explorer::select_address(&app, address_id("a2")).await.unwrap();

    let state = explorer::snapshot(&app).await;
    assert_eq!(state.selected_address_id(), Some(&address_id("a2")));
    assert_cleared_below_address(&state);
}

#[tokio::test]
async fn test_deleted_address_cannot_be_selected() {
    let source = source();
    let app = new_app(&source);
    explorer::select_user(&app, user("u1")).await.unwrap();

    let dispatch = explorer::select_address(&app, address_id("a0")).await.unwrap();
    assert_matches!(
        dispatch.outcome,
        ReduceOutcome::Ignored(IgnoreReason::UnknownAddress(_))
    );
    assert_eq!(source.call_count(&Call::Events(address_id("a0"))), 0);
}

#[tokio::test]
async fn test_failed_fetch_sets_error_and_next_transition_clears_it() {
    let source = source();
    source.fail(
        Call::Addresses(user("u1")),
        DataSourceError::network("connection reset"),
    );
    let app = new_app(&source);

    let err = explorer::select_user(&app, user("u1")).await.unwrap_err();
    assert_matches!(err, AppError::DataSource(DataSourceError::Network { .. }));

    let state = explorer::snapshot(&app).await;
    assert_eq!(state.error(), Some("Network error: connection reset"));
    assert!(state.addresses().is_empty());
    assert_eq!(state.selected_user_id(), Some(&user("u1")));

    source.clear_failure(&Call::Addresses(user("u1")));
    explorer::select_user(&app, user("u1")).await.unwrap();
    let state = explorer::snapshot(&app).await;
    assert!(state.error().is_none());
    assert_eq!(state.addresses().len(), 2);
}

#[tokio::test]
async fn test_dismiss_error() {
    let source = source();
    source.fail(Call::UserIds, DataSourceError::decode("unexpected eof"));
    let app = new_app(&source);

    explorer::load_users(&app).await.unwrap_err();
    assert!(explorer::snapshot(&app).await.error().is_some());

    explorer::dismiss_error(&app).await.unwrap();
    assert!(explorer::snapshot(&app).await.error().is_none());
}

#[tokio::test]
async fn test_comparison_detail_failure_keeps_view_open_without_result() {
    let source = source();
    source.fail(
        Call::Details(purchase().guid()),
        DataSourceError::not_found("event"),
    );
    let app = new_app(&source);

    explorer::select_user(&app, user("u1")).await.unwrap();
    explorer::select_address(&app, address_id("a1")).await.unwrap();
    explorer::toggle_event(&app, login().guid()).await.unwrap();
    explorer::toggle_event(&app, purchase().guid()).await.unwrap();
    explorer::request_comparison(&app).await.unwrap_err();

    let state = explorer::snapshot(&app).await;
    assert!(state.comparing_events());
    assert!(state.comparison().is_none());
    assert!(state.error().is_some());
}
