//! Standard assertion helpers for tests

use eventlens_app::ViewState;

/// Assert that the tree satisfies every structural invariant.
pub fn assert_invariants(state: &ViewState) {
    if let Err(violation) = state.check_invariants() {
        panic!("state invariant violated: {violation}\nstate: {state:#?}");
    }
}

/// Assert that nothing below the user level survived.
pub fn assert_cleared_below_user(state: &ViewState) {
    assert!(state.addresses().is_empty(), "addresses not cleared");
    assert!(
        state.selected_address_id().is_none(),
        "selected address not cleared"
    );
    assert_cleared_below_address(state);
}

/// Assert that nothing below the address level survived.
pub fn assert_cleared_below_address(state: &ViewState) {
    assert!(state.events().is_empty(), "events not cleared");
    assert!(state.selected_events().is_empty(), "selection not cleared");
    assert!(!state.comparing_events(), "comparison still open");
    assert!(state.comparison().is_none(), "comparison result not cleared");
}

/// Assert that a dispatch was discarded as stale.
#[macro_export]
macro_rules! assert_discarded {
    ($outcome:expr) => {{
        let outcome = &$outcome;
        assert!(
            matches!(outcome, $crate::__private::ReduceOutcome::Discarded(_)),
            "expected a discarded stale result, got {:?}",
            outcome
        );
    }};
}
