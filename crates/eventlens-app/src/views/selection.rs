//! Selected-events set

use eventlens_core::EventGuid;
use indexmap::IndexSet;
use serde::Serialize;

/// Upper bound on simultaneously selected events.
pub const MAX_SELECTED_EVENTS: usize = 2;

/// The set of selected event guids, in selection order.
///
/// The set can never hold more than [`MAX_SELECTED_EVENTS`] guids: the only
/// insertion path refuses once the set is full. Selection order decides which
/// record is shown first in a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectedEvents(IndexSet<EventGuid>);

impl SelectedEvents {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a guid is selected.
    pub fn contains(&self, guid: &EventGuid) -> bool {
        self.0.contains(guid)
    }

    /// Number of selected guids.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether another guid can still be added.
    pub fn has_room(&self) -> bool {
        self.0.len() < MAX_SELECTED_EVENTS
    }

    /// Selected guids in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &EventGuid> {
        self.0.iter()
    }

    /// The selected pair in selection order, once exactly two are selected.
    pub fn pair(&self) -> Option<[&EventGuid; 2]> {
        match (self.0.len(), self.0.get_index(0), self.0.get_index(1)) {
            (2, Some(first), Some(second)) => Some([first, second]),
            _ => None,
        }
    }

    /// Check whether `guids` names exactly the selected pair, in any order.
    pub fn matches_pair(&self, guids: &[EventGuid; 2]) -> bool {
        self.0.len() == 2 && guids[0] != guids[1] && guids.iter().all(|g| self.0.contains(g))
    }

    /// Add a guid. Returns `false` (and leaves the set untouched) if the guid
    /// is already present or the set is full.
    pub(crate) fn insert(&mut self, guid: EventGuid) -> bool {
        if !self.has_room() {
            return false;
        }
        self.0.insert(guid)
    }

    /// Remove a guid, keeping the order of the rest.
    pub(crate) fn remove(&mut self, guid: &EventGuid) -> bool {
        self.0.shift_remove(guid)
    }

    /// Keep only guids matching `keep`.
    pub(crate) fn retain(&mut self, keep: impl FnMut(&EventGuid) -> bool) {
        self.0.retain(keep);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guid(n: u8) -> EventGuid {
        format!("evt-{}", format!("{n:02x}").repeat(16)).parse().unwrap()
    }

    #[test]
    fn test_insert_refuses_third_guid() {
        let mut s = SelectedEvents::new();
        assert!(s.insert(guid(1)));
        assert!(s.insert(guid(2)));
        assert!(!s.has_room());
        assert!(!s.insert(guid(3)));
        assert_eq!(s.len(), 2);
        assert!(!s.contains(&guid(3)));
    }

    #[test]
    fn test_pair_keeps_selection_order() {
        let mut s = SelectedEvents::new();
        s.insert(guid(9));
        assert!(s.pair().is_none());
        s.insert(guid(1));
        assert_eq!(s.pair(), Some([&guid(9), &guid(1)]));
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let mut s = SelectedEvents::new();
        s.insert(guid(1));
        s.insert(guid(2));
        assert!(s.remove(&guid(1)));
        s.insert(guid(3));
        assert_eq!(s.pair(), Some([&guid(2), &guid(3)]));
    }

    #[test]
    fn test_matches_pair_ignores_order() {
        let mut s = SelectedEvents::new();
        s.insert(guid(1));
        s.insert(guid(2));
        assert!(s.matches_pair(&[guid(2), guid(1)]));
        assert!(!s.matches_pair(&[guid(1), guid(3)]));
        assert!(!s.matches_pair(&[guid(1), guid(1)]));
    }
}
