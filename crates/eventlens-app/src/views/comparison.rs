//! Comparison result

use crate::diff::{diff, DiffRow};
use eventlens_core::{EventDetail, EventGuid};
use serde::Serialize;

/// Both detail records of a comparison, ordered as the events were selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonPair {
    guids: [EventGuid; 2],
    details: [EventDetail; 2],
}

impl ComparisonPair {
    /// Pair each guid with its detail record.
    pub fn new(guids: [EventGuid; 2], details: [EventDetail; 2]) -> Self {
        Self { guids, details }
    }

    /// Reorder so the records follow `order`. Returns `None` unless `order`
    /// names the same two guids.
    pub(crate) fn ordered_as(self, order: [&EventGuid; 2]) -> Option<Self> {
        let [g0, g1] = self.guids;
        let [d0, d1] = self.details;
        if &g0 == order[0] && &g1 == order[1] {
            Some(Self::new([g0, g1], [d0, d1]))
        } else if &g1 == order[0] && &g0 == order[1] {
            Some(Self::new([g1, g0], [d1, d0]))
        } else {
            None
        }
    }

    /// The compared guids.
    pub fn guids(&self) -> &[EventGuid; 2] {
        &self.guids
    }

    /// Detail record of the first selected event.
    pub fn first(&self) -> &EventDetail {
        &self.details[0]
    }

    /// Detail record of the second selected event.
    pub fn second(&self) -> &EventDetail {
        &self.details[1]
    }

    /// Field-by-field diff of the two records.
    pub fn rows(&self) -> Vec<DiffRow> {
        diff(self.first(), self.second())
    }
}
