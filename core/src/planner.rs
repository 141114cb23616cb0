// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::event::{EventId, RecurringId};
use crate::types::Datestamp;

/// The ordered list of event ids owned by one day.
///
/// `event_ids` is the source of truth for manual position; for timed
/// events the same order must also be non-decreasing by effective time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerRecord {
    pub day: Datestamp,

    pub event_ids: Vec<EventId>,

    /// Recurring templates suppressed on this day, so regeneration does
    /// not resurrect an instance the user customized or deleted.
    #[serde(default)]
    pub hidden_recurring: BTreeSet<RecurringId>,
}

impl PlannerRecord {
    pub fn new(day: Datestamp) -> Self {
        PlannerRecord {
            day,
            event_ids: Vec::new(),
            hidden_recurring: BTreeSet::new(),
        }
    }

    /// Array index of the given event, if present.
    pub fn position(&self, id: &EventId) -> Option<usize> {
        self.event_ids.iter().position(|e| e == id)
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.position(id).is_some()
    }

    /// Inserts at the given index, clamped to the list length.
    pub fn insert_at(&mut self, index: usize, id: EventId) {
        let index = index.min(self.event_ids.len());
        self.event_ids.insert(index, id);
    }

    pub fn push(&mut self, id: EventId) {
        self.event_ids.push(id);
    }

    /// Removes the event, returning the index it occupied.
    pub fn remove(&mut self, id: &EventId) -> Option<usize> {
        let index = self.position(id)?;
        self.event_ids.remove(index);
        Some(index)
    }

    /// Replaces `old` with `new` in place, keeping the array position.
    pub fn replace(&mut self, old: &EventId, new: EventId) -> Option<usize> {
        let index = self.position(old)?;
        self.event_ids[index] = new;
        Some(index)
    }

    pub fn hide_recurring(&mut self, id: RecurringId) {
        self.hidden_recurring.insert(id);
    }

    pub fn is_recurring_hidden(&self, id: &RecurringId) -> bool {
        self.hidden_recurring.contains(id)
    }
}
