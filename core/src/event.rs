// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Datestamp, Partition};

/// Identifier of a planner event record, unique within its partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        EventId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        EventId(s.to_string())
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an event in the device calendar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarEventId(String);

impl CalendarEventId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CalendarEventId {
    fn from(s: &str) -> Self {
        CalendarEventId(s.to_string())
    }
}

impl From<String> for CalendarEventId {
    fn from(s: String) -> Self {
        CalendarEventId(s)
    }
}

impl Display for CalendarEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a recurring template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecurringId(String);

impl RecurringId {
    pub fn generate() -> Self {
        RecurringId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecurringId {
    fn from(s: &str) -> Self {
        RecurringId(s.to_string())
    }
}

impl Display for RecurringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a planner event record is scheduled.
///
/// One variant per record shape, carrying exactly the fields valid for
/// that shape. All-day spans have no planner record at all, so they have
/// no variant here; they exist only in the device calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    /// Manually ordered, no time attached, no calendar record.
    Untimed,

    /// Timed within a single day, backed by one calendar event.
    Timed {
        start: NaiveDateTime,
        end: NaiveDateTime,
        calendar_event_id: CalendarEventId,
    },

    /// Start half of a multi-day pair. `end_record` is the linked record
    /// on the end day; both halves share one calendar event.
    LinkedStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
        calendar_event_id: CalendarEventId,
        end_record: EventId,
    },

    /// End half of a multi-day pair, sorted by its own `end`.
    LinkedEnd {
        start: NaiveDateTime,
        end: NaiveDateTime,
        calendar_event_id: CalendarEventId,
        start_record: EventId,
    },
}

impl Schedule {
    /// The instant this record sorts by in its planner: the end for an
    /// end-linked record, the start otherwise. Untimed records keep their
    /// manual position instead.
    pub fn effective_time(&self) -> Option<NaiveDateTime> {
        match self {
            Schedule::Untimed => None,
            Schedule::Timed { start, .. } | Schedule::LinkedStart { start, .. } => Some(*start),
            Schedule::LinkedEnd { end, .. } => Some(*end),
        }
    }

    pub fn calendar_event_id(&self) -> Option<&CalendarEventId> {
        match self {
            Schedule::Untimed => None,
            Schedule::Timed {
                calendar_event_id, ..
            }
            | Schedule::LinkedStart {
                calendar_event_id, ..
            }
            | Schedule::LinkedEnd {
                calendar_event_id, ..
            } => Some(calendar_event_id),
        }
    }
}

/// Link between a planner event and the recurring template it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurringLink {
    /// Not recurring-derived.
    #[default]
    None,

    /// A generated instance of a template. Never mutated in place.
    Instance { recurring_id: RecurringId },

    /// A customized, permanently independent override of an instance.
    Clone { recurring_clone_id: RecurringId },
}

impl RecurringLink {
    pub fn instance_id(&self) -> Option<&RecurringId> {
        match self {
            RecurringLink::Instance { recurring_id } => Some(recurring_id),
            _ => None,
        }
    }
}

/// The atomic schedulable unit, one record in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,

    pub title: String,

    /// Datestamp of the planner that currently lists this record.
    pub owner_day: Datestamp,

    pub schedule: Schedule,

    #[serde(default)]
    pub recurring: RecurringLink,

    /// Soft-hide flag; hidden records are kept in the store so a later
    /// sync pass can not resurrect stale data under the same identity.
    #[serde(default)]
    pub hidden: bool,
}

impl EventRecord {
    /// Creates an untimed record on the given day.
    pub fn untimed(id: EventId, title: impl Into<String>, owner_day: Datestamp) -> Self {
        EventRecord {
            id,
            title: title.into(),
            owner_day,
            schedule: Schedule::Untimed,
            recurring: RecurringLink::None,
            hidden: false,
        }
    }

    pub fn effective_time(&self) -> Option<NaiveDateTime> {
        self.schedule.effective_time()
    }

    pub fn is_recurring_instance(&self) -> bool {
        matches!(self.recurring, RecurringLink::Instance { .. })
    }

    /// Partition this record is stored in. Recurring instances live in
    /// their own partition so template regeneration can scan them cheaply.
    pub fn partition(&self) -> Partition {
        if self.is_recurring_instance() {
            Partition::RecurringPlanner
        } else {
            Partition::PlannerEvent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        s.parse().expect("valid datetime")
    }

    #[test]
    fn effective_time_uses_end_for_end_linked_records() {
        let schedule = Schedule::LinkedEnd {
            start: dt("2024-06-01T22:00:00"),
            end: dt("2024-06-02T10:00:00"),
            calendar_event_id: "cal-1".into(),
            start_record: "e-start".into(),
        };
        assert_eq!(schedule.effective_time(), Some(dt("2024-06-02T10:00:00")));

        let schedule = Schedule::LinkedStart {
            start: dt("2024-06-01T22:00:00"),
            end: dt("2024-06-02T10:00:00"),
            calendar_event_id: "cal-1".into(),
            end_record: "e-end".into(),
        };
        assert_eq!(schedule.effective_time(), Some(dt("2024-06-01T22:00:00")));
    }

    #[test]
    fn untimed_records_have_no_effective_time() {
        let record = EventRecord::untimed(EventId::generate(), "Groceries", day("2024-06-01"));
        assert_eq!(record.effective_time(), None);
        assert_eq!(record.schedule.calendar_event_id(), None);
    }

    #[test]
    fn recurring_instances_use_their_own_partition() {
        let mut record = EventRecord::untimed("e-1".into(), "Standup", day("2024-06-01"));
        assert_eq!(record.partition(), Partition::PlannerEvent);

        record.recurring = RecurringLink::Instance {
            recurring_id: "r-1".into(),
        };
        assert_eq!(record.partition(), Partition::RecurringPlanner);

        record.recurring = RecurringLink::Clone {
            recurring_clone_id: "r-1".into(),
        };
        assert_eq!(record.partition(), Partition::PlannerEvent);
    }

    #[test]
    fn schedule_serde_is_tagged() {
        let schedule = Schedule::Timed {
            start: dt("2024-06-01T10:00:00"),
            end: dt("2024-06-01T11:00:00"),
            calendar_event_id: "cal-1".into(),
        };
        let json = serde_json::to_value(&schedule).unwrap();
        assert_eq!(json["kind"], "timed");
        assert_eq!(serde_json::from_value::<Schedule>(json).unwrap(), schedule);
    }

    fn day(s: &str) -> Datestamp {
        s.parse().expect("valid datestamp")
    }
}
