// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Thin async seam over the device calendar.
//!
//! The device calendar is an external system with independent failure
//! modes (permission revoked mid-session, event deleted externally).
//! Every call is fallible and the coordinator performs no local store
//! write until the calendar mutation has confirmed.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::CalendarEventId;
use crate::types::{DayRange, Datestamp};

/// The calendar-side fields of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
}

impl EventDetails {
    /// Days covered by this event. For all-day events the end boundary
    /// is exclusive (midnight of the day after the last covered day).
    pub fn day_range(&self) -> DayRange {
        let end_day = if self.all_day && self.end.time() == chrono::NaiveTime::MIN {
            Datestamp::from(self.end).pred()
        } else {
            Datestamp::from(self.end)
        };
        DayRange::new(Datestamp::from(self.start), end_day)
    }
}

/// Call contract of the OS calendar.
#[async_trait]
pub trait CalendarBridge: Send + Sync {
    async fn create_event(&self, calendar_id: &str, details: &EventDetails)
    -> Result<CalendarEventId>;

    async fn update_event(
        &self,
        id: &CalendarEventId,
        details: &EventDetails,
        future_events: bool,
    ) -> Result<()>;

    async fn delete_event(&self, id: &CalendarEventId, future_events: bool) -> Result<()>;

    async fn get_event(&self, id: &CalendarEventId) -> Result<EventDetails>;

    /// Whether calendar access is currently granted.
    async fn permission_granted(&self) -> bool;

    /// Prompts for calendar access; returns whether it was granted.
    async fn request_permission(&self) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        s.parse().expect("valid datetime")
    }

    #[test]
    fn day_range_of_timed_event_uses_both_dates() {
        let details = EventDetails {
            title: "Trip".into(),
            start: dt("2024-06-01T22:00:00"),
            end: dt("2024-06-03T10:00:00"),
            all_day: false,
        };
        let range = details.day_range();
        assert_eq!(range.start.to_string(), "2024-06-01");
        assert_eq!(range.end.to_string(), "2024-06-03");
    }

    #[test]
    fn all_day_midnight_end_is_exclusive() {
        // all-day events end at the start of the following day
        let details = EventDetails {
            title: "Conference".into(),
            start: dt("2024-06-01T00:00:00"),
            end: dt("2024-06-04T00:00:00"),
            all_day: true,
        };
        let range = details.day_range();
        assert_eq!(range.end.to_string(), "2024-06-03");
    }
}
