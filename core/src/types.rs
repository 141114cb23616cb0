// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize, de};

use crate::error::Error;

const DATESTAMP_FORMAT: &str = "%Y-%m-%d";

/// Calendar day key, `YYYY-MM-DD`.
///
/// Datestamps order lexicographically the same way they order
/// chronologically, which the store relies on for range pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Datestamp(NaiveDate);

impl Datestamp {
    pub fn new(date: NaiveDate) -> Self {
        Datestamp(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The following day.
    pub fn succ(&self) -> Self {
        // NaiveDate::MAX is ~262143 CE, overflow is not reachable from user data
        Datestamp(self.0.succ_opt().unwrap_or(self.0))
    }

    /// The preceding day.
    pub fn pred(&self) -> Self {
        Datestamp(self.0.pred_opt().unwrap_or(self.0))
    }

    /// Midnight at the start of this day.
    pub fn start_of_day(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }
}

impl From<NaiveDate> for Datestamp {
    fn from(date: NaiveDate) -> Self {
        Datestamp(date)
    }
}

impl From<NaiveDateTime> for Datestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Datestamp(dt.date())
    }
}

impl Display for Datestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATESTAMP_FORMAT))
    }
}

impl FromStr for Datestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DATESTAMP_FORMAT)
            .map(Datestamp)
            .map_err(|_| Error::InvalidDatestamp(s.to_string()))
    }
}

impl Serialize for Datestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Datestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Inclusive day interval whose cached calendar data must be reloaded
/// after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub start: Datestamp,
    pub end: Datestamp,
}

impl DayRange {
    /// Builds a range, swapping the endpoints if they are reversed.
    pub fn new(start: Datestamp, end: Datestamp) -> Self {
        if end < start {
            DayRange {
                start: end,
                end: start,
            }
        } else {
            DayRange { start, end }
        }
    }

    pub fn single(day: Datestamp) -> Self {
        DayRange {
            start: day,
            end: day,
        }
    }

    pub fn contains(&self, day: Datestamp) -> bool {
        self.start <= day && day <= self.end
    }

    /// Days covered by the range, in order.
    pub fn days(&self) -> impl Iterator<Item = Datestamp> + '_ {
        self.start
            .date()
            .iter_days()
            .take_while(|d| *d <= self.end.date())
            .map(Datestamp::from)
    }
}

impl Display for DayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Storage partition for one entity type.
///
/// The local store is a single key-value table; every record lives in
/// exactly one partition and is keyed by its id (or by its datestamp for
/// planners).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Partition {
    Planner,
    PlannerEvent,
    RecurringPlanner,
    RecurringEvent,
    FolderItem,
    CountdownEvent,
    UpcomingDateEvent,
}

impl Partition {
    /// Stable key used in the store's partition column.
    pub(crate) fn as_key(&self) -> &'static str {
        match self {
            Partition::Planner => "planner",
            Partition::PlannerEvent => "planner-event",
            Partition::RecurringPlanner => "recurring-planner",
            Partition::RecurringEvent => "recurring-event",
            Partition::FolderItem => "folder-item",
            Partition::CountdownEvent => "countdown-event",
            Partition::UpcomingDateEvent => "upcoming-date-event",
        }
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> Datestamp {
        s.parse().expect("valid datestamp")
    }

    #[test]
    fn datestamp_roundtrips_through_display() {
        let d = day("2024-06-01");
        assert_eq!(d.to_string(), "2024-06-01");
        assert_eq!(d.to_string().parse::<Datestamp>().unwrap(), d);
    }

    #[test]
    fn datestamp_rejects_garbage() {
        assert!("June 1st".parse::<Datestamp>().is_err());
        assert!("2024-13-01".parse::<Datestamp>().is_err());
    }

    #[test]
    fn datestamp_orders_like_dates() {
        assert!(day("2024-06-01") < day("2024-06-02"));
        assert!(day("2024-12-31") < day("2025-01-01"));
        // lexicographic string order must agree, the store prunes by it
        assert!(day("2024-06-01").to_string() < day("2024-06-02").to_string());
    }

    #[test]
    fn datestamp_succ_pred() {
        assert_eq!(day("2024-06-01").succ(), day("2024-06-02"));
        assert_eq!(day("2024-03-01").pred(), day("2024-02-29"));
    }

    #[test]
    fn day_range_normalizes_reversed_endpoints() {
        let r = DayRange::new(day("2024-06-03"), day("2024-06-01"));
        assert_eq!(r.start, day("2024-06-01"));
        assert_eq!(r.end, day("2024-06-03"));
    }

    #[test]
    fn day_range_contains_and_days() {
        let r = DayRange::new(day("2024-06-01"), day("2024-06-03"));
        assert!(r.contains(day("2024-06-01")));
        assert!(r.contains(day("2024-06-03")));
        assert!(!r.contains(day("2024-06-04")));

        let days: Vec<String> = r.days().map(|d| d.to_string()).collect();
        assert_eq!(days, ["2024-06-01", "2024-06-02", "2024-06-03"]);
    }

    #[test]
    fn partition_keys_are_stable() {
        assert_eq!(Partition::PlannerEvent.as_key(), "planner-event");
        assert_eq!(
            Partition::UpcomingDateEvent.to_string(),
            "upcoming-date-event"
        );
    }
}
