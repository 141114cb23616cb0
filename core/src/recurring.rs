// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurring templates and the clone-and-hide rule.
//!
//! A generated instance is never mutated in place when the edit would
//! change its title or time: it is cloned into an independent override
//! and the template is hidden on that day, so regeneration cannot
//! resurrect stale data.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::event::{EventId, EventRecord, RecurringId, RecurringLink, Schedule};
use crate::ordering::SortKey;
use crate::planner::PlannerRecord;
use crate::types::Datestamp;

/// Source definition a daily occurrence is generated from. Templates
/// form a manually ordered list (by `sort_key`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: RecurringId,

    pub title: String,

    /// Weekdays the template applies on, 0 = Monday .. 6 = Sunday.
    /// Empty means every day.
    #[serde(default)]
    pub weekdays: Vec<u8>,

    pub sort_key: SortKey,
}

impl RecurringTemplate {
    pub fn new(id: RecurringId, title: impl Into<String>, sort_key: SortKey) -> Self {
        RecurringTemplate {
            id,
            title: title.into(),
            weekdays: Vec::new(),
            sort_key,
        }
    }

    pub fn applies_on(&self, day: Datestamp) -> bool {
        if self.weekdays.is_empty() {
            return true;
        }
        let weekday = day.date().weekday().num_days_from_monday() as u8;
        self.weekdays.contains(&weekday)
    }

    /// Generates the untimed planner instance for one day.
    pub fn instantiate(&self, day: Datestamp) -> EventRecord {
        EventRecord {
            id: EventId::generate(),
            title: self.title.clone(),
            owner_day: day,
            schedule: Schedule::Untimed,
            recurring: RecurringLink::Instance {
                recurring_id: self.id.clone(),
            },
            hidden: false,
        }
    }
}

/// Instances to generate for a day: templates that apply and are not
/// hidden on that planner.
pub fn instances_for_day(
    templates: &[RecurringTemplate],
    planner: &PlannerRecord,
) -> Vec<EventRecord> {
    templates
        .iter()
        .filter(|t| t.applies_on(planner.day))
        .filter(|t| !planner.is_recurring_hidden(&t.id))
        .map(|t| t.instantiate(planner.day))
        .collect()
}

/// Clones a recurring instance into an independent override.
///
/// The clone gets a fresh identity, drops the instance link and records
/// the template id as its clone origin. The original record is left in
/// the store; the caller hides the template on the planner and swaps the
/// planner position over to the clone.
pub fn detach_instance(record: &EventRecord) -> Result<(EventRecord, RecurringId)> {
    let RecurringLink::Instance { recurring_id } = &record.recurring else {
        return Err(Error::BrokenLink(record.id.to_string()));
    };

    let clone = EventRecord {
        id: EventId::generate(),
        recurring: RecurringLink::Clone {
            recurring_clone_id: recurring_id.clone(),
        },
        ..record.clone()
    };
    Ok((clone, recurring_id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> Datestamp {
        s.parse().expect("valid datestamp")
    }

    fn template(id: &str, weekdays: &[u8]) -> RecurringTemplate {
        let mut t = RecurringTemplate::new(id.into(), "Standup", "m".into());
        t.weekdays = weekdays.to_vec();
        t
    }

    #[test]
    fn applies_on_respects_weekday_filter() {
        // 2024-06-03 is a Monday
        let weekdays_only = template("r-1", &[0, 1, 2, 3, 4]);
        assert!(weekdays_only.applies_on(day("2024-06-03")));
        assert!(!weekdays_only.applies_on(day("2024-06-02"))); // Sunday

        let daily = template("r-2", &[]);
        assert!(daily.applies_on(day("2024-06-02")));
    }

    #[test]
    fn instances_skip_hidden_templates() {
        let templates = vec![template("r-1", &[]), template("r-2", &[])];
        let mut planner = PlannerRecord::new(day("2024-06-03"));
        planner.hide_recurring("r-1".into());

        let instances = instances_for_day(&templates, &planner);

        assert_eq!(instances.len(), 1);
        assert_eq!(
            instances[0].recurring.instance_id(),
            Some(&"r-2".into())
        );
        assert_eq!(instances[0].owner_day, day("2024-06-03"));
    }

    #[test]
    fn detach_produces_independent_clone() {
        let t = template("r-1", &[]);
        let instance = t.instantiate(day("2024-06-03"));

        let (clone, hidden) = detach_instance(&instance).expect("detach");

        assert_ne!(clone.id, instance.id);
        assert_eq!(hidden, "r-1".into());
        assert_eq!(clone.recurring, RecurringLink::Clone {
            recurring_clone_id: "r-1".into(),
        });
        assert_eq!(clone.title, instance.title);
    }

    #[test]
    fn template_serde_carries_only_live_fields() {
        let t = template("r-1", &[0, 2]);

        let json = serde_json::to_value(&t).expect("serialize");
        let mut keys: Vec<&str> = json
            .as_object()
            .expect("object")
            .keys()
            .map(|k| k.as_str())
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, ["id", "sort_key", "title", "weekdays"]);

        let back: RecurringTemplate = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, t);
    }

    #[test]
    fn detach_rejects_non_instances() {
        let record = EventRecord::untimed("e-1".into(), "Groceries", day("2024-06-01"));
        assert!(matches!(
            detach_instance(&record),
            Err(Error::BrokenLink(_))
        ));
    }
}
