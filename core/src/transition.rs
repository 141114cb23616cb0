// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Pure state machine for converting an event between its four
//! representations: untimed, single-day calendar, multi-day calendar
//! (two linked records) and all-day calendar (calendar-only).
//!
//! Given the prior representation and the submitted form, it computes
//! the single calendar mutation to perform, which record identities and
//! array positions carry over, which records must be removed, and every
//! date range whose cached calendar data must be invalidated. It never
//! touches the store or the calendar itself.

use crate::bridge::EventDetails;
use crate::event::{CalendarEventId, EventId};
use crate::types::{DayRange, Datestamp};

/// Where an existing planner record sits.
///
/// `index: None` means the owner day's planner no longer exists in
/// storage (pruned) or does not list the record; such a record cannot
/// keep its position and is freshly placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordAnchor {
    pub id: EventId,
    pub day: Datestamp,
    pub index: Option<usize>,
}

/// An event's prior representation, with whatever already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representation {
    NonCalendar {
        anchor: RecordAnchor,
    },
    SingleDay {
        anchor: RecordAnchor,
        calendar_event_id: CalendarEventId,
    },
    MultiDay {
        start: RecordAnchor,
        end: RecordAnchor,
        calendar_event_id: CalendarEventId,
    },
    /// All-day spans are calendar-only; there is no planner record.
    AllDay {
        calendar_event_id: CalendarEventId,
        range: DayRange,
    },
}

impl Representation {
    pub fn calendar_event_id(&self) -> Option<&CalendarEventId> {
        match self {
            Representation::NonCalendar { .. } => None,
            Representation::SingleDay {
                calendar_event_id, ..
            }
            | Representation::MultiDay {
                calendar_event_id, ..
            }
            | Representation::AllDay {
                calendar_event_id, ..
            } => Some(calendar_event_id),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, Representation::AllDay { .. })
    }

    /// Date ranges the prior representation occupied.
    fn ranges(&self) -> Vec<DayRange> {
        match self {
            Representation::NonCalendar { anchor }
            | Representation::SingleDay { anchor, .. } => vec![DayRange::single(anchor.day)],
            Representation::MultiDay { start, end, .. } => {
                vec![DayRange::new(start.day, end.day)]
            }
            Representation::AllDay { range, .. } => vec![*range],
        }
    }
}

/// The form's requested representation, from three independent signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventForm {
    pub title: String,
    pub is_calendar_event: bool,
    pub all_day: bool,
    pub start: chrono::NaiveDateTime,
    pub end: chrono::NaiveDateTime,
    /// Apply calendar updates to future occurrences as well.
    pub future_events: bool,
}

/// Target representation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    NonCalendar,
    SingleDay,
    MultiDay,
    AllDay,
}

impl EventForm {
    pub fn target(&self) -> TargetKind {
        if !self.is_calendar_event {
            TargetKind::NonCalendar
        } else if self.all_day {
            TargetKind::AllDay
        } else if self.start.date() != self.end.date() {
            TargetKind::MultiDay
        } else {
            TargetKind::SingleDay
        }
    }

    pub fn start_day(&self) -> Datestamp {
        Datestamp::from(self.start)
    }

    pub fn end_day(&self) -> Datestamp {
        Datestamp::from(self.end)
    }

    /// Days the new representation covers.
    pub fn day_range(&self) -> DayRange {
        match self.target() {
            TargetKind::NonCalendar | TargetKind::SingleDay => DayRange::single(self.start_day()),
            TargetKind::MultiDay | TargetKind::AllDay => {
                DayRange::new(self.start_day(), self.end_day())
            }
        }
    }
}

/// The single calendar mutation a transition requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarAction {
    None,
    Create {
        details: EventDetails,
    },
    Update {
        id: CalendarEventId,
        details: EventDetails,
        future_events: bool,
    },
    Delete {
        id: CalendarEventId,
    },
}

/// Which half of the target representation a planned record is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRole {
    Sole,
    Start,
    End,
}

/// Identity and position reuse for one planned record.
///
/// The id is always reused when a prior planner record survives the
/// transition; the array index only when the record stays on the same,
/// still-existing day. `index: None` means freshly positioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carryover {
    pub id: EventId,
    pub from_day: Datestamp,
    pub index: Option<usize>,
}

/// One planner record that must exist after the transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPlan {
    pub day: Datestamp,
    pub role: RecordRole,
    pub carryover: Option<Carryover>,
}

/// A prior record that must be deleted from storage and its planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRemoval {
    pub id: EventId,
    pub day: Datestamp,
}

/// Everything the coordinator must do for one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub calendar_action: CalendarAction,
    pub records: Vec<RecordPlan>,
    pub removals: Vec<RecordRemoval>,
    pub affected_ranges: Vec<DayRange>,
}

/// Computes the transition from `prior` (or nothing, for a brand-new
/// event) to the representation the form requests.
pub fn plan(prior: Option<&Representation>, form: &EventForm) -> TransitionPlan {
    let target = form.target();
    let details = calendar_details(form, prior);

    let calendar_action = match (prior.and_then(|p| p.calendar_event_id()), target) {
        (None, TargetKind::NonCalendar) => CalendarAction::None,
        (None, _) => CalendarAction::Create { details },
        (Some(id), TargetKind::NonCalendar) => CalendarAction::Delete { id: id.clone() },
        (Some(id), _) => CalendarAction::Update {
            id: id.clone(),
            details,
            future_events: form.future_events,
        },
    };

    let (records, removals) = plan_records(prior, form, target);

    let new_range = form.day_range();
    let mut affected_ranges = vec![new_range];
    if let Some(prior) = prior {
        for range in prior.ranges() {
            if !affected_ranges.contains(&range) {
                affected_ranges.push(range);
            }
        }
    }

    TransitionPlan {
        calendar_action,
        records,
        removals,
        affected_ranges,
    }
}

/// Calendar-side details for the target representation.
///
/// Converting a not-previously-all-day event into all-day shifts the end
/// boundary to the start of the following day (all-day ends are
/// exclusive on the platform).
fn calendar_details(form: &EventForm, prior: Option<&Representation>) -> EventDetails {
    let was_all_day = prior.is_some_and(Representation::is_all_day);
    let end = if form.all_day && !was_all_day {
        form.end_day().succ().start_of_day()
    } else {
        form.end
    };

    EventDetails {
        title: form.title.clone(),
        start: form.start,
        end,
        all_day: form.all_day,
    }
}

fn carry(anchor: &RecordAnchor, target_day: Datestamp) -> Carryover {
    Carryover {
        id: anchor.id.clone(),
        from_day: anchor.day,
        index: if anchor.day == target_day {
            anchor.index
        } else {
            None
        },
    }
}

fn plan_records(
    prior: Option<&Representation>,
    form: &EventForm,
    target: TargetKind,
) -> (Vec<RecordPlan>, Vec<RecordRemoval>) {
    use Representation as R;

    // the prior planner record that continues as the primary record, and
    // the one made redundant by the transition
    let (primary, redundant) = match prior {
        None | Some(R::AllDay { .. }) => (None, None),
        Some(R::NonCalendar { anchor }) | Some(R::SingleDay { anchor, .. }) => {
            (Some(anchor), None)
        }
        Some(R::MultiDay { start, end, .. }) => (Some(start), Some(end)),
    };

    match target {
        TargetKind::NonCalendar | TargetKind::SingleDay => {
            let day = form.start_day();
            let records = vec![RecordPlan {
                day,
                role: RecordRole::Sole,
                carryover: primary.map(|a| carry(a, day)),
            }];
            let removals = redundant
                .map(|a| RecordRemoval {
                    id: a.id.clone(),
                    day: a.day,
                })
                .into_iter()
                .collect();
            (records, removals)
        }

        TargetKind::MultiDay => {
            let start_day = form.start_day();
            let end_day = form.end_day();

            let (start_carry, end_carry) = match prior {
                Some(R::MultiDay { start, end, .. }) => {
                    (Some(carry(start, start_day)), Some(carry(end, end_day)))
                }
                // a sole prior record becomes the start or the end half,
                // depending on which boundary its day matches
                Some(R::NonCalendar { anchor }) | Some(R::SingleDay { anchor, .. }) => {
                    if anchor.day == end_day {
                        (None, Some(carry(anchor, end_day)))
                    } else {
                        (Some(carry(anchor, start_day)), None)
                    }
                }
                None | Some(R::AllDay { .. }) => (None, None),
            };

            let records = vec![
                RecordPlan {
                    day: start_day,
                    role: RecordRole::Start,
                    carryover: start_carry,
                },
                RecordPlan {
                    day: end_day,
                    role: RecordRole::End,
                    carryover: end_carry,
                },
            ];
            (records, Vec::new())
        }

        // all-day spans keep no planner record at all
        TargetKind::AllDay => {
            let removals = [primary, redundant]
                .into_iter()
                .flatten()
                .map(|a| RecordRemoval {
                    id: a.id.clone(),
                    day: a.day,
                })
                .collect();
            (Vec::new(), removals)
        }
    }
}
