// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Daybook core: a local-first day planner that reconciles its own
//! records with the device calendar.
//!
//! [`Daybook`] is the facade; everything else supports it. Events move
//! between four representations (untimed, single-day, multi-day pair,
//! all-day) and each save is planned by a pure transition engine, then
//! applied calendar-first so a calendar failure never leaves partial
//! local state.

mod bridge;
mod config;
mod coordinator;
mod delete_queue;
mod error;
mod event;
mod ordering;
mod planner;
mod recurring;
mod store;
mod transition;
mod types;

#[cfg(test)]
mod testing;

pub use crate::bridge::{CalendarBridge, EventDetails};
pub use crate::config::Config;
pub use crate::coordinator::{Daybook, SaveOutcome, SaveRequest, UnscheduleRequest};
pub use crate::delete_queue::{DeleteScheduler, DeleteSink};
pub use crate::error::{Error, Result};
pub use crate::event::{
    CalendarEventId, EventId, EventRecord, RecurringId, RecurringLink, Schedule,
};
pub use crate::ordering::{Chronological, ManualOrder, OrderingStrategy, Slot, SortKey};
pub use crate::planner::PlannerRecord;
pub use crate::recurring::RecurringTemplate;
pub use crate::store::LocalStore;
pub use crate::transition::{
    CalendarAction, EventForm, Representation, TargetKind, TransitionPlan,
};
pub use crate::types::{DayRange, Datestamp, Partition};
