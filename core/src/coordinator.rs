// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation coordinator.
//!
//! [`Daybook`] is the single entry point for mutations: it classifies the
//! prior representation of an event, asks the transition engine for a
//! plan, performs the calendar mutation first and only then applies the
//! store writes. A calendar failure therefore surfaces before any local
//! state has changed, and retrying the whole operation is safe.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};

use crate::bridge::CalendarBridge;
use crate::config::Config;
use crate::delete_queue::{DeleteScheduler, DeleteSink};
use crate::error::{Error, Result};
use crate::event::{CalendarEventId, EventId, EventRecord, RecurringId, RecurringLink, Schedule};
use crate::ordering::{self, Chronological, ManualOrder, OrderingStrategy, Slot, SortKey};
use crate::planner::PlannerRecord;
use crate::recurring::{self, RecurringTemplate};
use crate::store::LocalStore;
use crate::transition::{
    self, CalendarAction, Carryover, EventForm, RecordAnchor, RecordRole, Representation,
    TargetKind,
};
use crate::types::{DayRange, Datestamp, Partition};

/// One submitted editor form, with the UI context needed to derive the
/// outcome.
#[derive(Debug)]
pub struct SaveRequest {
    /// Planner record being edited, `None` for a brand-new event.
    pub event_id: Option<EventId>,

    /// Calendar identity for events with no planner record (all-day
    /// spans), when no `event_id` exists.
    pub calendar_event_id: Option<CalendarEventId>,

    pub form: EventForm,

    /// Day range currently on screen, used to decide navigation.
    pub visible: Option<DayRange>,
}

/// Removal of an event's calendar linkage, triggered from a specific day.
#[derive(Debug)]
pub struct UnscheduleRequest {
    pub event_id: Option<EventId>,
    pub calendar_event_id: Option<CalendarEventId>,

    /// Day the unschedule was triggered from; the event becomes an
    /// untimed entry here, not on its own prior day.
    pub trigger_day: Datestamp,

    pub visible: Option<DayRange>,
}

/// What the UI needs after a mutation.
#[derive(Debug)]
pub struct SaveOutcome {
    /// Primary surviving planner record, `None` for all-day results.
    pub event_id: Option<EventId>,

    pub calendar_event_id: Option<CalendarEventId>,

    /// Date ranges whose cached calendar data must be reloaded.
    pub invalidate: Vec<DayRange>,

    /// Day to scroll to, when an endpoint of the new range is visible.
    pub navigate: Option<Datestamp>,
}

/// The planner facade: local store, device calendar and delete queue
/// behind one mutation API.
#[derive(Clone)]
pub struct Daybook {
    config: Config,
    store: LocalStore,
    calendar: Arc<dyn CalendarBridge>,
    deletes: DeleteScheduler,
    today: Datestamp,
}

impl Daybook {
    /// Opens the store, prunes stale planner history and wires up the
    /// delete queue.
    #[tracing::instrument(skip_all)]
    pub async fn open(mut config: Config, calendar: Arc<dyn CalendarBridge>) -> Result<Self> {
        config.normalize()?;
        if let Some(dir) = &config.state_dir {
            tokio::fs::create_dir_all(dir).await?;
        }
        let store = LocalStore::open(config.state_dir.as_deref()).await?;

        // days strictly before yesterday are dropped; a record carried
        // through a pruned day loses its position, not its identity
        let today = Datestamp::from(Local::now().date_naive());
        store.prune_planners_before(today.pred()).await?;

        let sink = Arc::new(StoreSink {
            store: store.clone(),
            calendar: calendar.clone(),
            today,
        });
        let deletes = DeleteScheduler::new(config.delete_debounce(), sink);

        Ok(Daybook {
            config,
            store,
            calendar,
            deletes,
            today,
        })
    }

    pub fn today(&self) -> Datestamp {
        self.today
    }

    pub async fn event(&self, id: &EventId) -> Result<Option<EventRecord>> {
        self.store.get_event(id).await
    }

    pub async fn planner(&self, day: Datestamp) -> Result<Option<PlannerRecord>> {
        self.store.get_planner(day).await
    }

    pub async fn close(self) -> Result<()> {
        self.store.close().await
    }

    // --- saving ---

    /// Applies one editor form: computes the transition from the event's
    /// prior representation, mutates the calendar, then the store.
    #[tracing::instrument(skip(self, req), fields(target = ?req.form.target()))]
    pub async fn save_event(&self, req: SaveRequest) -> Result<SaveOutcome> {
        self.save_with(req.event_id, req.calendar_event_id, req.form, req.visible, false)
            .await
    }

    /// Converts a calendar- or recurring-linked event back into an
    /// untimed entry on the trigger day.
    #[tracing::instrument(skip(self, req), fields(day = %req.trigger_day))]
    pub async fn unschedule_event(&self, req: UnscheduleRequest) -> Result<SaveOutcome> {
        let title = match (&req.event_id, &req.calendar_event_id) {
            (Some(id), _) => self.store.require_event(id).await?.title,
            (None, Some(cal_id)) => self.calendar.get_event(cal_id).await?.title,
            (None, None) => {
                return Err(Error::Config(
                    "unschedule needs an event or a calendar id".into(),
                ));
            }
        };

        let midnight = req.trigger_day.start_of_day();
        let form = EventForm {
            title,
            is_calendar_event: false,
            all_day: false,
            start: midnight,
            end: midnight,
            future_events: false,
        };
        self.save_with(req.event_id, req.calendar_event_id, form, req.visible, true)
            .await
    }

    async fn save_with(
        &self,
        event_id: Option<EventId>,
        calendar_event_id: Option<CalendarEventId>,
        form: EventForm,
        visible: Option<DayRange>,
        force_detach: bool,
    ) -> Result<SaveOutcome> {
        let stored = match &event_id {
            Some(id) => Some(self.store.require_event(id).await?),
            None => None,
        };

        // a recurring instance is never edited in place: work against a
        // detached clone, persisted only once the calendar has confirmed
        let mut detach: Option<(EventId, RecurringId)> = None;
        let working = match stored {
            Some(record)
                if record.is_recurring_instance()
                    && (force_detach || mutates_instance(&record, &form)) =>
            {
                let (clone, template) = recurring::detach_instance(&record)?;
                detach = Some((record.id.clone(), template));
                Some(clone)
            }
            other => other,
        };

        let (prior, partner) = match (&working, &calendar_event_id) {
            (Some(record), _) => {
                let position_id = detach.as_ref().map(|(orig, _)| orig).unwrap_or(&record.id);
                let (prior, partner) = self.classify(record, position_id).await?;
                (Some(prior), partner)
            }
            (None, Some(cal_id)) => {
                let details = self.calendar.get_event(cal_id).await?;
                let prior = Representation::AllDay {
                    calendar_event_id: cal_id.clone(),
                    range: details.day_range(),
                };
                (Some(prior), None)
            }
            (None, None) => (None, None),
        };

        let plan = transition::plan(prior.as_ref(), &form);

        // calendar first: if this fails the store has not been touched
        let confirmed = self.execute_calendar(&plan.calendar_action).await?;

        if let Some((original_id, template)) = &detach
            && let Some(clone) = &working
        {
            let mut planner = self.planner_or_new(clone.owner_day).await?;
            planner.hide_recurring(template.clone());
            planner.replace(original_id, clone.id.clone());
            self.store.put_planner(&planner).await?;
            tracing::debug!(%original_id, clone_id = %clone.id, "detached recurring instance");
        }

        for removal in &plan.removals {
            self.store.delete_event(&removal.id).await?;
            if let Some(mut planner) = self.store.get_planner(removal.day).await?
                && planner.remove(&removal.id).is_some()
            {
                self.store.put_planner(&planner).await?;
            }
        }

        // prior records by id, for recurring links and changed-time checks
        let mut prior_by_id: HashMap<EventId, EventRecord> = HashMap::new();
        if let Some(record) = working {
            prior_by_id.insert(record.id.clone(), record);
        }
        if let Some(record) = partner {
            prior_by_id.insert(record.id.clone(), record);
        }

        // identities first, so multi-day halves can reference each other
        let ids: Vec<EventId> = plan
            .records
            .iter()
            .map(|r| {
                r.carryover
                    .as_ref()
                    .map(|c| c.id.clone())
                    .unwrap_or_else(EventId::generate)
            })
            .collect();

        let target = form.target();
        let mut primary_id = None;
        for (i, planned) in plan.records.iter().enumerate() {
            let schedule = match (target, planned.role) {
                (TargetKind::NonCalendar, _) => Schedule::Untimed,
                (TargetKind::SingleDay, _) => Schedule::Timed {
                    start: form.start,
                    end: form.end,
                    calendar_event_id: required_calendar_id(&confirmed)?,
                },
                (TargetKind::MultiDay, RecordRole::Start) => Schedule::LinkedStart {
                    start: form.start,
                    end: form.end,
                    calendar_event_id: required_calendar_id(&confirmed)?,
                    end_record: ids[1].clone(),
                },
                (TargetKind::MultiDay, _) => Schedule::LinkedEnd {
                    start: form.start,
                    end: form.end,
                    calendar_event_id: required_calendar_id(&confirmed)?,
                    start_record: ids[0].clone(),
                },
                // all-day transitions plan no records
                (TargetKind::AllDay, _) => break,
            };

            let record = EventRecord {
                id: ids[i].clone(),
                title: form.title.clone(),
                owner_day: planned.day,
                schedule,
                recurring: prior_by_id
                    .get(&ids[i])
                    .map(|r| r.recurring.clone())
                    .unwrap_or_default(),
                hidden: false,
            };
            self.store.put_event(&record).await?;

            let prior_time = prior_by_id.get(&record.id).and_then(|r| r.effective_time());
            self.place(&record, planned.carryover.as_ref(), prior_time)
                .await?;

            if primary_id.is_none() {
                primary_id = Some(record.id.clone());
            }
        }

        Ok(SaveOutcome {
            event_id: primary_id,
            calendar_event_id: confirmed,
            invalidate: plan.affected_ranges,
            navigate: navigation_target(visible, form.day_range()),
        })
    }

    /// The prior representation of a stored record, plus the partner
    /// record for multi-day pairs. `position_id` is the id to look up in
    /// the owner day's planner (the original id when working against a
    /// freshly detached clone).
    async fn classify(
        &self,
        record: &EventRecord,
        position_id: &EventId,
    ) -> Result<(Representation, Option<EventRecord>)> {
        let anchor = self.anchor_of(record, position_id).await?;

        Ok(match &record.schedule {
            Schedule::Untimed => (Representation::NonCalendar { anchor }, None),

            Schedule::Timed {
                calendar_event_id, ..
            } => (
                Representation::SingleDay {
                    anchor,
                    calendar_event_id: calendar_event_id.clone(),
                },
                None,
            ),

            Schedule::LinkedStart {
                calendar_event_id,
                end_record,
                ..
            } => {
                let end = self
                    .store
                    .get_event(end_record)
                    .await?
                    .ok_or_else(|| Error::BrokenLink(record.id.to_string()))?;
                let end_anchor = self.anchor_of(&end, &end.id).await?;
                (
                    Representation::MultiDay {
                        start: anchor,
                        end: end_anchor,
                        calendar_event_id: calendar_event_id.clone(),
                    },
                    Some(end),
                )
            }

            Schedule::LinkedEnd {
                calendar_event_id,
                start_record,
                ..
            } => {
                let start = self
                    .store
                    .get_event(start_record)
                    .await?
                    .ok_or_else(|| Error::BrokenLink(record.id.to_string()))?;
                let start_anchor = self.anchor_of(&start, &start.id).await?;
                (
                    Representation::MultiDay {
                        start: start_anchor,
                        end: anchor,
                        calendar_event_id: calendar_event_id.clone(),
                    },
                    Some(start),
                )
            }
        })
    }

    async fn anchor_of(&self, record: &EventRecord, position_id: &EventId) -> Result<RecordAnchor> {
        let index = self
            .store
            .get_planner(record.owner_day)
            .await?
            .and_then(|p| p.position(position_id));
        Ok(RecordAnchor {
            id: record.id.clone(),
            day: record.owner_day,
            index,
        })
    }

    async fn execute_calendar(&self, action: &CalendarAction) -> Result<Option<CalendarEventId>> {
        match action {
            CalendarAction::None => Ok(None),
            CalendarAction::Create { details } => {
                ensure_permission(self.calendar.as_ref()).await?;
                let id = self
                    .calendar
                    .create_event(&self.config.calendar_id, details)
                    .await?;
                tracing::debug!(%id, "created calendar event");
                Ok(Some(id))
            }
            CalendarAction::Update {
                id,
                details,
                future_events,
            } => {
                ensure_permission(self.calendar.as_ref()).await?;
                self.calendar
                    .update_event(id, details, *future_events)
                    .await?;
                Ok(Some(id.clone()))
            }
            CalendarAction::Delete { id } => {
                ensure_permission(self.calendar.as_ref()).await?;
                self.calendar.delete_event(id, false).await?;
                tracing::debug!(%id, "deleted calendar event");
                Ok(None)
            }
        }
    }

    /// Puts the record into its owner day's planner.
    ///
    /// A carried position survives only while the effective time is
    /// unchanged; any time change re-places the record chronologically so
    /// the planner order stays non-decreasing.
    async fn place(
        &self,
        record: &EventRecord,
        carryover: Option<&Carryover>,
        prior_time: Option<NaiveDateTime>,
    ) -> Result<()> {
        // leaving a day removes the record from its old planner
        if let Some(c) = carryover
            && c.from_day != record.owner_day
            && let Some(mut old) = self.store.get_planner(c.from_day).await?
            && old.remove(&record.id).is_some()
        {
            self.store.put_planner(&old).await?;
        }

        let mut planner = self.planner_or_new(record.owner_day).await?;
        let carried_index = carryover.and_then(|c| c.index);
        let time = record.effective_time();

        if carried_index.is_some() && time == prior_time && planner.contains(&record.id) {
            return Ok(());
        }

        planner.remove(&record.id);
        let index = match carried_index {
            // untimed records are the only ones that keep a raw position
            Some(index) if time.is_none() => index,
            _ => {
                let entries = self.slots(&planner).await?;
                self.strategy_for(time)
                    .insertion_index(&entries, &Slot { time, key: None })
            }
        };
        planner.insert_at(index, record.id.clone());
        self.store.put_planner(&planner).await?;
        Ok(())
    }

    /// Planner lists mix both ordering schemes: timed entries place
    /// chronologically, untimed ones keep manual order.
    fn strategy_for(&self, time: Option<NaiveDateTime>) -> &'static dyn OrderingStrategy {
        match time {
            Some(_) => &Chronological,
            None => &ManualOrder,
        }
    }

    async fn planner_or_new(&self, day: Datestamp) -> Result<PlannerRecord> {
        planner_or_new(&self.store, day).await
    }

    async fn slots(&self, planner: &PlannerRecord) -> Result<Vec<Slot>> {
        let mut entries = Vec::with_capacity(planner.event_ids.len());
        for id in &planner.event_ids {
            let time = self
                .store
                .get_event(id)
                .await?
                .and_then(|r| r.effective_time());
            entries.push(Slot { time, key: None });
        }
        Ok(entries)
    }

    // --- day lists ---

    /// The planner for one day with its recurring instances materialized.
    /// Instances already present (or hidden) on the day are not generated
    /// again.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_day(&self, day: Datestamp) -> Result<PlannerRecord> {
        let mut planner = self.planner_or_new(day).await?;

        let mut present: BTreeSet<RecurringId> = BTreeSet::new();
        for id in &planner.event_ids {
            if let Some(record) = self.store.get_event(id).await?
                && let Some(template_id) = record.recurring.instance_id()
            {
                present.insert(template_id.clone());
            }
        }

        let templates = self.store.list_templates().await?;
        let mut changed = false;
        for instance in recurring::instances_for_day(&templates, &planner) {
            let Some(template_id) = instance.recurring.instance_id() else {
                continue;
            };
            if present.contains(template_id) {
                continue;
            }
            self.store.put_event(&instance).await?;
            planner.push(instance.id.clone());
            changed = true;
        }

        if changed {
            self.store.put_planner(&planner).await?;
        }
        Ok(planner)
    }

    /// Moves an event within (or into) a day's manual order. Timed events
    /// snap to their chronological position regardless of the drop index;
    /// the index actually used is returned.
    #[tracing::instrument(skip(self))]
    pub async fn move_event(&self, id: &EventId, day: Datestamp, to_index: usize) -> Result<usize> {
        let record = self.store.require_event(id).await?;
        let mut planner =
            self.store
                .get_planner(day)
                .await?
                .ok_or_else(|| Error::EventNotInPlanner {
                    event_id: id.to_string(),
                    day: day.to_string(),
                })?;
        planner.remove(id).ok_or_else(|| Error::EventNotInPlanner {
            event_id: id.to_string(),
            day: day.to_string(),
        })?;

        let index = match record.effective_time() {
            Some(time) => {
                let entries = self.slots(&planner).await?;
                Chronological.insertion_index(&entries, &Slot {
                    time: Some(time),
                    key: None,
                })
            }
            None => to_index.min(planner.event_ids.len()),
        };
        planner.insert_at(index, id.clone());
        self.store.put_planner(&planner).await?;
        Ok(index)
    }

    // --- recurring templates ---

    pub async fn templates(&self) -> Result<Vec<RecurringTemplate>> {
        self.store.list_templates().await
    }

    /// Creates a template at the end of the manual order.
    #[tracing::instrument(skip(self))]
    pub async fn create_template(&self, title: &str) -> Result<RecurringTemplate> {
        let templates = self.store.list_templates().await?;
        let keys: Vec<SortKey> = templates.iter().map(|t| t.sort_key.clone()).collect();
        let sort_key = SortKey::between(keys.last(), None);

        let template = RecurringTemplate::new(RecurringId::generate(), title, sort_key);
        self.store.put_template(&template).await?;
        Ok(template)
    }

    pub async fn update_template(&self, template: &RecurringTemplate) -> Result<()> {
        self.store.put_template(template).await
    }

    pub async fn delete_template(&self, id: &RecurringId) -> Result<bool> {
        self.store.delete_template(id).await
    }

    /// Moves a template directly after `after` in the manual order, or to
    /// the top when `after` is `None`. Only the moved template's key is
    /// rewritten.
    #[tracing::instrument(skip(self))]
    pub async fn reorder_template(
        &self,
        id: &RecurringId,
        after: Option<&RecurringId>,
    ) -> Result<SortKey> {
        let templates = self.store.list_templates().await?;
        let mut template = templates
            .iter()
            .find(|t| t.id == *id)
            .cloned()
            .ok_or_else(|| Error::RecordNotFound {
                partition: Partition::RecurringEvent,
                key: id.to_string(),
            })?;

        let reference = match after {
            None => None,
            Some(after_id) => Some(
                templates
                    .iter()
                    .find(|t| t.id == *after_id)
                    .map(|t| t.sort_key.clone())
                    .ok_or_else(|| Error::RecordNotFound {
                        partition: Partition::RecurringEvent,
                        key: after_id.to_string(),
                    })?,
            ),
        };
        let neighbors: Vec<SortKey> = templates
            .iter()
            .filter(|t| t.id != *id)
            .map(|t| t.sort_key.clone())
            .collect();

        template.sort_key = ordering::generate_sort_id(reference.as_ref(), &neighbors);
        self.store.put_template(&template).await?;
        Ok(template.sort_key)
    }

    // --- deleting ---

    /// Toggles an item on the debounced delete queue. The currently open
    /// editable instance is deleted synchronously instead. Returns whether
    /// the item is now scheduled.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_delete(
        &self,
        partition: Partition,
        id: &str,
        open_editor: bool,
    ) -> Result<bool> {
        if open_editor {
            self.deletes.flush_item_now(partition, id).await?;
            Ok(false)
        } else {
            Ok(self.deletes.toggle(partition, id).await)
        }
    }

    pub async fn pending_delete(&self, partition: Partition, id: &str) -> bool {
        self.deletes.is_pending(partition, id).await
    }

    /// Deletes one event immediately, with the soft-delete rules applied.
    #[tracing::instrument(skip(self))]
    pub async fn delete_event(&self, id: &EventId) -> Result<Vec<DayRange>> {
        delete_one(&self.store, self.calendar.as_ref(), self.today, id).await
    }
}

/// Chooses where the UI navigates after a save: the start of the new
/// range if visible, else its end if visible, else nowhere.
fn navigation_target(visible: Option<DayRange>, range: DayRange) -> Option<Datestamp> {
    let visible = visible?;
    if visible.contains(range.start) {
        Some(range.start)
    } else if visible.contains(range.end) {
        Some(range.end)
    } else {
        None
    }
}

/// Whether applying the form would change a generated instance: a new
/// title, a different day, or any scheduled time. Instances themselves
/// carry no time, so the form comparison is against `None`.
fn mutates_instance(record: &EventRecord, form: &EventForm) -> bool {
    let form_time = form.is_calendar_event.then_some(form.start);
    record.title != form.title
        || record.owner_day != form.start_day()
        || record.effective_time() != form_time
}

fn required_calendar_id(confirmed: &Option<CalendarEventId>) -> Result<CalendarEventId> {
    confirmed
        .clone()
        .ok_or_else(|| Error::Calendar("calendar returned no event id".into()))
}

async fn ensure_permission(calendar: &dyn CalendarBridge) -> Result<()> {
    if calendar.permission_granted().await {
        return Ok(());
    }
    if calendar.request_permission().await? {
        return Ok(());
    }
    Err(Error::CalendarPermission)
}

async fn planner_or_new(store: &LocalStore, day: Datestamp) -> Result<PlannerRecord> {
    Ok(store
        .get_planner(day)
        .await?
        .unwrap_or_else(|| PlannerRecord::new(day)))
}

async fn remove_from_planner(store: &LocalStore, record: &EventRecord) -> Result<()> {
    if let Some(mut planner) = store.get_planner(record.owner_day).await?
        && planner.remove(&record.id).is_some()
    {
        store.put_planner(&planner).await?;
    }
    Ok(())
}

/// Deletes one event with the soft-delete rules:
///
/// - recurring instances are hidden and their template suppressed for
///   the day, so regeneration cannot resurrect them;
/// - calendar-linked events covering today are hidden locally while the
///   calendar event stays;
/// - everything else is removed from the store, calendar first.
async fn delete_one(
    store: &LocalStore,
    calendar: &dyn CalendarBridge,
    today: Datestamp,
    id: &EventId,
) -> Result<Vec<DayRange>> {
    let Some(record) = store.get_event(id).await? else {
        // never saved, or already flushed
        return Ok(Vec::new());
    };

    if let RecurringLink::Instance { recurring_id } = &record.recurring {
        let mut planner = planner_or_new(store, record.owner_day).await?;
        planner.remove(&record.id);
        planner.hide_recurring(recurring_id.clone());
        store.put_planner(&planner).await?;

        let mut hidden = record.clone();
        hidden.hidden = true;
        store.put_event(&hidden).await?;
        return Ok(vec![DayRange::single(record.owner_day)]);
    }

    let partner = match &record.schedule {
        Schedule::LinkedStart { end_record, .. } => store.get_event(end_record).await?,
        Schedule::LinkedEnd { start_record, .. } => store.get_event(start_record).await?,
        _ => None,
    };

    let range = match &record.schedule {
        Schedule::Untimed | Schedule::Timed { .. } => DayRange::single(record.owner_day),
        Schedule::LinkedStart { start, end, .. } | Schedule::LinkedEnd { start, end, .. } => {
            DayRange::new(Datestamp::from(*start), Datestamp::from(*end))
        }
    };

    let mut halves = vec![record.clone()];
    halves.extend(partner);

    match record.schedule.calendar_event_id() {
        // covering today: the calendar event stays, only the planner side
        // is hidden
        Some(_) if range.contains(today) => {
            for half in &halves {
                remove_from_planner(store, half).await?;
                let mut hidden = half.clone();
                hidden.hidden = true;
                store.put_event(&hidden).await?;
            }
            tracing::debug!(%id, "soft-hid calendar event covering today");
        }
        Some(cal_id) => {
            // calendar first: a failure leaves the store untouched
            ensure_permission(calendar).await?;
            calendar.delete_event(cal_id, false).await?;
            for half in &halves {
                remove_from_planner(store, half).await?;
                store.delete_event(&half.id).await?;
            }
        }
        None => {
            remove_from_planner(store, &record).await?;
            store.delete_event(&record.id).await?;
        }
    }

    Ok(vec![range])
}

/// Routes flushed delete batches into the store.
struct StoreSink {
    store: LocalStore,
    calendar: Arc<dyn CalendarBridge>,
    today: Datestamp,
}

#[async_trait]
impl DeleteSink for StoreSink {
    async fn delete_batch(&self, partition: Partition, ids: Vec<String>) -> Result<()> {
        match partition {
            Partition::PlannerEvent | Partition::RecurringPlanner => {
                for id in ids {
                    let id = EventId::from(id.as_str());
                    delete_one(&self.store, self.calendar.as_ref(), self.today, &id).await?;
                }
            }
            // auxiliary partitions have no calendar side
            _ => {
                for id in ids {
                    self.store.records.delete(partition, &id).await?;
                }
            }
        }
        Ok(())
    }
}
