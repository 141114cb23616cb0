// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Test doubles shared across the crate's tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::bridge::{CalendarBridge, EventDetails};
use crate::config::Config;
use crate::coordinator::Daybook;
use crate::error::{Error, Result};
use crate::event::CalendarEventId;

/// In-memory stand-in for the device calendar.
pub struct FakeCalendar {
    events: Mutex<HashMap<CalendarEventId, EventDetails>>,
    next_id: AtomicUsize,

    /// Fails the next mutating call once.
    pub fail_next: AtomicBool,

    /// Simulates revoked calendar access.
    pub denied: AtomicBool,

    /// Whether a permission prompt would be accepted.
    pub grant_on_request: AtomicBool,
}

impl FakeCalendar {
    pub fn new() -> Arc<Self> {
        Arc::new(FakeCalendar {
            events: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
            denied: AtomicBool::new(false),
            grant_on_request: AtomicBool::new(true),
        })
    }

    pub fn event(&self, id: &CalendarEventId) -> Option<EventDetails> {
        self.events.lock().unwrap().get(id).cloned()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Places an event in the calendar directly, as if created by
    /// another app.
    pub fn seed(&self, id: &str, details: EventDetails) -> CalendarEventId {
        let id = CalendarEventId::from(id);
        self.events.lock().unwrap().insert(id.clone(), details);
        id
    }

    fn check(&self) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(Error::Calendar("simulated calendar outage".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarBridge for FakeCalendar {
    async fn create_event(
        &self,
        _calendar_id: &str,
        details: &EventDetails,
    ) -> Result<CalendarEventId> {
        self.check()?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let id = CalendarEventId::from(format!("cal-{n}").as_str());
        self.events.lock().unwrap().insert(id.clone(), details.clone());
        Ok(id)
    }

    async fn update_event(
        &self,
        id: &CalendarEventId,
        details: &EventDetails,
        _future_events: bool,
    ) -> Result<()> {
        self.check()?;
        let mut events = self.events.lock().unwrap();
        match events.get_mut(id) {
            Some(existing) => {
                *existing = details.clone();
                Ok(())
            }
            None => Err(Error::CalendarEventMissing(id.to_string())),
        }
    }

    async fn delete_event(&self, id: &CalendarEventId, _future_events: bool) -> Result<()> {
        self.check()?;
        self.events
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::CalendarEventMissing(id.to_string()))
    }

    async fn get_event(&self, id: &CalendarEventId) -> Result<EventDetails> {
        self.events
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::CalendarEventMissing(id.to_string()))
    }

    async fn permission_granted(&self) -> bool {
        !self.denied.load(Ordering::SeqCst)
    }

    async fn request_permission(&self) -> Result<bool> {
        if self.grant_on_request.load(Ordering::SeqCst) {
            self.denied.store(false, Ordering::SeqCst);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// A daybook over an in-memory store and a fake calendar.
pub async fn open_book() -> (Daybook, Arc<FakeCalendar>) {
    let calendar = FakeCalendar::new();
    let book = Daybook::open(Config::default(), calendar.clone())
        .await
        .expect("in-memory daybook");
    (book, calendar)
}
