// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Debounced, batched soft-delete trigger.
//!
//! Toggling an id schedules or unschedules it. One debounce timer is
//! shared across all pending items and is reset on every toggle; when it
//! fires, all pending items are flushed to the sink grouped by storage
//! partition. Unscheduling before the timer fires removes the item with
//! no store mutation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::types::Partition;

/// Receiver of a flushed delete batch for one partition.
#[async_trait]
pub trait DeleteSink: Send + Sync {
    async fn delete_batch(&self, partition: Partition, ids: Vec<String>) -> Result<()>;
}

#[derive(Debug, Default)]
struct Inner {
    pending: Vec<(Partition, String)>,
    /// Bumped on every toggle; a sleeping timer only fires if its
    /// generation is still current.
    generation: u64,
}

#[derive(Clone)]
pub struct DeleteScheduler {
    inner: Arc<Mutex<Inner>>,
    sink: Arc<dyn DeleteSink>,
    delay: Duration,
}

impl DeleteScheduler {
    pub fn new(delay: Duration, sink: Arc<dyn DeleteSink>) -> Self {
        DeleteScheduler {
            inner: Arc::new(Mutex::new(Inner::default())),
            sink,
            delay,
        }
    }

    /// Schedules the id for deletion, or unschedules it if already
    /// pending. Returns whether it is now scheduled. Every toggle resets
    /// the shared debounce timer.
    pub async fn toggle(&self, partition: Partition, id: &str) -> bool {
        let mut inner = self.inner.lock().await;

        let entry = (partition, id.to_string());
        let scheduled = match inner.pending.iter().position(|e| *e == entry) {
            Some(pos) => {
                inner.pending.remove(pos);
                false
            }
            None => {
                inner.pending.push(entry);
                true
            }
        };

        inner.generation += 1;
        let generation = inner.generation;
        let armed = !inner.pending.is_empty();
        drop(inner);

        tracing::debug!(%partition, id, scheduled, "delete toggled");
        if armed {
            self.arm(generation);
        }
        scheduled
    }

    /// Deletes one item immediately, bypassing the debounce. Used when
    /// the item being toggled is the currently open editable instance.
    pub async fn flush_item_now(&self, partition: Partition, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let entry = (partition, id.to_string());
        if let Some(pos) = inner.pending.iter().position(|e| *e == entry) {
            inner.pending.remove(pos);
        }
        drop(inner);

        self.sink.delete_batch(partition, vec![id.to_string()]).await
    }

    pub async fn is_pending(&self, partition: Partition, id: &str) -> bool {
        let inner = self.inner.lock().await;
        inner
            .pending
            .iter()
            .any(|(p, i)| *p == partition && i == id)
    }

    pub async fn pending_count(&self) -> usize {
        self.inner.lock().await.pending.len()
    }

    fn arm(&self, generation: u64) {
        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(this.delay).await;
            this.fire(generation).await;
        });
    }

    async fn fire(&self, generation: u64) {
        let batches = {
            let mut inner = self.inner.lock().await;
            if inner.generation != generation {
                // a later toggle reset the debounce
                return;
            }

            let pending = std::mem::take(&mut inner.pending);
            let mut batches: Vec<(Partition, Vec<String>)> = Vec::new();
            for (partition, id) in pending {
                match batches.iter_mut().find(|(p, _)| *p == partition) {
                    Some((_, ids)) => ids.push(id),
                    None => batches.push((partition, vec![id])),
                }
            }
            batches
        };

        for (partition, ids) in batches {
            tracing::debug!(%partition, count = ids.len(), "flushing delete batch");
            if let Err(err) = self.sink.delete_batch(partition, ids).await {
                tracing::error!(%partition, %err, "batched delete failed");
            }
        }
    }
}
