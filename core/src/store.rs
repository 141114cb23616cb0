// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod records;

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::{Error, Result};
use crate::event::{EventId, EventRecord, RecurringId};
use crate::planner::PlannerRecord;
use crate::recurring::RecurringTemplate;
use crate::store::records::Records;
use crate::types::{Datestamp, Partition};

const DB_NAME: &str = "daybook.db";

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS records (
    partition TEXT NOT NULL,
    key       TEXT NOT NULL,
    value     TEXT NOT NULL,
    PRIMARY KEY (partition, key)
);
";

/// Embedded key-value store: JSON values partitioned by entity type,
/// keyed by entity id (events) or by datestamp (planners).
///
/// Pure data access, no policy.
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,

    pub(crate) records: Records,
}

impl LocalStore {
    /// Opens the store under `state_dir`, or in memory when `None`.
    pub async fn open(state_dir: Option<&Path>) -> Result<Self> {
        let pool = match state_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "connecting to SQLite database");
                let dir = dir
                    .to_str()
                    .ok_or_else(|| Error::Config("Invalid path encoding".into()))?;
                let options = SqliteConnectOptions::new()
                    .filename(format!("{dir}/{DB_NAME}"))
                    .create_if_missing(true);
                SqlitePoolOptions::new().connect_with(options).await?
            }
            None => {
                tracing::info!("connecting to in-memory SQLite database");
                // every pooled connection would get its own :memory: db
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect_with(SqliteConnectOptions::new().in_memory(true))
                    .await?
            }
        };

        tracing::debug!("ensuring tables in the database");
        sqlx::query(SCHEMA).execute(&pool).await?;

        let records = Records::new(pool.clone());
        Ok(LocalStore { pool, records })
    }

    pub async fn close(self) -> Result<()> {
        tracing::debug!("closing database connection");
        self.pool.close().await;
        Ok(())
    }

    // --- planner events ---

    /// Looks the event up in both event partitions.
    pub async fn get_event(&self, id: &EventId) -> Result<Option<EventRecord>> {
        if let Some(record) = self
            .records
            .get(Partition::PlannerEvent, id.as_str())
            .await?
        {
            return Ok(Some(record));
        }
        self.records
            .get(Partition::RecurringPlanner, id.as_str())
            .await
    }

    /// The event, or an error if it does not exist.
    pub async fn require_event(&self, id: &EventId) -> Result<EventRecord> {
        self.get_event(id).await?.ok_or_else(|| Error::RecordNotFound {
            partition: Partition::PlannerEvent,
            key: id.to_string(),
        })
    }

    pub async fn put_event(&self, record: &EventRecord) -> Result<()> {
        self.records
            .put(record.partition(), record.id.as_str(), record)
            .await
    }

    pub async fn delete_event(&self, id: &EventId) -> Result<bool> {
        if self
            .records
            .delete(Partition::PlannerEvent, id.as_str())
            .await?
        {
            return Ok(true);
        }
        self.records
            .delete(Partition::RecurringPlanner, id.as_str())
            .await
    }

    // --- planners ---

    pub async fn get_planner(&self, day: Datestamp) -> Result<Option<PlannerRecord>> {
        self.records
            .get(Partition::Planner, &day.to_string())
            .await
    }

    pub async fn put_planner(&self, planner: &PlannerRecord) -> Result<()> {
        self.records
            .put(Partition::Planner, &planner.day.to_string(), planner)
            .await
    }

    /// Days that currently have a planner record.
    pub async fn planner_days(&self) -> Result<Vec<Datestamp>> {
        let keys = self.records.keys(Partition::Planner).await?;
        keys.iter().map(|k| k.parse()).collect()
    }

    /// Deletes planners for days strictly before `bound`. Run at
    /// startup; carryover logic treats pruned days as non-existent.
    pub async fn prune_planners_before(&self, bound: Datestamp) -> Result<u64> {
        let pruned = self
            .records
            .delete_keys_below(Partition::Planner, &bound.to_string())
            .await?;
        if pruned > 0 {
            tracing::info!(count = pruned, %bound, "pruned stale planners");
        }
        Ok(pruned)
    }

    // --- recurring templates ---

    pub async fn get_template(&self, id: &RecurringId) -> Result<Option<RecurringTemplate>> {
        self.records
            .get(Partition::RecurringEvent, id.as_str())
            .await
    }

    pub async fn put_template(&self, template: &RecurringTemplate) -> Result<()> {
        self.records
            .put(Partition::RecurringEvent, template.id.as_str(), template)
            .await
    }

    pub async fn delete_template(&self, id: &RecurringId) -> Result<bool> {
        self.records
            .delete(Partition::RecurringEvent, id.as_str())
            .await
    }

    /// All templates, ordered by their manual sort keys.
    pub async fn list_templates(&self) -> Result<Vec<RecurringTemplate>> {
        let mut templates: Vec<RecurringTemplate> =
            self.records.list(Partition::RecurringEvent).await?;
        templates.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RecurringLink;

    async fn setup() -> LocalStore {
        LocalStore::open(None).await.expect("in-memory store")
    }

    fn day(s: &str) -> Datestamp {
        s.parse().expect("valid datestamp")
    }

    #[tokio::test]
    async fn event_roundtrip_and_require() {
        // Arrange
        let store = setup().await;
        let record = EventRecord::untimed("e-1".into(), "Groceries", day("2024-06-01"));

        // Act
        store.put_event(&record).await.expect("put");

        // Assert
        let loaded = store.require_event(&"e-1".into()).await.expect("require");
        assert_eq!(loaded, record);
        assert!(matches!(
            store.require_event(&"missing".into()).await,
            Err(Error::RecordNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn recurring_instances_are_found_in_their_partition() {
        let store = setup().await;
        let mut record = EventRecord::untimed("e-1".into(), "Standup", day("2024-06-01"));
        record.recurring = RecurringLink::Instance {
            recurring_id: "r-1".into(),
        };
        store.put_event(&record).await.expect("put");

        let loaded = store.get_event(&"e-1".into()).await.expect("get");
        assert_eq!(loaded, Some(record));
        assert!(store.delete_event(&"e-1".into()).await.expect("delete"));
        assert!(!store.delete_event(&"e-1".into()).await.expect("delete"));
    }

    #[tokio::test]
    async fn planner_roundtrip_and_days() {
        let store = setup().await;
        let mut planner = PlannerRecord::new(day("2024-06-01"));
        planner.push("a".into());
        store.put_planner(&planner).await.expect("put");
        store
            .put_planner(&PlannerRecord::new(day("2024-06-02")))
            .await
            .expect("put");

        let loaded = store.get_planner(day("2024-06-01")).await.expect("get");
        assert_eq!(loaded, Some(planner));
        assert_eq!(
            store.planner_days().await.expect("days"),
            vec![day("2024-06-01"), day("2024-06-02")]
        );
    }

    #[tokio::test]
    async fn prune_removes_only_days_strictly_before_bound() {
        let store = setup().await;
        for d in ["2024-05-30", "2024-05-31", "2024-06-01"] {
            store.put_planner(&PlannerRecord::new(day(d))).await.unwrap();
        }

        let pruned = store
            .prune_planners_before(day("2024-05-31"))
            .await
            .expect("prune");

        assert_eq!(pruned, 1);
        assert_eq!(
            store.planner_days().await.unwrap(),
            vec![day("2024-05-31"), day("2024-06-01")]
        );
    }

    #[tokio::test]
    async fn templates_list_in_manual_order() {
        let store = setup().await;
        let a = RecurringTemplate::new("r-a".into(), "Standup", "m".into());
        let b = RecurringTemplate::new("r-b".into(), "Review", "c".into());
        store.put_template(&a).await.unwrap();
        store.put_template(&b).await.unwrap();

        let templates = store.list_templates().await.expect("list");

        // ordered by sort key, not by id
        assert_eq!(templates[0].id, "r-b".into());
        assert_eq!(templates[1].id, "r-a".into());
    }
}
