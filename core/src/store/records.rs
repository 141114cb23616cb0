// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::types::Partition;

/// Raw partitioned key-value access. Values are JSON; policy lives in
/// the typed accessors on `LocalStore`.
#[derive(Debug, Clone)]
pub struct Records {
    pool: SqlitePool,
}

impl Records {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        partition: Partition,
        key: &str,
    ) -> Result<Option<T>> {
        const SQL: &str = "\
SELECT value FROM records
WHERE partition = ? AND key = ?;
";

        let row: Option<(String,)> = sqlx::query_as(SQL)
            .bind(partition.as_key())
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((value,)) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    pub async fn put<T: Serialize>(&self, partition: Partition, key: &str, value: &T) -> Result<()> {
        const SQL: &str = "\
INSERT INTO records (partition, key, value)
VALUES (?, ?, ?)
ON CONFLICT(partition, key) DO UPDATE SET value = excluded.value;
";

        let value = serde_json::to_string(value)?;
        sqlx::query(SQL)
            .bind(partition.as_key())
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, partition: Partition, key: &str) -> Result<bool> {
        const SQL: &str = "\
DELETE FROM records
WHERE partition = ? AND key = ?;
";

        let result = sqlx::query(SQL)
            .bind(partition.as_key())
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All values in a partition, ordered by key.
    pub async fn list<T: DeserializeOwned>(&self, partition: Partition) -> Result<Vec<T>> {
        const SQL: &str = "\
SELECT value FROM records
WHERE partition = ?
ORDER BY key ASC;
";

        let rows: Vec<(String,)> = sqlx::query_as(SQL)
            .bind(partition.as_key())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|(value,)| Ok(serde_json::from_str(&value)?))
            .collect()
    }

    /// All keys in a partition, ordered.
    pub async fn keys(&self, partition: Partition) -> Result<Vec<String>> {
        const SQL: &str = "\
SELECT key FROM records
WHERE partition = ?
ORDER BY key ASC;
";

        let rows: Vec<(String,)> = sqlx::query_as(SQL)
            .bind(partition.as_key())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(key,)| key).collect())
    }

    /// Deletes every record in the partition with a key strictly below
    /// `bound`. Datestamp keys order lexicographically by day.
    pub async fn delete_keys_below(&self, partition: Partition, bound: &str) -> Result<u64> {
        const SQL: &str = "\
DELETE FROM records
WHERE partition = ? AND key < ?;
";

        let result = sqlx::query(SQL)
            .bind(partition.as_key())
            .bind(bound)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
