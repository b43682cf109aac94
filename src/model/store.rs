//! The persistence boundary: one progress document per user.
//!
//! `save` is atomic per user and guarded by optimistic versioning: a writer
//! that loaded version N may only replace version N. Concurrent writers for
//! the same user race on the compare-and-set and the loser gets `Conflict`
//! instead of silently clobbering the winner's fields.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::engine::ProgressAggregate;
use crate::model::error::{StoreError, StoreResult};
use crate::model::DbConnection;

/// An aggregate paired with the version it was loaded at.
#[derive(Debug, Clone)]
pub struct Versioned {
    pub aggregate: ProgressAggregate,
    pub version: i64,
}

impl Versioned {
    /// Wraps a freshly created aggregate that has never been persisted.
    /// Version 0 makes the next save an insert.
    pub fn unsaved(aggregate: ProgressAggregate) -> Self {
        Self { aggregate, version: 0 }
    }
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn load(&self, user_id: Uuid) -> StoreResult<Option<Versioned>>;

    /// Persists the whole document if the stored version still equals
    /// `expected_version` (0 meaning "not yet persisted"). Returns the new
    /// version on success, `Conflict` on a stale expectation.
    async fn save(&self, aggregate: &ProgressAggregate, expected_version: i64)
        -> StoreResult<i64>;
}

pub struct PgProgressStore {
    db: DbConnection,
}

impl PgProgressStore {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn load(&self, user_id: Uuid) -> StoreResult<Option<Versioned>> {
        let row: Option<(Json<ProgressAggregate>, i64)> =
            sqlx::query_as("SELECT doc, version FROM progress_aggregates WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(self.db.pool())
                .await?;

        Ok(row.map(|(doc, version)| Versioned { aggregate: doc.0, version }))
    }

    async fn save(
        &self,
        aggregate: &ProgressAggregate,
        expected_version: i64,
    ) -> StoreResult<i64> {
        if expected_version == 0 {
            let result = sqlx::query(
                r#"
                INSERT INTO progress_aggregates (user_id, doc, version)
                VALUES ($1, $2, 1)
                ON CONFLICT (user_id) DO NOTHING
                "#,
            )
            .bind(aggregate.user_id)
            .bind(Json(aggregate))
            .execute(self.db.pool())
            .await?;

            if result.rows_affected() == 0 {
                // Someone else created the document first.
                return Err(StoreError::Conflict(aggregate.user_id));
            }
            return Ok(1);
        }

        let result = sqlx::query(
            r#"
            UPDATE progress_aggregates
            SET doc = $2, version = version + 1, updated_at = now()
            WHERE user_id = $1 AND version = $3
            "#,
        )
        .bind(aggregate.user_id)
        .bind(Json(aggregate))
        .bind(expected_version)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(aggregate.user_id));
        }
        Ok(expected_version + 1)
    }
}

/// Store backed by a process-local map, with the same versioning contract as
/// the Postgres store. Used by the integration tests and local tooling.
#[derive(Default)]
pub struct MemoryProgressStore {
    inner: std::sync::Mutex<HashMap<Uuid, (i64, ProgressAggregate)>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn load(&self, user_id: Uuid) -> StoreResult<Option<Versioned>> {
        let map = self.inner.lock().expect("memory store lock poisoned");
        Ok(map
            .get(&user_id)
            .map(|(version, aggregate)| Versioned { aggregate: aggregate.clone(), version: *version }))
    }

    async fn save(
        &self,
        aggregate: &ProgressAggregate,
        expected_version: i64,
    ) -> StoreResult<i64> {
        let mut map = self.inner.lock().expect("memory store lock poisoned");
        let current = map.get(&aggregate.user_id).map(|(v, _)| *v).unwrap_or(0);
        if current != expected_version {
            return Err(StoreError::Conflict(aggregate.user_id));
        }
        let next = expected_version + 1;
        map.insert(aggregate.user_id, (next, aggregate.clone()));
        Ok(next)
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;

    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips_with_versions() {
        let store = MemoryProgressStore::new();
        let user_id = Uuid::new_v4();
        let aggregate = ProgressAggregate::new(user_id, Utc::now());

        assert!(store.load(user_id).await.unwrap().is_none());

        let v1 = store.save(&aggregate, 0).await.unwrap();
        assert_eq!(v1, 1);

        let loaded = store.load(user_id).await.unwrap().unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.aggregate.user_id, user_id);
    }

    #[tokio::test]
    async fn stale_save_is_a_conflict() {
        let store = MemoryProgressStore::new();
        let user_id = Uuid::new_v4();
        let aggregate = ProgressAggregate::new(user_id, Utc::now());

        store.save(&aggregate, 0).await.unwrap();
        // A second writer that also thinks the document is unsaved loses.
        let err = store.save(&aggregate, 0).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(id) if id == user_id));
    }
}
