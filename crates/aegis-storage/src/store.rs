// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The subscriber store: the durable owner of record of truth.
//!
//! Wraps a [`Database`] handle and exposes the four persistence operations
//! the REST API is built on. `id` and `created_at` are assigned here on
//! creation and never change afterwards.

use aegis_config::model::StorageConfig;
use aegis_core::{AegisError, Subscriber, SubscriberDraft, SubscriberId, SubscriberPatch};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::database::Database;
use crate::queries;

/// SQLite-backed subscriber store.
pub struct SubscriberStore {
    db: Database,
}

impl SubscriberStore {
    /// Open the store at the configured path, running migrations as needed.
    pub async fn open(config: &StorageConfig) -> Result<Self, AegisError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "subscriber store opened");
        Ok(Self { db })
    }

    /// List all subscriber records, newest first.
    pub async fn list(&self) -> Result<Vec<Subscriber>, AegisError> {
        queries::subscribers::list_subscribers(&self.db).await
    }

    /// Fetch one record by id.
    pub async fn get(&self, id: &SubscriberId) -> Result<Option<Subscriber>, AegisError> {
        queries::subscribers::get_subscriber(&self.db, id).await
    }

    /// Create a record from a candidate payload, assigning `id` and
    /// `created_at`.
    pub async fn create(&self, draft: &SubscriberDraft) -> Result<Subscriber, AegisError> {
        let record = draft
            .clone()
            .into_subscriber(SubscriberId(Uuid::new_v4().to_string()), Some(Utc::now()));
        queries::subscribers::insert_subscriber(&self.db, &record).await?;
        Ok(record)
    }

    /// Apply a partial update and return the stored record.
    pub async fn update(
        &self,
        id: &SubscriberId,
        patch: &SubscriberPatch,
    ) -> Result<Subscriber, AegisError> {
        queries::subscribers::update_subscriber(&self.db, id, patch)
            .await?
            .ok_or_else(|| AegisError::not_found(id.0.clone()))
    }

    /// Remove a record by id.
    pub async fn delete(&self, id: &SubscriberId) -> Result<(), AegisError> {
        if queries::subscribers::delete_subscriber(&self.db, id).await? {
            Ok(())
        } else {
            Err(AegisError::not_found(id.0.clone()))
        }
    }

    /// Cheap liveness probe for the health endpoint.
    pub async fn ping(&self) -> Result<(), AegisError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), tokio_rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), AegisError> {
        self.db.checkpoint().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::GeoPoint;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    fn draft(name: &str, email: &str) -> SubscriberDraft {
        SubscriberDraft {
            name: name.to_string(),
            email: email.to_string(),
            phone: 5550001111,
            emergency_phone: None,
            home_address: Some("12 North Rd".into()),
            accepted_terms: true,
            subscription_tier: "free".into(),
            subscription_expiration: None,
            last_known_location: Some(GeoPoint {
                latitude: 40.7,
                longitude: -74.0,
            }),
            is_agent: Some(false),
            is_safe: None,
            profile_picture: None,
            device_ids: Some(vec!["dev-1".into(), "dev-2".into()]),
        }
    }

    async fn open_store(dir: &tempfile::TempDir) -> SubscriberStore {
        let db_path = dir.path().join("test.db");
        SubscriberStore::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_assigns_id_and_created_at() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        let record = store.create(&draft("Ann", "ann@example.com")).await.unwrap();
        assert!(!record.id.0.is_empty());
        assert!(record.created_at.is_some());

        let fetched = store.get(&record.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Ann");
        assert_eq!(fetched.device_ids.as_deref(), Some(&["dev-1".to_string(), "dev-2".to_string()][..]));
        assert_eq!(
            fetched.last_known_location.map(|p| p.latitude),
            Some(40.7)
        );
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        let first = store.create(&draft("Ann", "ann@example.com")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create(&draft("Bob", "bob@example.com")).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[tokio::test]
    async fn update_merges_named_fields_only() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let record = store.create(&draft("Ann", "ann@example.com")).await.unwrap();

        let patch = SubscriberPatch {
            phone: Some(5559998888),
            subscription_tier: Some("premium".into()),
            ..Default::default()
        };
        let updated = store.update(&record.id, &patch).await.unwrap();
        assert_eq!(updated.phone, 5559998888);
        assert_eq!(updated.subscription_tier, "premium");
        // Untouched fields and identity survive.
        assert_eq!(updated.name, "Ann");
        assert_eq!(updated.id, record.id);
        assert_eq!(updated.created_at, record.created_at);

        let fetched = store.get(&record.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        let err = store
            .update(&SubscriberId("nope".into()), &SubscriberPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_removes_row_and_reports_unknown_ids() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let record = store.create(&draft("Ann", "ann@example.com")).await.unwrap();

        store.delete(&record.id).await.unwrap();
        assert!(store.get(&record.id).await.unwrap().is_none());

        let err = store.delete(&record.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn ping_and_close_succeed() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        store.ping().await.unwrap();
        store.close().await.unwrap();
    }
}
