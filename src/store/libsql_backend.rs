//! libSQL-backed `PreferenceStore`: one `settings` row per user and key.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::info;

use crate::error::StoreError;
use crate::store::migrations;
use crate::store::traits::PreferenceStore;

/// Preference store on one long-lived libSQL connection.
pub struct LibSqlPreferenceStore {
    // Held for as long as `conn` is in use.
    _db: LibSqlDatabase,
    conn: Connection,
}

impl LibSqlPreferenceStore {
    /// Open the preference file at `path`, creating it and its directory on
    /// first run.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| {
                StoreError::Pool(format!("cannot create {}: {e}", dir.display()))
            })?;
        }
        let store = Self::open(path).await?;
        info!(path = %path.display(), "Preference store opened");
        Ok(store)
    }

    /// Throwaway store, for tests and demo runs.
    pub async fn new_memory() -> Result<Self, StoreError> {
        Self::open(Path::new(":memory:")).await
    }

    async fn open(path: &Path) -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Pool(format!("open {}: {e}", path.display())))?;
        let conn = db
            .connect()
            .map_err(|e| StoreError::Pool(format!("connect {}: {e}", path.display())))?;
        migrations::run_migrations(&conn).await?;
        Ok(Self {
            _db: db,
            conn,
        })
    }
}

#[async_trait]
impl PreferenceStore for LibSqlPreferenceStore {
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT value FROM settings WHERE user_id = ?1 AND key = ?2",
                params![user_id, key],
            )
            .await
            .map_err(|e| StoreError::Query(format!("get_setting: {e}")))?;

        let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::Query(format!("get_setting: {e}")))?
        else {
            return Ok(None);
        };

        let raw: String = row
            .get(0)
            .map_err(|e| StoreError::Query(format!("get_setting {user_id}/{key}: {e}")))?;
        let value = serde_json::from_str(&raw).map_err(|e| {
            StoreError::Serialization(format!("setting {user_id}/{key} holds invalid JSON: {e}"))
        })?;
        Ok(Some(value))
    }

    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        let value_str =
            serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO settings (user_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (user_id, key) DO UPDATE SET value = ?3, updated_at = ?4",
                params![user_id, key, value_str, now],
            )
            .await
            .map_err(|e| StoreError::Query(format!("set_setting: {e}")))?;

        Ok(())
    }

    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, StoreError> {
        let count = self
            .conn
            .execute(
                "DELETE FROM settings WHERE user_id = ?1 AND key = ?2",
                params![user_id, key],
            )
            .await
            .map_err(|e| StoreError::Query(format!("delete_setting: {e}")))?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> LibSqlPreferenceStore {
        LibSqlPreferenceStore::new_memory().await.unwrap()
    }

    #[tokio::test]
    async fn settings_crud() {
        let store = test_store().await;

        let value = serde_json::json!({"language": "mr"});
        store.set_setting("user1", "preferences", &value).await.unwrap();
        let fetched = store.get_setting("user1", "preferences").await.unwrap();
        assert_eq!(fetched, Some(value));

        let updated = serde_json::json!({"language": "hi"});
        store.set_setting("user1", "preferences", &updated).await.unwrap();
        let fetched = store.get_setting("user1", "preferences").await.unwrap();
        assert_eq!(fetched, Some(updated));

        assert!(store.delete_setting("user1", "preferences").await.unwrap());
        assert!(store.get_setting("user1", "preferences").await.unwrap().is_none());
        assert!(!store.delete_setting("user1", "preferences").await.unwrap());
    }

    #[tokio::test]
    async fn settings_user_isolation() {
        let store = test_store().await;
        store
            .set_setting("user1", "key", &serde_json::json!("val1"))
            .await
            .unwrap();
        store
            .set_setting("user2", "key", &serde_json::json!("val2"))
            .await
            .unwrap();

        let v1 = store.get_setting("user1", "key").await.unwrap().unwrap();
        let v2 = store.get_setting("user2", "key").await.unwrap().unwrap();
        assert_eq!(v1, "val1");
        assert_eq!(v2, "val2");
    }

    #[tokio::test]
    async fn settings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.db");

        {
            let store = LibSqlPreferenceStore::new_local(&path).await.unwrap();
            store
                .set_setting("local", "onboarding_completed", &serde_json::json!(true))
                .await
                .unwrap();
        }

        let store = LibSqlPreferenceStore::new_local(&path).await.unwrap();
        let value = store
            .get_setting("local", "onboarding_completed")
            .await
            .unwrap();
        assert_eq!(value, Some(serde_json::json!(true)));
    }

    #[tokio::test]
    async fn corrupt_setting_is_reported() {
        let store = test_store().await;
        store
            .conn
            .execute(
                "INSERT INTO settings (user_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)",
                params!["user1", "language", "{not json", "2025-06-15T00:00:00Z"],
            )
            .await
            .unwrap();

        let err = store.get_setting("user1", "language").await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)), "got {err:?}");
    }
}
