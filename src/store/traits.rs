//! `PreferenceStore`, the key-value port behind user preferences.

use async_trait::async_trait;

use crate::error::StoreError;

/// Per-user JSON settings, keyed by `(user_id, key)`.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, StoreError>;

    /// Insert or replace a setting.
    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), StoreError>;

    /// Remove a setting. Returns whether it existed.
    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, StoreError>;
}
