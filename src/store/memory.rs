//! In-memory preference store for tests and demo sessions.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::traits::PreferenceStore;

#[derive(Default)]
pub struct InMemoryPreferenceStore {
    values: RwLock<HashMap<(String, String), serde_json::Value>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, StoreError> {
        let values = self.values.read().await;
        Ok(values.get(&(user_id.to_string(), key.to_string())).cloned())
    }

    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), StoreError> {
        self.values
            .write()
            .await
            .insert((user_id.to_string(), key.to_string()), value.clone());
        Ok(())
    }

    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .values
            .write()
            .await
            .remove(&(user_id.to_string(), key.to_string()))
            .is_some())
    }
}
