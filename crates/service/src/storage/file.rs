use std::sync::Arc;

use async_trait::async_trait;

use super::json_map_store::JsonMapStore;
use super::LocalStorage;
use crate::errors::ServiceError;

/// File-backed local storage.
/// Keeps a map of `key -> string value` persisted as one JSON document.
#[derive(Clone)]
pub struct FileStorage {
    store: Arc<JsonMapStore<String, String>>,
}

impl FileStorage {
    /// Initialize the storage from the given file path. Creates the file if missing.
    pub async fn open<P: Into<std::path::PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let store = JsonMapStore::<String, String>::new(path).await?;
        Ok(Self { store })
    }

    pub async fn keys(&self) -> Vec<String> {
        self.store.keys().await
    }
}

#[async_trait]
impl LocalStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.store.get(&key.to_string()).await)
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.store.insert(key.to_string(), value).await
    }

    async fn remove_item(&self, key: &str) -> Result<bool, ServiceError> {
        self.store.remove(&key.to_string()).await
    }
}
