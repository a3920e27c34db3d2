//! Runtime wiring
//!
//! Builds the root controller from configuration so binaries only depend on
//! `service` and `configs`.

use std::sync::Arc;

use configs::AppConfig;
use tracing::info;

use crate::api::ApiClient;
use crate::controllers::App;
use crate::directory::DirectoryClient;
use crate::state::{AppStore, StatePersistence, StoragePersistence};
use crate::storage::{FileStorage, LocalStorage};

/// Open file storage, rehydrate the store and wire the clients.
pub async fn bootstrap(config: &AppConfig) -> anyhow::Result<App> {
    common::env::ensure_storage_dir(&config.storage.path).await?;
    let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::open(&config.storage.path).await?);
    assemble(config, storage).await
}

/// Wire an [`App`] over any storage medium.
pub async fn assemble(config: &AppConfig, storage: Arc<dyn LocalStorage>) -> anyhow::Result<App> {
    let persistence: Arc<dyn StatePersistence> = Arc::new(StoragePersistence::new(storage.clone()));
    let store = AppStore::open(persistence).await?;
    info!(
        storage = %config.storage.path,
        authenticated = store.is_authenticated(),
        "state loaded"
    );
    let api = ApiClient::new(&config.api, storage, store)?;
    let directory = DirectoryClient::new(&config.directory)?;
    Ok(App::new(api, directory))
}
