use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::AppSnapshot;
use crate::errors::ServiceError;
use crate::storage::{LocalStorage, STATE_KEY};

/// Version written next to the state document.
pub const STATE_VERSION: u32 = 0;

#[derive(Serialize, Deserialize)]
struct Envelope {
    state: AppSnapshot,
    #[serde(default)]
    version: u32,
}

/// Where the application state is mirrored.
#[async_trait]
pub trait StatePersistence: Send + Sync {
    /// `Ok(None)` when nothing was ever saved.
    async fn load(&self) -> Result<Option<AppSnapshot>, ServiceError>;
    async fn save(&self, snapshot: &AppSnapshot) -> Result<(), ServiceError>;
}

/// Persists the state as a `{ state, version }` JSON document under
/// [`STATE_KEY`] of a [`LocalStorage`].
#[derive(Clone)]
pub struct StoragePersistence {
    storage: Arc<dyn LocalStorage>,
}

impl StoragePersistence {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl StatePersistence for StoragePersistence {
    async fn load(&self) -> Result<Option<AppSnapshot>, ServiceError> {
        let Some(raw) = self.storage.get_item(STATE_KEY).await? else {
            return Ok(None);
        };
        let envelope: Envelope = serde_json::from_str(&raw).map_err(ServiceError::serialization)?;
        Ok(Some(envelope.state))
    }

    async fn save(&self, snapshot: &AppSnapshot) -> Result<(), ServiceError> {
        let envelope = Envelope { state: snapshot.clone(), version: STATE_VERSION };
        let raw = serde_json::to_string(&envelope).map_err(ServiceError::serialization)?;
        self.storage.set_item(STATE_KEY, raw).await
    }
}
