//! Durable local storage
//!
//! A string key/value medium standing in for the browser's local storage.
//! The state document, the raw bearer token and the denormalized user
//! snapshot all live side by side in one medium under separate keys.

pub mod json_map_store;
pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::errors::ServiceError;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key of the persisted `{ state, version }` document.
pub const STATE_KEY: &str = "insurance-app-storage";
/// Key of the raw bearer token string.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Key of the user snapshot written at login.
pub const USER_SNAPSHOT_KEY: &str = "user";

/// Trait abstraction for the durable key/value medium.
/// Implementations can be in-memory, file-backed, or anything else that
/// survives the lifetime the caller needs.
#[async_trait]
pub trait LocalStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, ServiceError>;
    async fn set_item(&self, key: &str, value: String) -> Result<(), ServiceError>;
    /// Remove a key; returns whether it existed.
    async fn remove_item(&self, key: &str) -> Result<bool, ServiceError>;
}
