use thiserror::Error;

/// Failures of the durable storage medium and of state (de)serialization.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn storage(e: impl std::fmt::Display) -> Self { Self::Storage(e.to_string()) }
    pub fn serialization(e: impl std::fmt::Display) -> Self { Self::Serialization(e.to_string()) }
}
