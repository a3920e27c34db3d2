use thiserror::Error;

/// Domain validation failures. Validation messages are user-facing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid date: {0}")]
    Date(String),
}

impl ModelError {
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }
}
