use thiserror::Error;

use crate::errors::ServiceError;

/// Failures of the backend gateway functions.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No bearer token in storage; raised before any network call.
    #[error("Access token not found")]
    Unauthenticated,
    #[error("User ID not found")]
    UserIdMissing,
    #[error("{message}")]
    RequestFailed { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Parse(String),
    #[error(transparent)]
    Storage(#[from] ServiceError),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Unauthenticated => 2001,
            ApiError::UserIdMissing => 2002,
            ApiError::RequestFailed { .. } => 2003,
            ApiError::Transport(_) => 2101,
            ApiError::Parse(_) => 2102,
            ApiError::Storage(_) => 2200,
            ApiError::InvalidUrl(_) => 2300,
        }
    }

    /// The backend rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::RequestFailed { status: 401, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}
