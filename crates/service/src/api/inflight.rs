use std::future::Future;
use std::sync::Arc;

use moka::future::Cache;
use tracing::{debug, instrument};

use super::errors::ApiError;

/// Status and raw body of a finished request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Keyed registry of requests currently on the wire.
///
/// Callers asking for the same fingerprint while a request is running share
/// its outcome. The entry is dropped once the request finishes, so nothing is
/// served from cache afterwards.
#[derive(Clone)]
pub struct InflightRegistry {
    pending: Cache<String, RawResponse>,
}

impl Default for InflightRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InflightRegistry {
    pub fn new() -> Self {
        Self { pending: Cache::builder().max_capacity(256).build() }
    }

    #[instrument(skip(self, request))]
    pub async fn run<F>(&self, fingerprint: String, request: F) -> Result<RawResponse, ApiError>
    where
        F: Future<Output = Result<RawResponse, ApiError>> + Send,
    {
        let outcome = self
            .pending
            .try_get_with(fingerprint.clone(), request)
            .await
            .map_err(|e: Arc<ApiError>| (*e).clone());
        self.pending.invalidate(&fingerprint).await;
        debug!(ok = outcome.is_ok(), "request settled");
        outcome
    }
}
