//! Backend gateway
//!
//! One function group per resource. Every protected call reads the bearer
//! token from durable storage first and fails with
//! [`ApiError::Unauthenticated`] before touching the network when it is
//! missing. Responses are parsed into explicit types; a body that does not
//! parse is an [`ApiError::Parse`], distinct from an HTTP failure.

pub mod auth;
pub mod claims;
pub mod errors;
pub mod inflight;
pub mod policies;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use configs::ApiConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::state::AppStore;
use crate::storage::{LocalStorage, ACCESS_TOKEN_KEY};

pub use errors::ApiError;
pub use inflight::{InflightRegistry, RawResponse};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn LocalStorage>,
    store: AppStore,
    inflight: InflightRegistry,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, storage: Arc<dyn LocalStorage>, store: AppStore) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;
        Ok(Self { http, base_url, storage, store, inflight: InflightRegistry::new() })
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    pub fn storage(&self) -> &Arc<dyn LocalStorage> {
        &self.storage
    }

    /// Bearer token from durable storage.
    pub async fn access_token(&self) -> Result<String, ApiError> {
        self.storage
            .get_item(ACCESS_TOKEN_KEY)
            .await?
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthenticated)
    }

    /// Signed-in user id as recorded in the persisted state document.
    pub async fn user_id(&self) -> Result<String, ApiError> {
        self.store.persisted_user_id().await?.ok_or(ApiError::UserIdMissing)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET through the in-flight registry, keyed by method and path.
    async fn get(&self, url: Url, token: &str) -> Result<RawResponse, ApiError> {
        let fingerprint = match url.query() {
            Some(q) => format!("GET {}?{q}", url.path()),
            None => format!("GET {}", url.path()),
        };
        let request = self.http.get(url).bearer_auth(token);
        self.inflight
            .run(fingerprint, async move { read_response(request.send().await?).await })
            .await
    }

    async fn post<B: Serialize + ?Sized>(&self, url: Url, token: Option<&str>, body: &B) -> Result<RawResponse, ApiError> {
        let mut request = self.http.post(url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        read_response(request.send().await?).await
    }
}

async fn read_response(resp: reqwest::Response) -> Result<RawResponse, ApiError> {
    let status = resp.status().as_u16();
    let body = resp.bytes().await?.to_vec();
    debug!(status, bytes = body.len(), "response received");
    Ok(RawResponse { status, body })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ServerMessage {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<ServerMessage>,
}

/// `message` field of an error body, if the server sent one.
fn server_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    let text = match parsed.message? {
        ServerMessage::One(s) => s,
        ServerMessage::Many(parts) => parts.join(", "),
    };
    (!text.trim().is_empty()).then_some(text)
}

fn ensure_success(raw: &RawResponse, fallback: &str) -> Result<(), ApiError> {
    if raw.is_success() {
        return Ok(());
    }
    let message = server_message(&raw.body).unwrap_or_else(|| fallback.to_string());
    Err(ApiError::RequestFailed { status: raw.status, message })
}

fn decode<T: DeserializeOwned>(raw: &RawResponse, fallback: &str) -> Result<T, ApiError> {
    ensure_success(raw, fallback)?;
    serde_json::from_slice(&raw.body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// 404, an empty body and `null` all mean "not found".
fn decode_optional<T: DeserializeOwned>(raw: &RawResponse, fallback: &str) -> Result<Option<T>, ApiError> {
    if raw.status == 404 || (raw.is_success() && raw.body.iter().all(u8::is_ascii_whitespace)) {
        return Ok(None);
    }
    decode::<Option<T>>(raw, fallback)
}

/// A `null` list is an empty list.
fn decode_list<T: DeserializeOwned>(raw: &RawResponse, fallback: &str) -> Result<Vec<T>, ApiError> {
    Ok(decode::<Option<Vec<T>>>(raw, fallback)?.unwrap_or_default())
}
