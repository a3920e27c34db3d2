//! Third-party public user directory (reqres-style paging).

use std::time::Duration;

use configs::DirectoryConfig;
use models::{User, UserRole};
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::api::ApiError;

/// Upper bound on pages followed, whatever `total_pages` claims.
pub const MAX_PAGES: u32 = 50;

#[derive(Debug, Deserialize)]
struct DirectoryPage {
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    data: Vec<DirectoryUser>,
}

#[derive(Debug, Deserialize)]
struct DirectoryUser {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
    #[serde(default)]
    avatar: Option<String>,
}

impl From<DirectoryUser> for User {
    fn from(u: DirectoryUser) -> Self {
        User {
            id: u.id.to_string(),
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            google_id: None,
            created_at: None,
            updated_at: None,
            last_login: None,
            role: UserRole::User,
            avatar: u.avatar,
        }
    }
}

#[derive(Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    users_url: Url,
    api_key: Option<String>,
    first_name_prefixes: Vec<String>,
    last_name_prefixes: Vec<String>,
}

impl DirectoryClient {
    pub fn new(config: &DirectoryConfig) -> Result<Self, ApiError> {
        let mut users_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        users_url
            .path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(config.base_url.clone()))?
            .pop_if_empty()
            .push("users");
        let http = reqwest::Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            http,
            users_url,
            api_key: config.api_key.clone(),
            first_name_prefixes: config.first_name_prefixes.clone(),
            last_name_prefixes: config.last_name_prefixes.clone(),
        })
    }

    /// Every matching user, or an empty list if any page fails.
    pub async fn fetch_users(&self) -> Vec<User> {
        match self.fetch_all().await {
            Ok(users) => users.into_iter().filter(|u| self.matches(u)).collect(),
            Err(e) => {
                warn!(error = %e, "user directory unavailable; showing no users");
                Vec::new()
            }
        }
    }

    fn matches(&self, user: &User) -> bool {
        self.first_name_prefixes.iter().any(|p| user.first_name.starts_with(p.as_str()))
            || self.last_name_prefixes.iter().any(|p| user.last_name.starts_with(p.as_str()))
    }

    #[instrument(skip(self), fields(url = %self.users_url))]
    async fn fetch_all(&self) -> Result<Vec<User>, ApiError> {
        let mut users = Vec::new();
        let mut page = 1;
        loop {
            let body = self.fetch_page(page).await?;
            debug!(page, total_pages = body.total_pages, count = body.data.len(), "directory page");
            users.extend(body.data.into_iter().map(User::from));
            if page >= body.total_pages {
                break;
            }
            if page >= MAX_PAGES {
                warn!(total_pages = body.total_pages, max_pages = MAX_PAGES, "directory listing truncated at page cap");
                break;
            }
            page += 1;
        }
        Ok(users)
    }

    async fn fetch_page(&self, page: u32) -> Result<DirectoryPage, ApiError> {
        let mut url = self.users_url.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        let mut request = self.http.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                message: format!("Error fetching users: {}", status.canonical_reason().unwrap_or("unknown")),
            });
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
    }
}
