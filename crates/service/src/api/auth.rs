use models::{LoginData, LoginRequest};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::{decode, ensure_success, ApiClient, ApiError};
use crate::errors::ServiceError;
use crate::storage::{ACCESS_TOKEN_KEY, USER_SNAPSHOT_KEY};

impl ApiClient {
    /// `POST /auth/login`. The token and user snapshot are written to
    /// durable storage before the session store learns about the user.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginData, ApiError> {
        let url = self.endpoint(&["auth", "login"])?;
        let body = LoginRequest { email: email.to_string(), password: password.to_string() };
        let raw = self.post(url, None, &body).await?;
        let data: LoginData = decode(&raw, "Failed to login")?;

        self.storage.set_item(ACCESS_TOKEN_KEY, data.access_token.clone()).await?;
        let snapshot = serde_json::to_string(&data.user).map_err(ServiceError::serialization)?;
        self.storage.set_item(USER_SNAPSHOT_KEY, snapshot).await?;
        self.store.login(data.user.clone()).await?;

        info!(user_id = %data.user.id, role = ?data.user.role, "user_logged_in");
        Ok(data)
    }

    /// `POST /auth/logout`, best effort. Local state is untouched; callers
    /// follow up with [`ApiClient::clear_session`] whatever the outcome.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let token = self.access_token().await?;
        let url = self.endpoint(&["auth", "logout"])?;
        let raw = self.post(url, Some(&token), &json!({})).await?;
        if let Err(e) = ensure_success(&raw, "Failed to logout") {
            warn!(error = %e, "server logout rejected");
            return Err(e);
        }
        info!("server session invalidated");
        Ok(())
    }

    /// Drop the token, the user snapshot and the session.
    pub async fn clear_session(&self) -> Result<(), ApiError> {
        self.storage.remove_item(ACCESS_TOKEN_KEY).await?;
        self.storage.remove_item(USER_SNAPSHOT_KEY).await?;
        self.store.logout().await?;
        info!("local session cleared");
        Ok(())
    }
}
