use models::User;
use serde_json::json;
use tracing::instrument;

use super::{decode_list, decode_optional, ApiClient, ApiError};

impl ApiClient {
    /// `POST /users/email`. An unknown email is `Ok(None)`, not an error.
    #[instrument(skip(self))]
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let token = self.access_token().await?;
        let url = self.endpoint(&["users", "email"])?;
        let raw = self.post(url, Some(&token), &json!({ "email": email })).await?;
        decode_optional(&raw, "Failed to fetch user")
    }

    /// `GET /users`
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let token = self.access_token().await?;
        let url = self.endpoint(&["users"])?;
        let raw = self.get(url, &token).await?;
        decode_list(&raw, "Failed to fetch users")
    }
}
