use models::{CreatePolicyRequest, InsuranceProduct, Policy};
use tracing::{info, instrument};

use super::{decode, decode_list, decode_optional, ApiClient, ApiError};

impl ApiClient {
    /// `GET /policies/{id}`
    #[instrument(skip(self))]
    pub async fn get_policy(&self, id: &str) -> Result<Option<Policy>, ApiError> {
        let token = self.access_token().await?;
        let url = self.endpoint(&["policies", id])?;
        let raw = self.get(url, &token).await?;
        decode_optional(&raw, "Failed to fetch insurance")
    }

    /// `GET /policies/user/{userId}` for the signed-in user.
    #[instrument(skip(self))]
    pub async fn my_policies(&self) -> Result<Vec<Policy>, ApiError> {
        let token = self.access_token().await?;
        let user_id = self.user_id().await?;
        let url = self.endpoint(&["policies", "user", &user_id])?;
        let raw = self.get(url, &token).await?;
        decode_list(&raw, "Failed to fetch insurance")
    }

    /// `POST /policies` on behalf of the signed-in user; the created policy
    /// is added to the cache.
    #[instrument(skip(self, request), fields(product = %request.insurance_product_id))]
    pub async fn create_policy(&self, mut request: CreatePolicyRequest) -> Result<Policy, ApiError> {
        let token = self.access_token().await?;
        request.user_id = self.user_id().await?;
        let url = self.endpoint(&["policies"])?;
        let raw = self.post(url, Some(&token), &request).await?;
        let policy: Policy = decode(&raw, "Failed to create insurance")?;
        self.store.add_policies(vec![policy.clone()]).await?;
        info!(policy_id = %policy.id, "policy_created");
        Ok(policy)
    }

    /// `GET /insurance-products`
    #[instrument(skip(self))]
    pub async fn insurance_products(&self) -> Result<Vec<InsuranceProduct>, ApiError> {
        let token = self.access_token().await?;
        let url = self.endpoint(&["insurance-products"])?;
        let raw = self.get(url, &token).await?;
        decode_list(&raw, "Failed to fetch insurance products")
    }
}
