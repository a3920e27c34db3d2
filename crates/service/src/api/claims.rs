use models::{Claim, CreateClaimRequest};
use tracing::{info, instrument};

use super::{decode, decode_list, decode_optional, ApiClient, ApiError};

impl ApiClient {
    /// `POST /claims`; the created claim is appended to the cache.
    #[instrument(skip(self, request), fields(policy_id = %request.policy_id))]
    pub async fn create_claim(&self, request: CreateClaimRequest) -> Result<Claim, ApiError> {
        let token = self.access_token().await?;
        let url = self.endpoint(&["claims"])?;
        let raw = self.post(url, Some(&token), &request).await?;
        let claim: Claim = decode(&raw, "Failed to create claim")?;
        self.store.add_claims(vec![claim.clone()]).await?;
        info!(claim_id = %claim.id, amount = claim.amount, "claim_created");
        Ok(claim)
    }

    /// `GET /claims/user/{userId}` for the signed-in user.
    #[instrument(skip(self))]
    pub async fn my_claims(&self) -> Result<Vec<Claim>, ApiError> {
        let token = self.access_token().await?;
        let user_id = self.user_id().await?;
        let url = self.endpoint(&["claims", "user", &user_id])?;
        let raw = self.get(url, &token).await?;
        decode_list(&raw, "Failed to fetch claims")
    }

    /// `GET /claims/policy/{policyId}`
    #[instrument(skip(self))]
    pub async fn claims_for_policy(&self, policy_id: &str) -> Result<Vec<Claim>, ApiError> {
        let token = self.access_token().await?;
        let url = self.endpoint(&["claims", "policy", policy_id])?;
        let raw = self.get(url, &token).await?;
        decode_list(&raw, "Failed to fetch claims")
    }

    /// `GET /claims/{id}`
    #[instrument(skip(self))]
    pub async fn get_claim(&self, id: &str) -> Result<Option<Claim>, ApiError> {
        let token = self.access_token().await?;
        let url = self.endpoint(&["claims", id])?;
        let raw = self.get(url, &token).await?;
        decode_optional(&raw, "Failed to fetch claim")
    }
}
