use chrono::NaiveDate;
use models::{Claim, CreateClaimRequest, Policy};

use super::{App, ControllerError, Navigation, Notice};
use crate::guard::Route;

#[derive(Clone, Debug, PartialEq)]
pub struct ClaimRow {
    pub claim: Claim,
    /// Label of the claimed policy's type, "Unknown" if it is not cached.
    pub policy_type: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClaimForm {
    pub policy_id: String,
    pub description: String,
    pub amount: f64,
    /// Incident date; defaults to the submission day.
    pub date: Option<NaiveDate>,
}

impl App {
    pub async fn claims(&self) -> Result<Vec<ClaimRow>, ControllerError> {
        self.enter(&Route::Claims)?;
        let fetched = self.call(self.api.my_claims()).await?;
        self.store().sync_claims(fetched).await?;

        let snapshot = self.store().snapshot();
        Ok(snapshot
            .cache
            .claims
            .iter()
            .map(|claim| ClaimRow {
                policy_type: snapshot
                    .cache
                    .policy(&claim.policy_id)
                    .map(|p| p.policy_type.label().to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
                claim: claim.clone(),
            })
            .collect())
    }

    /// Policies a claim can be filed against.
    pub fn claim_targets(&self) -> Result<Vec<Policy>, ControllerError> {
        self.enter(&Route::SubmitClaim(None))?;
        Ok(self.store().snapshot().cache.active_policies().cloned().collect())
    }

    pub async fn submit_claim(&self, form: ClaimForm, today: NaiveDate) -> Result<Navigation, ControllerError> {
        let session = self.enter(&Route::SubmitClaim(None))?;
        let request = CreateClaimRequest {
            policy_id: form.policy_id.trim().to_string(),
            user_id: session.user.map(|u| u.id).unwrap_or_default(),
            description: form.description.trim().to_string(),
            amount: form.amount,
            date: form.date.unwrap_or(today),
        };
        request.validate()?;
        self.call(self.api.create_claim(request)).await?;
        Ok(Navigation {
            route: Route::Claims,
            notice: Notice::success(
                "Claim Submitted",
                "Your claim has been submitted successfully and is pending review.",
            ),
        })
    }
}
