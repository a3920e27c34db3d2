use chrono::NaiveDate;
use models::policy::add_year;
use models::{Claim, CreatePolicyRequest, InsuranceProduct, Policy, PolicyStatus, PolicyType};
use tracing::info;
use uuid::Uuid;

use super::{App, ControllerError, Navigation, Notice};
use crate::guard::Route;
use crate::pricing::{self, CoverageLevel, PaymentFrequency, Quote};

#[derive(Clone, Debug, PartialEq)]
pub struct PolicyDetail {
    pub policy: Policy,
    pub claims: Vec<Claim>,
    pub days_until_end: i64,
    pub renewable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseForm {
    pub product_id: String,
    pub level: CoverageLevel,
    pub frequency: PaymentFrequency,
}

fn policy_number() -> String {
    let id = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("POL-{}", &id[..8])
}

impl App {
    /// The user's policies, reconciled into the cache.
    pub async fn policies(&self) -> Result<Vec<Policy>, ControllerError> {
        self.enter(&Route::Policies)?;
        let fetched = self.call(self.api.my_policies()).await?;
        self.store().sync_policies(fetched).await?;
        Ok(self.store().policies())
    }

    pub async fn policy_detail(&self, id: &str, today: NaiveDate) -> Result<PolicyDetail, ControllerError> {
        self.enter(&Route::Policy(id.to_string()))?;
        if let Some(policy) = self.call(self.api.get_policy(id)).await? {
            self.store().sync_policies(vec![policy]).await?;
        }
        let policy = self.store().policy(id).ok_or_else(|| ControllerError::NotFound(format!("policy {id}")))?;
        let claims = self.call(self.api.claims_for_policy(id)).await?;
        self.store().sync_claims(claims.clone()).await?;
        Ok(PolicyDetail {
            days_until_end: policy.days_until_end(today),
            renewable: !policy.is_active(),
            policy,
            claims,
        })
    }

    /// Renew a cached policy from `today`. Active policies are refused.
    pub async fn renew(&self, id: &str, today: NaiveDate) -> Result<Navigation, ControllerError> {
        let route = Route::Policy(id.to_string());
        self.enter(&route)?;
        let policy = self.store().policy(id).ok_or_else(|| ControllerError::NotFound(format!("policy {id}")))?;
        let patch = policy.renewal(today)?;
        let mut renewed = policy.clone();
        patch.clone().apply(&mut renewed);
        renewed.validate()?;
        self.store().update_policy(id, patch).await?;
        info!(policy_id = %id, "policy_renewed");
        Ok(Navigation {
            route,
            notice: Notice::success(
                "Insurance Renewed",
                format!("Your {} insurance has been renewed for another year.", policy.policy_type.label()),
            ),
        })
    }

    /// Products currently on sale.
    pub async fn products(&self) -> Result<Vec<InsuranceProduct>, ControllerError> {
        self.enter(&Route::Purchase)?;
        let products = self.call(self.api.insurance_products()).await?;
        Ok(products.into_iter().filter(InsuranceProduct::is_available).collect())
    }

    pub fn quote(&self, policy_type: PolicyType, level: CoverageLevel, frequency: PaymentFrequency) -> Result<Quote, ControllerError> {
        self.enter(&Route::Purchase)?;
        Ok(pricing::quote(policy_type, level, frequency))
    }

    /// Buy a product at the quoted price; the policy starts `today` and runs
    /// for one year.
    pub async fn purchase(&self, form: PurchaseForm, today: NaiveDate) -> Result<Navigation, ControllerError> {
        let products = self.products().await?;
        let product = products
            .into_iter()
            .find(|p| p.id == form.product_id)
            .ok_or_else(|| ControllerError::NotFound(format!("insurance product {}", form.product_id)))?;
        let quote = pricing::quote(product.product_type, form.level, form.frequency);

        let request = CreatePolicyRequest {
            policy_number: policy_number(),
            status: PolicyStatus::Active,
            start_date: today,
            end_date: add_year(today)?,
            premium: quote.premium,
            coverage_limit: quote.coverage,
            user_id: String::new(),
            insurance_product_id: product.id.clone(),
        };
        request.validate()?;
        let policy = self.call(self.api.create_policy(request)).await?;
        Ok(Navigation {
            route: Route::Policy(policy.id),
            notice: Notice::success(
                "Insurance Purchased",
                format!("Your {} insurance has been successfully purchased.", product.product_type.label()),
            ),
        })
    }
}
