use chrono::NaiveDate;
use models::Policy;

use super::{App, ControllerError};
use crate::guard::Route;
use crate::state::RENEWAL_WINDOW_DAYS;

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardView {
    pub greeting_name: String,
    pub active_policies: usize,
    pub pending_claims: usize,
    pub upcoming_renewals: Vec<Policy>,
    pub next_renewal: Option<NaiveDate>,
    pub total_active_coverage: f64,
    /// First few active policies, for the overview list.
    pub highlighted: Vec<Policy>,
}

const HIGHLIGHTED: usize = 3;

impl App {
    pub async fn dashboard(&self, today: NaiveDate) -> Result<DashboardView, ControllerError> {
        let session = self.enter(&Route::Dashboard)?;
        let policies = self.call(self.api.my_policies()).await?;
        self.store().sync_policies(policies).await?;
        let claims = self.call(self.api.my_claims()).await?;
        self.store().sync_claims(claims).await?;

        let snapshot = self.store().snapshot();
        let cache = &snapshot.cache;
        let upcoming: Vec<Policy> = cache.upcoming_renewals(today, RENEWAL_WINDOW_DAYS).into_iter().cloned().collect();
        Ok(DashboardView {
            greeting_name: session.user.map(|u| u.first_name).unwrap_or_default(),
            active_policies: cache.active_policies().count(),
            pending_claims: cache.pending_claims().count(),
            next_renewal: upcoming.first().map(|p| p.end_date),
            upcoming_renewals: upcoming,
            total_active_coverage: cache.total_active_coverage(),
            highlighted: cache.active_policies().take(HIGHLIGHTED).cloned().collect(),
        })
    }
}
