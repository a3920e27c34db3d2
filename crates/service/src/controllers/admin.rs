use common::format::mask_email;
use models::{User, UserRole};
use serde::Serialize;

use super::{App, ControllerError};
use crate::guard::Route;

const RECENT_USERS: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub masked_email: String,
    pub role: UserRole,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        UserRow { id: u.id.clone(), name: u.full_name(), masked_email: mask_email(&u.email), role: u.role }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminDashboardView {
    pub user_count: usize,
    pub active_policies: usize,
    pub pending_claims: usize,
    pub recent_users: Vec<UserRow>,
}

impl App {
    pub async fn admin_dashboard(&self) -> Result<AdminDashboardView, ControllerError> {
        self.enter(&Route::AdminDashboard)?;
        let users = self.directory.fetch_users().await;
        let snapshot = self.store().snapshot();
        Ok(AdminDashboardView {
            user_count: users.len(),
            active_policies: snapshot.cache.active_policies().count(),
            pending_claims: snapshot.cache.pending_claims().count(),
            recent_users: users.iter().take(RECENT_USERS).map(UserRow::from).collect(),
        })
    }

    pub async fn admin_users(&self) -> Result<Vec<UserRow>, ControllerError> {
        self.enter(&Route::AdminUsers)?;
        let users = self.directory.fetch_users().await;
        Ok(users.iter().map(UserRow::from).collect())
    }

    /// Registered accounts from the insurance backend itself.
    pub async fn admin_accounts(&self) -> Result<Vec<UserRow>, ControllerError> {
        self.enter(&Route::AdminUsers)?;
        let users = self.call(self.api.list_users()).await?;
        Ok(users.iter().map(UserRow::from).collect())
    }

    /// Look up one backend account by email; `None` when nobody matches.
    pub async fn admin_lookup(&self, email: &str) -> Result<Option<UserRow>, ControllerError> {
        self.enter(&Route::AdminUsers)?;
        models::user::validate_email(email)?;
        let user = self.call(self.api.find_user_by_email(email.trim())).await?;
        Ok(user.as_ref().map(UserRow::from))
    }
}
