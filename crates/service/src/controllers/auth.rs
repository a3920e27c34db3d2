use common::format::mask_email;
use models::{LoginRequest, UserRole};
use tracing::warn;

use super::{App, ControllerError, Navigation, Notice};
use crate::guard::{home_route, Route};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub masked_email: String,
    pub role: UserRole,
    pub avatar: Option<String>,
}

impl App {
    pub async fn login(&self, email: &str, password: &str) -> Result<Navigation, ControllerError> {
        let request = LoginRequest { email: email.trim().to_string(), password: password.to_string() };
        request.validate()?;
        // a 401 here means bad credentials, not a rejected token
        let data = self.api.login(&request.email, &request.password).await?;
        Ok(Navigation {
            route: home_route(&data.user),
            notice: Notice::success("Login successful", format!("Welcome back, {}!", data.user.first_name)),
        })
    }

    /// Sign out. The local session is cleared even when the server call fails.
    pub async fn logout(&self) -> Result<Navigation, ControllerError> {
        let server = self.api.logout().await;
        self.api.clear_session().await?;
        let notice = match server {
            Ok(()) => Notice::success("Logout successful", "You have been logged out successfully."),
            Err(e) => {
                warn!(error = %e, "server logout failed; signed out locally");
                Notice::warning("Signed out locally", format!("The server could not be reached: {e}"))
            }
        };
        Ok(Navigation { route: Route::Login, notice })
    }

    pub fn profile(&self) -> Result<ProfileView, ControllerError> {
        let session = self.enter(&Route::Profile)?;
        let user = session.user.ok_or_else(|| ControllerError::NotFound("user".into()))?;
        Ok(ProfileView {
            name: user.full_name(),
            masked_email: mask_email(&user.email),
            id: user.id,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
        })
    }
}
