//! Headless page controllers
//!
//! Each controller passes its route through the guard, talks to the backend
//! through [`ApiClient`], reconciles results into the store and returns a
//! view model or a [`Navigation`]. A 401 from a protected call clears the
//! local session before the error is returned; a 401 on login does not.

pub mod admin;
pub mod auth;
pub mod claims;
pub mod dashboard;
pub mod policies;

use std::fmt;
use std::future::Future;

use models::errors::ModelError;
use thiserror::Error;
use tracing::warn;

use crate::api::{ApiClient, ApiError};
use crate::directory::DirectoryClient;
use crate::errors::ServiceError;
use crate::guard::{self, Decision, Route};
use crate::state::{AppStore, Session};

pub use admin::{AdminDashboardView, UserRow};
pub use auth::ProfileView;
pub use claims::{ClaimForm, ClaimRow};
pub use dashboard::DashboardView;
pub use policies::{PolicyDetail, PurchaseForm};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0}")]
    Validation(#[from] ModelError),
    #[error(transparent)]
    Storage(#[from] ServiceError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("redirected to {0}")]
    Redirect(Route),
}

impl ControllerError {
    /// Transient notification describing this failure.
    pub fn notice(&self) -> Notice {
        match self {
            ControllerError::Redirect(Route::Login) => Notice::error("Sign in required", "Please sign in to continue."),
            ControllerError::Redirect(_) => Notice::error("Access denied", "You do not have permission to view this page."),
            ControllerError::Validation(e) => Notice::error("Invalid input", e.to_string()),
            ControllerError::NotFound(what) => Notice::error("Not found", format!("The requested {what} could not be found.")),
            other => Notice::error("Something went wrong", other.to_string()),
        }
    }

    /// Gateway error code, when the failure came from a backend call.
    pub fn code(&self) -> Option<u16> {
        match self {
            ControllerError::Api(e) => Some(e.code()),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

/// Transient user-facing notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), kind: NoticeKind::Success }
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), kind: NoticeKind::Warning }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), kind: NoticeKind::Error }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Result of an action: where to go next and what to tell the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub notice: Notice,
}

/// Root controller owning the store, the gateway and the directory client.
#[derive(Clone)]
pub struct App {
    api: ApiClient,
    directory: DirectoryClient,
}

impl App {
    pub fn new(api: ApiClient, directory: DirectoryClient) -> Self {
        Self { api, directory }
    }

    pub fn store(&self) -> &AppStore {
        self.api.store()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Evaluate the guard for an arbitrary path.
    pub fn navigate(&self, path: &str) -> (Route, Decision) {
        let route = Route::parse(path);
        let decision = guard::check(&route, &self.store().session());
        (route, decision)
    }

    fn enter(&self, route: &Route) -> Result<Session, ControllerError> {
        let session = self.store().session();
        match guard::check(route, &session) {
            Decision::Allow => Ok(session),
            Decision::Redirect(to) => Err(ControllerError::Redirect(to)),
        }
    }

    /// Await a gateway call; a rejected token ends the local session.
    async fn call<T>(&self, request: impl Future<Output = Result<T, ApiError>>) -> Result<T, ControllerError> {
        match request.await {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_unauthorized() {
                    warn!(error = %e, "token rejected; clearing local session");
                    if let Err(clear) = self.api.clear_session().await {
                        warn!(error = %clear, "failed to clear local session");
                    }
                }
                Err(e.into())
            }
        }
    }
}
