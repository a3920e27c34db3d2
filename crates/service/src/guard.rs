//! Routes and the access rules in front of them.

use std::fmt;

use models::User;

use crate::state::Session;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    Unauthorized,
    Dashboard,
    Policies,
    Policy(String),
    Purchase,
    Claims,
    SubmitClaim(Option<String>),
    Profile,
    AdminDashboard,
    AdminUsers,
    NotFound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(Route),
}

impl Route {
    /// Map a path to its route; anything unknown is [`Route::NotFound`].
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Landing,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["unauthorized"] => Route::Unauthorized,
            ["dashboard"] => Route::Dashboard,
            ["insurance"] => Route::Policies,
            ["insurance", "purchase"] => Route::Purchase,
            ["insurance", id] => Route::Policy((*id).to_string()),
            ["claims"] => Route::Claims,
            ["claims", "new"] => Route::SubmitClaim(None),
            ["claims", "new", policy_id] => Route::SubmitClaim(Some((*policy_id).to_string())),
            ["profile"] => Route::Profile,
            ["admin", "dashboard"] => Route::AdminDashboard,
            ["admin", "users"] => Route::AdminUsers,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".into(),
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::Unauthorized => "/unauthorized".into(),
            Route::Dashboard => "/dashboard".into(),
            Route::Policies => "/insurance".into(),
            Route::Policy(id) => format!("/insurance/{id}"),
            Route::Purchase => "/insurance/purchase".into(),
            Route::Claims => "/claims".into(),
            Route::SubmitClaim(None) => "/claims/new".into(),
            Route::SubmitClaim(Some(policy_id)) => format!("/claims/new/{policy_id}"),
            Route::Profile => "/profile".into(),
            Route::AdminDashboard => "/admin/dashboard".into(),
            Route::AdminUsers => "/admin/users".into(),
            Route::NotFound => "/404".into(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Landing | Route::Login | Route::Register | Route::Unauthorized | Route::NotFound => Access::Public,
            Route::AdminDashboard | Route::AdminUsers => Access::Admin,
            _ => Access::Authenticated,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub fn check(route: &Route, session: &Session) -> Decision {
    match route.access() {
        Access::Public => Decision::Allow,
        Access::Authenticated if !session.is_authenticated => Decision::Redirect(Route::Login),
        Access::Authenticated => Decision::Allow,
        Access::Admin if !session.is_authenticated => Decision::Redirect(Route::Login),
        Access::Admin if !session.is_admin() => Decision::Redirect(Route::Unauthorized),
        Access::Admin => Decision::Allow,
    }
}

/// Where a user lands after signing in.
pub fn home_route(user: &User) -> Route {
    if user.is_admin() {
        Route::AdminDashboard
    } else {
        Route::Dashboard
    }
}
