use models::User;
use serde::{Deserialize, Serialize};

/// Who is signed in. `is_authenticated` is true iff `user` is present,
/// except for documents rehydrated verbatim from storage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl Session {
    /// No validation: the caller guarantees `user` came from a trusted
    /// authentication response.
    pub fn login(&mut self, user: User) {
        self.user = Some(user);
        self.is_authenticated = true;
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.is_authenticated = false;
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str()).filter(|id| !id.is_empty())
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.user.as_ref().is_some_and(User::is_admin)
    }
}
