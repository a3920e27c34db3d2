//! Application state
//!
//! [`AppStore`] owns the session and the domain cache. Every mutator writes
//! the whole document through [`StatePersistence`] before the new state is
//! published to subscribers, so the persisted document and the live state
//! only ever differ while a mutator is running.

pub mod cache;
pub mod persistence;
pub mod session;

use std::sync::Arc;

use chrono::NaiveDate;
use models::{Claim, ClaimPatch, Policy, PolicyPatch, User};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::errors::ServiceError;

pub use cache::DomainCache;
pub use persistence::{StatePersistence, StoragePersistence, STATE_VERSION};
pub use session::Session;

/// Window used by dashboards for "upcoming renewal".
pub const RENEWAL_WINDOW_DAYS: i64 = 30;

/// Everything the store holds, as persisted:
/// `{ user, isAuthenticated, policies, claims }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSnapshot {
    #[serde(flatten)]
    pub session: Session,
    #[serde(flatten)]
    pub cache: DomainCache,
}

struct StoreInner {
    tx: watch::Sender<AppSnapshot>,
    persistence: Arc<dyn StatePersistence>,
    // serializes clone -> modify -> save -> publish
    write_lock: Mutex<()>,
}

/// Shared handle to the application state. Cheap to clone.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<StoreInner>,
}

impl AppStore {
    /// Start from `initial` without reading persistence.
    pub fn new(initial: AppSnapshot, persistence: Arc<dyn StatePersistence>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { inner: Arc::new(StoreInner { tx, persistence, write_lock: Mutex::new(()) }) }
    }

    /// Rehydrate from persistence. The document is trusted as is: no token
    /// freshness check and no normalization. An unreadable document is
    /// logged and the store starts anonymous.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::state::{AppStore, StoragePersistence};
    /// use service::storage::MemoryStorage;
    /// let persistence = Arc::new(StoragePersistence::new(Arc::new(MemoryStorage::new())));
    /// let store = tokio_test::block_on(AppStore::open(persistence)).unwrap();
    /// assert!(!store.is_authenticated());
    /// assert!(store.policies().is_empty());
    /// ```
    pub async fn open(persistence: Arc<dyn StatePersistence>) -> Result<Self, ServiceError> {
        let initial = match persistence.load().await {
            Ok(Some(snapshot)) => {
                debug!(
                    authenticated = snapshot.session.is_authenticated,
                    policies = snapshot.cache.policies.len(),
                    claims = snapshot.cache.claims.len(),
                    "state rehydrated"
                );
                snapshot
            }
            Ok(None) => AppSnapshot::default(),
            Err(ServiceError::Serialization(e)) => {
                warn!(error = %e, "persisted state unreadable; starting anonymous");
                AppSnapshot::default()
            }
            Err(e) => return Err(e),
        };
        Ok(Self::new(initial, persistence))
    }

    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.inner.tx.subscribe()
    }

    pub fn snapshot(&self) -> AppSnapshot {
        self.inner.tx.borrow().clone()
    }

    pub fn session(&self) -> Session {
        self.inner.tx.borrow().session.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.tx.borrow().session.user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.tx.borrow().session.is_authenticated
    }

    pub fn policies(&self) -> Vec<Policy> {
        self.inner.tx.borrow().cache.policies.clone()
    }

    pub fn claims(&self) -> Vec<Claim> {
        self.inner.tx.borrow().cache.claims.clone()
    }

    pub fn policy(&self, id: &str) -> Option<Policy> {
        self.inner.tx.borrow().cache.policy(id).cloned()
    }

    pub fn upcoming_renewals(&self, today: NaiveDate) -> Vec<Policy> {
        self.inner
            .tx
            .borrow()
            .cache
            .upcoming_renewals(today, RENEWAL_WINDOW_DAYS)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The single authoritative source of the signed-in user id: the
    /// persisted state document.
    pub async fn persisted_user_id(&self) -> Result<Option<String>, ServiceError> {
        match self.inner.persistence.load().await {
            Ok(snapshot) => Ok(snapshot.and_then(|s| s.session.user_id().map(str::to_owned))),
            Err(ServiceError::Serialization(e)) => {
                warn!(error = %e, "persisted state unreadable while resolving user id");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn mutate<R>(&self, op: &str, f: impl FnOnce(&mut AppSnapshot) -> R) -> Result<R, ServiceError> {
        let _guard = self.inner.write_lock.lock().await;
        let mut next = self.inner.tx.borrow().clone();
        let out = f(&mut next);
        self.inner.persistence.save(&next).await?;
        self.inner.tx.send_replace(next);
        debug!(op, "state mutated");
        Ok(out)
    }

    pub async fn login(&self, user: User) -> Result<(), ServiceError> {
        self.mutate("login", |s| s.session.login(user)).await
    }

    pub async fn logout(&self) -> Result<(), ServiceError> {
        self.mutate("logout", |s| s.session.logout()).await
    }

    pub async fn add_policies(&self, policies: Vec<Policy>) -> Result<usize, ServiceError> {
        self.mutate("add_policies", |s| s.cache.add_policies(policies)).await
    }

    pub async fn update_policy(&self, id: &str, patch: PolicyPatch) -> Result<bool, ServiceError> {
        self.mutate("update_policy", |s| s.cache.update_policy(id, patch)).await
    }

    pub async fn remove_policy(&self, id: &str) -> Result<bool, ServiceError> {
        self.mutate("remove_policy", |s| s.cache.remove_policy(id)).await
    }

    pub async fn add_claims(&self, claims: Vec<Claim>) -> Result<usize, ServiceError> {
        self.mutate("add_claims", |s| s.cache.add_claims(claims)).await
    }

    pub async fn update_claim(&self, id: &str, patch: ClaimPatch) -> Result<bool, ServiceError> {
        self.mutate("update_claim", |s| s.cache.update_claim(id, patch)).await
    }

    pub async fn remove_claim(&self, id: &str) -> Result<bool, ServiceError> {
        self.mutate("remove_claim", |s| s.cache.remove_claim(id)).await
    }

    pub async fn sync_policies(&self, fetched: Vec<Policy>) -> Result<(usize, usize), ServiceError> {
        self.mutate("sync_policies", |s| s.cache.sync_policies(fetched)).await
    }

    pub async fn sync_claims(&self, fetched: Vec<Claim>) -> Result<(usize, usize), ServiceError> {
        self.mutate("sync_claims", |s| s.cache.sync_claims(fetched)).await
    }
}
