//! Per-tenant, per-region state store.
//!
//! [`SessionStore`] lazily creates one value per `(tenant, region)` pair the
//! first time it is asked for, using the seed function it was built with.
//! Each value sits behind its own [`tokio::sync::Mutex`], so operations on
//! different tenants or regions run concurrently while a bulk operation on
//! one registry sees no interleaved writes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

/// Key identifying one tenant's state in one region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TenantRegion {
    /// Tenant id from the request path.
    pub tenant_id: String,
    /// Region name, e.g. `ORD`.
    pub region: String,
}

impl TenantRegion {
    /// Creates a key.
    #[must_use]
    pub fn new(tenant_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            region: region.into(),
        }
    }
}

impl fmt::Display for TenantRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant_id, self.region)
    }
}

type Seed<T> = Box<dyn Fn(&TenantRegion) -> T + Send + Sync>;

/// Lazily populated map from [`TenantRegion`] to shared, lockable state.
pub struct SessionStore<T> {
    sessions: RwLock<HashMap<TenantRegion, Arc<Mutex<T>>>>,
    seed: Seed<T>,
}

impl<T> SessionStore<T> {
    /// Creates an empty store that builds new entries with `seed`.
    #[must_use]
    pub fn new(seed: impl Fn(&TenantRegion) -> T + Send + Sync + 'static) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            seed: Box::new(seed),
        }
    }

    /// Returns the state for `key`, creating it on first access.
    pub async fn session(&self, key: &TenantRegion) -> Arc<Mutex<T>> {
        if let Some(existing) = self.sessions.read().await.get(key) {
            return Arc::clone(existing);
        }
        let mut map = self.sessions.write().await;
        let entry = map.entry(key.clone()).or_insert_with(|| {
            tracing::debug!(tenant_id = %key.tenant_id, region = %key.region, "creating session");
            Arc::new(Mutex::new((self.seed)(key)))
        });
        Arc::clone(entry)
    }
}

impl<T> fmt::Debug for SessionStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
