//! RackConnect V3 service: pool lookups and bulk node operations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OwnedMutexGuard;

use super::ensure_region;
use crate::clock::Clock;
use crate::domain::{bulk, NodeTarget, NodeView, PoolId, PoolRegistry, PoolView, RemoveOutcome};
use crate::error::MimicError;
use crate::session::{SessionStore, TenantRegion};

/// Construction-time settings for [`RackConnectService`].
#[derive(Debug, Clone)]
pub struct RackConnectConfig {
    /// Regions the service answers in.
    pub regions: Vec<String>,
    /// Pools seeded into every new tenant/region registry.
    pub default_pools: usize,
    /// Age at which `ADDING` nodes become `ACTIVE`. `None` disables it.
    pub node_activation: Option<Duration>,
}

impl Default for RackConnectConfig {
    fn default() -> Self {
        Self {
            regions: vec!["ORD".to_string()],
            default_pools: 1,
            node_activation: None,
        }
    }
}

/// Stateful RackConnect V3 mock.
///
/// Every call resolves the tenant/region registry (seeding it on first use),
/// locks it for the duration of the call, and applies any due `ADDING` →
/// `ACTIVE` promotions before reading or writing.
#[derive(Debug)]
pub struct RackConnectService {
    regions: Vec<String>,
    node_activation: Option<chrono::Duration>,
    store: SessionStore<PoolRegistry>,
    clock: Arc<dyn Clock>,
}

impl RackConnectService {
    /// Creates the service.
    ///
    /// An activation delay too large for a date-time offset is kept as the
    /// largest one, so such nodes stay `ADDING`.
    #[must_use]
    pub fn new(config: RackConnectConfig, clock: Arc<dyn Clock>) -> Self {
        let default_pools = config.default_pools;
        let node_activation = config.node_activation.map(|d| {
            chrono::Duration::from_std(d).unwrap_or_else(|_| {
                tracing::warn!(
                    requested_secs = d.as_secs(),
                    "node activation delay out of range, nodes will stay ADDING"
                );
                chrono::Duration::MAX
            })
        });
        Self {
            regions: config.regions,
            node_activation,
            store: SessionStore::new(move |key: &TenantRegion| {
                tracing::info!(
                    tenant_id = %key.tenant_id,
                    region = %key.region,
                    pools = default_pools,
                    "seeding load balancer pools"
                );
                PoolRegistry::seeded(default_pools)
            }),
            clock,
        }
    }

    /// Regions this service answers in.
    #[must_use]
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Locks the registry for `tenant_id` in `region`, creating it if needed.
    async fn registry(
        &self,
        tenant_id: &str,
        region: &str,
    ) -> Result<OwnedMutexGuard<PoolRegistry>, MimicError> {
        ensure_region(&self.regions, region)?;
        let key = TenantRegion::new(tenant_id, region);
        let mut registry = self.store.session(&key).await.lock_owned().await;
        if let Some(delay) = self.node_activation {
            let promoted = registry.activate_settled(self.clock.now(), delay);
            if promoted > 0 {
                tracing::debug!(tenant_id, region, promoted, "pool nodes became active");
            }
        }
        Ok(registry)
    }

    /// Lists every pool.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::RegionNotFound`] for an unknown region.
    pub async fn list_pools(
        &self,
        tenant_id: &str,
        region: &str,
    ) -> Result<Vec<PoolView>, MimicError> {
        Ok(self.registry(tenant_id, region).await?.list())
    }

    /// Ids of every pool, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::RegionNotFound`] for an unknown region.
    pub async fn pool_ids(&self, tenant_id: &str, region: &str) -> Result<Vec<PoolId>, MimicError> {
        Ok(self.registry(tenant_id, region).await?.pool_ids())
    }

    /// Returns one pool.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::PoolNotFound`] if the pool does not exist, or
    /// [`MimicError::RegionNotFound`] for an unknown region.
    pub async fn get_pool(
        &self,
        tenant_id: &str,
        region: &str,
        pool_id: &PoolId,
    ) -> Result<PoolView, MimicError> {
        let registry = self.registry(tenant_id, region).await?;
        let pool = registry.get(pool_id).inspect_err(|_| {
            tracing::debug!(tenant_id, region, %pool_id, "pool lookup missed");
        })?;
        Ok(pool.as_json())
    }

    /// Lists the nodes of one pool.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::PoolNotFound`] if the pool does not exist, or
    /// [`MimicError::RegionNotFound`] for an unknown region.
    pub async fn pool_nodes(
        &self,
        tenant_id: &str,
        region: &str,
        pool_id: &PoolId,
    ) -> Result<Vec<NodeView>, MimicError> {
        let registry = self.registry(tenant_id, region).await?;
        Ok(registry.get(pool_id)?.nodes_json())
    }

    /// Lists the nodes of every pool.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::RegionNotFound`] for an unknown region.
    pub async fn all_nodes(
        &self,
        tenant_id: &str,
        region: &str,
    ) -> Result<Vec<NodeView>, MimicError> {
        Ok(self.registry(tenant_id, region).await?.all_nodes())
    }

    /// Adds nodes to pools, all or nothing.
    ///
    /// # Errors
    ///
    /// See [`bulk::add_nodes`]; also [`MimicError::RegionNotFound`].
    pub async fn add_nodes(
        &self,
        tenant_id: &str,
        region: &str,
        targets: &[NodeTarget],
    ) -> Result<Vec<NodeView>, MimicError> {
        let mut registry = self.registry(tenant_id, region).await?;
        let now = self.clock.now();
        match bulk::add_nodes(&mut registry, targets, now) {
            Ok(added) => {
                tracing::info!(tenant_id, region, added = added.len(), "pool nodes added");
                Ok(added)
            }
            Err(e) => {
                tracing::warn!(tenant_id, region, error = %e, "bulk node add rejected");
                Err(e)
            }
        }
    }

    /// Removes nodes from pools.
    ///
    /// # Errors
    ///
    /// See [`bulk::remove_nodes`]; also [`MimicError::RegionNotFound`].
    pub async fn remove_nodes(
        &self,
        tenant_id: &str,
        region: &str,
        targets: &[NodeTarget],
    ) -> Result<RemoveOutcome, MimicError> {
        let mut registry = self.registry(tenant_id, region).await?;
        match bulk::remove_nodes(&mut registry, targets) {
            Ok(outcome) => {
                tracing::info!(
                    tenant_id,
                    region,
                    removed = outcome.removed.len(),
                    "pool nodes removed"
                );
                if outcome.unresolved > 0 {
                    tracing::debug!(
                        tenant_id,
                        region,
                        unresolved = outcome.unresolved,
                        "bulk node removal matched nothing for some items"
                    );
                }
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(tenant_id, region, error = %e, "bulk node removal rejected");
                Err(e)
            }
        }
    }
}
