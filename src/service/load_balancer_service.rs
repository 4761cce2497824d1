//! Cloud Load Balancers (v1) service.

use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;

use super::ensure_region;
use crate::clock::Clock;
use crate::domain::load_balancer::{LbNode, LoadBalancerSpec, LoadBalancerView, NodeSpec};
use crate::domain::LoadBalancerRegistry;
use crate::error::MimicError;
use crate::session::{SessionStore, TenantRegion};

/// Stateful Cloud Load Balancers mock.
#[derive(Debug)]
pub struct LoadBalancerService {
    regions: Vec<String>,
    max_nodes: usize,
    store: SessionStore<LoadBalancerRegistry>,
    clock: Arc<dyn Clock>,
}

impl LoadBalancerService {
    /// Creates the service.
    #[must_use]
    pub fn new(regions: Vec<String>, max_nodes: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            regions,
            max_nodes,
            store: SessionStore::new(|_: &TenantRegion| LoadBalancerRegistry::new()),
            clock,
        }
    }

    async fn registry(
        &self,
        tenant_id: &str,
        region: &str,
    ) -> Result<OwnedMutexGuard<LoadBalancerRegistry>, MimicError> {
        ensure_region(&self.regions, region)?;
        let key = TenantRegion::new(tenant_id, region);
        Ok(self.store.session(&key).await.lock_owned().await)
    }

    /// Creates a load balancer.
    ///
    /// # Errors
    ///
    /// See [`LoadBalancerRegistry::create`]; also
    /// [`MimicError::RegionNotFound`].
    pub async fn create(
        &self,
        tenant_id: &str,
        region: &str,
        spec: &LoadBalancerSpec,
    ) -> Result<LoadBalancerView, MimicError> {
        let mut registry = self.registry(tenant_id, region).await?;
        let lb = registry.create(spec, self.clock.now(), self.max_nodes)?;
        tracing::info!(tenant_id, region, lb_id = lb.id, name = %lb.name, "load balancer created");
        Ok(lb.as_json())
    }

    /// Lists load balancers.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::RegionNotFound`] for an unknown region.
    pub async fn list(
        &self,
        tenant_id: &str,
        region: &str,
    ) -> Result<Vec<LoadBalancerView>, MimicError> {
        Ok(self.registry(tenant_id, region).await?.list())
    }

    /// Returns one load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::LoadBalancerNotFound`] or
    /// [`MimicError::RegionNotFound`].
    pub async fn get(
        &self,
        tenant_id: &str,
        region: &str,
        lb_id: u32,
    ) -> Result<LoadBalancerView, MimicError> {
        let registry = self.registry(tenant_id, region).await?;
        Ok(registry.get(lb_id)?.as_json())
    }

    /// Deletes a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::LoadBalancerNotFound`] or
    /// [`MimicError::RegionNotFound`].
    pub async fn delete(&self, tenant_id: &str, region: &str, lb_id: u32) -> Result<(), MimicError> {
        let mut registry = self.registry(tenant_id, region).await?;
        registry.delete(lb_id)?;
        tracing::info!(tenant_id, region, lb_id, "load balancer deleted");
        Ok(())
    }

    /// Adds nodes to a load balancer.
    ///
    /// # Errors
    ///
    /// See [`LoadBalancerRegistry::add_nodes`]; also
    /// [`MimicError::RegionNotFound`].
    pub async fn add_nodes(
        &self,
        tenant_id: &str,
        region: &str,
        lb_id: u32,
        specs: &[NodeSpec],
    ) -> Result<Vec<LbNode>, MimicError> {
        let mut registry = self.registry(tenant_id, region).await?;
        let added = registry
            .add_nodes(lb_id, specs, self.clock.now(), self.max_nodes)
            .inspect_err(|e| {
                tracing::warn!(tenant_id, region, lb_id, error = %e, "node add rejected");
            })?;
        tracing::info!(tenant_id, region, lb_id, added = added.len(), "load balancer nodes added");
        Ok(added)
    }

    /// Lists the nodes of a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::LoadBalancerNotFound`] or
    /// [`MimicError::RegionNotFound`].
    pub async fn nodes(
        &self,
        tenant_id: &str,
        region: &str,
        lb_id: u32,
    ) -> Result<Vec<LbNode>, MimicError> {
        let registry = self.registry(tenant_id, region).await?;
        Ok(registry.nodes(lb_id)?.to_vec())
    }

    /// Returns one node of a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::LoadBalancerNotFound`],
    /// [`MimicError::NodeNotFound`] or [`MimicError::RegionNotFound`].
    pub async fn node(
        &self,
        tenant_id: &str,
        region: &str,
        lb_id: u32,
        node_id: u32,
    ) -> Result<LbNode, MimicError> {
        let registry = self.registry(tenant_id, region).await?;
        Ok(registry.node(lb_id, node_id)?.clone())
    }

    /// Removes one node from a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::LoadBalancerNotFound`],
    /// [`MimicError::NodeNotFound`] or [`MimicError::RegionNotFound`].
    pub async fn delete_node(
        &self,
        tenant_id: &str,
        region: &str,
        lb_id: u32,
        node_id: u32,
    ) -> Result<(), MimicError> {
        let mut registry = self.registry(tenant_id, region).await?;
        registry.delete_node(lb_id, node_id, self.clock.now())?;
        tracing::info!(tenant_id, region, lb_id, node_id, "load balancer node deleted");
        Ok(())
    }
}
