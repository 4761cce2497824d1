//! Per-tenant, per-region store of RackConnect load balancer pools.
//!
//! A [`PoolRegistry`] is plain data: the caller (see
//! [`crate::session::SessionStore`]) wraps each registry in its own lock and
//! holds that lock for the whole of a bulk operation.

use chrono::{DateTime, Duration, Utc};

use super::load_balancer_pool::{LoadBalancerPool, PoolView};
use super::pool_node::{NodeStatus, NodeView};
use super::PoolId;
use crate::error::MimicError;

/// All pools belonging to one tenant in one region, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolRegistry {
    pools: Vec<LoadBalancerPool>,
}

impl PoolRegistry {
    /// Creates a registry holding `count` freshly generated default pools.
    #[must_use]
    pub fn seeded(count: usize) -> Self {
        Self {
            pools: (0..count).map(|_| LoadBalancerPool::seeded()).collect(),
        }
    }

    /// Returns `true` if the registry holds a pool with this id.
    #[must_use]
    pub fn contains(&self, id: &PoolId) -> bool {
        self.pools.iter().any(|p| &p.id == id)
    }

    /// Returns the pool with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::PoolNotFound`] if there is no such pool.
    pub fn get(&self, id: &PoolId) -> Result<&LoadBalancerPool, MimicError> {
        self.pools
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| MimicError::PoolNotFound(id.to_string()))
    }

    /// Returns the pool with the given id for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::PoolNotFound`] if there is no such pool.
    pub fn get_mut(&mut self, id: &PoolId) -> Result<&mut LoadBalancerPool, MimicError> {
        self.pools
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| MimicError::PoolNotFound(id.to_string()))
    }

    /// Pool ids in creation order.
    #[must_use]
    pub fn pool_ids(&self) -> Vec<PoolId> {
        self.pools.iter().map(|p| p.id.clone()).collect()
    }

    /// Full JSON of every pool.
    #[must_use]
    pub fn list(&self) -> Vec<PoolView> {
        self.pools.iter().map(LoadBalancerPool::as_json).collect()
    }

    /// Short JSON of every node in every pool, pool by pool.
    #[must_use]
    pub fn all_nodes(&self) -> Vec<NodeView> {
        self.pools
            .iter()
            .flat_map(LoadBalancerPool::nodes_json)
            .collect()
    }

    /// Promotes every `ADDING` node that has existed for at least `delay`
    /// to `ACTIVE`, stamping `updated` with `now`. Returns how many nodes
    /// changed.
    ///
    /// A node whose due time lies beyond the representable range never
    /// becomes due.
    pub fn activate_settled(&mut self, now: DateTime<Utc>, delay: Duration) -> usize {
        let mut promoted = 0;
        for node in self.pools.iter_mut().flat_map(|p| p.nodes.iter_mut()) {
            let due = node.created.checked_add_signed(delay);
            if node.status == NodeStatus::Adding && due.is_some_and(|due| due <= now) {
                node.transition(NodeStatus::Active, None, now);
                promoted += 1;
            }
        }
        promoted
    }
}
