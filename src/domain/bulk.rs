//! Bulk node add/remove against a single tenant/region registry.
//!
//! Both operations validate every item before touching any pool, so a batch
//! that fails validation leaves the registry exactly as it was.

use chrono::{DateTime, Utc};

use super::pool_node::{LoadBalancerPoolNode, NodeView};
use super::pool_registry::PoolRegistry;
use super::{NodeId, PoolId};
use crate::error::MimicError;

/// One item of a bulk node request: which pool, and which node on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTarget {
    /// Pool the node belongs (or will belong) to.
    pub pool: PoolId,
    /// Backing cloud server.
    pub cloud_server: Option<String>,
    /// Explicit node id. Only meaningful for removal.
    pub node: Option<NodeId>,
}

impl NodeTarget {
    /// Targets the node backed by `cloud_server` on `pool`.
    #[must_use]
    pub fn server_on_pool(cloud_server: impl Into<String>, pool: PoolId) -> Self {
        Self {
            pool,
            cloud_server: Some(cloud_server.into()),
            node: None,
        }
    }
}

/// Result of a bulk removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// Ids of the nodes that were removed, in request order.
    pub removed: Vec<NodeId>,
    /// Items that named an existing pool but matched no node.
    pub unresolved: usize,
}

/// Fails with [`MimicError::PoolNotFound`] for the first target whose pool
/// is not in `registry`.
fn ensure_pools_exist(registry: &PoolRegistry, targets: &[NodeTarget]) -> Result<(), MimicError> {
    match targets.iter().find(|t| !registry.contains(&t.pool)) {
        Some(missing) => Err(MimicError::PoolNotFound(missing.pool.to_string())),
        None => Ok(()),
    }
}

/// Creates one `ADDING` node per target, stamped with `now`.
///
/// Returns the new nodes' short JSON in request order.
///
/// # Errors
///
/// - [`MimicError::InvalidRequest`] if any item lacks a cloud server.
/// - [`MimicError::PoolNotFound`] if any item names an unknown pool.
///
/// On error no node is created.
pub fn add_nodes(
    registry: &mut PoolRegistry,
    targets: &[NodeTarget],
    now: DateTime<Utc>,
) -> Result<Vec<NodeView>, MimicError> {
    if targets.iter().any(|t| t.cloud_server.is_none()) {
        return Err(MimicError::InvalidRequest(
            "cloud_server.id is required for every node".to_string(),
        ));
    }
    ensure_pools_exist(registry, targets)?;

    let mut added = Vec::with_capacity(targets.len());
    for target in targets {
        let Some(server) = target.cloud_server.clone() else {
            continue;
        };
        let pool = registry.get_mut(&target.pool)?;
        let node = LoadBalancerPoolNode::adding(pool.id.clone(), server, now);
        added.push(node.short_json());
        pool.push_node(node);
    }
    Ok(added)
}

/// Removes the node each target resolves to.
///
/// A target resolves by explicit node id when one is given, otherwise by
/// cloud server. Targets on an existing pool that match nothing are counted
/// in [`RemoveOutcome::unresolved`] and otherwise ignored.
///
/// # Errors
///
/// - [`MimicError::InvalidRequest`] if an item names neither a node nor a
///   cloud server.
/// - [`MimicError::PoolNotFound`] if any item names an unknown pool.
///
/// On error no node is removed.
pub fn remove_nodes(
    registry: &mut PoolRegistry,
    targets: &[NodeTarget],
) -> Result<RemoveOutcome, MimicError> {
    if targets
        .iter()
        .any(|t| t.node.is_none() && t.cloud_server.is_none())
    {
        return Err(MimicError::InvalidRequest(
            "each node must identify a node id or a cloud_server.id".to_string(),
        ));
    }
    ensure_pools_exist(registry, targets)?;

    let mut outcome = RemoveOutcome::default();
    for target in targets {
        let pool = registry.get_mut(&target.pool)?;
        let resolved = match (&target.node, &target.cloud_server) {
            (Some(node_id), _) => pool.node_by_id(node_id),
            (None, Some(server)) => pool.node_by_cloud_server(server),
            (None, None) => None,
        }
        .map(|n| n.id.clone());

        match resolved.and_then(|id| pool.remove_node(&id)) {
            Some(node) => outcome.removed.push(node.id),
            None => outcome.unresolved += 1,
        }
    }
    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::pool_node::NodeStatus;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap_or_default()
    }

    fn registry_with(count: usize) -> (PoolRegistry, Vec<PoolId>) {
        let registry = PoolRegistry::seeded(count);
        let ids = registry.pool_ids();
        (registry, ids)
    }

    #[test]
    fn add_creates_adding_nodes_in_request_order() {
        let (mut registry, ids) = registry_with(2);
        let targets: Vec<NodeTarget> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| NodeTarget::server_on_pool(i.to_string(), id.clone()))
            .collect();

        let Ok(added) = add_nodes(&mut registry, &targets, at(50)) else {
            panic!("add failed");
        };
        assert_eq!(added.len(), 2);
        for (view, target) in added.iter().zip(&targets) {
            assert_eq!(view.status, NodeStatus::Adding);
            assert_eq!(view.created, "1970-01-01T00:00:50Z");
            assert_eq!(view.updated, None);
            assert_eq!(view.load_balancer_pool.id, target.pool.to_string());
            assert_eq!(
                view.cloud_server.as_ref().map(|c| c.id.clone()),
                target.cloud_server
            );
        }
        for id in &ids {
            let Ok(pool) = registry.get(id) else {
                panic!("pool missing");
            };
            assert_eq!(pool.node_counts().total, 1);
        }
    }

    #[test]
    fn listing_after_add_returns_exactly_the_added_nodes() {
        let (mut registry, ids) = registry_with(3);
        let targets: Vec<NodeTarget> = ids
            .iter()
            .rev()
            .map(|id| NodeTarget::server_on_pool("s", id.clone()))
            .collect();
        let Ok(added) = add_nodes(&mut registry, &targets, at(0)) else {
            panic!("add failed");
        };
        let added: HashSet<NodeId> = added.into_iter().map(|n| n.id).collect();
        let listed: HashSet<NodeId> = registry.all_nodes().into_iter().map(|n| n.id).collect();
        assert_eq!(added, listed);
    }

    #[test]
    fn add_with_unknown_pool_creates_nothing() {
        let (mut registry, ids) = registry_with(2);
        let mut targets: Vec<NodeTarget> = ids
            .iter()
            .map(|id| NodeTarget::server_on_pool("1", id.clone()))
            .collect();
        targets.push(NodeTarget::server_on_pool("2", PoolId::from("nope")));

        let before = registry.clone();
        let result = add_nodes(&mut registry, &targets, at(0));
        assert_eq!(result, Err(MimicError::PoolNotFound("nope".to_string())));
        assert_eq!(registry, before);
        assert!(registry.all_nodes().is_empty());
    }

    #[test]
    fn add_without_cloud_server_is_rejected() {
        let (mut registry, ids) = registry_with(1);
        let Some(id) = ids.first() else {
            panic!("no pool");
        };
        let targets = vec![NodeTarget {
            pool: id.clone(),
            cloud_server: None,
            node: None,
        }];
        let result = add_nodes(&mut registry, &targets, at(0));
        let Err(MimicError::InvalidRequest(_)) = result else {
            panic!("expected InvalidRequest");
        };
        assert!(registry.all_nodes().is_empty());
    }

    #[test]
    fn remove_by_cloud_server_empties_pools() {
        let (mut registry, ids) = registry_with(2);
        let targets: Vec<NodeTarget> = ids
            .iter()
            .map(|id| NodeTarget::server_on_pool("7", id.clone()))
            .collect();
        assert!(add_nodes(&mut registry, &targets, at(0)).is_ok());
        assert_eq!(registry.all_nodes().len(), 2);

        let Ok(outcome) = remove_nodes(&mut registry, &targets) else {
            panic!("remove failed");
        };
        assert_eq!(outcome.removed.len(), 2);
        assert_eq!(outcome.unresolved, 0);
        assert!(registry.all_nodes().is_empty());
    }

    #[test]
    fn remove_by_node_id() {
        let (mut registry, ids) = registry_with(1);
        let Some(pool_id) = ids.first().cloned() else {
            panic!("no pool");
        };
        let targets = vec![
            NodeTarget::server_on_pool("a", pool_id.clone()),
            NodeTarget::server_on_pool("a", pool_id.clone()),
        ];
        let Ok(added) = add_nodes(&mut registry, &targets, at(0)) else {
            panic!("add failed");
        };
        let Some(second) = added.get(1) else {
            panic!("second node missing");
        };

        let removal = vec![NodeTarget {
            pool: pool_id.clone(),
            cloud_server: None,
            node: Some(second.id.clone()),
        }];
        let Ok(outcome) = remove_nodes(&mut registry, &removal) else {
            panic!("remove failed");
        };
        assert_eq!(outcome.removed, vec![second.id.clone()]);

        let remaining: Vec<NodeId> = registry.all_nodes().into_iter().map(|n| n.id).collect();
        assert_eq!(remaining.len(), 1);
        assert!(!remaining.contains(&second.id));
    }

    #[test]
    fn remove_unmatched_node_is_a_no_op() {
        let (mut registry, ids) = registry_with(1);
        let Some(pool_id) = ids.first().cloned() else {
            panic!("no pool");
        };
        let targets = vec![NodeTarget::server_on_pool("ghost", pool_id)];
        let Ok(outcome) = remove_nodes(&mut registry, &targets) else {
            panic!("remove failed");
        };
        assert!(outcome.removed.is_empty());
        assert_eq!(outcome.unresolved, 1);
    }

    #[test]
    fn remove_with_unknown_pool_removes_nothing() {
        let (mut registry, ids) = registry_with(1);
        let Some(pool_id) = ids.first().cloned() else {
            panic!("no pool");
        };
        let targets = vec![NodeTarget::server_on_pool("1", pool_id.clone())];
        assert!(add_nodes(&mut registry, &targets, at(0)).is_ok());

        let removal = vec![
            NodeTarget::server_on_pool("1", pool_id),
            NodeTarget::server_on_pool("1", PoolId::from("X")),
        ];
        let result = remove_nodes(&mut registry, &removal);
        assert_eq!(result, Err(MimicError::PoolNotFound("X".to_string())));
        assert_eq!(registry.all_nodes().len(), 1);
    }
}
