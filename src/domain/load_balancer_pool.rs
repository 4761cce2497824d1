//! RackConnect V3 load balancer pool and its aggregate node counts.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::pool_node::{LoadBalancerPoolNode, NodeView};
use super::{NodeId, PoolId};

/// Operational status of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolStatus {
    /// The pool is serving traffic.
    Active,
    /// The pool is being provisioned.
    Adding,
    /// The pool is being torn down.
    Deleting,
    /// The pool is broken; see `status_detail`.
    Error,
}

/// A pool of backend nodes behind a virtual IP.
///
/// Nodes keep insertion order; listings return them in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancerPool {
    /// Pool identifier, unique within the tenant/region registry.
    pub id: PoolId,
    /// Pool name.
    pub name: String,
    /// Virtual IP address traffic is balanced behind.
    pub virtual_ip: String,
    /// Listening port.
    pub port: u16,
    /// Current status.
    pub status: PoolStatus,
    /// Explanation of a non-`ACTIVE` status.
    pub status_detail: Option<String>,
    /// Member nodes, in insertion order.
    pub nodes: Vec<LoadBalancerPoolNode>,
}

/// Node tallies reported with every pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct NodeCounts {
    /// Nodes backed by a cloud server.
    pub cloud_servers: usize,
    /// Nodes not backed by a cloud server.
    pub external: usize,
    /// `cloud_servers + external`.
    pub total: usize,
}

/// Full JSON representation of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PoolView {
    /// Pool identifier.
    pub id: PoolId,
    /// Pool name.
    pub name: String,
    /// Node tallies.
    pub node_counts: NodeCounts,
    /// Listening port.
    pub port: u16,
    /// Virtual IP address.
    pub virtual_ip: String,
    /// Current status.
    pub status: PoolStatus,
    /// Explanation of a non-`ACTIVE` status, or `null`.
    pub status_detail: Option<String>,
}

impl LoadBalancerPool {
    /// Default pool name.
    pub const DEFAULT_NAME: &'static str = "default";

    /// Default listening port.
    pub const DEFAULT_PORT: u16 = 80;

    /// Creates an empty, active pool with default name and port.
    #[must_use]
    pub fn new(id: PoolId, virtual_ip: impl Into<String>) -> Self {
        Self {
            id,
            name: Self::DEFAULT_NAME.to_string(),
            virtual_ip: virtual_ip.into(),
            port: Self::DEFAULT_PORT,
            status: PoolStatus::Active,
            status_detail: None,
            nodes: Vec::new(),
        }
    }

    /// Creates a default pool with a fresh id and a random `10.x.x.x`
    /// virtual IP.
    #[must_use]
    pub fn seeded() -> Self {
        let id = PoolId::generate();
        let bytes = uuid::Uuid::new_v4().into_bytes();
        let [a, b, c, ..] = bytes;
        Self::new(id, format!("10.{a}.{b}.{c}"))
    }

    /// Counts nodes by kind.
    #[must_use]
    pub fn node_counts(&self) -> NodeCounts {
        let cloud_servers = self.nodes.iter().filter(|n| n.is_cloud_server()).count();
        let external = self.nodes.len() - cloud_servers;
        NodeCounts {
            cloud_servers,
            external,
            total: cloud_servers + external,
        }
    }

    /// Full JSON form, including node counts.
    #[must_use]
    pub fn as_json(&self) -> PoolView {
        PoolView {
            id: self.id.clone(),
            name: self.name.clone(),
            node_counts: self.node_counts(),
            port: self.port,
            virtual_ip: self.virtual_ip.clone(),
            status: self.status,
            status_detail: self.status_detail.clone(),
        }
    }

    /// Short JSON of every node, in insertion order.
    #[must_use]
    pub fn nodes_json(&self) -> Vec<NodeView> {
        self.nodes.iter().map(LoadBalancerPoolNode::short_json).collect()
    }

    /// Returns the node with the given id.
    #[must_use]
    pub fn node_by_id(&self, id: &NodeId) -> Option<&LoadBalancerPoolNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Returns the first node backed by the given cloud server.
    #[must_use]
    pub fn node_by_cloud_server(&self, server_id: &str) -> Option<&LoadBalancerPoolNode> {
        self.nodes
            .iter()
            .find(|n| n.cloud_server_id.as_deref() == Some(server_id))
    }

    /// Appends a node.
    pub fn push_node(&mut self, node: LoadBalancerPoolNode) {
        self.nodes.push(node);
    }

    /// Removes and returns the node with the given id.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<LoadBalancerPoolNode> {
        let index = self.nodes.iter().position(|n| &n.id == id)?;
        Some(self.nodes.remove(index))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    fn created() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2000-01-01T00:00:00Z")
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_default()
    }

    fn pool_with_ten_nodes() -> LoadBalancerPool {
        let mut pool = LoadBalancerPool::new(PoolId::from("pool_id"), "10.0.0.1");
        for i in 0..10 {
            pool.push_node(LoadBalancerPoolNode::active(
                NodeId::from(format!("node_{i}")),
                pool.id.clone(),
                Some(format!("server_{i}")),
                created(),
            ));
        }
        pool
    }

    #[test]
    fn as_json_reports_counts_and_defaults() {
        let pool = pool_with_ten_nodes();
        let json = serde_json::to_value(pool.as_json()).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "pool_id",
                "name": "default",
                "node_counts": {
                    "cloud_servers": 10,
                    "external": 0,
                    "total": 10
                },
                "port": 80,
                "virtual_ip": "10.0.0.1",
                "status": "ACTIVE",
                "status_detail": null
            })
        );
    }

    #[test]
    fn external_nodes_are_counted_separately() {
        let mut pool = pool_with_ten_nodes();
        pool.push_node(LoadBalancerPoolNode::active(
            NodeId::from("external"),
            pool.id.clone(),
            None,
            created(),
        ));
        assert_eq!(
            pool.node_counts(),
            NodeCounts {
                cloud_servers: 10,
                external: 1,
                total: 11
            }
        );
    }

    #[test]
    fn find_node_by_id() {
        let pool = pool_with_ten_nodes();
        let Some(node) = pool.node_by_id(&NodeId::from("node_5")) else {
            panic!("node_5 missing");
        };
        assert_eq!(node.cloud_server_id.as_deref(), Some("server_5"));
        assert!(pool.node_by_id(&NodeId::from("node_99")).is_none());
    }

    #[test]
    fn find_node_by_cloud_server() {
        let pool = pool_with_ten_nodes();
        let Some(node) = pool.node_by_cloud_server("server_3") else {
            panic!("server_3 missing");
        };
        assert_eq!(node.id, NodeId::from("node_3"));
        assert!(pool.node_by_cloud_server("server_42").is_none());
    }

    #[test]
    fn remove_node_keeps_order() {
        let mut pool = pool_with_ten_nodes();
        let removed = pool.remove_node(&NodeId::from("node_2"));
        assert!(removed.is_some());
        let ids: Vec<String> = pool.nodes.iter().take(3).map(|n| n.id.to_string()).collect();
        assert_eq!(ids, vec!["node_0", "node_1", "node_3"]);
        assert!(pool.remove_node(&NodeId::from("node_2")).is_none());
    }

    #[test]
    fn seeded_pools_are_distinct_and_empty() {
        let a = LoadBalancerPool::seeded();
        let b = LoadBalancerPool::seeded();
        assert_ne!(a.id, b.id);
        assert!(a.virtual_ip.starts_with("10."));
        assert_eq!(a.node_counts(), NodeCounts::default());
    }
}
