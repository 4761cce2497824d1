//! A single member of a RackConnect load balancer pool.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{NodeId, PoolId};
use crate::clock::format_timestamp;

/// Provisioning state of a pool node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeStatus {
    /// The node is being attached to the pool.
    Adding,
    /// The node is receiving traffic.
    Active,
    /// The node is being detached from the pool.
    Deleting,
    /// Provisioning failed; see `status_detail`.
    Error,
}

/// A pool member, normally backed by a cloud server.
///
/// `load_balancer_pool` refers back to the owning pool by id only; the pool
/// owns its nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancerPoolNode {
    /// Node identifier, unique within the owning pool.
    pub id: NodeId,
    /// Creation time. Never changes.
    pub created: DateTime<Utc>,
    /// Time of the last status change, if any.
    pub updated: Option<DateTime<Utc>>,
    /// Backing cloud server, or `None` for an external node.
    pub cloud_server_id: Option<String>,
    /// Owning pool.
    pub load_balancer_pool: PoolId,
    /// Current status.
    pub status: NodeStatus,
    /// Explanation of a non-`ACTIVE` status.
    pub status_detail: Option<String>,
}

/// `{"id": ...}` reference to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdRef {
    /// Referenced resource id.
    pub id: String,
}

/// Node representation used in listings and bulk operation results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NodeView {
    /// Node identifier.
    pub id: NodeId,
    /// ISO-8601 creation timestamp.
    pub created: String,
    /// ISO-8601 timestamp of the last update, or `null`.
    pub updated: Option<String>,
    /// Owning pool.
    pub load_balancer_pool: IdRef,
    /// Backing cloud server, or `null` for an external node.
    pub cloud_server: Option<IdRef>,
    /// Current status.
    pub status: NodeStatus,
    /// Explanation of a non-`ACTIVE` status, or `null`.
    pub status_detail: Option<String>,
}

impl LoadBalancerPoolNode {
    /// Creates a node that is still being attached to `pool`.
    #[must_use]
    pub fn adding(pool: PoolId, cloud_server_id: String, created: DateTime<Utc>) -> Self {
        Self {
            id: NodeId::generate(),
            created,
            updated: None,
            cloud_server_id: Some(cloud_server_id),
            load_balancer_pool: pool,
            status: NodeStatus::Adding,
            status_detail: None,
        }
    }

    /// Creates an already active node with a caller-chosen id.
    #[must_use]
    pub fn active(
        id: NodeId,
        pool: PoolId,
        cloud_server_id: Option<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            created,
            updated: None,
            cloud_server_id,
            load_balancer_pool: pool,
            status: NodeStatus::Active,
            status_detail: None,
        }
    }

    /// Returns `true` if the node is backed by a cloud server.
    #[must_use]
    pub fn is_cloud_server(&self) -> bool {
        self.cloud_server_id.is_some()
    }

    /// Moves the node to `status`, stamping `updated`.
    pub fn transition(&mut self, status: NodeStatus, detail: Option<String>, at: DateTime<Utc>) {
        self.status = status;
        self.status_detail = detail;
        self.updated = Some(at);
    }

    /// Short JSON form used in node listings and bulk results.
    #[must_use]
    pub fn short_json(&self) -> NodeView {
        NodeView {
            id: self.id.clone(),
            created: format_timestamp(&self.created),
            updated: self.updated.as_ref().map(format_timestamp),
            load_balancer_pool: IdRef {
                id: self.load_balancer_pool.to_string(),
            },
            cloud_server: self
                .cloud_server_id
                .as_ref()
                .map(|id| IdRef { id: id.clone() }),
            status: self.status,
            status_detail: self.status_detail.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap_or_default()
    }

    #[test]
    fn short_json_matches_listing_shape() {
        let node = LoadBalancerPoolNode::active(
            NodeId::from("node_0"),
            PoolId::from("pool_id"),
            Some("server_0".to_string()),
            DateTime::parse_from_rfc3339("2000-01-01T00:00:00Z")
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_default(),
        );
        let json = serde_json::to_value(node.short_json()).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "node_0",
                "created": "2000-01-01T00:00:00Z",
                "updated": null,
                "load_balancer_pool": {"id": "pool_id"},
                "cloud_server": {"id": "server_0"},
                "status": "ACTIVE",
                "status_detail": null
            })
        );
    }

    #[test]
    fn external_node_has_null_cloud_server() {
        let node =
            LoadBalancerPoolNode::active(NodeId::from("n"), PoolId::from("p"), None, at(0));
        assert!(!node.is_cloud_server());
        let json = serde_json::to_value(node.short_json()).unwrap_or_default();
        assert_eq!(json.get("cloud_server"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn adding_node_starts_in_adding() {
        let node = LoadBalancerPoolNode::adding(PoolId::from("p"), "7".to_string(), at(50));
        let view = node.short_json();
        assert_eq!(view.status, NodeStatus::Adding);
        assert_eq!(view.created, "1970-01-01T00:00:50Z");
        assert_eq!(view.updated, None);
        assert_eq!(view.cloud_server, Some(IdRef { id: "7".to_string() }));
    }

    #[test]
    fn transition_stamps_updated() {
        let mut node = LoadBalancerPoolNode::adding(PoolId::from("p"), "7".to_string(), at(0));
        node.transition(NodeStatus::Active, None, at(30));
        assert_eq!(node.status, NodeStatus::Active);
        assert_eq!(
            node.short_json().updated.as_deref(),
            Some("1970-01-01T00:00:30Z")
        );
        assert_eq!(node.created, at(0));
    }

    #[test]
    fn status_serializes_screaming_case() {
        let json = serde_json::to_string(&NodeStatus::Deleting).unwrap_or_default();
        assert_eq!(json, "\"DELETING\"");
    }
}
