//! Cloud Load Balancers (v1) model: load balancers and their nodes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::clock::format_timestamp;
use crate::error::MimicError;

/// Load balancer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadBalancerStatus {
    /// Configured and serving.
    Active,
    /// Being provisioned.
    Build,
    /// A configuration change is in flight.
    PendingUpdate,
    /// Being deleted.
    PendingDelete,
    /// Provisioning failed.
    Error,
}

/// Whether a node receives traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeCondition {
    /// Receives traffic.
    #[default]
    Enabled,
    /// Receives no traffic.
    Disabled,
    /// Finishes existing connections, accepts no new ones.
    Draining,
}

/// Node role within the load balancer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    /// Serves traffic normally.
    #[default]
    Primary,
    /// Only serves when all primaries are down.
    Secondary,
}

/// Node as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct NodeSpec {
    /// Backend IP address.
    pub address: String,
    /// Backend port.
    pub port: u16,
    /// Traffic condition.
    #[serde(default)]
    pub condition: NodeCondition,
    /// Weight for weighted algorithms.
    #[serde(default)]
    pub weight: Option<u32>,
    /// Node role.
    #[serde(default, rename = "type")]
    pub node_type: NodeType,
}

/// Virtual IP as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VirtualIpSpec {
    /// `PUBLIC` or `SERVICENET`.
    #[serde(rename = "type", default = "default_vip_type")]
    pub vip_type: String,
}

fn default_vip_type() -> String {
    "PUBLIC".to_string()
}

fn default_protocol() -> String {
    "HTTP".to_string()
}

const fn default_port() -> u16 {
    80
}

fn default_algorithm() -> String {
    "RANDOM".to_string()
}

/// Load balancer as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerSpec {
    /// Display name.
    pub name: String,
    /// Protocol, e.g. `HTTP`.
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Listening port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Balancing algorithm.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Virtual IPs to allocate. One public IP when empty.
    #[serde(default)]
    pub virtual_ips: Vec<VirtualIpSpec>,
    /// Initial nodes.
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

/// An allocated virtual IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VirtualIp {
    /// Virtual IP id.
    pub id: u32,
    /// Allocated address.
    pub address: String,
    /// `PUBLIC` or `SERVICENET`.
    #[serde(rename = "type")]
    pub vip_type: String,
    /// Always `IPV4`.
    pub ip_version: String,
}

/// A backend node of a load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LbNode {
    /// Node id, unique within the load balancer.
    pub id: u32,
    /// Backend IP address.
    pub address: String,
    /// Backend port.
    pub port: u16,
    /// Traffic condition.
    pub condition: NodeCondition,
    /// Weight, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    /// Node role.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Health as seen by the load balancer. Always `ONLINE` here.
    pub status: String,
}

/// `{"time": ...}` timestamp wrapper used by this API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimeRef {
    /// ISO-8601 timestamp.
    pub time: String,
}

/// A load balancer and everything configured on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancer {
    /// Load balancer id, unique within the tenant/region.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Protocol.
    pub protocol: String,
    /// Listening port.
    pub port: u16,
    /// Balancing algorithm.
    pub algorithm: String,
    /// Current status.
    pub status: LoadBalancerStatus,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Time of the last change.
    pub updated: DateTime<Utc>,
    /// Allocated virtual IPs.
    pub virtual_ips: Vec<VirtualIp>,
    /// Backend nodes, in insertion order.
    pub nodes: Vec<LbNode>,
    next_node_id: u32,
}

/// JSON form of a [`LoadBalancer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerView {
    /// Load balancer id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Protocol.
    pub protocol: String,
    /// Listening port.
    pub port: u16,
    /// Balancing algorithm.
    pub algorithm: String,
    /// Current status.
    pub status: LoadBalancerStatus,
    /// Creation time.
    pub created: TimeRef,
    /// Time of the last change.
    pub updated: TimeRef,
    /// Allocated virtual IPs.
    pub virtual_ips: Vec<VirtualIp>,
    /// Backend nodes.
    pub nodes: Vec<LbNode>,
    /// Number of backend nodes.
    pub node_count: usize,
}

impl LoadBalancer {
    /// Returns the node with the given id.
    #[must_use]
    pub fn node(&self, node_id: u32) -> Option<&LbNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    /// JSON form of this load balancer.
    #[must_use]
    pub fn as_json(&self) -> LoadBalancerView {
        LoadBalancerView {
            id: self.id,
            name: self.name.clone(),
            protocol: self.protocol.clone(),
            port: self.port,
            algorithm: self.algorithm.clone(),
            status: self.status,
            created: TimeRef {
                time: format_timestamp(&self.created),
            },
            updated: TimeRef {
                time: format_timestamp(&self.updated),
            },
            virtual_ips: self.virtual_ips.clone(),
            nodes: self.nodes.clone(),
            node_count: self.nodes.len(),
        }
    }

    /// Checks that `specs` can be added without duplicating an address/port
    /// pair or exceeding `max_nodes`.
    fn check_new_nodes(&self, specs: &[NodeSpec], max_nodes: usize) -> Result<(), MimicError> {
        if self.nodes.len() + specs.len() > max_nodes {
            return Err(MimicError::OverLimit(format!(
                "Nodes must not exceed {max_nodes} per load balancer."
            )));
        }
        let mut seen: Vec<(&str, u16)> = self
            .nodes
            .iter()
            .map(|n| (n.address.as_str(), n.port))
            .collect();
        for spec in specs {
            let key = (spec.address.as_str(), spec.port);
            if seen.contains(&key) {
                return Err(MimicError::DuplicateNodes);
            }
            seen.push(key);
        }
        Ok(())
    }

    fn push_nodes(&mut self, specs: &[NodeSpec]) -> Vec<LbNode> {
        let mut added = Vec::with_capacity(specs.len());
        for spec in specs {
            self.next_node_id += 1;
            let node = LbNode {
                id: self.next_node_id,
                address: spec.address.clone(),
                port: spec.port,
                condition: spec.condition,
                weight: spec.weight,
                node_type: spec.node_type,
                status: "ONLINE".to_string(),
            };
            added.push(node.clone());
            self.nodes.push(node);
        }
        added
    }
}

/// All cloud load balancers of one tenant in one region.
///
/// Ids are handed out sequentially starting at 1 and never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadBalancerRegistry {
    load_balancers: BTreeMap<u32, LoadBalancer>,
    last_id: u32,
}

impl LoadBalancerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a load balancer from `spec`.
    ///
    /// # Errors
    ///
    /// - [`MimicError::InvalidRequest`] if the name is blank.
    /// - [`MimicError::OverLimit`] / [`MimicError::DuplicateNodes`] if the
    ///   initial nodes are invalid.
    pub fn create(
        &mut self,
        spec: &LoadBalancerSpec,
        now: DateTime<Utc>,
        max_nodes: usize,
    ) -> Result<&LoadBalancer, MimicError> {
        if spec.name.trim().is_empty() {
            return Err(MimicError::InvalidRequest(
                "Load balancer name is required".to_string(),
            ));
        }

        let id = self.last_id + 1;
        let vip_specs = if spec.virtual_ips.is_empty() {
            vec![VirtualIpSpec {
                vip_type: default_vip_type(),
            }]
        } else {
            spec.virtual_ips.clone()
        };
        let virtual_ips = vip_specs
            .iter()
            .zip(1u32..)
            .map(|(vip, n)| VirtualIp {
                id: id * 10 + n,
                address: format!("10.69.{}.{}", id / 250, (id % 250) + n),
                vip_type: vip.vip_type.clone(),
                ip_version: "IPV4".to_string(),
            })
            .collect();

        let mut lb = LoadBalancer {
            id,
            name: spec.name.clone(),
            protocol: spec.protocol.clone(),
            port: spec.port,
            algorithm: spec.algorithm.clone(),
            status: LoadBalancerStatus::Active,
            created: now,
            updated: now,
            virtual_ips,
            nodes: Vec::new(),
            next_node_id: 0,
        };
        lb.check_new_nodes(&spec.nodes, max_nodes)?;
        lb.push_nodes(&spec.nodes);

        self.last_id = id;
        Ok(&*self.load_balancers.entry(id).or_insert(lb))
    }

    /// Returns the load balancer with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::LoadBalancerNotFound`] if there is none.
    pub fn get(&self, lb_id: u32) -> Result<&LoadBalancer, MimicError> {
        self.load_balancers
            .get(&lb_id)
            .ok_or(MimicError::LoadBalancerNotFound(lb_id))
    }

    fn get_mut(&mut self, lb_id: u32) -> Result<&mut LoadBalancer, MimicError> {
        self.load_balancers
            .get_mut(&lb_id)
            .ok_or(MimicError::LoadBalancerNotFound(lb_id))
    }

    /// JSON of every load balancer, by ascending id.
    #[must_use]
    pub fn list(&self) -> Vec<LoadBalancerView> {
        self.load_balancers.values().map(LoadBalancer::as_json).collect()
    }

    /// Deletes a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::LoadBalancerNotFound`] if there is none.
    pub fn delete(&mut self, lb_id: u32) -> Result<LoadBalancer, MimicError> {
        self.load_balancers
            .remove(&lb_id)
            .ok_or(MimicError::LoadBalancerNotFound(lb_id))
    }

    /// Adds nodes to a load balancer, all or none.
    ///
    /// # Errors
    ///
    /// - [`MimicError::LoadBalancerNotFound`] if there is no such load
    ///   balancer.
    /// - [`MimicError::DuplicateNodes`] if an address/port pair repeats.
    /// - [`MimicError::OverLimit`] if the node cap would be exceeded.
    pub fn add_nodes(
        &mut self,
        lb_id: u32,
        specs: &[NodeSpec],
        now: DateTime<Utc>,
        max_nodes: usize,
    ) -> Result<Vec<LbNode>, MimicError> {
        if specs.is_empty() {
            return Err(MimicError::InvalidRequest(
                "At least one node is required".to_string(),
            ));
        }
        let lb = self.get_mut(lb_id)?;
        lb.check_new_nodes(specs, max_nodes)?;
        let added = lb.push_nodes(specs);
        lb.updated = now;
        Ok(added)
    }

    /// Returns one node of a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::LoadBalancerNotFound`] or
    /// [`MimicError::NodeNotFound`].
    pub fn node(&self, lb_id: u32, node_id: u32) -> Result<&LbNode, MimicError> {
        self.get(lb_id)?
            .node(node_id)
            .ok_or(MimicError::NodeNotFound(node_id))
    }

    /// Returns all nodes of a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::LoadBalancerNotFound`] if there is none.
    pub fn nodes(&self, lb_id: u32) -> Result<&[LbNode], MimicError> {
        Ok(&self.get(lb_id)?.nodes)
    }

    /// Removes one node from a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`MimicError::LoadBalancerNotFound`] or
    /// [`MimicError::NodeNotFound`].
    pub fn delete_node(
        &mut self,
        lb_id: u32,
        node_id: u32,
        now: DateTime<Utc>,
    ) -> Result<LbNode, MimicError> {
        let lb = self.get_mut(lb_id)?;
        let index = lb
            .nodes
            .iter()
            .position(|n| n.id == node_id)
            .ok_or(MimicError::NodeNotFound(node_id))?;
        let node = lb.nodes.remove(index);
        lb.updated = now;
        Ok(node)
    }
}
