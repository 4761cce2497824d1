//! Cloud Load Balancers request and response envelopes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::load_balancer::{LbNode, LoadBalancerSpec, LoadBalancerView, NodeSpec};

/// Request body for `POST /loadbalancers`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoadBalancerRequest {
    /// Load balancer to create.
    pub load_balancer: LoadBalancerSpec,
}

/// `{"loadBalancer": {...}}` response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerResponse {
    /// The load balancer.
    pub load_balancer: LoadBalancerView,
}

/// `{"loadBalancers": [...]}` response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerListResponse {
    /// All load balancers of the tenant in the region.
    pub load_balancers: Vec<LoadBalancerView>,
}

/// Request body for `POST /loadbalancers/{id}/nodes`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddNodesRequest {
    /// Nodes to add.
    pub nodes: Vec<NodeSpec>,
}

/// `{"nodes": [...]}` response.
#[derive(Debug, Serialize, ToSchema)]
pub struct NodeListResponse {
    /// Nodes.
    pub nodes: Vec<LbNode>,
}

/// `{"node": {...}}` response.
#[derive(Debug, Serialize, ToSchema)]
pub struct NodeResponse {
    /// The node.
    pub node: LbNode,
}
