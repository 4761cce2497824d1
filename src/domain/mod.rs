//! Domain layer: the in-memory models behind each mocked API.
//!
//! RackConnect V3 pools and nodes ([`LoadBalancerPool`],
//! [`LoadBalancerPoolNode`], [`PoolRegistry`]) with the bulk node engine in
//! [`bulk`], and the Cloud Load Balancers model in [`load_balancer`]. Nothing
//! here locks or reads the clock; callers pass the current time in.

pub mod bulk;
pub mod ids;
pub mod load_balancer;
pub mod load_balancer_pool;
pub mod pool_node;
pub mod pool_registry;

pub use bulk::{NodeTarget, RemoveOutcome};
pub use ids::{NodeId, PoolId};
pub use load_balancer::{LoadBalancer, LoadBalancerRegistry};
pub use load_balancer_pool::{LoadBalancerPool, NodeCounts, PoolView};
pub use pool_node::{IdRef, LoadBalancerPoolNode, NodeStatus, NodeView};
pub use pool_registry::PoolRegistry;
