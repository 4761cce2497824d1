//! Data Transfer Objects for REST request/response serialization.
//!
//! Response shapes that mirror a domain entity one to one (pools, pool
//! nodes, load balancers) live next to the entity in [`crate::domain`];
//! this module holds request bodies and envelopes.

pub mod load_balancer_dto;
pub mod rackconnect_dto;
pub mod system_dto;

pub use load_balancer_dto::*;
pub use rackconnect_dto::*;
pub use system_dto::*;
