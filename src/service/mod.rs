//! Service layer: per-tenant state orchestration for each mocked API.
//!
//! Services own a [`crate::session::SessionStore`] of domain registries and
//! the injected [`crate::clock::Clock`]. They lock the right registry, stamp
//! times, call into [`crate::domain`], and log what happened.

pub mod load_balancer_service;
pub mod rackconnect_service;

pub use load_balancer_service::LoadBalancerService;
pub use rackconnect_service::{RackConnectConfig, RackConnectService};

use crate::error::MimicError;

/// Fails with [`MimicError::RegionNotFound`] unless `region` is served.
fn ensure_region(regions: &[String], region: &str) -> Result<(), MimicError> {
    if regions.iter().any(|r| r == region) {
        Ok(())
    } else {
        Err(MimicError::RegionNotFound(region.to_string()))
    }
}
