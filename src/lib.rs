//! # mimic
//!
//! Stateful, in-memory mock of Rackspace cloud APIs for integration tests.
//!
//! Client code under test talks to Mimic exactly as it would to the real
//! RackConnect V3 or Cloud Load Balancers endpoints. State is partitioned
//! per tenant and region, and every timestamp comes from an injectable
//! [`clock::Clock`] so test suites can control time.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── RackConnectService / LoadBalancerService (service/)
//!     ├── SessionStore per tenant/region (session)
//!     │
//!     ├── PoolRegistry / LoadBalancerRegistry (domain/)
//!     │
//!     └── Clock (logical or wall time)
//! ```

pub mod api;
pub mod app_state;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod session;
