//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::clock::{Clock, LogicalClock, SystemClock};
use crate::config::MimicConfig;
use crate::service::{LoadBalancerService, RackConnectConfig, RackConnectService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// RackConnect V3 mock.
    pub rackconnect: Arc<RackConnectService>,
    /// Cloud Load Balancers mock.
    pub load_balancers: Arc<LoadBalancerService>,
    /// Time source shared by every service.
    pub clock: Arc<dyn Clock>,
    /// Regions the sample API answers in.
    pub regions: Arc<[String]>,
}

impl AppState {
    /// Builds every service from `config` around the given clock.
    #[must_use]
    pub fn new(config: &MimicConfig, clock: Arc<dyn Clock>) -> Self {
        let rackconnect = RackConnectService::new(
            RackConnectConfig {
                regions: config.regions.clone(),
                default_pools: config.default_pools,
                node_activation: config.node_activation,
            },
            Arc::clone(&clock),
        );
        let load_balancers =
            LoadBalancerService::new(config.regions.clone(), config.clb_max_nodes, Arc::clone(&clock));
        Self {
            rackconnect: Arc::new(rackconnect),
            load_balancers: Arc::new(load_balancers),
            clock,
            regions: config.regions.clone().into(),
        }
    }

    /// Builds the state with the clock `config.realtime` asks for.
    #[must_use]
    pub fn from_config(config: &MimicConfig) -> Self {
        let clock: Arc<dyn Clock> = if config.realtime {
            Arc::new(SystemClock)
        } else {
            Arc::new(LogicalClock::new())
        };
        Self::new(config, clock)
    }
}
