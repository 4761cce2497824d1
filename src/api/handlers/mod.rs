//! REST endpoint handlers organized by mocked API.

pub mod load_balancers;
pub mod rackconnect;
pub mod sample;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes every mocked API under its per-region, per-tenant prefix.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/rackconnect/{region}/v3/{tenant_id}", rackconnect::routes())
        .nest("/loadbalancers/{region}/v2/{tenant_id}", load_balancers::routes())
        .nest("/sample/{region}/v2/{tenant_id}", sample::routes())
}
