//! OpenAPI document describing every mocked endpoint.

use utoipa::OpenApi;

use super::handlers::{load_balancers, rackconnect, sample, system};

/// OpenAPI 3 document for Mimic.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Mimic",
        description = "Stateful in-memory mock of Rackspace cloud APIs for integration testing."
    ),
    paths(
        rackconnect::list_pools,
        rackconnect::get_pool,
        rackconnect::list_pool_nodes,
        rackconnect::list_all_nodes,
        rackconnect::add_nodes,
        rackconnect::remove_nodes,
        rackconnect::add_pool_node,
        rackconnect::pool_nodes_details,
        rackconnect::pool_node,
        rackconnect::pool_node_details,
        load_balancers::create_load_balancer,
        load_balancers::list_load_balancers,
        load_balancers::get_load_balancer,
        load_balancers::delete_load_balancer,
        load_balancers::add_nodes,
        load_balancers::list_nodes,
        load_balancers::get_node,
        load_balancers::delete_node,
        sample::get_sample,
        system::health_handler,
        system::tick_handler,
    ),
    tags(
        (name = "RackConnect", description = "RackConnect V3 load balancer pools"),
        (name = "Cloud Load Balancers", description = "Cloud Load Balancers v1"),
        (name = "Sample", description = "Sample API"),
        (name = "System", description = "Health and clock control"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_mocked_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(
            paths
                .iter()
                .any(|p| p.as_str() == "/rackconnect/{region}/v3/{tenant_id}/load_balancer_pools/nodes")
        );
        assert!(paths.iter().any(|p| p.as_str() == "/mimic/v1.1/tick"));
    }
}
