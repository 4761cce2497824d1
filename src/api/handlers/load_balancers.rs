//! Cloud Load Balancers (v1) handlers.
//!
//! Mounted under `/loadbalancers/{region}/v2/{tenant_id}`.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::dto::{
    AddNodesRequest, CreateLoadBalancerRequest, LoadBalancerListResponse, LoadBalancerResponse,
    NodeListResponse, NodeResponse,
};
use crate::app_state::AppState;
use crate::error::{parse_json_body, BadRequestResponse, MessageResponse, MimicError};

/// Path parameters of the collection routes.
#[derive(Debug, Deserialize)]
pub struct AccountPath {
    /// Region code.
    pub region: String,
    /// Tenant id.
    pub tenant_id: String,
}

/// Path parameters of a single load balancer route.
#[derive(Debug, Deserialize)]
pub struct LoadBalancerPath {
    /// Region code.
    pub region: String,
    /// Tenant id.
    pub tenant_id: String,
    /// Load balancer id.
    pub lb_id: u32,
}

/// Path parameters of a single node route.
#[derive(Debug, Deserialize)]
pub struct NodePath {
    /// Region code.
    pub region: String,
    /// Tenant id.
    pub tenant_id: String,
    /// Load balancer id.
    pub lb_id: u32,
    /// Node id.
    pub node_id: u32,
}

/// `POST /loadbalancers` — Create a load balancer.
///
/// # Errors
///
/// Returns [`MimicError::InvalidRequest`] for a malformed body, or the
/// node validation errors of [`crate::domain::LoadBalancerRegistry::create`].
#[utoipa::path(
    post,
    path = "/loadbalancers/{region}/v2/{tenant_id}/loadbalancers",
    tag = "Cloud Load Balancers",
    summary = "Create a load balancer",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
    ),
    request_body = CreateLoadBalancerRequest,
    responses(
        (status = 202, description = "Load balancer created", body = LoadBalancerResponse),
        (status = 400, description = "Malformed body", body = BadRequestResponse),
        (status = 413, description = "Too many nodes", body = MessageResponse),
        (status = 422, description = "Duplicate nodes", body = MessageResponse),
    )
)]
pub async fn create_load_balancer(
    State(state): State<AppState>,
    Path(path): Path<AccountPath>,
    body: Bytes,
) -> Result<impl IntoResponse, MimicError> {
    let request: CreateLoadBalancerRequest = parse_json_body(&body)?;
    let load_balancer = state
        .load_balancers
        .create(&path.tenant_id, &path.region, &request.load_balancer)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(LoadBalancerResponse { load_balancer })))
}

/// `GET /loadbalancers` — List load balancers.
///
/// # Errors
///
/// Returns [`MimicError::RegionNotFound`] for an unknown region.
#[utoipa::path(
    get,
    path = "/loadbalancers/{region}/v2/{tenant_id}/loadbalancers",
    tag = "Cloud Load Balancers",
    summary = "List load balancers",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
    ),
    responses(
        (status = 200, description = "All load balancers", body = LoadBalancerListResponse),
    )
)]
pub async fn list_load_balancers(
    State(state): State<AppState>,
    Path(path): Path<AccountPath>,
) -> Result<impl IntoResponse, MimicError> {
    let load_balancers = state
        .load_balancers
        .list(&path.tenant_id, &path.region)
        .await?;
    Ok(Json(LoadBalancerListResponse { load_balancers }))
}

/// `GET /loadbalancers/{lb_id}` — Load balancer details.
///
/// # Errors
///
/// Returns [`MimicError::LoadBalancerNotFound`] if there is no such load
/// balancer.
#[utoipa::path(
    get,
    path = "/loadbalancers/{region}/v2/{tenant_id}/loadbalancers/{lb_id}",
    tag = "Cloud Load Balancers",
    summary = "Get a load balancer",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("lb_id" = u32, Path, description = "Load balancer id"),
    ),
    responses(
        (status = 200, description = "The load balancer", body = LoadBalancerResponse),
        (status = 404, description = "Load balancer not found", body = MessageResponse),
    )
)]
pub async fn get_load_balancer(
    State(state): State<AppState>,
    Path(path): Path<LoadBalancerPath>,
) -> Result<impl IntoResponse, MimicError> {
    let load_balancer = state
        .load_balancers
        .get(&path.tenant_id, &path.region, path.lb_id)
        .await?;
    Ok(Json(LoadBalancerResponse { load_balancer }))
}

/// `DELETE /loadbalancers/{lb_id}` — Delete a load balancer.
///
/// # Errors
///
/// Returns [`MimicError::LoadBalancerNotFound`] if there is no such load
/// balancer.
#[utoipa::path(
    delete,
    path = "/loadbalancers/{region}/v2/{tenant_id}/loadbalancers/{lb_id}",
    tag = "Cloud Load Balancers",
    summary = "Delete a load balancer",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("lb_id" = u32, Path, description = "Load balancer id"),
    ),
    responses(
        (status = 202, description = "Deletion accepted"),
        (status = 404, description = "Load balancer not found", body = MessageResponse),
    )
)]
pub async fn delete_load_balancer(
    State(state): State<AppState>,
    Path(path): Path<LoadBalancerPath>,
) -> Result<impl IntoResponse, MimicError> {
    state
        .load_balancers
        .delete(&path.tenant_id, &path.region, path.lb_id)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// `POST /loadbalancers/{lb_id}/nodes` — Add nodes.
///
/// # Errors
///
/// Returns [`MimicError::LoadBalancerNotFound`],
/// [`MimicError::DuplicateNodes`], [`MimicError::OverLimit`] or
/// [`MimicError::InvalidRequest`].
#[utoipa::path(
    post,
    path = "/loadbalancers/{region}/v2/{tenant_id}/loadbalancers/{lb_id}/nodes",
    tag = "Cloud Load Balancers",
    summary = "Add nodes to a load balancer",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("lb_id" = u32, Path, description = "Load balancer id"),
    ),
    request_body = AddNodesRequest,
    responses(
        (status = 202, description = "Nodes added", body = NodeListResponse),
        (status = 400, description = "Malformed body", body = BadRequestResponse),
        (status = 404, description = "Load balancer not found", body = MessageResponse),
        (status = 413, description = "Too many nodes", body = MessageResponse),
        (status = 422, description = "Duplicate nodes", body = MessageResponse),
    )
)]
pub async fn add_nodes(
    State(state): State<AppState>,
    Path(path): Path<LoadBalancerPath>,
    body: Bytes,
) -> Result<impl IntoResponse, MimicError> {
    let request: AddNodesRequest = parse_json_body(&body)?;
    let nodes = state
        .load_balancers
        .add_nodes(&path.tenant_id, &path.region, path.lb_id, &request.nodes)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(NodeListResponse { nodes })))
}

/// `GET /loadbalancers/{lb_id}/nodes` — List nodes.
///
/// # Errors
///
/// Returns [`MimicError::LoadBalancerNotFound`] if there is no such load
/// balancer.
#[utoipa::path(
    get,
    path = "/loadbalancers/{region}/v2/{tenant_id}/loadbalancers/{lb_id}/nodes",
    tag = "Cloud Load Balancers",
    summary = "List the nodes of a load balancer",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("lb_id" = u32, Path, description = "Load balancer id"),
    ),
    responses(
        (status = 200, description = "Nodes", body = NodeListResponse),
        (status = 404, description = "Load balancer not found", body = MessageResponse),
    )
)]
pub async fn list_nodes(
    State(state): State<AppState>,
    Path(path): Path<LoadBalancerPath>,
) -> Result<impl IntoResponse, MimicError> {
    let nodes = state
        .load_balancers
        .nodes(&path.tenant_id, &path.region, path.lb_id)
        .await?;
    Ok(Json(NodeListResponse { nodes }))
}

/// `GET /loadbalancers/{lb_id}/nodes/{node_id}` — Node details.
///
/// # Errors
///
/// Returns [`MimicError::LoadBalancerNotFound`] or
/// [`MimicError::NodeNotFound`].
#[utoipa::path(
    get,
    path = "/loadbalancers/{region}/v2/{tenant_id}/loadbalancers/{lb_id}/nodes/{node_id}",
    tag = "Cloud Load Balancers",
    summary = "Get a load balancer node",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("lb_id" = u32, Path, description = "Load balancer id"),
        ("node_id" = u32, Path, description = "Node id"),
    ),
    responses(
        (status = 200, description = "The node", body = NodeResponse),
        (status = 404, description = "Load balancer or node not found", body = MessageResponse),
    )
)]
pub async fn get_node(
    State(state): State<AppState>,
    Path(path): Path<NodePath>,
) -> Result<impl IntoResponse, MimicError> {
    let node = state
        .load_balancers
        .node(&path.tenant_id, &path.region, path.lb_id, path.node_id)
        .await?;
    Ok(Json(NodeResponse { node }))
}

/// `DELETE /loadbalancers/{lb_id}/nodes/{node_id}` — Remove a node.
///
/// # Errors
///
/// Returns [`MimicError::LoadBalancerNotFound`] or
/// [`MimicError::NodeNotFound`].
#[utoipa::path(
    delete,
    path = "/loadbalancers/{region}/v2/{tenant_id}/loadbalancers/{lb_id}/nodes/{node_id}",
    tag = "Cloud Load Balancers",
    summary = "Remove a load balancer node",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("lb_id" = u32, Path, description = "Load balancer id"),
        ("node_id" = u32, Path, description = "Node id"),
    ),
    responses(
        (status = 202, description = "Node removed"),
        (status = 404, description = "Load balancer or node not found", body = MessageResponse),
    )
)]
pub async fn delete_node(
    State(state): State<AppState>,
    Path(path): Path<NodePath>,
) -> Result<impl IntoResponse, MimicError> {
    state
        .load_balancers
        .delete_node(&path.tenant_id, &path.region, path.lb_id, path.node_id)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// Cloud Load Balancers routes, relative to
/// `/loadbalancers/{region}/v2/{tenant_id}`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/loadbalancers",
            get(list_load_balancers).post(create_load_balancer),
        )
        .route(
            "/loadbalancers/{lb_id}",
            get(get_load_balancer).delete(delete_load_balancer),
        )
        .route("/loadbalancers/{lb_id}/nodes", get(list_nodes).post(add_nodes))
        .route(
            "/loadbalancers/{lb_id}/nodes/{node_id}",
            get(get_node).delete(delete_node),
        )
}
