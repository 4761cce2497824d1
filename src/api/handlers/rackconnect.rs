//! RackConnect V3 handlers: load balancer pools and their nodes.
//!
//! Mounted under `/rackconnect/{region}/v3/{tenant_id}`.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::dto::BulkNodeItem;
use crate::app_state::AppState;
use crate::domain::{NodeTarget, NodeView, PoolId, PoolView};
use crate::error::{parse_json_body, BadRequestResponse, MimicError};

/// Path parameters shared by every RackConnect route.
#[derive(Debug, Deserialize)]
pub struct TenantPath {
    /// Region code, e.g. `ORD`.
    pub region: String,
    /// Tenant id.
    pub tenant_id: String,
}

/// Path parameters of a single-pool route.
#[derive(Debug, Deserialize)]
pub struct PoolPath {
    /// Region code.
    pub region: String,
    /// Tenant id.
    pub tenant_id: String,
    /// Pool id.
    pub pool_id: String,
}

fn parse_items(body: &[u8]) -> Result<Vec<NodeTarget>, MimicError> {
    let items: Vec<BulkNodeItem> = parse_json_body(body)?;
    Ok(items.into_iter().map(NodeTarget::from).collect())
}

/// `GET /load_balancer_pools` — List every pool of the tenant.
///
/// # Errors
///
/// Returns [`MimicError::RegionNotFound`] for an unknown region.
#[utoipa::path(
    get,
    path = "/rackconnect/{region}/v3/{tenant_id}/load_balancer_pools",
    tag = "RackConnect",
    summary = "List load balancer pools",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
    ),
    responses(
        (status = 200, description = "All pools", body = Vec<PoolView>),
        (status = 404, description = "Unknown region", body = String, content_type = "text/plain"),
    )
)]
pub async fn list_pools(
    State(state): State<AppState>,
    Path(path): Path<TenantPath>,
) -> Result<impl IntoResponse, MimicError> {
    let pools = state
        .rackconnect
        .list_pools(&path.tenant_id, &path.region)
        .await?;
    Ok(Json(pools))
}

/// `GET /load_balancer_pools/{pool_id}` — Pool details.
///
/// # Errors
///
/// Returns [`MimicError::PoolNotFound`] if the pool does not exist.
#[utoipa::path(
    get,
    path = "/rackconnect/{region}/v3/{tenant_id}/load_balancer_pools/{pool_id}",
    tag = "RackConnect",
    summary = "Get a load balancer pool",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("pool_id" = String, Path, description = "Pool id"),
    ),
    responses(
        (status = 200, description = "The pool", body = PoolView),
        (status = 404, description = "Pool not found", body = String, content_type = "text/plain"),
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    Path(path): Path<PoolPath>,
) -> Result<impl IntoResponse, MimicError> {
    let pool = state
        .rackconnect
        .get_pool(&path.tenant_id, &path.region, &PoolId::from(path.pool_id))
        .await?;
    Ok(Json(pool))
}

/// `GET /load_balancer_pools/{pool_id}/nodes` — Nodes of one pool.
///
/// # Errors
///
/// Returns [`MimicError::PoolNotFound`] if the pool does not exist.
#[utoipa::path(
    get,
    path = "/rackconnect/{region}/v3/{tenant_id}/load_balancer_pools/{pool_id}/nodes",
    tag = "RackConnect",
    summary = "List the nodes of a pool",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("pool_id" = String, Path, description = "Pool id"),
    ),
    responses(
        (status = 200, description = "Pool nodes in insertion order", body = Vec<NodeView>),
        (status = 404, description = "Pool not found", body = String, content_type = "text/plain"),
    )
)]
pub async fn list_pool_nodes(
    State(state): State<AppState>,
    Path(path): Path<PoolPath>,
) -> Result<impl IntoResponse, MimicError> {
    let nodes = state
        .rackconnect
        .pool_nodes(&path.tenant_id, &path.region, &PoolId::from(path.pool_id))
        .await?;
    Ok(Json(nodes))
}

/// `GET /load_balancer_pools/nodes` — Nodes of every pool.
///
/// # Errors
///
/// Returns [`MimicError::RegionNotFound`] for an unknown region.
#[utoipa::path(
    get,
    path = "/rackconnect/{region}/v3/{tenant_id}/load_balancer_pools/nodes",
    tag = "RackConnect",
    summary = "List the nodes of every pool",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
    ),
    responses(
        (status = 200, description = "All pool nodes", body = Vec<NodeView>),
    )
)]
pub async fn list_all_nodes(
    State(state): State<AppState>,
    Path(path): Path<TenantPath>,
) -> Result<impl IntoResponse, MimicError> {
    let nodes = state
        .rackconnect
        .all_nodes(&path.tenant_id, &path.region)
        .await?;
    Ok(Json(nodes))
}

/// `POST /load_balancer_pools/nodes` — Add nodes to pools in bulk.
///
/// Either every node is added or none is.
///
/// # Errors
///
/// Returns [`MimicError::PoolNotFound`] if any item names a missing pool,
/// [`MimicError::InvalidRequest`] for a malformed body.
#[utoipa::path(
    post,
    path = "/rackconnect/{region}/v3/{tenant_id}/load_balancer_pools/nodes",
    tag = "RackConnect",
    summary = "Add pool nodes in bulk",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
    ),
    request_body = Vec<BulkNodeItem>,
    responses(
        (status = 200, description = "Created nodes, one per item", body = Vec<NodeView>),
        (status = 400, description = "Malformed body", body = BadRequestResponse),
        (status = 404, description = "Pool not found", body = String, content_type = "text/plain"),
    )
)]
pub async fn add_nodes(
    State(state): State<AppState>,
    Path(path): Path<TenantPath>,
    body: Bytes,
) -> Result<impl IntoResponse, MimicError> {
    let targets = parse_items(&body)?;
    let added = state
        .rackconnect
        .add_nodes(&path.tenant_id, &path.region, &targets)
        .await?;
    Ok(Json(added))
}

/// `DELETE /load_balancer_pools/nodes` — Remove nodes from pools in bulk.
///
/// Items that match no node are ignored.
///
/// # Errors
///
/// Returns [`MimicError::PoolNotFound`] if any item names a missing pool,
/// [`MimicError::InvalidRequest`] for a malformed body.
#[utoipa::path(
    delete,
    path = "/rackconnect/{region}/v3/{tenant_id}/load_balancer_pools/nodes",
    tag = "RackConnect",
    summary = "Remove pool nodes in bulk",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
    ),
    request_body = Vec<BulkNodeItem>,
    responses(
        (status = 204, description = "Nodes removed"),
        (status = 400, description = "Malformed body", body = BadRequestResponse),
        (status = 404, description = "Pool not found", body = String, content_type = "text/plain"),
    )
)]
pub async fn remove_nodes(
    State(state): State<AppState>,
    Path(path): Path<TenantPath>,
    body: Bytes,
) -> Result<impl IntoResponse, MimicError> {
    let targets = parse_items(&body)?;
    state
        .rackconnect
        .remove_nodes(&path.tenant_id, &path.region, &targets)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /load_balancer_pools/{pool_id}/nodes` — Not mocked.
///
/// # Errors
///
/// Always returns [`MimicError::NotImplemented`].
#[utoipa::path(
    post,
    path = "/rackconnect/{region}/v3/{tenant_id}/load_balancer_pools/{pool_id}/nodes",
    tag = "RackConnect",
    summary = "Add a single pool node (not mocked)",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("pool_id" = String, Path, description = "Pool id"),
    ),
    responses((status = 501, description = "Not implemented"))
)]
pub async fn add_pool_node() -> MimicError {
    MimicError::NotImplemented("adding a single pool node")
}

/// `GET /load_balancer_pools/{pool_id}/nodes/details` — Not mocked.
///
/// # Errors
///
/// Always returns [`MimicError::NotImplemented`].
#[utoipa::path(
    get,
    path = "/rackconnect/{region}/v3/{tenant_id}/load_balancer_pools/{pool_id}/nodes/details",
    tag = "RackConnect",
    summary = "Detailed pool node listing (not mocked)",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("pool_id" = String, Path, description = "Pool id"),
    ),
    responses((status = 501, description = "Not implemented"))
)]
pub async fn pool_nodes_details() -> MimicError {
    MimicError::NotImplemented("pool node details")
}

/// `GET|POST|DELETE /load_balancer_pools/{pool_id}/nodes/{node_id}` — Not mocked.
///
/// # Errors
///
/// Always returns [`MimicError::NotImplemented`].
#[utoipa::path(
    get,
    path = "/rackconnect/{region}/v3/{tenant_id}/load_balancer_pools/{pool_id}/nodes/{node_id}",
    tag = "RackConnect",
    summary = "Single pool node (not mocked)",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("pool_id" = String, Path, description = "Pool id"),
        ("node_id" = String, Path, description = "Node id"),
    ),
    responses((status = 501, description = "Not implemented"))
)]
pub async fn pool_node() -> MimicError {
    MimicError::NotImplemented("single pool node operations")
}

/// `GET /load_balancer_pools/{pool_id}/nodes/{node_id}/details` — Not mocked.
///
/// # Errors
///
/// Always returns [`MimicError::NotImplemented`].
#[utoipa::path(
    get,
    path = "/rackconnect/{region}/v3/{tenant_id}/load_balancer_pools/{pool_id}/nodes/{node_id}/details",
    tag = "RackConnect",
    summary = "Single pool node details (not mocked)",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("pool_id" = String, Path, description = "Pool id"),
        ("node_id" = String, Path, description = "Node id"),
    ),
    responses((status = 501, description = "Not implemented"))
)]
pub async fn pool_node_details() -> MimicError {
    MimicError::NotImplemented("single pool node details")
}

/// RackConnect routes, relative to `/rackconnect/{region}/v3/{tenant_id}`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/load_balancer_pools", get(list_pools))
        .route(
            "/load_balancer_pools/nodes",
            get(list_all_nodes).post(add_nodes).delete(remove_nodes),
        )
        .route("/load_balancer_pools/{pool_id}", get(get_pool))
        .route(
            "/load_balancer_pools/{pool_id}/nodes",
            get(list_pool_nodes).post(add_pool_node),
        )
        .route(
            "/load_balancer_pools/{pool_id}/nodes/details",
            get(pool_nodes_details),
        )
        .route(
            "/load_balancer_pools/{pool_id}/nodes/{node_id}",
            get(pool_node).post(pool_node).delete(pool_node),
        )
        .route(
            "/load_balancer_pools/{pool_id}/nodes/{node_id}/details",
            get(pool_node_details)
                .post(pool_node_details)
                .delete(pool_node_details),
        )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};

    use crate::api::test_support::{TestApp, json_body, text_body};

    const BASE: &str = "/rackconnect/ORD/v3/tenant/load_balancer_pools";

    async fn pool_ids(app: &TestApp) -> Vec<String> {
        let response = app.send(Method::GET, BASE, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let Value::Array(pools) = json_body(response).await else {
            panic!("pool listing should be an array");
        };
        pools
            .iter()
            .filter_map(|p| p.get("id").and_then(Value::as_str).map(str::to_string))
            .collect()
    }

    fn add_body(pool_ids: &[String], server: &str) -> Value {
        Value::Array(
            pool_ids
                .iter()
                .map(|id| json!({"cloud_server": {"id": server}, "load_balancer_pool": {"id": id}}))
                .collect(),
        )
    }

    #[tokio::test]
    async fn default_pool_shape() {
        let app = TestApp::new();
        let response = app.send(Method::GET, BASE, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert_eq!(content_type, "application/json");

        let Value::Array(pools) = json_body(response).await else {
            panic!("expected an array");
        };
        assert_eq!(pools.len(), 1);
        let Some(pool) = pools.first() else {
            panic!("no pool");
        };
        assert_eq!(pool.get("name"), Some(&json!("default")));
        assert_eq!(pool.get("port"), Some(&json!(80)));
        assert_eq!(pool.get("status"), Some(&json!("ACTIVE")));
        assert_eq!(pool.get("status_detail"), Some(&Value::Null));
        assert_eq!(
            pool.get("node_counts"),
            Some(&json!({"cloud_servers": 0, "external": 0, "total": 0}))
        );
        let vip = pool.get("virtual_ip").and_then(Value::as_str).unwrap_or_default();
        assert!(vip.starts_with("10."));
    }

    #[tokio::test]
    async fn pool_lookup_round_trips() {
        let app = TestApp::new();
        let ids = pool_ids(&app).await;
        let Some(id) = ids.first() else {
            panic!("no pool");
        };
        let response = app.send(Method::GET, &format!("{BASE}/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.get("id"), Some(&json!(id)));
    }

    #[tokio::test]
    async fn missing_pool_is_plain_text_404() {
        let app = TestApp::new();
        let response = app.send(Method::GET, &format!("{BASE}/X"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(text_body(response).await, "Load Balancer Pool X does not exist");

        let response = app.send(Method::GET, &format!("{BASE}/X/nodes"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(text_body(response).await, "Load Balancer Pool X does not exist");
    }

    #[tokio::test]
    async fn unknown_region_is_404() {
        let app = TestApp::new();
        let response = app
            .send(Method::GET, "/rackconnect/LON/v3/tenant/load_balancer_pools", None)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(text_body(response).await, "Region LON does not exist");
    }

    #[tokio::test]
    async fn unimplemented_endpoints_are_501() {
        let app = TestApp::new();
        let calls = [
            (Method::POST, format!("{BASE}/p/nodes")),
            (Method::GET, format!("{BASE}/p/nodes/details")),
            (Method::GET, format!("{BASE}/p/nodes/n")),
            (Method::POST, format!("{BASE}/p/nodes/n")),
            (Method::DELETE, format!("{BASE}/p/nodes/n")),
            (Method::GET, format!("{BASE}/p/nodes/n/details")),
        ];
        for (method, uri) in calls {
            let response = app.send(method.clone(), &uri, Some(json!({}))).await;
            assert_eq!(
                response.status(),
                StatusCode::NOT_IMPLEMENTED,
                "{method} {uri}"
            );
        }
    }

    #[tokio::test]
    async fn bulk_add_stamps_clock_time() {
        let app = TestApp::new();
        let _ = app.state.clock.advance(Duration::from_secs(50));
        let ids = pool_ids(&app).await;

        let response = app
            .send(Method::POST, &format!("{BASE}/nodes"), Some(add_body(&ids, "d6d4")))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let Value::Array(nodes) = json_body(response).await else {
            panic!("expected an array");
        };
        assert_eq!(nodes.len(), ids.len());
        for node in &nodes {
            assert_eq!(node.get("created"), Some(&json!("1970-01-01T00:00:50Z")));
            assert_eq!(node.get("updated"), Some(&Value::Null));
            assert_eq!(node.get("status"), Some(&json!("ADDING")));
            assert_eq!(node.get("cloud_server"), Some(&json!({"id": "d6d4"})));
        }
    }

    #[tokio::test]
    async fn add_then_remove_empties_pool() {
        let app = TestApp::new();
        let ids = pool_ids(&app).await;
        let body = add_body(&ids, "srv");

        let response = app
            .send(Method::POST, &format!("{BASE}/nodes"), Some(body.clone()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let Some(id) = ids.first() else {
            panic!("no pool");
        };
        let response = app.send(Method::GET, &format!("{BASE}/{id}/nodes"), None).await;
        let Value::Array(nodes) = json_body(response).await else {
            panic!("expected an array");
        };
        assert_eq!(nodes.len(), 1);

        let response = app
            .send(Method::DELETE, &format!("{BASE}/nodes"), Some(body))
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(text_body(response).await.is_empty());

        let response = app.send(Method::GET, &format!("{BASE}/{id}/nodes"), None).await;
        assert_eq!(json_body(response).await, json!([]));
        let response = app.send(Method::GET, &format!("{BASE}/{id}"), None).await;
        assert_eq!(
            json_body(response).await.get("node_counts").and_then(|c| c.get("total")),
            Some(&json!(0))
        );
    }

    #[tokio::test]
    async fn add_to_missing_pool_changes_nothing() {
        let app = TestApp::new();
        let mut ids = pool_ids(&app).await;
        ids.push("X".to_string());

        let response = app
            .send(Method::POST, &format!("{BASE}/nodes"), Some(add_body(&ids, "srv")))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(text_body(response).await, "Load Balancer Pool X does not exist");

        let response = app.send(Method::GET, &format!("{BASE}/nodes"), None).await;
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let app = TestApp::new();
        let response = app.send_raw(Method::POST, &format!("{BASE}/nodes"), "{not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body.get("code"), Some(&json!(400)));
        assert!(body.pointer("/badRequest/validationErrors/messages/0").is_some());
    }

    #[tokio::test]
    async fn tenants_are_isolated() {
        let app = TestApp::new();
        let mine = pool_ids(&app).await;
        let response = app
            .send(Method::GET, "/rackconnect/ORD/v3/someone-else/load_balancer_pools", None)
            .await;
        let Value::Array(theirs) = json_body(response).await else {
            panic!("expected an array");
        };
        assert_eq!(theirs.len(), 1);
        let theirs_id = theirs
            .first()
            .and_then(|p| p.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string);
        assert!(theirs_id.is_some());
        assert_ne!(theirs_id.as_ref(), mine.first());
    }
}
