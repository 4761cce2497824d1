//! RackConnect V3 request bodies.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{IdRef, NodeId, NodeTarget, PoolId};

/// One element of the `POST`/`DELETE /load_balancer_pools/nodes` array.
///
/// ```json
/// {"cloud_server": {"id": "d95ae0c4-..."}, "load_balancer_pool": {"id": "..."}}
/// ```
///
/// For removal, `id` may name the node directly instead of `cloud_server`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulkNodeItem {
    /// Node id. Only used when removing.
    #[serde(default)]
    pub id: Option<String>,
    /// Backing cloud server. Required when adding.
    #[serde(default)]
    pub cloud_server: Option<IdRef>,
    /// Target pool.
    pub load_balancer_pool: IdRef,
}

impl From<BulkNodeItem> for NodeTarget {
    fn from(item: BulkNodeItem) -> Self {
        Self {
            pool: PoolId::from(item.load_balancer_pool.id),
            cloud_server: item.cloud_server.map(|c| c.id),
            node: item.id.map(NodeId::from),
        }
    }
}
