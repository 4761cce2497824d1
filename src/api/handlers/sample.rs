//! Sample API: a minimal per-region endpoint returning an empty listing.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::load_balancers::AccountPath;
use crate::api::dto::SampleResponse;
use crate::app_state::AppState;
use crate::error::MimicError;

/// `GET /sample` — Always `{"sample": []}`.
///
/// # Errors
///
/// Returns [`MimicError::RegionNotFound`] for an unknown region.
#[utoipa::path(
    get,
    path = "/sample/{region}/v2/{tenant_id}/sample",
    tag = "Sample",
    summary = "Sample listing",
    params(
        ("region" = String, Path, description = "Region code"),
        ("tenant_id" = String, Path, description = "Tenant id"),
    ),
    responses(
        (status = 200, description = "Empty sample listing", body = SampleResponse),
        (status = 404, description = "Unknown region", body = String, content_type = "text/plain"),
    )
)]
pub async fn get_sample(
    State(state): State<AppState>,
    Path(path): Path<AccountPath>,
) -> Result<impl IntoResponse, MimicError> {
    if !state.regions.iter().any(|r| *r == path.region) {
        return Err(MimicError::RegionNotFound(path.region));
    }
    tracing::debug!(tenant_id = %path.tenant_id, region = %path.region, "sample listing");
    Ok(Json(SampleResponse { sample: Vec::new() }))
}

/// Sample routes, relative to `/sample/{region}/v2/{tenant_id}`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sample", get(get_sample))
}
