//! System endpoints: health check and clock control.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::SecondsFormat;

use crate::api::dto::{HealthResponse, TickRequest, TickResponse};
use crate::app_state::AppState;
use crate::clock::format_timestamp;
use crate::error::{parse_json_body, BadRequestResponse, MimicError};

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and the current mock time.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: format_timestamp(&state.clock.now()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `POST /mimic/v1.1/tick` — Advance the logical clock.
///
/// # Errors
///
/// Returns [`MimicError::InvalidRequest`] for a negative or non-finite
/// amount, a malformed body, or when running on wall-clock time.
#[utoipa::path(
    post,
    path = "/mimic/v1.1/tick",
    tag = "System",
    summary = "Advance the clock",
    description = "Moves the logical clock forward by `amount` seconds. Every timestamp handed out afterwards reflects the new time.",
    request_body = TickRequest,
    responses(
        (status = 200, description = "Clock advanced", body = TickResponse),
        (status = 400, description = "Invalid amount or realtime clock", body = BadRequestResponse),
    )
)]
pub async fn tick_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, MimicError> {
    let request: TickRequest = parse_json_body(&body)?;
    let amount = Duration::try_from_secs_f64(request.amount).map_err(|_| {
        MimicError::InvalidRequest(format!(
            "amount must be a finite, non-negative number of seconds, got {}",
            request.amount
        ))
    })?;
    state.clock.advance(amount)?;
    let now = state.clock.now();
    tracing::info!(advanced = request.amount, now = %format_timestamp(&now), "clock advanced");
    Ok(Json(TickResponse {
        advanced: request.amount,
        now: now.to_rfc3339_opts(SecondsFormat::Micros, true),
    }))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/mimic/v1.1/tick", post(tick_handler))
}
