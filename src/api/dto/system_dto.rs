//! Bodies for the control and sample endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /mimic/v1.1/tick`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TickRequest {
    /// Seconds to advance the clock by. May be fractional.
    pub amount: f64,
}

/// Response body for `POST /mimic/v1.1/tick`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TickResponse {
    /// Seconds the clock was advanced by.
    pub advanced: f64,
    /// Clock reading after advancing, with microseconds.
    pub now: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: String,
    /// Current reading of the mock clock.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

/// Response body of the sample API.
#[derive(Debug, Serialize, ToSchema)]
pub struct SampleResponse {
    /// Always empty.
    pub sample: Vec<String>,
}
