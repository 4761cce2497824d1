//! Mimic error types with HTTP status code mapping.
//!
//! [`MimicError`] is the central error type. Each variant maps to the status
//! code and body shape the corresponding real Rackspace API returns, which is
//! not always JSON: RackConnect answers a missing pool with a plain-text
//! sentence, Cloud Load Balancers with a small `{"message", "code"}` object.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Body of a 400 response.
///
/// ```json
/// {
///   "badRequest": {
///     "validationErrors": { "messages": ["Invalid JSON request body"] }
///   },
///   "code": 400
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BadRequestResponse {
    /// Error payload.
    pub bad_request: BadRequestBody,
    /// Always `400`.
    pub code: u16,
}

/// Inner body of a [`BadRequestResponse`].
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BadRequestBody {
    /// Validation failures.
    pub validation_errors: ValidationErrors,
}

/// List of human-readable validation failures.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrors {
    /// One entry per failure.
    pub messages: Vec<String>,
}

/// Error body used by the Cloud Load Balancers API.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
    /// Numeric HTTP status code, repeated in the body.
    pub code: u16,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Variant                | Status | Body                          |
/// |------------------------|--------|-------------------------------|
/// | `PoolNotFound`         | 404    | plain text                    |
/// | `RegionNotFound`       | 404    | plain text                    |
/// | `LoadBalancerNotFound` | 404    | `{"message", "code"}`         |
/// | `NodeNotFound`         | 404    | `{"message", "code"}`         |
/// | `InvalidRequest`       | 400    | `{"badRequest": ...}`         |
/// | `OverLimit`            | 413    | `{"message", "code"}`         |
/// | `DuplicateNodes`       | 422    | `{"message", "code"}`         |
/// | `NotImplemented`       | 501    | empty                         |
/// | `Internal`             | 500    | plain text                    |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MimicError {
    /// RackConnect load balancer pool with the given ID does not exist.
    #[error("Load Balancer Pool {0} does not exist")]
    PoolNotFound(String),

    /// The region is not served by this Mimic instance.
    #[error("Region {0} does not exist")]
    RegionNotFound(String),

    /// Cloud load balancer with the given ID does not exist.
    #[error("Load balancer not found")]
    LoadBalancerNotFound(u32),

    /// Node with the given ID does not exist on the load balancer.
    #[error("Node not found")]
    NodeNotFound(u32),

    /// Request body could not be parsed or failed validation.
    #[error("{0}")]
    InvalidRequest(String),

    /// The request would exceed an account or resource limit.
    #[error("{0}")]
    OverLimit(String),

    /// The request would configure the same node twice.
    #[error("Duplicate nodes detected. One or more nodes already configured on load balancer.")]
    DuplicateNodes,

    /// The endpoint exists in the real API but is not mocked.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MimicError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::PoolNotFound(_)
            | Self::RegionNotFound(_)
            | Self::LoadBalancerNotFound(_)
            | Self::NodeNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::OverLimit(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::DuplicateNodes => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MimicError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::PoolNotFound(_) | Self::RegionNotFound(_) | Self::Internal(_) => {
                (status, self.to_string()).into_response()
            }
            Self::InvalidRequest(message) => {
                let body = BadRequestResponse {
                    bad_request: BadRequestBody {
                        validation_errors: ValidationErrors {
                            messages: vec![message],
                        },
                    },
                    code: status.as_u16(),
                };
                (status, axum::Json(body)).into_response()
            }
            Self::LoadBalancerNotFound(_)
            | Self::NodeNotFound(_)
            | Self::OverLimit(_)
            | Self::DuplicateNodes => {
                let body = MessageResponse {
                    message: self.to_string(),
                    code: status.as_u16(),
                };
                (status, axum::Json(body)).into_response()
            }
            Self::NotImplemented(_) => status.into_response(),
        }
    }
}

/// Parses a JSON request body, reporting failures as
/// [`MimicError::InvalidRequest`] instead of axum's plain-text rejection.
///
/// # Errors
///
/// Returns [`MimicError::InvalidRequest`] if `body` is not valid JSON for `T`.
pub fn parse_json_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, MimicError> {
    serde_json::from_slice(body).map_err(|e| {
        if e.is_syntax() || e.is_eof() {
            MimicError::InvalidRequest("Invalid JSON request body".to_string())
        } else {
            MimicError::InvalidRequest(e.to_string())
        }
    })
}
