//! Request-level gateway errors.
//!
//! Every failure a caller can observe ends up here and is rendered as
//! `{"error": "<message>"}` with a fixed status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::http::forward::ForwardError;
use crate::load_balancer::selector::SelectError;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// First path segment names no configured service.
    #[error("service `{0}` not found")]
    UnknownService(String),

    /// Every candidate failed its liveness probe.
    #[error("all endpoints of `{service}` are down ({attempts} probed)")]
    AllBackendsUnavailable { service: String, attempts: usize },

    /// Transport failure while relaying to the chosen endpoint.
    #[error("failed to forward to {target}: {source}")]
    ForwardFailure {
        target: String,
        #[source]
        source: ForwardError,
    },

    /// Inbound body exceeded `forwarding.max_body_bytes`.
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Inbound body could not be read (client abort, malformed framing).
    #[error("failed to read request body: {0}")]
    InvalidBody(String),

    /// The overall request deadline expired.
    #[error("request timed out")]
    RequestTimeout,

    /// Middleware failure with no more specific mapping.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::UnknownService(_) => StatusCode::NOT_FOUND,
            GatewayError::AllBackendsUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::ForwardFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            GatewayError::UnknownService(_) => "Service not found",
            GatewayError::AllBackendsUnavailable { .. } => "All servers are down",
            GatewayError::ForwardFailure { .. } => "Failed to forward request",
            GatewayError::BodyTooLarge { .. } => "Request body too large",
            GatewayError::InvalidBody(_) => "Invalid request body",
            GatewayError::RequestTimeout => "Request timed out",
            GatewayError::Internal(_) => "Internal gateway error",
        }
    }
}

impl From<SelectError> for GatewayError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::UnknownService(service) => GatewayError::UnknownService(service),
            SelectError::Unavailable { service, attempts } => {
                GatewayError::AllBackendsUnavailable { service, attempts }
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}
