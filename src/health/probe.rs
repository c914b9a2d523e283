//! Liveness probe contract.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::{uri::InvalidUri, StatusCode};
use thiserror::Error;

use crate::load_balancer::backend::Endpoint;

/// Why a candidate endpoint was judged dead.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid probe url `{url}`: {source}")]
    InvalidUri {
        url: String,
        #[source]
        source: InvalidUri,
    },

    #[error("failed to build probe request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("connection error: {0}")]
    Connect(#[from] hyper_util::client::legacy::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("non-success status {0}")]
    Status(StatusCode),
}

/// Decides whether an endpoint may receive a forwarded request.
///
/// Results are never cached; every selection attempt probes afresh.
#[async_trait]
pub trait LivenessProbe: Send + Sync + std::fmt::Debug {
    async fn check(&self, endpoint: &Endpoint) -> Result<(), ProbeError>;
}
