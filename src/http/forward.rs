//! Request forwarding to a selected endpoint.
//!
//! # Responsibilities
//! - Build the target URL from the endpoint base and the inbound path
//! - Reissue the call with the inbound method, headers and raw body
//! - Buffer the backend response and hand it back for relaying
//!
//! # Design Decisions
//! - One attempt only; choosing another endpoint is the selector's job
//! - The whole exchange (send + body read) shares one deadline

use std::time::Duration;

use axum::{
    body::Body,
    http::{uri::InvalidUri, Request, Uri},
};
use thiserror::Error;
use tokio::time;

use crate::config::{ForwardingConfig, TimeoutConfig};
use crate::http::client::HttpClient;
use crate::http::headers::{outbound_request_headers, strip_hop_by_hop};
use crate::http::request::ProxyRequest;
use crate::http::response::ProxyResponse;
use crate::load_balancer::backend::Endpoint;

/// Transport-level forwarding failure.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid target url: {0}")]
    InvalidUri(#[from] InvalidUri),

    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to read upstream body: {0}")]
    Body(axum::Error),
}

/// Path sent to the backend.
///
/// Starts from the inbound path and query. With `strip_service_prefix` the
/// leading `/{service}` segment is removed first. Exactly one trailing `/`
/// is then dropped, unless the path is just `/`.
pub fn target_path(path_and_query: &str, service: &str, strip_service_prefix: bool) -> String {
    let mut path = if strip_service_prefix {
        let rest = path_and_query
            .strip_prefix('/')
            .and_then(|p| p.strip_prefix(service))
            .unwrap_or(path_and_query);
        if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{}", rest)
        }
    } else {
        path_and_query.to_string()
    };

    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

#[derive(Debug, Clone)]
pub struct Forwarder {
    client: HttpClient,
    timeout: Duration,
    strip_service_prefix: bool,
    strip_hop_by_hop: bool,
    preserve_host: bool,
}

impl Forwarder {
    pub fn new(client: HttpClient, forwarding: &ForwardingConfig, timeouts: &TimeoutConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(timeouts.forward_secs),
            strip_service_prefix: forwarding.strip_service_prefix,
            strip_hop_by_hop: forwarding.strip_hop_by_hop,
            preserve_host: forwarding.preserve_host,
        }
    }

    /// Full URL the request will be sent to.
    pub fn target_url(&self, endpoint: &Endpoint, request: &ProxyRequest) -> String {
        endpoint.join(&target_path(
            &request.path_and_query,
            &request.service,
            self.strip_service_prefix,
        ))
    }

    fn build_request(&self, url: &str, request: &ProxyRequest) -> Result<Request<Body>, ForwardError> {
        let uri: Uri = url.parse()?;
        let body = if request.sends_body() {
            Body::from(request.body.clone())
        } else {
            Body::empty()
        };

        let mut outbound = Request::builder()
            .method(request.method.clone())
            .uri(uri)
            .body(body)?;
        *outbound.headers_mut() =
            outbound_request_headers(&request.headers, self.strip_hop_by_hop, self.preserve_host);
        Ok(outbound)
    }

    /// Send `request` to `endpoint` and buffer the reply.
    pub async fn forward(
        &self,
        endpoint: &Endpoint,
        request: &ProxyRequest,
    ) -> Result<ProxyResponse, ForwardError> {
        let url = self.target_url(endpoint, request);
        let outbound = self.build_request(&url, request)?;

        let exchange = async {
            let response = self.client.request(outbound).await?;
            let (parts, body) = response.into_parts();
            let body = axum::body::to_bytes(Body::new(body), usize::MAX)
                .await
                .map_err(ForwardError::Body)?;
            Ok::<_, ForwardError>((parts, body))
        };

        let (parts, body) = time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ForwardError::Timeout(self.timeout))??;

        let mut headers = parts.headers;
        if self.strip_hop_by_hop {
            strip_hop_by_hop(&mut headers);
        }

        Ok(ProxyResponse {
            status: parts.status,
            headers,
            body,
        })
    }
}
