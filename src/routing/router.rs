//! Service resolution and dispatch.
//!
//! # Responsibilities
//! - Map the first path segment to a registered service
//! - Drive selection then forwarding for one request
//! - Convert every stage failure into a `GatewayError`
//!
//! # Request States
//! ```text
//! Received → ServiceResolved → EndpointSelected → Forwarded → Completed
//!               │ unknown          │ all down         │ transport error
//!               ▼                  ▼                  ▼
//!              404                500                500
//! ```
//!
//! # Design Decisions
//! - Unknown services are rejected before the body is read
//! - No retry of a failed forward against another endpoint

use std::sync::Arc;

use axum::{body::Body, http::Request};

use crate::config::{GatewayConfig, SelectionMode};
use crate::error::GatewayError;
use crate::health::HttpProbe;
use crate::http::client::HttpClient;
use crate::http::forward::Forwarder;
use crate::http::request::ProxyRequest;
use crate::http::response::ProxyResponse;
use crate::load_balancer::selector::{SelectionStrategy, Selector};
use crate::routing::registry::{RegistryError, ServiceRegistry};

/// First non-empty path segment, e.g. `user` for `/user/profile`.
pub fn service_segment(path: &str) -> Option<&str> {
    path.strip_prefix('/')
        .unwrap_or(path)
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

/// Routes inbound requests to service clusters.
#[derive(Debug)]
pub struct Gateway {
    selector: Selector,
    forwarder: Forwarder,
    max_body_bytes: usize,
}

impl Gateway {
    pub fn new(selector: Selector, forwarder: Forwarder, max_body_bytes: usize) -> Self {
        Self {
            selector,
            forwarder,
            max_body_bytes,
        }
    }

    /// Wire registry, selector and forwarder from configuration.
    pub fn from_config(config: &GatewayConfig, client: HttpClient) -> Result<Self, RegistryError> {
        let registry = Arc::new(ServiceRegistry::from_config(&config.services)?);

        let strategy = match config.selection.mode {
            SelectionMode::RoundRobin => SelectionStrategy::RoundRobin,
            SelectionMode::Failover => SelectionStrategy::Failover(Arc::new(HttpProbe::new(
                client.clone(),
                &config.health_check,
            ))),
        };

        let forwarder = Forwarder::new(client, &config.forwarding, &config.timeouts);
        Ok(Self::new(
            Selector::new(registry, strategy),
            forwarder,
            config.forwarding.max_body_bytes,
        ))
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Resolve the service named by the first path segment.
    pub fn resolve<'a>(&self, path: &'a str) -> Result<&'a str, GatewayError> {
        match service_segment(path) {
            Some(service) if self.selector.registry().contains(service) => Ok(service),
            Some(service) => Err(GatewayError::UnknownService(service.to_string())),
            None => Err(GatewayError::UnknownService(String::new())),
        }
    }

    /// Select an endpoint of `service` and relay `request` to it.
    pub async fn dispatch(
        &self,
        service: &str,
        request: Request<Body>,
    ) -> Result<ProxyResponse, GatewayError> {
        let request = ProxyRequest::capture(service, request, self.max_body_bytes).await?;
        let endpoint = self.selector.select(service).await?;

        let target = self.forwarder.target_url(endpoint, &request);
        tracing::info!(
            request_id = request.request_id().unwrap_or("unknown"),
            service = %service,
            url = %target,
            "Forwarding request"
        );

        self.forwarder
            .forward(endpoint, &request)
            .await
            .map_err(|source| {
                tracing::error!(url = %target, error = %source, "Error forwarding request");
                GatewayError::ForwardFailure { target, source }
            })
    }

    /// Resolve then dispatch.
    pub async fn handle(&self, request: Request<Body>) -> Result<ProxyResponse, GatewayError> {
        let path = request.uri().path().to_string();
        let service = self.resolve(&path)?;
        self.dispatch(service, request).await
    }
}
