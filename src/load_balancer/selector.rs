//! Endpoint selection.
//!
//! # Responsibilities
//! - Keep one rotation cursor per service
//! - Simple mode: hand out the next endpoint, no checks
//! - Failover mode: probe candidates in rotation order, first live one wins
//!
//! # Design Decisions
//! - Strategy fixed at construction; both modes share the cursors
//! - The cursor advances before the probe, so a dead endpoint still
//!   rotates the start point for the next request
//! - At most `len` probes per selection; no randomization

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::health::LivenessProbe;
use crate::load_balancer::{backend::Endpoint, round_robin::RoundRobin};
use crate::observability::metrics;
use crate::routing::registry::ServiceRegistry;

/// Selection failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("service `{0}` is not registered")]
    UnknownService(String),

    #[error("all {attempts} endpoints of `{service}` failed their liveness probe")]
    Unavailable { service: String, attempts: usize },
}

/// How endpoints are chosen.
#[derive(Debug, Clone)]
pub enum SelectionStrategy {
    /// Plain rotation.
    RoundRobin,
    /// Rotation that skips endpoints failing the probe.
    Failover(Arc<dyn LivenessProbe>),
}

/// Round-robin endpoint selector over a static registry.
#[derive(Debug)]
pub struct Selector {
    registry: Arc<ServiceRegistry>,
    cursors: HashMap<String, RoundRobin>,
    strategy: SelectionStrategy,
}

impl Selector {
    pub fn new(registry: Arc<ServiceRegistry>, strategy: SelectionStrategy) -> Self {
        // The registry never changes, so cursors are created once and
        // need no map-level locking afterwards.
        let cursors = registry
            .service_names()
            .map(|name| (name.to_string(), RoundRobin::new()))
            .collect();

        Self {
            registry,
            cursors,
            strategy,
        }
    }

    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// Current cursor position of a service.
    pub fn cursor(&self, service: &str) -> Option<usize> {
        self.cursors.get(service).map(RoundRobin::position)
    }

    fn candidates(&self, service: &str) -> Result<(&[Endpoint], &RoundRobin), SelectError> {
        let endpoints = self.registry.lookup(service);
        let cursor = self.cursors.get(service);
        match (endpoints, cursor) {
            (Some(endpoints), Some(cursor)) if !endpoints.is_empty() => Ok((endpoints, cursor)),
            _ => Err(SelectError::UnknownService(service.to_string())),
        }
    }

    /// Simple mode: endpoint at the cursor, then advance. Never probes.
    pub fn next(&self, service: &str) -> Result<&Endpoint, SelectError> {
        let (endpoints, cursor) = self.candidates(service)?;
        Ok(&endpoints[cursor.advance(endpoints.len())])
    }

    /// Failover mode: probe up to `len` candidates in rotation order.
    pub async fn next_available(
        &self,
        service: &str,
        probe: &dyn LivenessProbe,
    ) -> Result<&Endpoint, SelectError> {
        let (endpoints, cursor) = self.candidates(service)?;
        let total = endpoints.len();

        for _ in 0..total {
            let candidate = &endpoints[cursor.advance(total)];

            match probe.check(candidate).await {
                Ok(()) => {
                    metrics::record_probe(candidate.base(), true);
                    return Ok(candidate);
                }
                Err(e) => {
                    metrics::record_probe(candidate.base(), false);
                    tracing::warn!(
                        service = %service,
                        endpoint = %candidate,
                        error = %e,
                        "Endpoint unavailable, trying the next one"
                    );
                }
            }
        }

        Err(SelectError::Unavailable {
            service: service.to_string(),
            attempts: total,
        })
    }

    /// Pick an endpoint with the configured strategy.
    pub async fn select(&self, service: &str) -> Result<&Endpoint, SelectError> {
        match &self.strategy {
            SelectionStrategy::RoundRobin => self.next(service),
            SelectionStrategy::Failover(probe) => self.next_available(service, probe.as_ref()).await,
        }
    }
}
