//! Static service registry.
//!
//! # Responsibilities
//! - Map service name to its ordered endpoint list
//! - Reject empty clusters and malformed endpoints at construction
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - Endpoint order is the configured order; rotation relies on it

use std::collections::HashMap;

use thiserror::Error;

use crate::config::ServicesConfig;
use crate::load_balancer::backend::Endpoint;

/// Error building the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("service `{0}` has no endpoints")]
    Empty(String),

    #[error("service `{service}` endpoint `{url}` is invalid: {reason}")]
    InvalidEndpoint {
        service: String,
        url: String,
        reason: String,
    },
}

/// Service name → ordered endpoints.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Vec<Endpoint>>,
}

impl ServiceRegistry {
    /// Build the registry from the configured service table.
    pub fn from_config(services: &ServicesConfig) -> Result<Self, RegistryError> {
        let mut registry = HashMap::new();

        for (name, urls) in services.iter() {
            if urls.is_empty() {
                return Err(RegistryError::Empty(name.clone()));
            }

            let endpoints = urls
                .iter()
                .map(|url| {
                    Endpoint::parse(url).map_err(|reason| RegistryError::InvalidEndpoint {
                        service: name.clone(),
                        url: url.clone(),
                        reason,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            tracing::debug!(service = %name, endpoints = endpoints.len(), "Service registered");
            registry.insert(name.clone(), endpoints);
        }

        Ok(Self { services: registry })
    }

    /// Ordered endpoints of a service, or `None` when it is not configured.
    pub fn lookup(&self, service: &str) -> Option<&[Endpoint]> {
        self.services.get(service).map(Vec::as_slice)
    }

    pub fn contains(&self, service: &str) -> bool {
        self.services.contains_key(service)
    }

    /// Names of all registered services.
    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }
}
