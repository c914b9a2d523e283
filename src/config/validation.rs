//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every service has at least one well-formed `http` endpoint
//! - Validate value ranges (timeouts > 0, body limit > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),

    #[error("no services configured")]
    NoServices,

    #[error("service name `{0}` must be non-empty and contain no `/`")]
    ServiceName(String),

    #[error("service `{0}` has no endpoints")]
    EmptyService(String),

    #[error("service `{service}` endpoint `{url}`: {reason}")]
    Endpoint {
        service: String,
        url: String,
        reason: String,
    },

    #[error("health_check.path `{0}` must start with `/`")]
    HealthPath(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Check an endpoint base URL. Only plain `http` without query or fragment is accepted.
pub fn check_endpoint_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme `{}`", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("query and fragment are not allowed".to_string());
    }
    Ok(url)
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.services.0.is_empty() {
        errors.push(ValidationError::NoServices);
    }

    for (name, endpoints) in config.services.iter() {
        if name.is_empty() || name.contains('/') {
            errors.push(ValidationError::ServiceName(name.clone()));
        }
        if endpoints.is_empty() {
            errors.push(ValidationError::EmptyService(name.clone()));
        }
        for raw in endpoints {
            if let Err(reason) = check_endpoint_url(raw) {
                errors.push(ValidationError::Endpoint {
                    service: name.clone(),
                    url: raw.clone(),
                    reason,
                });
            }
        }
    }

    if !config.health_check.path.starts_with('/') {
        errors.push(ValidationError::HealthPath(config.health_check.path.clone()));
    }

    let ranges = [
        ("health_check.timeout_secs", config.health_check.timeout_secs),
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.forward_secs", config.timeouts.forward_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("forwarding.max_body_bytes", config.forwarding.max_body_bytes as u64),
    ];
    for (field, value) in ranges {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.services.clear();
        config.services.insert("empty", vec![]);
        config.services.insert("bad/name", vec!["http://localhost:1".into()]);
        config.services.insert(
            "tls",
            vec!["https://localhost:1".into(), "http://localhost:2/?q=1".into()],
        );
        config.health_check.path = "health".into();
        config.timeouts.forward_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::BindAddress("nowhere".into())));
        assert!(errors.contains(&ValidationError::EmptyService("empty".into())));
        assert!(errors.contains(&ValidationError::ServiceName("bad/name".into())));
        assert!(errors.contains(&ValidationError::HealthPath("health".into())));
        assert!(errors.contains(&ValidationError::Zero("timeouts.forward_secs")));
        let endpoint_errors = errors
            .iter()
            .filter(|e| matches!(e, ValidationError::Endpoint { .. }))
            .count();
        assert_eq!(endpoint_errors, 2);
    }

    #[test]
    fn endpoint_url_rules() {
        assert!(check_endpoint_url("http://localhost:8081").is_ok());
        assert!(check_endpoint_url("http://10.1.2.3:80/base").is_ok());
        assert!(check_endpoint_url("localhost:8081").is_err());
        assert!(check_endpoint_url("https://localhost:8081").is_err());
        assert!(check_endpoint_url("http://localhost:8081#frag").is_err());
    }
}
