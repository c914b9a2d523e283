//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Endpoint selection settings.
    pub selection: SelectionConfig,

    /// Liveness probe settings (failover mode).
    pub health_check: HealthCheckConfig,

    /// Outbound request shaping.
    pub forwarding: ForwardingConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Service name -> ordered list of backend base URLs.
    pub services: ServicesConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// How an endpoint is picked within a service cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Plain rotation, no liveness checks.
    RoundRobin,
    /// Rotation that probes each candidate and skips dead ones.
    #[default]
    Failover,
}

/// Endpoint selection configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SelectionConfig {
    pub mode: SelectionMode,
}

/// Liveness probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Path appended to the endpoint base URL.
    pub path: String,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent sent with every probe.
    pub user_agent: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            path: "/health".to_string(),
            timeout_secs: 3,
            user_agent: "service-gateway-health-check".to_string(),
        }
    }
}

/// Outbound request shaping.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Drop the leading `/{service}` segment before forwarding.
    pub strip_service_prefix: bool,

    /// Strip hop-by-hop headers in both directions.
    pub strip_hop_by_hop: bool,

    /// Send the caller's `Host` header instead of the backend authority.
    pub preserve_host: bool,

    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            strip_service_prefix: false,
            strip_hop_by_hop: true,
            preserve_host: false,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Deadline for a single forwarded call in seconds.
    pub forward_secs: u64,

    /// Overall inbound request deadline in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            forward_secs: 30,
            request_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Static service table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ServicesConfig(pub BTreeMap<String, Vec<String>>);

impl ServicesConfig {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn insert(&mut self, name: impl Into<String>, endpoints: Vec<String>) {
        self.0.insert(name.into(), endpoints);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        let table = [
            ("user", ["http://localhost:8081", "http://localhost:8085"]),
            ("restaurant", ["http://localhost:8082", "http://localhost:8086"]),
            ("order", ["http://localhost:8083", "http://localhost:8087"]),
            ("delivery", ["http://localhost:8090", "http://localhost:8091"]),
        ];

        Self(
            table
                .into_iter()
                .map(|(name, urls)| {
                    (name.to_string(), urls.iter().map(|u| u.to_string()).collect())
                })
                .collect(),
        )
    }
}
