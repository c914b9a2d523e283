//! Outbound HTTP client shared by the forwarder and the liveness probe.

use std::time::Duration;

use axum::body::Body;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::TimeoutConfig;

/// Pooled plain-HTTP client.
pub type HttpClient = Client<HttpConnector, Body>;

/// Build the client with the configured connect timeout.
pub fn build_client(timeouts: &TimeoutConfig) -> HttpClient {
    let mut connector = HttpConnector::new();
    connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
    connector.set_nodelay(true);

    Client::builder(TokioExecutor::new()).build(connector)
}
