//! Active HTTP liveness probe.
//!
//! # Responsibilities
//! - GET `{endpoint}{path}` on demand during failover selection
//! - Bound every probe with a timeout
//! - Treat any 2xx as alive, everything else as dead

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Uri};
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::health::probe::{LivenessProbe, ProbeError};
use crate::http::client::HttpClient;
use crate::load_balancer::backend::Endpoint;

#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: HttpClient,
    path: String,
    timeout: Duration,
    user_agent: String,
}

impl HttpProbe {
    pub fn new(client: HttpClient, config: &HealthCheckConfig) -> Self {
        Self {
            client,
            path: config.path.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl LivenessProbe for HttpProbe {
    async fn check(&self, endpoint: &Endpoint) -> Result<(), ProbeError> {
        let url = endpoint.join(&self.path);
        let uri: Uri = url
            .parse()
            .map_err(|source| ProbeError::InvalidUri { url: url.clone(), source })?;

        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::USER_AGENT, self.user_agent.as_str())
            .body(Body::empty())?;

        let response = time::timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))??;

        let status = response.status();
        if status.is_success() {
            tracing::trace!(endpoint = %endpoint, status = %status, "Health check passed");
            Ok(())
        } else {
            Err(ProbeError::Status(status))
        }
    }
}
