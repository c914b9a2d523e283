//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all gateway handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and stop on the shutdown signal
//! - Record per-request metrics

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    BoxError, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::client::build_client;
use crate::http::request::{GatewayRequestId, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::{Gateway, RegistryError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, RegistryError> {
        let client = build_client(&config.timeouts);
        let gateway = Arc::new(Gateway::from_config(&config, client)?);

        let router = Self::build_router(&config, AppState { gateway });
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let deadline = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )));

        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(deadline)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(GatewayRequestId))
    }

    /// The fully layered application, for serving or in-process testing.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = ?self.config.selection.mode,
            "API gateway listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Render middleware failures in the same JSON shape as gateway errors.
async fn handle_middleware_error(err: BoxError) -> GatewayError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request deadline exceeded");
        GatewayError::RequestTimeout
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        GatewayError::Internal(err.to_string())
    }
}

/// Catch-all handler: resolve service, select endpoint, forward.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let service = match state.gateway.resolve(&path) {
        Ok(service) => service,
        Err(e) => {
            tracing::warn!(request_id = %request_id, path = %path, "Service not found");
            metrics::record_request(&method, e.status().as_u16(), "none", start_time);
            return e.into_response();
        }
    };

    let response = match state.gateway.dispatch(service, request).await {
        Ok(relayed) => relayed.into_response(),
        Err(e) => {
            tracing::warn!(request_id = %request_id, service = %service, error = %e, "Request failed");
            e.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), service, start_time);
    response
}
