//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use service_gateway::config::{GatewayConfig, SelectionMode};
use service_gateway::{HttpServer, Shutdown};

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Programmable backend state.
#[derive(Debug)]
pub struct Backend {
    pub name: String,
    pub healthy: AtomicBool,
    pub health_hits: AtomicUsize,
    pub status: Mutex<(StatusCode, String)>,
    pub extra_headers: Mutex<HeaderMap>,
    pub delay_ms: AtomicU64,
    pub health_delay_ms: AtomicU64,
    pub requests: Mutex<Vec<Recorded>>,
}

impl Backend {
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn respond_with(&self, status: StatusCode, body: &str) {
        *self.status.lock().unwrap() = (status, body.to_string());
    }

    /// Add a header to every non-health response.
    pub fn respond_with_header(&self, name: &'static str, value: &'static str) {
        self.extra_headers.lock().unwrap().append(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    /// Stall every non-health response.
    pub fn stall(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Stall `/health` responses.
    pub fn stall_health(&self, delay: Duration) {
        self.health_delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn health_hits(&self) -> usize {
        self.health_hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn health(State(backend): State<Arc<Backend>>) -> StatusCode {
    backend.health_hits.fetch_add(1, Ordering::SeqCst);
    let delay = backend.health_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    if backend.healthy.load(Ordering::SeqCst) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn echo(
    State(backend): State<Arc<Backend>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    backend.requests.lock().unwrap().push(Recorded {
        method,
        uri: uri.to_string(),
        headers,
        body,
    });
    let delay = backend.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let (status, body) = backend.status.lock().unwrap().clone();
    let mut headers = backend.extra_headers.lock().unwrap().clone();
    headers.insert("x-backend", HeaderValue::from_str(&backend.name).unwrap());
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    (status, headers, body)
}

/// Start a mock backend on an ephemeral port.
///
/// `/health` answers 200 while healthy, 503 otherwise. Every other path
/// records the request and answers with the programmed status, headers and
/// body (default: 200 and the backend name). Either side can be stalled.
pub async fn start_backend(name: &str) -> (SocketAddr, Arc<Backend>) {
    let backend = Arc::new(Backend {
        name: name.to_string(),
        healthy: AtomicBool::new(true),
        health_hits: AtomicUsize::new(0),
        status: Mutex::new((StatusCode::OK, name.to_string())),
        extra_headers: Mutex::new(HeaderMap::new()),
        delay_ms: AtomicU64::new(0),
        health_delay_ms: AtomicU64::new(0),
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/health", get(health))
        .fallback(echo)
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, backend)
}

/// An address nothing listens on.
pub fn dead_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config with only the given services and fast timeouts.
pub fn config(mode: SelectionMode, services: &[(&str, Vec<SocketAddr>)]) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.selection.mode = mode;
    config.health_check.timeout_secs = 1;
    config.timeouts.connect_secs = 1;
    config.timeouts.forward_secs = 2;
    config.services.clear();
    for (name, addrs) in services {
        config.services.insert(
            *name,
            addrs.iter().map(|a| format!("http://{}", a)).collect(),
        );
    }
    config
}

/// A running gateway on an ephemeral port.
pub struct RunningGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_gateway(config: GatewayConfig) -> RunningGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let rx: broadcast::Receiver<()> = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningGateway { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
