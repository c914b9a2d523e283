//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (request ID, buffered ProxyRequest)
//!     → [routing layer resolves service, selector picks endpoint]
//!     → forward.rs + headers.rs (outbound call through client.rs)
//!     → response.rs (relay status, headers, body)
//!     → Send to client
//! ```

pub mod client;
pub mod forward;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use client::{build_client, HttpClient};
pub use forward::{ForwardError, Forwarder};
pub use request::{GatewayRequestId, ProxyRequest, X_REQUEST_ID};
pub use response::ProxyResponse;
pub use server::HttpServer;
