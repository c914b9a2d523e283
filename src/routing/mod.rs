//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, headers, body)
//!     → router.rs (first path segment → service name)
//!     → registry.rs (service known?)
//!     → load_balancer::selector (pick endpoint)
//!     → http::forward (relay call)
//! ```
//!
//! # Design Decisions
//! - Registry built at startup, immutable at runtime
//! - Service name is always the first path segment
//! - Deterministic: same path always resolves to the same service

pub mod registry;
pub mod router;

pub use registry::{RegistryError, ServiceRegistry};
pub use router::{service_segment, Gateway};
