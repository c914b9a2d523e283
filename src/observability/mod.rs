//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway, selector and forwarder produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is attached to every per-request log line
//! - Metrics are cheap and disabled unless configured

pub mod logging;
pub mod metrics;
