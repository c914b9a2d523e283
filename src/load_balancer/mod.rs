//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Service resolved → endpoints from routing::registry
//!     → selector.rs (strategy: round robin or failover)
//!         - round_robin.rs (per-service atomic cursor)
//!         - health::LivenessProbe (failover only)
//!     → backend.rs (selected Endpoint)
//!     → Return endpoint or Unavailable
//! ```
//!
//! # Design Decisions
//! - Cursor advances once per attempt, success or not
//! - Cursors are per service; services never contend with each other
//! - Strategy chosen at construction, not per request

pub mod backend;
pub mod round_robin;
pub mod selector;

pub use backend::Endpoint;
pub use round_robin::RoundRobin;
pub use selector::{SelectError, SelectionStrategy, Selector};
