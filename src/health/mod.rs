//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Failover selection (load_balancer::selector):
//!     Candidate endpoint picked by rotation
//!     → probe.rs (LivenessProbe contract)
//!     → active.rs (GET {endpoint}/health with timeout)
//!     → alive: candidate returned; dead: next candidate
//! ```
//!
//! # Design Decisions
//! - Probes run on demand, per selection attempt
//! - No health state is stored between requests
//! - The probe sits behind a trait so selection can be tested without sockets

pub mod active;
pub mod probe;

pub use active::HttpProbe;
pub use probe::{LivenessProbe, ProbeError};
