//! Backend endpoint abstraction.
//!
//! # Responsibilities
//! - Represent a single backend instance of a service cluster
//! - Build outbound URLs (forward target, health probe) from its base URL

use std::fmt;

use crate::config::validation::check_endpoint_url;

/// A concrete backend instance address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Validated base URL without trailing slash.
    base: String,
}

impl Endpoint {
    /// Parse an endpoint from a configured base URL such as `http://localhost:8081`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let url = check_endpoint_url(raw)?;
        let base = url.as_str().trim_end_matches('/').to_string();
        Ok(Self { base })
    }

    /// Base URL without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// `{base}{path}`; `path` is expected to start with `/`.
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
