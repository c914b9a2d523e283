//! Header filtering for proxied traffic.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers (RFC 9110 §7.6.1), including those named in `Connection`
//! - Drop headers the outbound client must compute itself
//!
//! # Design Decisions
//! - Multi-valued headers are kept as-is
//! - Filtering is optional so a raw pass-through remains possible

use axum::http::header::{self, HeaderMap, HeaderName};

/// Headers that apply to a single connection and must not be relayed.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove hop-by-hop headers in place.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

/// Outbound request headers derived from the inbound ones.
///
/// `content-length` is always dropped because the client recomputes it from
/// the body actually sent; `host` is dropped unless `preserve_host` so the
/// client fills in the backend authority.
pub fn outbound_request_headers(
    inbound: &HeaderMap,
    strip_hop: bool,
    preserve_host: bool,
) -> HeaderMap {
    let mut headers = inbound.clone();
    headers.remove(header::CONTENT_LENGTH);
    if !preserve_host {
        headers.remove(header::HOST);
    }
    if strip_hop {
        strip_hop_by_hop(&mut headers);
    }
    headers
}
