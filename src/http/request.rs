//! Inbound request capture and request IDs.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound call
//! - Buffer the inbound body once, bounded by the configured limit
//! - Keep the original path and query for target construction
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The raw body bytes are kept untouched; nothing is re-serialized

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderValue, Method, Request},
};
use http_body_util::LengthLimitError;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::GatewayError;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Assigns a fresh UUID v4 unless the caller already sent one.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayRequestId;

impl MakeRequestId for GatewayRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// 413 only when the size limit tripped; any other read failure is the
/// caller's fault (aborted upload, broken chunked framing).
fn body_error(err: axum::Error, limit: usize) -> GatewayError {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
    while let Some(cause) = source {
        if cause.is::<LengthLimitError>() {
            return GatewayError::BodyTooLarge { limit };
        }
        source = cause.source();
    }
    GatewayError::InvalidBody(err.to_string())
}

/// An inbound call, fully buffered, owned by its in-flight handler.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    /// Service the call was routed to.
    pub service: String,
    pub method: Method,
    /// Original path plus query string, exactly as received.
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ProxyRequest {
    /// Capture an axum request, reading at most `max_body_bytes` of body.
    pub async fn capture(
        service: &str,
        request: Request<Body>,
        max_body_bytes: usize,
    ) -> Result<Self, GatewayError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, max_body_bytes)
            .await
            .map_err(|e| body_error(e, max_body_bytes))?;

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        Ok(Self {
            service: service.to_string(),
            method: parts.method,
            path_and_query,
            headers: parts.headers,
            body,
        })
    }

    /// The value of the request ID header, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
    }

    /// GET and HEAD never carry a forwarded body.
    pub fn sends_body(&self) -> bool {
        self.method != Method::GET && self.method != Method::HEAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Frame;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    #[tokio::test]
    async fn captures_path_query_and_raw_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/user/profile/?verbose=1")
            .header("content-type", "application/json")
            .body(Body::from("{ \"b\": 1,  \"a\": 2 }"))
            .unwrap();

        let captured = ProxyRequest::capture("user", request, 1024).await.unwrap();
        assert_eq!(captured.service, "user");
        assert_eq!(captured.path_and_query, "/user/profile/?verbose=1");
        assert_eq!(&captured.body[..], b"{ \"b\": 1,  \"a\": 2 }");
        assert!(captured.sends_body());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/user/x")
            .body(Body::from(vec![b'a'; 64]))
            .unwrap();

        let err = ProxyRequest::capture("user", request, 16).await.unwrap_err();
        assert!(matches!(err, GatewayError::BodyTooLarge { limit: 16 }));
    }

    /// A body stream that fails like a client hanging up mid-upload.
    struct AbortedUpload;

    impl hyper::body::Body for AbortedUpload {
        type Data = Bytes;
        type Error = std::io::Error;

        fn poll_frame(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Bytes>, Self::Error>>> {
            Poll::Ready(Some(Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "client went away",
            ))))
        }
    }

    #[tokio::test]
    async fn broken_body_is_bad_request_not_too_large() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/user/x")
            .body(Body::new(AbortedUpload))
            .unwrap();

        let err = ProxyRequest::capture("user", request, 1024).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidBody(_)));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn request_ids_are_unique() {
        let mut maker = GatewayRequestId;
        let request = Request::new(());
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
