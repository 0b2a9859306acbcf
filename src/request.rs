//! Incoming HTTP request type.

use bytes::Bytes;
use http::header::{ACCEPT, AsHeaderName};
use http::{HeaderMap, Method};

use crate::negotiate;

/// An incoming HTTP request with its body already collected.
///
/// Every handler in a chain sees the same `&Request`; nothing downstream can
/// mutate it.
pub struct Request {
    parts: http::request::Parts,
    body: Bytes,
}

impl Request {
    pub(crate) fn new(parts: http::request::Parts, body: Bytes) -> Self {
        Self { parts, body }
    }

    pub fn method(&self) -> &Method { &self.parts.method }
    pub fn path(&self) -> &str { self.parts.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.parts.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Values that are not visible ASCII
    /// read as absent.
    pub fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether an error for this request should be rendered as JSON.
    ///
    /// See [`negotiate::prefers_json`] for the exact rule.
    pub fn prefers_json(&self) -> bool {
        negotiate::prefers_json(self.header(ACCEPT))
    }
}

/// Build a request directly, e.g. in handler tests or a custom transport.
///
/// ```rust
/// use bytes::Bytes;
/// use sieve::Request;
///
/// let req = Request::from(
///     http::Request::builder()
///         .uri("/users/42")
///         .header("accept", "application/json")
///         .body(Bytes::new())
///         .unwrap(),
/// );
/// assert_eq!(req.path(), "/users/42");
/// assert!(req.prefers_json());
/// ```
impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(accept: Option<&str>) -> Request {
        let mut builder = http::Request::builder().method(Method::POST).uri("/orders?page=2");
        if let Some(accept) = accept {
            builder = builder.header("Accept", accept);
        }
        Request::from(builder.body(Bytes::from_static(b"{}")).unwrap())
    }

    #[test]
    fn exposes_request_line_and_body() {
        let req = request(None);
        assert_eq!(*req.method(), Method::POST);
        assert_eq!(req.path(), "/orders");
        assert_eq!(req.body(), b"{}");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = request(Some("text/plain"));
        assert_eq!(req.header("accept"), Some("text/plain"));
        assert_eq!(req.header("ACCEPT"), Some("text/plain"));
        assert_eq!(req.header(ACCEPT), Some("text/plain"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn negotiation_reads_the_accept_header() {
        assert!(request(Some("application/json")).prefers_json());
        assert!(!request(Some("text/plain")).prefers_json());
        assert!(!request(None).prefers_json());
    }
}
