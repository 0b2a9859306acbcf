//! The buffered response sink the server hands to the handler tree.
//!
//! You should not need to think about this module directly unless you test
//! handlers: build a [`Response`], pass it to
//! [`Handler::serve`](crate::Handler::serve), then read back what was written.

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderValue, StatusCode};
use http_body_util::Full;
use tracing::warn;

use crate::writer::ResponseWriter;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for the `content-type` header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Csv,          // text/csv
    EventStream,  // text/event-stream  (SSE)
    Html,         // text/html; charset=utf-8
    Json,         // application/json
    OctetStream,  // application/octet-stream
    Text,         // text/plain; charset=utf-8
    Xml,          // application/xml
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv         => "text/csv",
            Self::EventStream => "text/event-stream",
            Self::Html        => "text/html; charset=utf-8",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Xml         => "application/xml",
        }
    }

    pub fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// A [`ResponseWriter`] that buffers everything in memory.
///
/// The first [`write_head`](ResponseWriter::write_head) fixes the status and
/// snapshots the headers; the response is then committed. Header edits after
/// that point are not sent, and further `write_head` calls are logged and
/// dropped. Writing body bytes before any commit implicitly commits `200 OK`.
///
/// ```rust
/// use http::StatusCode;
/// use sieve::{Response, ResponseWriter};
///
/// let mut res = Response::new();
/// res.write_head(StatusCode::ACCEPTED);
/// res.write(b"queued");
///
/// assert_eq!(res.status(), Some(StatusCode::ACCEPTED));
/// assert_eq!(res.body(), b"queued");
/// ```
#[derive(Debug, Default)]
pub struct Response {
    pending: HeaderMap,
    head: Option<(StatusCode, HeaderMap)>,
    body: BytesMut,
}

impl Response {
    pub fn new() -> Self { Self::default() }

    /// The committed status, if anything committed.
    pub fn status(&self) -> Option<StatusCode> {
        self.head.as_ref().map(|(status, _)| *status)
    }

    pub fn is_committed(&self) -> bool { self.head.is_some() }

    /// The headers that will be sent: the snapshot taken at commit time, or
    /// the pending set while uncommitted.
    pub fn headers(&self) -> &HeaderMap {
        match &self.head {
            Some((_, headers)) => headers,
            None => &self.pending,
        }
    }

    pub fn body(&self) -> &[u8] { &self.body }

    /// Converts into the hyper response type.
    ///
    /// A response no handler committed becomes an empty `404 Not Found`.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let (status, headers) = self
            .head
            .unwrap_or_else(|| (StatusCode::NOT_FOUND, HeaderMap::new()));
        let mut res = http::Response::new(Full::new(self.body.freeze()));
        *res.status_mut() = status;
        *res.headers_mut() = headers;
        res
    }
}

impl ResponseWriter for Response {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.pending
    }

    fn write_head(&mut self, status: StatusCode) {
        if let Some((sent, _)) = &self.head {
            warn!(sent = sent.as_u16(), ignored = status.as_u16(), "superfluous write_head");
            return;
        }
        self.head = Some((status, self.pending.clone()));
    }

    fn write(&mut self, body: &[u8]) {
        if self.head.is_none() {
            self.write_head(StatusCode::OK);
        }
        self.body.extend_from_slice(body);
    }
}
