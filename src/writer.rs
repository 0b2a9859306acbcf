//! The response sink handlers write into, and the guard that watches it.

use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

/// Everything a handler can do to a response.
///
/// The sink is handed to handlers as `&mut dyn ResponseWriter`. A handler
/// *commits* the response by calling [`write_head`](ResponseWriter::write_head);
/// inside a [`First`](crate::middleware::First) chain that is also what ends
/// the chain.
pub trait ResponseWriter {
    /// Headers not yet sent. Changes after the commit are not meaningful.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Commits the response with `status`.
    fn write_head(&mut self, status: StatusCode);

    /// Appends bytes to the response body.
    fn write(&mut self, body: &[u8]);

    /// Sets `name`, replacing every value it had.
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers_mut().insert(name, value);
    }
}

/// A [`ResponseWriter`] wrapper that remembers whether anything committed
/// through it.
///
/// Every call is forwarded to the wrapped writer unchanged, including a
/// second `write_head`: what a repeated commit means is the wrapped writer's
/// business. The flag only ever goes from `false` to `true`.
///
/// Body writes do not flip the flag, even if the underlying sink treats them
/// as an implicit `200`. Handlers that want to end a chain commit explicitly.
pub struct WriteGuard<'a> {
    inner: &'a mut dyn ResponseWriter,
    committed: bool,
}

impl<'a> WriteGuard<'a> {
    pub fn new(inner: &'a mut dyn ResponseWriter) -> Self {
        Self { inner, committed: false }
    }

    /// Whether `write_head` has been called through this guard.
    pub fn committed(&self) -> bool { self.committed }
}

impl ResponseWriter for WriteGuard<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_head(&mut self, status: StatusCode) {
        self.committed = true;
        self.inner.write_head(status);
    }

    fn write(&mut self, body: &[u8]) {
        self.inner.write(body);
    }
}
