//! First-write-wins handler chain.

use tracing::trace;

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::writer::{ResponseWriter, WriteGuard};

/// Runs handlers in order until one of them commits the response.
///
/// Each request gets one fresh [`WriteGuard`] around the caller's writer; all
/// handlers in the chain write through it. After every handler returns, the
/// chain checks the guard and stops at the first commit. If nobody commits,
/// every handler runs exactly once and the response is left uncommitted for
/// the caller to deal with.
///
/// The handler list is fixed once the chain starts serving; the chain itself
/// keeps no per-request state.
///
/// ```rust
/// use http::{HeaderValue, StatusCode, header::CACHE_CONTROL};
/// use sieve::middleware::First;
/// use sieve::{handler_fn, Handler, Request, Response, ResponseWriter};
///
/// let chain = First::new()
///     // sets a header, does not commit: the chain continues
///     .then(handler_fn(|w, _| w.set_header(CACHE_CONTROL, HeaderValue::from_static("no-store"))))
///     // commits: the chain stops here
///     .then(handler_fn(|w, _| w.write_head(StatusCode::NO_CONTENT)))
///     // never runs
///     .then(handler_fn(|w, _| w.write_head(StatusCode::INTERNAL_SERVER_ERROR)));
///
/// let mut res = Response::new();
/// chain.serve(&mut res, &Request::from(http::Request::new(bytes::Bytes::new())));
///
/// assert_eq!(res.status(), Some(StatusCode::NO_CONTENT));
/// assert_eq!(res.headers()[CACHE_CONTROL], "no-store");
/// ```
#[derive(Clone, Default)]
pub struct First {
    handlers: Vec<BoxedHandler>,
}

impl First {
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Appends `handler` to the end of the chain. Returns `self` for chaining.
    pub fn then(mut self, handler: impl Handler) -> Self {
        self.handlers.push(handler.boxed());
        self
    }

    pub fn len(&self) -> usize { self.handlers.len() }
    pub fn is_empty(&self) -> bool { self.handlers.is_empty() }
}

impl FromIterator<BoxedHandler> for First {
    fn from_iter<I: IntoIterator<Item = BoxedHandler>>(iter: I) -> Self {
        Self { handlers: iter.into_iter().collect() }
    }
}

impl Handler for First {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        let mut guard = WriteGuard::new(w);
        for (i, handler) in self.handlers.iter().enumerate() {
            handler.serve(&mut guard, req);
            if guard.committed() {
                trace!(handler = i, skipped = self.handlers.len() - i - 1, "response committed");
                break;
            }
        }
    }
}
