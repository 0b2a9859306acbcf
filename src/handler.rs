//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! A [`First`](crate::middleware::First) chain holds handlers of *different*
//! types in one `Vec`. Rust collections can only hold one concrete type, so
//! every handler is erased behind `Arc<dyn Handler>` and stored uniformly.
//!
//! ```text
//! fn(&mut dyn ResponseWriter, &Request)     ← user writes this
//!        ↓ handler_fn(f)
//! HandlerFn(f)                              ← implements Handler
//!        ↓ .boxed()  /  First::then(…)
//! Arc<dyn Handler>                          ← stored as BoxedHandler
//!        ↓
//! handler.serve(&mut guard, &req)           ← one vtable dispatch per step
//! ```
//!
//! `First` and `Guard` implement [`Handler`] themselves, so chains nest to
//! any depth without special cases.

use std::sync::Arc;

use crate::request::Request;
use crate::writer::ResponseWriter;

/// A type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn Handler>;

/// A unit of request handling.
///
/// A handler reacts to a request purely through side effects on the
/// [`ResponseWriter`]. It may set headers and return, leaving the response to
/// whoever runs next, or commit with
/// [`write_head`](ResponseWriter::write_head), which ends a
/// [`First`](crate::middleware::First) chain.
///
/// `serve` is synchronous. `Send + Sync + 'static` let one handler tree be
/// shared by every connection task.
pub trait Handler: Send + Sync + 'static {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request);

    /// Erases the handler's type.
    fn boxed(self) -> BoxedHandler
    where
        Self: Sized,
    {
        Arc::new(self)
    }
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        (**self).serve(w, req);
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        (**self).serve(w, req);
    }
}

// ── Closures ──────────────────────────────────────────────────────────────────

/// Turns a closure into a [`Handler`].
///
/// ```rust
/// use http::StatusCode;
/// use sieve::{handler_fn, Handler};
///
/// let teapot = handler_fn(|w, _req| w.write_head(StatusCode::IM_A_TEAPOT));
/// # let _ = teapot.boxed();
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, &Request) + Send + Sync + 'static,
{
    HandlerFn(f)
}

/// A [`Handler`] made from a closure. See [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F>(F);

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, &Request) + Send + Sync + 'static,
{
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        (self.0)(w, req);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;

    use crate::response::Response;

    fn request() -> Request {
        Request::from(http::Request::new(Bytes::new()))
    }

    #[test]
    fn closures_become_handlers() {
        let h = handler_fn(|w, _req| {
            w.write_head(StatusCode::ACCEPTED);
            w.write(b"ok");
        });

        let mut res = Response::new();
        h.serve(&mut res, &request());
        assert_eq!(res.status(), Some(StatusCode::ACCEPTED));
        assert_eq!(res.body(), b"ok");
    }

    #[test]
    fn erased_handlers_still_serve() {
        let h: BoxedHandler = handler_fn(|w, req| w.write(req.path().as_bytes())).boxed();
        let shared = Arc::clone(&h);

        let mut res = Response::new();
        shared.serve(&mut res, &request());
        assert_eq!(res.body(), b"/");
    }
}
