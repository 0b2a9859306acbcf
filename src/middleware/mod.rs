//! Middleware layer.
//!
//! Two composable handlers, both built on one rule: **the first handler to
//! commit a response wins, and nothing after it runs.**
//!
//! - [`First`] runs handlers in order until one commits.
//! - [`Guard`] runs a check in front of a handler; a failing check answers
//!   with a content-negotiated error and the handler is never reached.
//!
//! Both are [`Handler`](crate::Handler)s, so they nest freely:
//!
//! ```rust
//! use http::StatusCode;
//! use sieve::middleware::{First, Guard};
//! use sieve::{handler_fn, Failure, GuardResult, Request};
//!
//! fn authenticated(req: &Request) -> GuardResult {
//!     match req.header("authorization") {
//!         Some(_) => GuardResult::pass(),
//!         None => GuardResult::fail(Failure::with_status(StatusCode::UNAUTHORIZED, "unauthorized")),
//!     }
//! }
//!
//! let app = First::new()
//!     .then(handler_fn(|w, req| {
//!         if req.path() == "/healthz" {
//!             w.write_head(StatusCode::OK);
//!         }
//!     }))
//!     .then(Guard::new(authenticated, handler_fn(|w, _| w.write_head(StatusCode::NO_CONTENT))));
//! ```

mod first;
mod guard;

pub use first::First;
pub use guard::{Guard, GuardResult};
