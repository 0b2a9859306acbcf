//! # sieve
//!
//! First-write-wins handler chains for HTTP services.
//!
//! ## The contract
//!
//! A handler gets a request and a [`ResponseWriter`]. It may set headers and
//! return, or it may *commit* the response with
//! [`write_head`](ResponseWriter::write_head). Chains run handlers in order
//! and stop at the first commit. Guards put a check in front of a handler and
//! commit an error response when the check fails.
//!
//! That is the whole model. Routing, body parsing, retries and backpressure
//! belong elsewhere.
//!
//! - [`middleware::First`] — run handlers until one commits
//! - [`middleware::Guard`] — check, then either reject or delegate
//! - [`negotiate`] — JSON vs plain-text error bodies from `Accept`
//! - [`Server`] — hyper host with graceful shutdown
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::{HeaderValue, StatusCode, header::RETRY_AFTER};
//! use sieve::middleware::Guard;
//! use sieve::{handler_fn, Failure, GuardResult, Request, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Guard::new(
//!         |req: &Request| {
//!             if req.header("x-api-key").is_some() {
//!                 GuardResult::pass()
//!             } else {
//!                 GuardResult::fail(Failure::with_status(StatusCode::TOO_MANY_REQUESTS, "rate limited"))
//!                     .header(RETRY_AFTER, HeaderValue::from_static("30"))
//!             }
//!         },
//!         handler_fn(|w, _req| {
//!             w.write_head(StatusCode::OK);
//!             w.write(b"hello");
//!         }),
//!     );
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//! ```

mod error;
mod failure;
mod handler;
mod request;
mod response;
mod server;
mod writer;

pub mod middleware;
pub mod negotiate;

pub use error::Error;
pub use failure::{Failure, HttpEquivError};
pub use handler::{BoxedHandler, Handler, HandlerFn, handler_fn};
pub use middleware::GuardResult;
pub use request::Request;
pub use response::{ContentType, Response};
pub use server::Server;
pub use writer::{ResponseWriter, WriteGuard};
