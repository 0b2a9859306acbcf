//! Guards: run a check, then either answer with an error or hand over.

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::failure::Failure;
use crate::handler::Handler;
use crate::middleware::First;
use crate::request::Request;
use crate::response::ContentType;
use crate::writer::ResponseWriter;

/// What a guard's check decided: headers to publish, and an optional
/// failure.
///
/// The headers are published whether the check passes or fails, so a
/// rejection can still carry `Retry-After` or rate-limit headers.
///
/// ```rust
/// use http::{HeaderValue, StatusCode, header::RETRY_AFTER};
/// use sieve::{Failure, GuardResult};
///
/// let verdict = GuardResult::fail(Failure::with_status(StatusCode::TOO_MANY_REQUESTS, "rate limited"))
///     .header(RETRY_AFTER, HeaderValue::from_static("30"));
/// assert!(verdict.failure().is_some());
/// ```
#[derive(Debug, Default)]
pub struct GuardResult {
    headers: HeaderMap,
    failure: Option<Failure>,
}

impl GuardResult {
    /// Let the request through.
    pub fn pass() -> Self { Self::default() }

    /// Stop the request.
    pub fn fail(failure: impl Into<Failure>) -> Self {
        Self { headers: HeaderMap::new(), failure: Some(failure.into()) }
    }

    /// Adds a header value. Repeated names keep every value in order.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn failure(&self) -> Option<&Failure> { self.failure.as_ref() }
}

impl From<Result<(), Failure>> for GuardResult {
    fn from(result: Result<(), Failure>) -> Self {
        match result {
            Ok(()) => Self::pass(),
            Err(failure) => Self::fail(failure),
        }
    }
}

// ── Guard ─────────────────────────────────────────────────────────────────────

/// A handler that runs `check` before `inner`, and runs `inner` only if the
/// check passes.
///
/// Internally this is a [`First`] chain of exactly two handlers: the check
/// and `inner`. A failing check commits an error response, which ends the
/// chain before `inner` is reached.
///
/// The error response:
/// - status: [`Failure::status`], `500` unless the failure names one
/// - JSON (`{"error":"<message>"}`, `application/json`) when the request's
///   `Accept` header prefers it, otherwise the bare message as
///   `text/plain; charset=utf-8`. See [`negotiate`](crate::negotiate).
///
/// ```rust
/// use http::{HeaderValue, StatusCode, header::RETRY_AFTER};
/// use sieve::middleware::Guard;
/// use sieve::{handler_fn, Failure, GuardResult, Handler, Request, Response};
///
/// let guarded = Guard::new(
///     |_req: &Request| {
///         GuardResult::fail(Failure::with_status(StatusCode::TOO_MANY_REQUESTS, "rate limited"))
///             .header(RETRY_AFTER, HeaderValue::from_static("30"))
///     },
///     handler_fn(|w, _| w.write_head(StatusCode::OK)),
/// );
///
/// let req = http::Request::builder()
///     .header("accept", "application/json")
///     .body(bytes::Bytes::new())
///     .unwrap();
/// let mut res = Response::new();
/// guarded.serve(&mut res, &Request::from(req));
///
/// assert_eq!(res.status(), Some(StatusCode::TOO_MANY_REQUESTS));
/// assert_eq!(res.headers()[RETRY_AFTER], "30");
/// assert_eq!(res.body(), br#"{"error":"rate limited"}"#);
/// ```
#[derive(Clone)]
pub struct Guard {
    chain: First,
}

impl Guard {
    pub fn new<F>(check: F, inner: impl Handler) -> Self
    where
        F: Fn(&Request) -> GuardResult + Send + Sync + 'static,
    {
        Self { chain: First::new().then(Check(check)).then(inner) }
    }
}

impl Handler for Guard {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        self.chain.serve(w, req);
    }
}

/// The first link of a guard's chain.
struct Check<F>(F);

impl<F> Handler for Check<F>
where
    F: Fn(&Request) -> GuardResult + Send + Sync + 'static,
{
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        let GuardResult { headers, failure } = (self.0)(req);
        publish(&headers, w);

        if let Some(failure) = failure {
            reject(&failure, w, req);
        }
    }
}

/// Copies `headers` onto `w`, names in lexical order, values in the order
/// they were added. Each name replaces what `w` already had under it.
fn publish(headers: &HeaderMap, w: &mut dyn ResponseWriter) {
    let mut names: Vec<&HeaderName> = headers.keys().collect();
    names.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));

    let target = w.headers_mut();
    for name in names {
        let mut values = headers.get_all(name).iter();
        if let Some(first) = values.next() {
            target.insert(name.clone(), first.clone());
        }
        for value in values {
            target.append(name.clone(), value.clone());
        }
    }
}

/// Commits the error response for `failure`.
fn reject(failure: &Failure, w: &mut dyn ResponseWriter, req: &Request) {
    let status = failure.status();
    let json = req.prefers_json();
    debug!(status = status.as_u16(), json, path = req.path(), "guard rejected request");

    if json {
        let body = serde_json::json!({ "error": failure.message() }).to_string();
        w.set_header(CONTENT_TYPE, ContentType::Json.header_value());
        w.write_head(status);
        w.write(body.as_bytes());
    } else {
        w.set_header(CONTENT_TYPE, ContentType::Text.header_value());
        w.write_head(status);
        w.write(failure.message().as_bytes());
    }
}
