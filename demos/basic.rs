//! Minimal sieve example — a rate-limit guard in front of a greeting.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/healthz
//!   curl -i http://localhost:3000/hello                          # 429, plain text
//!   curl -i -H 'accept: application/json' http://localhost:3000/hello   # 429, JSON
//!   curl -i -H 'x-api-key: demo' http://localhost:3000/hello     # 200

use http::header::{CONTENT_TYPE, RETRY_AFTER};
use http::{HeaderName, HeaderValue, StatusCode};
use sieve::middleware::{First, Guard};
use sieve::{ContentType, Failure, GuardResult, Request, Server, handler_fn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = First::new()
        .then(handler_fn(|w, req| {
            if req.path() == "/healthz" {
                w.set_header(CONTENT_TYPE, ContentType::Text.header_value());
                w.write_head(StatusCode::OK);
                w.write(b"ok");
            }
        }))
        .then(Guard::new(api_key, handler_fn(|w, req| {
            w.set_header(CONTENT_TYPE, ContentType::Text.header_value());
            w.write_head(StatusCode::OK);
            w.write(format!("hello from {}", req.path()).as_bytes());
        })));

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// Requests without an API key are told to back off. The remaining-quota
// header is sent either way.
fn api_key(req: &Request) -> GuardResult {
    let verdict = match req.header("x-api-key") {
        Some(_) => GuardResult::pass(),
        None => GuardResult::fail(Failure::with_status(StatusCode::TOO_MANY_REQUESTS, "rate limited"))
            .header(RETRY_AFTER, HeaderValue::from_static("30")),
    };
    verdict.header(HeaderName::from_static("x-ratelimit-remaining"), HeaderValue::from_static("0"))
}
