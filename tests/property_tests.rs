//! Property tests for the first-write-wins rule.
//!
//! Chains of arbitrary length with an arbitrary commit position, and guards
//! with arbitrary failures and `Accept` headers, exercised through the public
//! API only.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderName, HeaderValue, StatusCode};
use proptest::prelude::*;
use sieve::middleware::{First, Guard};
use sieve::{Failure, GuardResult, Handler, Request, Response, ResponseWriter, WriteGuard, handler_fn};

type Log = Arc<Mutex<Vec<usize>>>;

fn request(accept: Option<&str>) -> Request {
    let mut builder = http::Request::builder().uri("/");
    if let Some(accept) = accept {
        builder = builder.header(ACCEPT, accept);
    }
    Request::from(builder.body(Bytes::new()).unwrap())
}

fn chain(log: &Log, commits: &[bool]) -> First {
    commits
        .iter()
        .enumerate()
        .map(|(id, &commit)| {
            let log = Arc::clone(log);
            handler_fn(move |w, _| {
                log.lock().unwrap().push(id);
                if commit {
                    w.write_head(StatusCode::OK);
                }
            })
            .boxed()
        })
        .collect()
}

// Strategy: a chain of 0..12 handlers, each committing or not
fn arb_commits() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 0..12)
}

// Strategy: a failure with or without an explicit status
fn arb_failure() -> impl Strategy<Value = Failure> {
    let message = prop::string::string_regex("[a-zA-Z0-9 \"\\\\]{1,30}").unwrap();
    let status = prop::option::of(prop_oneof![
        Just(StatusCode::BAD_REQUEST),
        Just(StatusCode::UNAUTHORIZED),
        Just(StatusCode::FORBIDDEN),
        Just(StatusCode::TOO_MANY_REQUESTS),
        Just(StatusCode::SERVICE_UNAVAILABLE),
    ]);
    (message, status).prop_map(|(message, status)| match status {
        Some(status) => Failure::with_status(status, message),
        None => Failure::new(message),
    })
}

proptest! {
    /// Property: handlers run in order up to and including the first one
    /// that commits, and never beyond it.
    #[test]
    fn proptest_chain_stops_at_first_commit(commits in arb_commits()) {
        let log = Log::default();
        let mut res = Response::new();
        chain(&log, &commits).serve(&mut res, &request(None));

        let expected: Vec<usize> = match commits.iter().position(|&c| c) {
            Some(k) => (0..=k).collect(),
            None => (0..commits.len()).collect(),
        };
        prop_assert_eq!(&*log.lock().unwrap(), &expected);
        prop_assert_eq!(res.is_committed(), commits.contains(&true));
    }

    /// Property: however often a commit is repeated, the flag reads true
    /// from the first one on.
    #[test]
    fn proptest_write_guard_flag_is_monotonic(calls in prop::collection::vec(any::<bool>(), 0..20)) {
        let mut res = Response::new();
        let mut guard = WriteGuard::new(&mut res);
        let mut seen = false;
        for commit in calls {
            if commit {
                guard.write_head(StatusCode::OK);
                seen = true;
            } else {
                guard.write(b".");
            }
            prop_assert_eq!(guard.committed(), seen);
        }
    }

    /// Property: a failing guard answers with the failure's status (or 500),
    /// renders the negotiated format, keeps its headers, and never reaches
    /// the inner handler.
    #[test]
    fn proptest_failing_guard_owns_the_response(
        failure in arb_failure(),
        accept in prop::option::of(prop_oneof![
            Just("application/json"),
            Just("text/plain"),
            Just("*/*"),
        ])
    ) {
        let reached = Log::default();
        let inner = {
            let reached = Arc::clone(&reached);
            handler_fn(move |w, _| {
                reached.lock().unwrap().push(1);
                w.write_head(StatusCode::OK);
            })
        };
        let expected = failure.clone();
        let guard = Guard::new(
            move |_: &Request| {
                GuardResult::fail(failure.clone())
                    .header(HeaderName::from_static("x-guard"), HeaderValue::from_static("1"))
            },
            inner,
        );

        let mut res = Response::new();
        guard.serve(&mut res, &request(accept));

        prop_assert!(reached.lock().unwrap().is_empty());
        prop_assert_eq!(res.status(), Some(expected.status()));
        prop_assert_eq!(&res.headers()["x-guard"], "1");

        if accept == Some("application/json") {
            prop_assert_eq!(&res.headers()[CONTENT_TYPE], "application/json");
            let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
            prop_assert_eq!(body, serde_json::json!({ "error": expected.message() }));
        } else {
            prop_assert_eq!(&res.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
            prop_assert_eq!(res.body(), expected.message().as_bytes());
        }
    }
}
