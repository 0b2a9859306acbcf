//! Guard failures and the status they map to.

use std::fmt;

use http::StatusCode;

/// Why a guard refused a request.
///
/// A failure either names the HTTP status it should be answered with, or it
/// does not, in which case [`Failure::status`] falls back to
/// `500 Internal Server Error`.
///
/// ```rust
/// use http::StatusCode;
/// use sieve::Failure;
///
/// assert_eq!(Failure::new("boom").status(), StatusCode::INTERNAL_SERVER_ERROR);
/// assert_eq!(
///     Failure::with_status(StatusCode::TOO_MANY_REQUESTS, "slow down").status(),
///     StatusCode::TOO_MANY_REQUESTS,
/// );
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Failure {
    /// A failure with no opinion about the status code.
    Plain(String),
    /// A failure carrying its HTTP-equivalent status.
    WithStatus(StatusCode, String),
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Plain(message.into())
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::WithStatus(status, message.into())
    }

    /// The status the failure is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Plain(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::WithStatus(status, _) => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Plain(message) | Self::WithStatus(_, message) => message,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for Failure {}

// ── HttpEquivError ────────────────────────────────────────────────────────────

/// An application error that knows which HTTP status it corresponds to.
///
/// Implement it on your own error types and return them from a guard with
/// [`GuardResult::fail`](crate::GuardResult::fail); the status and the
/// `Display` text are carried over into the [`Failure`].
///
/// ```rust
/// use std::fmt;
/// use http::StatusCode;
/// use sieve::{Failure, HttpEquivError};
///
/// #[derive(Debug)]
/// struct QuotaExceeded;
///
/// impl fmt::Display for QuotaExceeded {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("quota exceeded")
///     }
/// }
///
/// impl std::error::Error for QuotaExceeded {}
///
/// impl HttpEquivError for QuotaExceeded {
///     fn status(&self) -> StatusCode { StatusCode::TOO_MANY_REQUESTS }
/// }
///
/// let failure = Failure::from(QuotaExceeded);
/// assert_eq!(failure.status(), StatusCode::TOO_MANY_REQUESTS);
/// assert_eq!(failure.message(), "quota exceeded");
/// ```
pub trait HttpEquivError: std::error::Error {
    fn status(&self) -> StatusCode;
}

impl<E: HttpEquivError> From<E> for Failure {
    fn from(err: E) -> Self {
        Self::WithStatus(err.status(), err.to_string())
    }
}
