//! Unified error type.

use std::fmt;
use std::net::SocketAddr;

/// The error type returned by [`Server::serve`](crate::Server::serve).
///
/// Guard rejections are never `Error`s: they become committed responses
/// inside the handler tree. What is left is infrastructure, and in practice
/// that means the listener could not be bound.
#[derive(Debug)]
pub struct Error {
    addr: SocketAddr,
    source: std::io::Error,
}

impl Error {
    pub(crate) fn bind(addr: SocketAddr, source: std::io::Error) -> Self {
        Self { addr, source }
    }

    /// The address the server tried to bind.
    pub fn addr(&self) -> SocketAddr { self.addr }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bind {}: {}", self.addr, self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn names_the_address_it_failed_on() {
        let addr: SocketAddr = "127.0.0.1:3000".parse().unwrap();
        let err = Error::bind(addr, std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken"));
        assert_eq!(err.to_string(), "bind 127.0.0.1:3000: port taken");
        assert_eq!(err.addr(), addr);
        assert!(err.source().is_some());
    }
}
