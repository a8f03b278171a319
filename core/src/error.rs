//! Error types for the client facade.
//!
//! # Design
//! Engine failures (DNS, connect, TLS, timeout) are carried verbatim inside
//! `Engine` — the facade never retries, remaps, or converts them into
//! default values. `Closed` gets a dedicated variant because using a session
//! after `close()` is a caller bug, not a transport condition.

use std::fmt;

/// Errors returned by `Client` operations.
#[derive(Debug)]
pub enum Error {
    /// The session was closed; no further operations are permitted.
    Closed,

    /// The base URL or request target failed to parse or resolve.
    Url(url::ParseError),

    /// A failure reported by the underlying engine, surfaced unchanged.
    Engine(Box<dyn std::error::Error + Send + Sync>),

    /// The engine rejected an option it does not support.
    UnsupportedOption(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Closed => write!(f, "session is closed"),
            Error::Url(e) => write!(f, "invalid url: {e}"),
            Error::Engine(e) => write!(f, "{e}"),
            Error::UnsupportedOption(name) => {
                write!(f, "engine does not support option: {name}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Url(e) => Some(e),
            Error::Engine(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::Url(e)
    }
}
