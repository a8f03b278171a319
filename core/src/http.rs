//! Plain-data request and transfer types exchanged with the engine.
//!
//! # Design
//! The facade describes what it wants as a `Request` value and receives a
//! `Transfer` value back. Both are plain owned data so engines stay free to
//! execute the round-trip however they like, and so mock engines in tests
//! can fabricate transfers without touching the network.

use url::Url;

/// HTTP method for a request. The facade only ever issues GET and POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// One fully resolved request, ready for an engine to perform.
///
/// The URL is already absolute and carries any query string; headers are in
/// the order they should be sent.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// The observable result of one completed transfer.
///
/// `header_text` is the raw response head (status line plus header lines,
/// CRLF separated) the way a wire capture would show it. Timing and size
/// figures live in the engine and are read back through its metric query.
#[derive(Debug, Clone)]
pub struct Transfer {
    pub status: u16,
    pub effective_url: String,
    pub header_text: String,
    pub body: Vec<u8>,
}
