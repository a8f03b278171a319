//! Stateful, blocking HTTP client facade.
//!
//! # Overview
//! A small object-oriented wrapper over a blocking HTTP engine: open a
//! session with a base URL, issue GET/POST requests, read back the body, the
//! raw header text, and named transfer metrics, then close. All transport
//! behavior — connections, redirects, cookies, TLS, timeouts — lives in the
//! engine; this crate is configuration plumbing around a single blocking
//! `perform` call.
//!
//! # Design
//! - `Client` owns one engine handle for its whole life; `close()` releases
//!   it exactly once and is terminal.
//! - The engine sits behind the `HttpEngine` trait, so tests can substitute
//!   a canned engine; the default is `UreqEngine` over a `ureq::Agent`.
//! - `body()`/`header()` reflect only the most recently completed request.
//!   "No response yet" is distinct from "empty successful body".
//! - No retries, no backoff: engine failures surface verbatim and retry
//!   policy stays with the caller.
//! - One session, one thread: the single body/header buffer pair makes a
//!   `Client` unsuitable for sharing across concurrent requests.

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod info;
mod netrc;
pub mod process;

pub use client::Client;
pub use config::SessionConfig;
pub use engine::{EngineOption, HttpEngine, UreqEngine};
pub use error::Error;
pub use http::{Method, Request, Transfer};
pub use info::{InfoValue, Metric};
