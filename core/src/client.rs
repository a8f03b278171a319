//! Stateful, blocking client facade over a pluggable HTTP engine.
//!
//! # Design
//! `Client` owns exactly one engine for its whole life. It resolves request
//! targets against its base URL, encodes query and form parameters, and
//! keeps the body and raw header text of the most recent response. Both
//! buffers are cleared when a new request starts and only repopulated when
//! the transfer completes, so after a failed request they read as "no
//! response" rather than stale data.
//!
//! A session is single-threaded and blocking: one request at a time, one
//! body/header pair. Callers wanting concurrency use one `Client` per
//! in-flight request.

use std::collections::BTreeMap;

use url::form_urlencoded;
use url::Url;

use crate::config::SessionConfig;
use crate::engine::{EngineOption, HttpEngine, UreqEngine};
use crate::error::Error;
use crate::http::{Method, Request};
use crate::info::{InfoValue, Metric};

/// A stateful HTTP session: `Open → (request)* → Closed`.
///
/// `close()` releases the engine and is terminal; every operation afterwards
/// fails with [`Error::Closed`]. Dropping an open client releases the engine
/// the same way, so the handle is freed exactly once either path.
pub struct Client {
    engine: Option<Box<dyn HttpEngine>>,
    base_url: String,
    headers: Vec<(String, String)>,
    payload: Option<Vec<u8>>,
    header_text: String,
}

impl Client {
    /// Open a session against `base_url` with the default configuration.
    ///
    /// `headers` are extra request headers sent on every request, in order.
    pub fn new(base_url: &str, headers: Vec<(String, String)>) -> Self {
        Self::with_config(base_url, headers, SessionConfig::default())
    }

    /// Open a session with an explicit configuration, applied atomically
    /// before the first request.
    pub fn with_config(
        base_url: &str,
        headers: Vec<(String, String)>,
        config: SessionConfig,
    ) -> Self {
        Self::with_engine(base_url, headers, Box::new(UreqEngine::new(config)))
    }

    /// Open a session over a caller-supplied engine.
    pub fn with_engine(
        base_url: &str,
        headers: Vec<(String, String)>,
        engine: Box<dyn HttpEngine>,
    ) -> Self {
        Self {
            engine: Some(engine),
            base_url: base_url.to_string(),
            headers,
            payload: None,
            header_text: String::new(),
        }
    }

    /// Replace the base URL used for relative resolution and as the default
    /// request target.
    pub fn set_base_url(&mut self, url: &str) -> Result<(), Error> {
        if self.engine.is_none() {
            return Err(Error::Closed);
        }
        self.base_url = url.to_string();
        Ok(())
    }

    /// Override the request timeout.
    pub fn set_timeout(&mut self, timeout: std::time::Duration) -> Result<(), Error> {
        self.set_option(EngineOption::Timeout(timeout))
    }

    /// Toggle per-transaction debug logging.
    pub fn set_verbose(&mut self, on: bool) -> Result<(), Error> {
        self.set_option(EngineOption::Verbose(on))
    }

    /// Forward one option to the engine. The facade does no validation;
    /// options the engine cannot honor fail with the engine's own error.
    pub fn set_option(&mut self, option: EngineOption) -> Result<(), Error> {
        self.engine
            .as_mut()
            .ok_or(Error::Closed)?
            .set_option(option)
    }

    /// Issue a GET for `url` (resolved against the base URL), returning the
    /// response body. `params` are appended as a percent-encoded query
    /// string, pairs joined by `&` and `=`, in the given order.
    pub fn get(&mut self, url: &str, params: &[(&str, &str)]) -> Result<&[u8], Error> {
        let mut target = self.resolve(url)?;
        if !params.is_empty() {
            target.query_pairs_mut().extend_pairs(params);
        }
        self.dispatch(Method::Get, target, None, Vec::new())
    }

    /// Issue a POST to `target` (resolved against the base URL) with
    /// `params` form-encoded as the request body.
    pub fn post(&mut self, target: &str, params: &[(&str, &str)]) -> Result<&[u8], Error> {
        let url = self.resolve(target)?;
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        self.dispatch(
            Method::Post,
            url,
            Some(body.into_bytes()),
            vec![(
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
        )
    }

    /// The body of the most recent response, or `None` if no request has
    /// completed yet. An empty successful body is `Some(&[])`, never `None`.
    pub fn body(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// The raw header text of the most recent response (status line plus
    /// header lines). Empty until a request completes.
    pub fn header(&self) -> &str {
        &self.header_text
    }

    /// Query one named metric of the most recent transfer.
    pub fn get_info(&self, metric: Metric) -> Result<InfoValue, Error> {
        let engine = self.engine.as_ref().ok_or(Error::Closed)?;
        Ok(engine.info(metric))
    }

    /// All metrics of the most recent transfer, keyed by metric name,
    /// including the session cookie list.
    pub fn info(&self) -> Result<BTreeMap<&'static str, InfoValue>, Error> {
        let engine = self.engine.as_ref().ok_or(Error::Closed)?;
        Ok(Metric::ALL
            .iter()
            .map(|&metric| (metric.as_str(), engine.info(metric)))
            .collect())
    }

    /// Whether `needle` occurs as a contiguous byte substring of the most
    /// recent body. `false` before any request has completed.
    pub fn answered(&self, needle: &[u8]) -> bool {
        match &self.payload {
            Some(payload) => contains(payload, needle),
            None => false,
        }
    }

    /// Close the session, releasing the engine and clearing the body and
    /// header buffers. Idempotent; the closed state is terminal.
    pub fn close(&mut self) {
        self.engine = None;
        self.payload = None;
        self.header_text.clear();
    }

    /// Whether `close()` has been called.
    pub fn is_closed(&self) -> bool {
        self.engine.is_none()
    }

    /// Resolve `target` against the base URL: empty target means the base
    /// itself, an absolute target replaces it, anything else joins onto it.
    fn resolve(&self, target: &str) -> Result<Url, Error> {
        if self.base_url.is_empty() {
            return Ok(Url::parse(target)?);
        }
        let base = Url::parse(&self.base_url)?;
        if target.is_empty() {
            return Ok(base);
        }
        Ok(base.join(target)?)
    }

    /// Perform the pending request: clear the last response, run the
    /// transfer, capture body and header text on success.
    fn dispatch(
        &mut self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
        extra_headers: Vec<(String, String)>,
    ) -> Result<&[u8], Error> {
        let engine = self.engine.as_mut().ok_or(Error::Closed)?;
        self.payload = None;
        self.header_text.clear();

        let mut headers = self.headers.clone();
        headers.extend(extra_headers);
        let request = Request {
            method,
            url,
            headers,
            body,
        };
        let transfer = engine.perform(&request)?;

        self.header_text = transfer.header_text;
        self.payload = Some(transfer.body);
        Ok(self.payload.as_deref().unwrap_or_default())
    }
}

/// Byte-level substring search. An empty needle matches everything.
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}
