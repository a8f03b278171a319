//! The engine seam: a trait over a blocking HTTP transfer engine, plus the
//! default `ureq`-backed implementation.
//!
//! # Design
//! The facade never talks to the network itself. It hands a fully resolved
//! `Request` to an `HttpEngine` and reads transfer metadata back through the
//! engine's metric query. `UreqEngine` keeps one `ureq::Agent` per session so
//! the agent's cookie store and connection pool live exactly as long as the
//! session does.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, trace};
use ureq::ResponseExt;
use ureq::http::HeaderMap;
use ureq::tls::TlsConfig;

use crate::config::SessionConfig;
use crate::error::Error;
use crate::http::{Method, Request, Transfer};
use crate::info::{InfoValue, Metric};
use crate::netrc;

/// Auth scheme bits reported through the `httpauth-avail` metric, matching
/// the customary libcurl mask values.
const AUTH_BASIC: i64 = 1 << 0;
const AUTH_DIGEST: i64 = 1 << 1;
const AUTH_NEGOTIATE: i64 = 1 << 2;
const AUTH_NTLM: i64 = 1 << 3;
const AUTH_BEARER: i64 = 1 << 6;

/// A blocking HTTP transfer engine.
///
/// One engine instance backs one `Client`. Engines are stateful: they carry
/// session cookies and remember the figures of the most recent transfer.
pub trait HttpEngine {
    /// Execute one blocking round-trip.
    fn perform(&mut self, request: &Request) -> Result<Transfer, Error>;

    /// Apply one configuration option. Options the engine cannot honor
    /// surface as `Error::UnsupportedOption`.
    fn set_option(&mut self, option: EngineOption) -> Result<(), Error>;

    /// Query one named metric of the most recent transfer. Before any
    /// transfer, metrics answer with zero/empty values.
    fn info(&self, metric: Metric) -> InfoValue;
}

/// Typed configuration options forwarded from `Client::set_option`.
#[derive(Debug, Clone)]
pub enum EngineOption {
    Timeout(Duration),
    VerifyHost(bool),
    FollowRedirects(bool),
    MaxRedirects(u32),
    Verbose(bool),
    UserAgent(String),
    UseNetrc(bool),
    /// Persist cookies to a file. The default engine keeps its jar strictly
    /// in memory and rejects this.
    CookieFile(PathBuf),
}

/// Per-transfer figures recorded by `UreqEngine`.
#[derive(Debug, Clone)]
struct TransferStats {
    effective_url: String,
    status: i64,
    total_time: f64,
    redirect_count: i64,
    size_upload: i64,
    size_download: i64,
    speed_upload: f64,
    speed_download: f64,
    header_size: i64,
    request_size: i64,
    content_length_download: i64,
    content_length_upload: i64,
    content_type: String,
    filetime: i64,
    httpauth_avail: i64,
    proxyauth_avail: i64,
    num_connects: i64,
}

impl Default for TransferStats {
    fn default() -> Self {
        Self {
            effective_url: String::new(),
            status: 0,
            total_time: 0.0,
            redirect_count: 0,
            size_upload: 0,
            size_download: 0,
            speed_upload: 0.0,
            speed_download: 0.0,
            header_size: 0,
            request_size: 0,
            // -1 signals "unknown", as transfer engines customarily do.
            content_length_download: -1,
            content_length_upload: -1,
            content_type: String::new(),
            filetime: -1,
            httpauth_avail: 0,
            proxyauth_avail: 0,
            num_connects: 0,
        }
    }
}

/// Blocking engine backed by a `ureq::Agent`.
///
/// The agent is created once per engine with non-error status reporting
/// (4xx/5xx come back as data, like a wire capture would show them) and
/// redirect history enabled so the redirect count can be reported. Variable
/// settings — timeout, redirect limit, TLS verification — are applied per
/// request from the stored `SessionConfig`, so option changes take effect
/// without discarding the agent's cookie jar.
pub struct UreqEngine {
    agent: ureq::Agent,
    config: SessionConfig,
    stats: TransferStats,
    cookies: Vec<String>,
}

impl UreqEngine {
    pub fn new(config: SessionConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .save_redirect_history(true)
            .build()
            .new_agent();
        Self {
            agent,
            config,
            stats: TransferStats::default(),
            cookies: Vec::new(),
        }
    }

    /// The request's headers plus session-level ones: User-Agent and, when
    /// netrc lookup is enabled and the caller sent no Authorization header,
    /// Basic credentials for the target host.
    fn effective_headers(&self, request: &Request) -> Vec<(String, String)> {
        let mut headers = request.headers.clone();
        if let Some(agent) = &self.config.user_agent {
            if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("user-agent")) {
                headers.push(("user-agent".to_string(), agent.clone()));
            }
        }
        if let Some(auth) = self.netrc_auth(request) {
            headers.push(auth);
        }
        headers
    }

    fn netrc_auth(&self, request: &Request) -> Option<(String, String)> {
        if !self.config.use_netrc {
            return None;
        }
        if request
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("authorization"))
        {
            return None;
        }
        let host = request.url.host_str()?;
        let path = match &self.config.netrc_path {
            Some(path) => path.clone(),
            None => PathBuf::from(std::env::var_os("HOME")?).join(".netrc"),
        };
        let creds = netrc::lookup(&path, host)?;
        let token = BASE64.encode(format!("{}:{}", creds.login, creds.password));
        Some(("authorization".to_string(), format!("Basic {token}")))
    }

    /// Remember Set-Cookie lines from the final response, newest value per
    /// cookie name winning. Cookies set on intermediate redirect hops live
    /// in the agent's jar but are not reported here.
    fn record_cookies(&mut self, headers: &HeaderMap) {
        for value in headers.get_all("set-cookie") {
            let line = String::from_utf8_lossy(value.as_bytes()).into_owned();
            let name = cookie_name(&line).to_string();
            self.cookies.retain(|c| cookie_name(c) != name);
            self.cookies.push(line);
        }
    }
}

fn cookie_name(line: &str) -> &str {
    line.split('=').next().unwrap_or("").trim()
}

/// Bitmask of auth schemes offered in `WWW-Authenticate` headers.
fn auth_mask(headers: &HeaderMap, header_name: &str) -> i64 {
    let mut mask = 0;
    for value in headers.get_all(header_name) {
        let text = String::from_utf8_lossy(value.as_bytes()).to_ascii_lowercase();
        for challenge in text.split(',') {
            match challenge.trim().split_whitespace().next() {
                Some("basic") => mask |= AUTH_BASIC,
                Some("digest") => mask |= AUTH_DIGEST,
                Some("negotiate") => mask |= AUTH_NEGOTIATE,
                Some("ntlm") => mask |= AUTH_NTLM,
                Some("bearer") => mask |= AUTH_BEARER,
                _ => {}
            }
        }
    }
    mask
}

/// Approximate size of the serialized request head plus body, the figure
/// the `request-size` metric reports.
fn request_size(request: &Request, headers: &[(String, String)]) -> i64 {
    let mut size = format!("{} {} HTTP/1.1\r\n", request.method, request.url).len();
    for (name, value) in headers {
        size += name.len() + value.len() + 4;
    }
    size += 2;
    size += request.body.as_ref().map(Vec::len).unwrap_or(0);
    size as i64
}

impl HttpEngine for UreqEngine {
    fn perform(&mut self, request: &Request) -> Result<Transfer, Error> {
        let headers = self.effective_headers(request);
        let url = request.url.as_str();

        if self.config.verbose {
            debug!("> {} {}", request.method, url);
            for (name, value) in &headers {
                debug!("> {name}: {value}");
            }
        } else {
            trace!("{} {}", request.method, url);
        }

        let tls = TlsConfig::builder()
            .disable_verification(!self.config.verify_host)
            .build();
        let max_redirects = if self.config.follow_redirects {
            self.config.max_redirects
        } else {
            0
        };

        let started = Instant::now();
        let result = match request.method {
            Method::Get => {
                let mut builder = self
                    .agent
                    .get(url)
                    .config()
                    .timeout_global(Some(self.config.timeout))
                    .max_redirects(max_redirects)
                    .tls_config(tls)
                    .build();
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            Method::Post => {
                let mut builder = self
                    .agent
                    .post(url)
                    .config()
                    .timeout_global(Some(self.config.timeout))
                    .max_redirects(max_redirects)
                    .tls_config(tls)
                    .build();
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send(request.body.as_deref().unwrap_or_default())
            }
        };
        let mut response = result.map_err(|e| Error::Engine(Box::new(e)))?;
        let total_time = started.elapsed().as_secs_f64();

        let status = response.status();
        let effective_url = response.get_uri().to_string();
        let redirect_count = response
            .get_redirect_history()
            .map(|history| history.len().saturating_sub(1) as i64)
            .unwrap_or(0);

        let mut header_text = format!("{:?} {}\r\n", response.version(), status);
        for (name, value) in response.headers() {
            header_text.push_str(name.as_str());
            header_text.push_str(": ");
            header_text.push_str(&String::from_utf8_lossy(value.as_bytes()));
            header_text.push_str("\r\n");
        }
        header_text.push_str("\r\n");

        if self.config.verbose {
            debug!("< {:?} {}", response.version(), status);
        }

        let content_type = response
            .headers()
            .get("content-type")
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();
        let content_length_download = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(-1);
        let filetime = response
            .headers()
            .get("last-modified")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| chrono::DateTime::parse_from_rfc2822(s).ok())
            .map(|dt| dt.timestamp())
            .unwrap_or(-1);
        let httpauth_avail = auth_mask(response.headers(), "www-authenticate");
        let proxyauth_avail = auth_mask(response.headers(), "proxy-authenticate");

        self.record_cookies(response.headers());

        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| Error::Engine(Box::new(e)))?;

        let size_upload = request.body.as_ref().map(Vec::len).unwrap_or(0) as i64;
        let size_download = body.len() as i64;
        let speed = |size: i64| {
            if total_time > 0.0 {
                size as f64 / total_time
            } else {
                0.0
            }
        };
        self.stats = TransferStats {
            effective_url: effective_url.clone(),
            status: status.as_u16() as i64,
            total_time,
            redirect_count,
            size_upload,
            size_download,
            speed_upload: speed(size_upload),
            speed_download: speed(size_download),
            header_size: header_text.len() as i64,
            request_size: request_size(request, &headers),
            content_length_download,
            content_length_upload: size_upload,
            content_type,
            filetime,
            httpauth_avail,
            proxyauth_avail,
            // Connection reuse is not observable through the agent.
            num_connects: 1,
        };

        Ok(Transfer {
            status: status.as_u16(),
            effective_url,
            header_text,
            body,
        })
    }

    fn set_option(&mut self, option: EngineOption) -> Result<(), Error> {
        match option {
            EngineOption::Timeout(timeout) => self.config.timeout = timeout,
            EngineOption::VerifyHost(on) => self.config.verify_host = on,
            EngineOption::FollowRedirects(on) => self.config.follow_redirects = on,
            EngineOption::MaxRedirects(max) => self.config.max_redirects = max,
            EngineOption::Verbose(on) => self.config.verbose = on,
            EngineOption::UserAgent(agent) => self.config.user_agent = Some(agent),
            EngineOption::UseNetrc(on) => self.config.use_netrc = on,
            EngineOption::CookieFile(_) => {
                return Err(Error::UnsupportedOption("cookie-file"));
            }
        }
        Ok(())
    }

    fn info(&self, metric: Metric) -> InfoValue {
        match metric {
            Metric::EffectiveUrl => InfoValue::Str(self.stats.effective_url.clone()),
            Metric::HttpCode | Metric::ResponseCode => InfoValue::Int(self.stats.status),
            Metric::TotalTime => InfoValue::Float(self.stats.total_time),
            // Phase timings below the whole-transfer level are not
            // observable through a pooled blocking agent.
            Metric::NamelookupTime
            | Metric::ConnectTime
            | Metric::PretransferTime
            | Metric::StarttransferTime
            | Metric::RedirectTime => InfoValue::Float(0.0),
            Metric::RedirectCount => InfoValue::Int(self.stats.redirect_count),
            Metric::SizeUpload => InfoValue::Int(self.stats.size_upload),
            Metric::SizeDownload => InfoValue::Int(self.stats.size_download),
            Metric::SpeedUpload => InfoValue::Float(self.stats.speed_upload),
            Metric::SpeedDownload => InfoValue::Float(self.stats.speed_download),
            Metric::HeaderSize => InfoValue::Int(self.stats.header_size),
            Metric::RequestSize => InfoValue::Int(self.stats.request_size),
            Metric::ContentLengthDownload => {
                InfoValue::Int(self.stats.content_length_download)
            }
            Metric::ContentLengthUpload => InfoValue::Int(self.stats.content_length_upload),
            Metric::ContentType => InfoValue::Str(self.stats.content_type.clone()),
            Metric::SslVerifyResult => InfoValue::Int(0),
            Metric::Filetime => InfoValue::Int(self.stats.filetime),
            Metric::HttpConnectCode => InfoValue::Int(0),
            Metric::HttpAuthAvail => InfoValue::Int(self.stats.httpauth_avail),
            Metric::ProxyAuthAvail => InfoValue::Int(self.stats.proxyauth_avail),
            Metric::OsErrno => InfoValue::Int(0),
            Metric::NumConnects => InfoValue::Int(self.stats.num_connects),
            Metric::SslEngines => InfoValue::List(Vec::new()),
            Metric::FtpEntryPath => InfoValue::Str(String::new()),
            Metric::CookieList => InfoValue::List(self.cookies.clone()),
        }
    }
}
