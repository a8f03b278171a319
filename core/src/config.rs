//! Session configuration applied atomically at construction.
//!
//! # Design
//! All engine defaults live in one `SessionConfig` value instead of a chain
//! of post-construction option calls, so a `Client` is fully configured the
//! moment its engine exists. Later adjustments go through
//! `Client::set_option`.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration snapshot for one client session.
///
/// The defaults match what a careful interactive user would pick: TLS host
/// verification on, redirects followed up to 5 hops, a 30 second request
/// timeout, session-scoped cookie capture/replay, and credentials looked up
/// from the user's netrc file.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Per-request timeout covering the whole transfer.
    pub timeout: Duration,
    /// Verify the TLS certificate matches the requested host.
    pub verify_host: bool,
    /// Follow 3xx redirects automatically.
    pub follow_redirects: bool,
    /// Redirect hop limit when following is enabled.
    pub max_redirects: u32,
    /// Consult a netrc file for HTTP Basic credentials.
    pub use_netrc: bool,
    /// Override the netrc location; `None` means `$HOME/.netrc`.
    pub netrc_path: Option<PathBuf>,
    /// Optional User-Agent header sent on every request.
    pub user_agent: Option<String>,
    /// Log each transaction's request and response lines at debug level.
    pub verbose: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            verify_host: true,
            follow_redirects: true,
            max_redirects: 5,
            use_netrc: true,
            netrc_path: None,
            user_agent: None,
            verbose: false,
        }
    }
}
