//! Opt-in process-level configuration.
//!
//! Nothing in this crate touches signal dispositions implicitly; embedding
//! applications call these functions themselves, as early as practical in
//! their entry point.

/// Ignore `SIGPIPE` for the whole process.
///
/// Writing to a socket whose peer already closed raises `SIGPIPE`, which
/// kills the process by default on Unix. Blocking HTTP clients generally
/// prefer to see the write error instead. This changes process-wide state,
/// so it is never called from library code.
#[cfg(unix)]
pub fn ignore_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_IGN);
    }
}

/// No-op on platforms without `SIGPIPE`.
#[cfg(not(unix))]
pub fn ignore_sigpipe() {}
