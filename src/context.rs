//! Per-request context carrying an optional timeout.

use std::time::Duration;

/// Context for a single request.
///
/// [`Context::background`] is unbounded; [`Context::with_timeout`] bounds
/// the whole round trip (headers and body), which then aborts with
/// [`crate::Error::Timeout`]. Dropping the request future cancels the round
/// trip in either case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    timeout: Option<Duration>,
}

impl Context {
    /// Context with no timeout.
    #[must_use]
    pub const fn background() -> Self {
        Self { timeout: None }
    }

    /// Context that aborts the round trip once `timeout` elapses.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// The configured timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
