//! Error types for remora.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use derive_more::{Display, Error, From};

/// Main error type for remora operations.
///
/// Every failure mode of the send pipeline is captured into the returned
/// [`crate::Response`]; decode failures are returned directly from the
/// `parse_*` call that hit them. The storable variants are all `Clone` so a
/// recorded error can be re-returned by every subsequent decode call.
#[derive(Debug, Clone, Display, Error, From)]
pub enum Error {
    /// JSON serialization of the request body failed before any network activity.
    #[display("request body serialization failed: {_0}")]
    #[from(skip)]
    Serialize(#[error(not(source))] String),

    /// Malformed URL or other request-construction failure.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// The context timeout elapsed before the round trip completed.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// A response arrived with a status outside the {200, 201} allow-list.
    #[display("request failed with status {status}: {body}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response text.
        body: String,
    },

    /// A decode call failed.
    #[display("{_0}")]
    Parse(ParseError),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a body-serialization error.
    #[must_use]
    pub fn serialize(message: impl Into<String>) -> Self {
        Self::Serialize(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a non-success-status error from status code and response text.
    #[must_use]
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Returns the HTTP status code if this is a non-success-status error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

// ============================================================================
// Parse Error
// ============================================================================

/// Decode failure carrying a display message and an optional original cause.
///
/// Diagnostic key/value pairs ([`ParseError::with_detail`]) are flattened into
/// the message text, and the wrapped cause stays reachable through
/// [`ParseError::original`] (and [`std::error::Error::source`]) for
/// programmatic inspection.
#[derive(Debug, Clone)]
pub struct ParseError {
    message: String,
    source: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ParseError {
    /// Create a parse error with the given message and no cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Attach the original cause, folding its text into the message.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        let _ = write!(self.message, ": {source}");
        self.source = Some(Arc::new(source));
        self
    }

    /// Append a diagnostic key/value pair to the message.
    #[must_use]
    pub fn with_detail(mut self, key: &str, value: impl fmt::Display) -> Self {
        let _ = write!(self.message, ", {key}: {value}");
        self
    }

    /// The wrapped original cause, if any.
    #[must_use]
    pub fn original(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.original()
    }
}
