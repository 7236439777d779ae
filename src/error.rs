//! Error types for cep-race
//!
//! Two layers, mirroring how a race unfolds:
//! - [`FetchError`] is what a single source reports. It travels as data inside
//!   an [`Outcome`](crate::types::Outcome) and never crosses a task boundary
//!   any other way.
//! - [`Error`] is the race-level failure: bad configuration, the first source
//!   to answer having failed, or the deadline elapsing.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for cep-race operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cep-race
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "sources")
        key: Option<String>,
    },

    /// The first source to answer reported a failure
    #[error("{source_name}: {error}")]
    Fetch {
        /// Name of the source whose outcome decided the race
        source_name: String,
        /// What went wrong for that source
        #[source]
        error: FetchError,
    },

    /// No source answered before the race deadline
    #[error("timeout: no source responded within {}ms", .timeout.as_millis())]
    Timeout {
        /// The race-wide deadline that elapsed
        timeout: Duration,
    },

    /// The shared HTTP client could not be built
    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub(crate) fn config(message: impl Into<String>, key: &str) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Returns true if the race ended because the deadline elapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

/// Failure reported by a single source lookup
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request URL could not be built from the source template
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl {
        /// The rendered URL that failed to parse
        url: String,
        /// Why parsing failed
        reason: String,
    },

    /// Transport-level failure (DNS, connection refused, reset, TLS)
    #[error("connection error: {0}")]
    Connection(#[source] reqwest::Error),

    /// The source answered with a non-success HTTP status
    #[error("HTTP status {status}")]
    Status {
        /// The HTTP status code returned
        status: u16,
    },

    /// The response body could not be read to completion
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The body was not JSON or did not match the source's schema
    #[error("decode error: {0}")]
    Decode(String),

    /// The source answered but does not know the postal code
    #[error("postal code not found")]
    NotFound,

    /// The race was decided or torn down before this lookup finished
    #[error("canceled")]
    Canceled,
}

/// Coarse classification of a [`FetchError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The request could not be constructed
    Request,
    /// Network or HTTP-level failure
    Transport,
    /// The response could not be turned into an address
    Decode,
    /// The lookup was canceled by the race
    Canceled,
}

impl FetchError {
    /// Map this error onto its [`FailureKind`]
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::InvalidUrl { .. } => FailureKind::Request,
            FetchError::Connection(_) | FetchError::Status { .. } | FetchError::Body(_) => {
                FailureKind::Transport
            }
            // A "not found" reply is a well-formed answer that carries no address
            FetchError::Decode(_) | FetchError::NotFound => FailureKind::Decode,
            FetchError::Canceled => FailureKind::Canceled,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}
