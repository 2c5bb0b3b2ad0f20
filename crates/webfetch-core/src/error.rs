//! Error types and handling for webfetch-core operations.
//!
//! Failures fall into two tiers with different propagation rules:
//!
//! - **Request-parameter failures** (`InvalidUrl` on single-page operations,
//!   `InvalidSearchTerm`, `InvalidBatchParameters`) fail the whole call before
//!   any network activity.
//! - **Per-URL failures** (`Timeout`, `Connection`, `Network`) are captured
//!   into the affected item's result as a [`FailureRecord`] and never abort a
//!   batch.
//!
//! Non-2xx HTTP statuses are deliberately *not* errors at the fetch level: a
//! 404 page is still a document worth extracting. Callers that want the strict
//! interpretation use [`crate::FetchOutcome::error_for_status`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for webfetch-core operations.
///
/// All public functions in webfetch-core return `Result<T, Error>`. Network
/// errors preserve the underlying `reqwest::Error` so the source chain stays
/// inspectable; everything else carries a human-readable message.
#[derive(Error, Debug)]
pub enum Error {
    /// URL is not a syntactically valid absolute HTTP/HTTPS URL.
    ///
    /// Raised before any network call is made. Covers unparseable URLs,
    /// unsupported schemes (`ftp:`, `file:`), and host-less URLs.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL as provided by the caller.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Request exceeded its timeout.
    #[error("Timeout fetching '{0}'")]
    Timeout(String),

    /// Connection-level failure: DNS resolution, refused, or reset.
    ///
    /// The only failure class that prevents a `FetchOutcome` from being
    /// produced at all.
    #[error("Connection error for '{url}': {reason}")]
    Connection {
        /// URL the connection was attempted for.
        url: String,
        /// Underlying transport failure description.
        reason: String,
    },

    /// Non-2xx HTTP status, surfaced only when a caller opts into strict
    /// status handling via `FetchOutcome::error_for_status`.
    #[error("HTTP {status} for '{url}'")]
    HttpStatus {
        /// URL that returned the status.
        url: String,
        /// The non-2xx status code.
        status: u16,
    },

    /// Markup could not be processed.
    ///
    /// Content extraction itself never raises this (it degrades to the
    /// full-text fallback instead); it covers auxiliary parsing such as
    /// configuration input.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A search term is unusable, e.g. the empty string (which would match at
    /// every position).
    #[error("Invalid search term: {0}")]
    InvalidSearchTerm(String),

    /// Batch or filter parameters are malformed.
    ///
    /// Covers empty URL lists, `max_concurrent < 1`, and mutually exclusive
    /// link filters requested together. Rejected before any work starts.
    #[error("Invalid batch parameters: {0}")]
    InvalidBatchParameters(String),

    /// Other network failure from the HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// A convenient `Result` alias for webfetch-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Wire-stable discriminant for an [`Error`].
///
/// Returned inside [`FailureRecord`] so callers can branch on the failure
/// class without inspecting message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Syntactically invalid URL.
    InvalidUrl,
    /// Request timed out.
    Timeout,
    /// DNS/refused/reset.
    ConnectionError,
    /// Non-2xx status under strict handling.
    HttpError,
    /// Markup/configuration parsing failed.
    ParseError,
    /// Unusable search term.
    InvalidSearchTerm,
    /// Malformed batch/filter parameters.
    InvalidBatchParameters,
    /// Other HTTP client failure.
    NetworkError,
}

impl Error {
    /// The wire-stable kind tag for this error.
    ///
    /// `reqwest` timeouts and connect failures are folded into
    /// [`ErrorKind::Timeout`] and [`ErrorKind::ConnectionError`] so transport
    /// callers see the same taxonomy regardless of which layer detected the
    /// failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Connection { .. } => ErrorKind::ConnectionError,
            Self::HttpStatus { .. } => ErrorKind::HttpError,
            Self::Parse(_) => ErrorKind::ParseError,
            Self::InvalidSearchTerm(_) => ErrorKind::InvalidSearchTerm,
            Self::InvalidBatchParameters(_) => ErrorKind::InvalidBatchParameters,
            Self::Network(e) => {
                if e.is_timeout() {
                    ErrorKind::Timeout
                } else if e.is_connect() {
                    ErrorKind::ConnectionError
                } else {
                    ErrorKind::NetworkError
                }
            },
        }
    }

    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for failures that are typically temporary (timeouts,
    /// connection errors) and `false` for permanent ones (invalid URLs,
    /// malformed parameters).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Timeout | ErrorKind::ConnectionError | ErrorKind::NetworkError
        )
    }
}

/// Structured failure shape returned on every operation's error path.
///
/// Distinct from the success shape so callers discriminate on structure, not
/// message text. One is produced per failed batch item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// URL the failure applies to.
    pub url: String,
    /// Failure class tag.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl FailureRecord {
    /// Capture an [`Error`] against the URL it occurred for.
    #[must_use]
    pub fn from_error(url: impl Into<String>, error: &Error) -> Self {
        Self {
            url: url.into(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}
