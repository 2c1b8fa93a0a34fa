//! Generation Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use verbum_retry::{Classify, ErrorClass, classify_message};

/// A generation error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The service refused the request. The message is the service's own,
    /// prefixed with the HTTP status (e.g. `429 RESOURCE_EXHAUSTED: ...`).
    #[display("request rejected: {_0}")]
    Rejected(#[error(not(source))] String),
    /// The request never got an answer (connection, TLS, timeout).
    #[display("transport error: {_0}")]
    Transport(#[error(not(source))] String),
    /// The service answered with something other than a generation result.
    #[display("malformed response from service")]
    MalformedResponse,
    /// The model produced no text at all.
    #[display("empty response from model {_0}")]
    EmptyResponse(#[error(not(source))] String),
    /// The client can't be built from the given settings.
    #[display("invalid client configuration: {_0}")]
    Configuration(#[error(not(source))] String),
}

impl Classify for ErrorKind {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Rejected(message) | Self::Transport(message) => classify_message(message),
            Self::MalformedResponse | Self::EmptyResponse(_) | Self::Configuration(_) => ErrorClass::Fatal,
        }
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        self.class().is_retryable()
    }
}
