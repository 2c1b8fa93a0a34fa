//! Storage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Key does not exist (only raised by operations that require it to)
    #[display("key not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Access denied to the storage location
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// Storage root is unusable (relative, or not a directory)
    #[display("invalid storage root: {}", _0.display())]
    InvalidRoot(#[error(not(source))] PathBuf),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Stored value is not valid UTF-8 or not the JSON shape requested
    #[display("malformed value stored under key {_0:?}")]
    MalformedValue(#[error(not(source))] String),
    /// Value could not be serialized before storing
    #[display("could not serialize value for key {_0:?}")]
    Serialize(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
