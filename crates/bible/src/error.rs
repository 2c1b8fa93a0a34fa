//! Bible Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use verbum_retry::{Classify, ErrorClass};

/// A passage resolution error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for passage resolution.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Not cached and no connectivity; the model was never asked.
    #[display("offline and not cached: {_0}")]
    Offline(#[error(not(source))] String),
    /// The model could not be reached or refused, after any retries.
    #[display("passage generation failed ({_0})")]
    Generation(#[error(not(source))] ErrorClass),
    /// The model's answer is not passage JSON.
    #[display("model response is not valid passage JSON")]
    Parse,
    /// The model's answer is JSON but breaks a passage invariant.
    #[display("passage rejected: {_0}")]
    Schema(#[error(not(source))] String),
    /// Reading or writing device storage failed.
    #[display("device storage error")]
    Storage,
    /// Nothing to look up.
    #[display("empty query")]
    EmptyQuery,
    /// Book name not in the canon.
    #[display("unknown book: {_0}")]
    UnknownBook(#[error(not(source))] String),
    /// Book exists but has no such chapter.
    #[display("{book} has no chapter {chapter}")]
    ChapterOutOfRange { book: String, chapter: u32 },
}

impl Classify for ErrorKind {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Offline(_) => ErrorClass::Offline,
            Self::Generation(class) => *class,
            Self::Parse | Self::Schema(_) => ErrorClass::Parse,
            Self::Storage | Self::EmptyQuery | Self::UnknownBook(_) | Self::ChapterOutOfRange { .. } => ErrorClass::Fatal,
        }
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Generation failures are only ever returned once retries are used up,
    /// but a later call (after the quota window) may still succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Offline(_) | Self::Generation(ErrorClass::Transient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Offline("bible_v3_search_jo3_ara".to_string()), ErrorClass::Offline)]
    #[case(ErrorKind::Generation(ErrorClass::Transient), ErrorClass::Transient)]
    #[case(ErrorKind::Generation(ErrorClass::Fatal), ErrorClass::Fatal)]
    #[case(ErrorKind::Parse, ErrorClass::Parse)]
    #[case(ErrorKind::Schema("no verses".to_string()), ErrorClass::Parse)]
    #[case(ErrorKind::Storage, ErrorClass::Fatal)]
    #[case(ErrorKind::EmptyQuery, ErrorClass::Fatal)]
    fn test_class(#[case] kind: ErrorKind, #[case] expected: ErrorClass) {
        assert_eq!(kind.class(), expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ErrorKind::ChapterOutOfRange { book: "Judas".to_string(), chapter: 2 }.to_string(),
            "Judas has no chapter 2"
        );
        assert_eq!(ErrorKind::Generation(ErrorClass::Transient).to_string(), "passage generation failed (transient)");
    }
}
