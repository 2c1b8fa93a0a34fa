//! Assistant Error Types

use derive_more::{Display, Error};
use verbum_retry::{Classify, ErrorClass};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The model could not be reached or refused, after any retries.
    #[display("generation failed ({_0})")]
    Generation(#[error(not(source))] ErrorClass),
    /// The model answered with nothing but whitespace.
    #[display("model returned an empty answer")]
    EmptyAnswer,
}

impl ErrorKind {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Generation(ErrorClass::Transient))
    }
}

impl Classify for ErrorKind {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Generation(class) => *class,
            Self::EmptyAnswer => ErrorClass::Fatal,
        }
    }
}
