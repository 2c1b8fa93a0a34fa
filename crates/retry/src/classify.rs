//! Failure classification.
//!
//! Only the message of an error is inspected: whatever the service, a quota
//! or overload failure mentions one of [`TRANSIENT_TOKENS`] somewhere in its
//! text.

use derive_more::Display;

/// Message fragments marking a failure as rate-limiting or a transient server
/// fault. Matched case-insensitively against the full error message.
pub const TRANSIENT_TOKENS: [&str; 6] = ["429", "500", "QUOTA", "EXHAUSTED", "RATE_LIMIT", "RESOURCE_EXHAUSTED"];

/// What kind of failure an error represents, from the point of view of
/// whoever decides to try again.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Rate limiting or a busy server; waiting may help.
    #[display("transient")]
    Transient,
    /// Anything else the remote service rejected.
    #[display("fatal")]
    Fatal,
    /// The service answered, but not with what was asked for.
    #[display("parse")]
    Parse,
    /// No connectivity; the service was never contacted.
    #[display("offline")]
    Offline,
}

impl ErrorClass {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Transient)
    }
}

/// Errors that know which [`ErrorClass`] they belong to.
pub trait Classify {
    fn class(&self) -> ErrorClass;
}

impl Classify for ErrorClass {
    fn class(&self) -> ErrorClass {
        *self
    }
}

impl<E> Classify for exn::Exn<E>
where
    E: Classify + std::error::Error + Send + Sync + 'static,
{
    fn class(&self) -> ErrorClass {
        (**self).class()
    }
}

/// Classify a raw error message: [`Transient`](ErrorClass::Transient) when it
/// contains any of [`TRANSIENT_TOKENS`] (ignoring case), otherwise
/// [`Fatal`](ErrorClass::Fatal).
///
/// ```
/// use verbum_retry::{ErrorClass, classify_message};
///
/// assert_eq!(classify_message("429 Too Many Requests"), ErrorClass::Transient);
/// assert_eq!(classify_message("quota exceeded for project"), ErrorClass::Transient);
/// assert_eq!(classify_message("400 INVALID_ARGUMENT"), ErrorClass::Fatal);
/// ```
pub fn classify_message(message: impl AsRef<str>) -> ErrorClass {
    let message = message.as_ref().to_uppercase();
    match TRANSIENT_TOKENS.iter().any(|token| message.contains(token)) {
        true => ErrorClass::Transient,
        false => ErrorClass::Fatal,
    }
}
