//! Exponential back-off for calls to rate-limited services.
//!
//! The generative text service this workspace talks to answers with quota
//! and "server busy" errors under load. [`Backoff::run`] re-invokes a failing
//! call while its error [classifies](Classify) as [`ErrorClass::Transient`],
//! doubling the delay each time, and hands every other failure straight back
//! to the caller.
//!
//! ```
//! use std::time::Duration;
//! use verbum_retry::{Backoff, Classify, ErrorClass, classify_message};
//!
//! #[derive(Debug)]
//! struct Busy(&'static str);
//! impl Classify for Busy {
//!     fn class(&self) -> ErrorClass {
//!         classify_message(self.0)
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backoff = Backoff::new(2, Duration::from_millis(1));
//! let result: Result<u8, Busy> = backoff.run(|| async { Err(Busy("invalid argument")) }).await;
//! assert!(result.is_err());
//! # }
//! ```

mod backoff;
mod classify;

pub use crate::backoff::{Backoff, DEFAULT_INITIAL_DELAY, DEFAULT_RETRIES, with_retry};
pub use crate::classify::{Classify, ErrorClass, TRANSIENT_TOKENS, classify_message};
