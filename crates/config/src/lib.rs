//! Configuration loading and validation.
//!
//! See [`loader`] for where values come from and in which order.

pub mod error;
pub mod loader;
mod settings;
mod validate;

pub use crate::loader::load;
pub use crate::settings::{BibleSettings, GenAiSettings, RetrySettings, Settings, StorageSettings};
