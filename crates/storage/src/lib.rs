//! Device-local key-value storage.
//!
//! Everything the app remembers between runs (resolved passages, reading
//! position, church data) is a string value under a flat string key, the
//! same contract a browser's local storage offers. Writes are last-write-wins;
//! there is no expiry and no cross-device sync.

pub mod backend;
pub mod error;
mod json;
mod key;

pub use crate::backend::KeyValueStore;
pub use crate::json::JsonStoreExt;
use std::sync::Arc;

pub type StoreHandle = Arc<dyn KeyValueStore + Send + Sync>;
