//! Key-value store trait and implementations.
//!
//! This module defines the `KeyValueStore` trait, which provides a unified
//! interface over wherever the app keeps its device-local state (a directory
//! on disk, process memory for tests, or a read-only view of either).
//!

mod local;
#[cfg(any(test, feature = "mock"))]
mod memory;
mod ro;

pub use self::local::LocalStore;
#[cfg(any(test, feature = "mock"))]
pub use self::memory::MemoryStore;
pub use self::ro::ReadOnlyStore;
use crate::error::Result;
use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use std::pin::Pin;

pub type KeyStream<'a> = Pin<Box<dyn Stream<Item = Result<String>> + Send + 'a>>;

/// Unified interface for key-value stores.
///
/// Values are opaque strings (callers wanting structure go through
/// [`JsonStoreExt`](crate::JsonStoreExt)). Writes replace whatever was there
/// before: last write wins, nothing expires.
///
/// # Key Handling
/// Any string is a valid key, the empty string included. Implementations
/// that can't hold a key as-is must encode it, and hand back the original
/// key from [`keys_stream()`](Self::keys_stream).
///
/// # Examples
///
/// ```
/// use verbum_storage::{backend::KeyValueStore, error::Result};
///
/// async fn remembered_version(store: &dyn KeyValueStore) -> Result<String> {
///     Ok(store.get("selected_version").await?.unwrap_or_else(|| "ARA".to_string()))
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Name of the configured store (used for logging only).
    fn name(&self) -> &str;

    /// Read the value stored under `key`, or `None` if there is none.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the key
    /// does not exist.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Stream every key starting with `prefix` (all keys when `None`).
    ///
    /// Order is unspecified.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::TryStreamExt;
    /// # use verbum_storage::{backend::KeyValueStore, error::Result};
    /// # async fn example(store: &dyn KeyValueStore) -> Result<()> {
    /// let mut keys = store.keys_stream(Some("bible_v3_"));
    /// while let Some(key) = keys.try_next().await? {
    ///     println!("{key}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn keys_stream<'a>(&'a self, prefix: Option<&'a str>) -> KeyStream<'a>;

    /// Collect [`keys_stream()`](Self::keys_stream) into a sorted [`Vec`].
    async fn keys(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.keys_stream(prefix).try_collect().await?;
        keys.sort();
        Ok(keys)
    }
}
