//! In-memory key-value store for testing.

use super::KeyStream;
use crate::KeyValueStore;
use crate::error::{ErrorKind, Result};
use async_stream::stream;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory key-value store for testing.
///
/// Values are stored in a `HashMap` behind a [`RwLock`], so all trait methods
/// can operate on `&self` without external synchronisation. Ideal for unit
/// tests that need a [`KeyValueStore`] without filesystem dependencies.
///
/// # Examples
///
/// ```
/// use verbum_storage::backend::{MemoryStore, KeyValueStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::with_values([("selected_version", "NVI")]);
/// assert_eq!(store.get("selected_version").await?.as_deref(), Some("NVI"));
///
/// store.set("last_read_chapter", "23").await?;
/// assert!(store.get("last_read_chapter").await?.is_some());
/// # Ok(())
/// # }
/// ```
pub struct MemoryStore {
    name: String,
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a memory store pre-populated with values.
    pub fn with_values(values: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        let map = values.into_iter().map(|(key, value)| (key.into(), value.into())).collect();
        Self {
            name: "memory".to_string(),
            values: RwLock::new(map),
        }
    }

    /// Number of stored values.
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }
}
impl Default for MemoryStore {
    fn default() -> Self {
        let values: [(&str, &str); 0] = [];
        Self::with_values(values)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(key.to_string())))
    }

    fn keys_stream<'a>(&'a self, prefix: Option<&'a str>) -> KeyStream<'a> {
        Box::pin(stream! {
            // Snapshot matching keys under the read lock, then drop it
            // before yielding to avoid holding the lock across yield points.
            let keys: Vec<String> = {
                let guard = self.values.read().await;
                guard
                    .keys()
                    .filter(|key| prefix.is_none_or(|pfx| key.starts_with(pfx)))
                    .cloned()
                    .collect()
            };
            for key in keys {
                yield Ok(key);
            }
        })
    }
}
