//! Read-only key-value store.
//!
//! This module provides a store implementation that wraps other
//! implementations and prevents write operations from executing, but
//! indicating success on return.

use async_trait::async_trait;

use crate::{KeyValueStore, StoreHandle, backend::KeyStream, error::Result};

/// Read-only key-value store.
///
/// Wraps another store and silently drops all write operations, logging an
/// [`info event`](tracing::Event). Useful for inspecting a device's state
/// without the run leaving anything behind.
#[derive(Clone)]
pub struct ReadOnlyStore {
    inner: StoreHandle,
}
impl ReadOnlyStore {
    pub fn new(inner: StoreHandle) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        tracing::info!(key, bytes = value.len(), "Skipping write during read-only mode");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        tracing::info!(key, "Skipping removal during read-only mode");
        Ok(())
    }

    fn keys_stream<'a>(&'a self, prefix: Option<&'a str>) -> KeyStream<'a> {
        self.inner.keys_stream(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reads_pass_through_and_writes_are_dropped() {
        let inner = Arc::new(MemoryStore::with_values([("selected_version", "ARA")]));
        let store = ReadOnlyStore::new(inner.clone());
        assert_eq!(store.get("selected_version").await.unwrap().as_deref(), Some("ARA"));
        store.set("selected_version", "NVI").await.unwrap();
        store.remove("selected_version").await.unwrap();
        assert_eq!(inner.get("selected_version").await.unwrap().as_deref(), Some("ARA"));
        assert_eq!(store.keys(None).await.unwrap(), ["selected_version"]);
    }
}
