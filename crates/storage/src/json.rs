//! Typed access on top of string values.

use crate::backend::KeyValueStore;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// JSON (de)serialization helpers for any [`KeyValueStore`].
///
/// # Examples
///
/// ```
/// use verbum_storage::JsonStoreExt;
/// # use verbum_storage::{KeyValueStore, error::Result};
/// # async fn example(store: &dyn KeyValueStore) -> Result<()> {
/// store.set_json("last_read_chapter", &23u32).await?;
/// let chapter: Option<u32> = store.get_json("last_read_chapter").await?;
/// assert_eq!(chapter, Some(23));
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait JsonStoreExt {
    /// Read and deserialize the value under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent and
    /// [`MalformedValue`](ErrorKind::MalformedValue) when the stored text is
    /// not valid JSON for `T`.
    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;

    /// Serialize `value` and store it under `key`, replacing any previous value.
    async fn set_json<T: Serialize + Sync + ?Sized>(&self, key: &str, value: &T) -> Result<()>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> JsonStoreExt for S {
    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).or_raise(|| ErrorKind::MalformedValue(key.to_string()))?;
        Ok(Some(value))
    }

    async fn set_json<T: Serialize + Sync + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).or_raise(|| ErrorKind::Serialize(key.to_string()))?;
        self.set(key, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Progress {
        book: String,
        chapter: u32,
    }

    #[tokio::test]
    async fn test_json_roundtrip_through_store() {
        let store = MemoryStore::default();
        let progress = Progress { book: "Salmos".to_string(), chapter: 23 };
        store.set_json("progress", &progress).await.unwrap();
        assert_eq!(store.get("progress").await.unwrap().as_deref(), Some(r#"{"book":"Salmos","chapter":23}"#));
        assert_eq!(store.get_json::<Progress>("progress").await.unwrap(), Some(progress));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = MemoryStore::default();
        assert_eq!(store.get_json::<Progress>("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_value() {
        let store = MemoryStore::with_values([("progress", "{not json")]);
        let err = store.get_json::<Progress>("progress").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::MalformedValue(key) if key == "progress"));
    }
}
