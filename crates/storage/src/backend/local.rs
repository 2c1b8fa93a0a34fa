//! Directory-backed key-value store.
//!
//! Every key is a file directly under the configured root directory; the file
//! contents are the value. Accessed with `tokio::fs` for async I/O.

use crate::KeyValueStore;
use crate::backend::KeyStream;
use crate::error::{ErrorKind, Result};
use crate::key::{Entry, FileName, classify_file_name, split_header};
use async_stream::stream;
use async_trait::async_trait;
use std::fs::create_dir_all as sync_create_dir;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory-backed key-value store.
///
/// Keys are percent-encoded into file names; keys too long for a file name
/// get a hashed name and are recorded on the first line of the file. Values are written to a hidden temporary file first and renamed
/// into place, so a reader never observes a half-written value.
///
/// # Examples
///
/// ```no_run
/// use verbum_storage::backend::LocalStore;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = LocalStore::new("device", "/home/user/.local/share/verbum")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalStore {
    name: String,
    /// Directory holding one file per key
    root: PathBuf,
}
impl LocalStore {
    /// Create a new directory-backed store.
    ///
    /// # Arguments
    /// * `root` - Absolute path to the storage directory (created if missing)
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute or is not a directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidRoot(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidRoot(root));
            }
        } else {
            // Use non-async here; it'll only happen once on startup and it's
            // not worth the hassle of making the constructor async.
            sync_create_dir(&root).map_err(|e| Self::map_io_error(e, &root))?;
        }
        Ok(Self { name: name.into(), root })
    }

    /// Directory holding the stored values.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }

    async fn read_string(&self, key: &str, path: &Path) -> Result<Option<String>> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => exn::bail!(Self::map_io_error(e, path)),
        };
        match String::from_utf8(bytes) {
            Ok(contents) => Ok(Some(contents)),
            Err(_) => exn::bail!(ErrorKind::MalformedValue(key.to_string())),
        }
    }

    /// Key recorded inside a hashed file.
    async fn hashed_key(&self, path: &Path) -> Result<Option<String>> {
        let contents = match fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => return Ok(None),
            Err(e) => exn::bail!(Self::map_io_error(e, path)),
        };
        Ok(split_header(&contents).map(|(key, _)| key))
    }
}

#[async_trait]
impl KeyValueStore for LocalStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = FileName::encode(key);
        let path = self.root.join(file.as_str());
        let Some(contents) = self.read_string(key, &path).await? else {
            return Ok(None);
        };
        if file.header().is_none() {
            return Ok(Some(contents));
        }
        match split_header(&contents) {
            Some((stored, value)) if stored == key => Ok(Some(value.to_string())),
            // Same name, different key: a hash collision, so not our value.
            Some(_) => Ok(None),
            None => exn::bail!(ErrorKind::MalformedValue(key.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let file = FileName::encode(key);
        let path = self.root.join(file.as_str());
        let staging = self.root.join(format!(".{}.tmp", file.as_str()));
        let contents = match file.header() {
            Some(header) => format!("{header}\n{value}"),
            None => value.to_string(),
        };
        fs::write(&staging, contents).await.map_err(|e| Self::map_io_error(e, &staging))?;
        fs::rename(&staging, &path).await.map_err(|e| Self::map_io_error(e, &path))?;
        tracing::trace!(store = %self.name, key, file = file.as_str(), bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if self.get(key).await?.is_none() {
            exn::bail!(ErrorKind::NotFound(key.to_string()));
        }
        let path = self.root.join(FileName::encode(key).as_str());
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => exn::bail!(ErrorKind::NotFound(key.to_string())),
            Err(e) => exn::bail!(Self::map_io_error(e, &path)),
        }
    }

    fn keys_stream<'a>(&'a self, prefix: Option<&'a str>) -> KeyStream<'a> {
        Box::pin(stream! {
            let mut entries = match fs::read_dir(&self.root).await {
                Ok(entries) => entries,
                Err(e) => {
                    yield Err(exn::Exn::from(Self::map_io_error(e, &self.root)));
                    return;
                }
            };
            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => { yield Err(exn::Exn::from(Self::map_io_error(e, &self.root))); break; },
                };
                match entry.file_type().await {
                    Ok(kind) if kind.is_file() => {},
                    Ok(_) => continue,
                    Err(e) => { yield Err(exn::Exn::from(Self::map_io_error(e, &entry.path()))); continue; },
                }
                // Non-UTF-8 names were never written as keys.
                let Ok(name) = entry.file_name().into_string() else { continue };
                let key = match classify_file_name(&name) {
                    Entry::Plain(key) => key,
                    Entry::Ignored => continue,
                    Entry::Hashed => match self.hashed_key(&entry.path()).await {
                        Ok(Some(key)) => key,
                        Ok(None) => continue,
                        Err(e) => { yield Err(e); continue; },
                    },
                };
                if prefix.is_none_or(|pfx| key.starts_with(pfx)) {
                    yield Ok(key);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_absolute_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(LocalStore::new("device", temp_dir.path()).is_ok());
        assert!(LocalStore::new("device", "relative/path").is_err());
        assert!(LocalStore::new("device", "./relative").is_err());
    }

    #[test]
    fn test_new_creates_missing_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("nested/store");
        let store = LocalStore::new("device", &root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root);
    }

    #[test]
    fn test_new_rejects_file_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("file");
        std::fs::write(&file, b"not a directory").unwrap();
        let err = LocalStore::new("device", &file).err().unwrap();
        assert!(matches!(&*err, ErrorKind::InvalidRoot(_)));
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new("device", temp_dir.path()).unwrap();
        store.set("selected_version", "NVI").await.unwrap();
        assert_eq!(store.get("selected_version").await.unwrap().as_deref(), Some("NVI"));
        assert_eq!(std::fs::read_to_string(temp_dir.path().join("selected_version")).unwrap(), "NVI");
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new("device", temp_dir.path()).unwrap();
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new("device", temp_dir.path()).unwrap();
        store.set("last_read_chapter", "1").await.unwrap();
        store.set("last_read_chapter", "23").await.unwrap();
        assert_eq!(store.get("last_read_chapter").await.unwrap().as_deref(), Some("23"));
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        LocalStore::new("device", temp_dir.path()).unwrap().set("k", "v").await.unwrap();
        let reopened = LocalStore::new("device", temp_dir.path()).unwrap();
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_remove() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new("device", temp_dir.path()).unwrap();
        store.set("k", "v").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        let err = store.remove("k").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_keys_with_prefix() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new("device", temp_dir.path()).unwrap();
        store.set("bible_v3_salmos_23_ara", "{}").await.unwrap();
        store.set("bible_v3_search_joão3_nvi", "{}").await.unwrap();
        store.set("selected_version", "ARA").await.unwrap();
        std::fs::create_dir(temp_dir.path().join("bible_v3_not_a_value")).unwrap();
        std::fs::write(temp_dir.path().join(".bible_v3_leftover.tmp"), b"{}").unwrap();
        let keys = store.keys(Some("bible_v3_")).await.unwrap();
        assert_eq!(keys, ["bible_v3_salmos_23_ara", "bible_v3_search_joão3_nvi"]);
        assert_eq!(store.keys(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_any_key_stays_inside_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("store");
        let store = LocalStore::new("device", &root).unwrap();
        for key in ["../escape", ".hidden", "bible_v3_search_jo3/16_ara", "a\\b", "", "~"] {
            store.set(key, key).await.unwrap();
            assert_eq!(store.get(key).await.unwrap().as_deref(), Some(key));
        }
        assert!(!temp_dir.path().join("escape").exists());
        assert_eq!(std::fs::read_dir(&root).unwrap().count(), 6);
        let keys = store.keys(None).await.unwrap();
        assert_eq!(keys, ["", "../escape", ".hidden", "a\\b", "bible_v3_search_jo3/16_ara", "~"]);
    }

    #[tokio::test]
    async fn test_long_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new("device", temp_dir.path()).unwrap();
        let first = format!("bible_v3_search_{}_ara", "ansiedadeemedo".repeat(30));
        let second = format!("bible_v3_search_{}_nvi", "ansiedadeemedo".repeat(30));
        store.set(&first, "{\"n\":1}").await.unwrap();
        store.set(&second, "{\"n\":2}").await.unwrap();
        assert_eq!(store.get(&first).await.unwrap().as_deref(), Some("{\"n\":1}"));
        assert_eq!(store.get(&second).await.unwrap().as_deref(), Some("{\"n\":2}"));
        assert_eq!(store.keys(Some("bible_v3_search_")).await.unwrap(), [first.clone(), second]);

        store.remove(&first).await.unwrap();
        assert_eq!(store.get(&first).await.unwrap(), None);
        let err = store.remove(&first).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }
}
