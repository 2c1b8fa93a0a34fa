//! Where the reader left off.

use crate::books::find_book;
use crate::passage::Passage;
use crate::error::{ErrorKind, Result};
use crate::translation::DEFAULT_TRANSLATION;
use exn::ResultExt;
use serde::Deserialize;
use verbum_storage::error::ErrorKind as StorageErrorKind;
use verbum_storage::{JsonStoreExt, KeyValueStore};

const BOOK_KEY: &str = "last_read_book";
const CHAPTER_KEY: &str = "last_read_chapter";
const VERSION_KEY: &str = "selected_version";

const DEFAULT_BOOK: &str = "Salmos";
const DEFAULT_CHAPTER: u32 = 23;

/// Last chapter opened from the book list, and the translation it was read in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingProgress {
    pub book: String,
    pub chapter: u32,
    pub version: String,
}

impl Default for ReadingProgress {
    fn default() -> Self {
        Self { book: DEFAULT_BOOK.to_string(), chapter: DEFAULT_CHAPTER, version: DEFAULT_TRANSLATION.to_string() }
    }
}

/// Only the name is needed back; the rest of the stored book comes from the
/// catalog.
#[derive(Deserialize)]
struct StoredBook {
    name: String,
}

impl ReadingProgress {
    /// Load saved progress, falling back to the default for anything missing
    /// or no longer valid. Only a failing store is an error.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let mut progress = Self::default();
        let book = match store.get_json::<StoredBook>(BOOK_KEY).await {
            Ok(stored) => stored.and_then(|stored| find_book(&stored.name)),
            Err(err) if matches!(&*err, StorageErrorKind::MalformedValue(_)) => {
                tracing::debug!(error = ?err, "Discarding unreadable reading position");
                None
            },
            Err(err) => return Err(err.raise(ErrorKind::Storage)),
        };
        let chapter = store
            .get(CHAPTER_KEY)
            .await
            .or_raise(|| ErrorKind::Storage)?
            .and_then(|raw| raw.trim().parse::<u32>().ok());
        if let Some(book) = book {
            progress.book = book.name.to_string();
            progress.chapter = chapter.filter(|chapter| book.has_chapter(*chapter)).unwrap_or(1);
        }
        if let Some(version) = store.get(VERSION_KEY).await.or_raise(|| ErrorKind::Storage)? {
            let version = version.trim();
            if !version.is_empty() {
                progress.version = version.to_string();
            }
        }
        Ok(progress)
    }

    /// Position to remember after reading `passage`, when it names a canon
    /// book and one of its chapters. Topical results spanning several books
    /// usually don't.
    pub fn from_passage(passage: &Passage, version: &str) -> Option<Self> {
        let book = passage.canonical_book()?;
        book.has_chapter(passage.chapter).then(|| Self {
            book: book.name.to_string(),
            chapter: passage.chapter,
            version: version.trim().to_string(),
        })
    }

    /// Persist this position. The book must be in the canon.
    pub async fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        let Some(book) = find_book(&self.book) else {
            exn::bail!(ErrorKind::UnknownBook(self.book.clone()));
        };
        if !book.has_chapter(self.chapter) {
            exn::bail!(ErrorKind::ChapterOutOfRange { book: book.name.to_string(), chapter: self.chapter });
        }
        store.set_json(BOOK_KEY, book).await.or_raise(|| ErrorKind::Storage)?;
        store.set(CHAPTER_KEY, &self.chapter.to_string()).await.or_raise(|| ErrorKind::Storage)?;
        store.set(VERSION_KEY, &self.version).await.or_raise(|| ErrorKind::Storage)?;
        tracing::debug!(book = book.name, chapter = self.chapter, version = %self.version, "Saved reading position");
        Ok(())
    }
}
