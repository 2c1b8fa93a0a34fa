//! Cache-then-fetch passage resolution.

use crate::books::find_book;
use crate::connectivity::ConnectivityHandle;
use crate::error::{ErrorKind, Result};
use crate::key::CacheKey;
use crate::passage::{Passage, parse_passage};
use crate::prompt::passage_request;
use exn::ResultExt;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tracing::instrument;
use verbum_genai::GeneratorHandle;
use verbum_retry::{Backoff, Classify};
use verbum_storage::{JsonStoreExt, StoreHandle};

/// Model used for passage lookups unless configured otherwise.
pub const DEFAULT_PASSAGE_MODEL: &str = "gemini-3-pro-preview";

/// Resolves free-text queries to [`Passage`]s, caching every success forever.
///
/// Lookups go through three gates, in order:
///
/// 1. **Cache**: a stored passage for the same [`CacheKey`] is returned as
///    is. No connectivity check, no model call.
/// 2. **Connectivity**: offline misses fail immediately.
/// 3. **Model**: one schema-constrained generation, retried with
///    [`Backoff`] on quota/server errors, parsed, validated, then cached.
///
/// At most one generation is in flight per key: concurrent callers asking
/// for the same key wait for the first and are answered from the cache.
pub struct PassageResolver {
    generator: GeneratorHandle,
    store: StoreHandle,
    connectivity: ConnectivityHandle,
    backoff: Backoff,
    model: String,
    in_flight: Mutex<HashMap<CacheKey, Weak<Mutex<()>>>>,
}

impl PassageResolver {
    pub fn new(generator: GeneratorHandle, store: StoreHandle, connectivity: ConnectivityHandle) -> Self {
        Self {
            generator,
            store,
            connectivity,
            backoff: Backoff::default(),
            model: DEFAULT_PASSAGE_MODEL.to_string(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Resolve a reference or theme, or `None` if it can't be resolved right
    /// now (the caller should offer to try again). Never fails.
    pub async fn resolve(&self, query: &str, version: &str) -> Option<Passage> {
        self.try_resolve(query, version).await.inspect_err(|err| log_failure(query, version, err)).ok()
    }

    /// Like [`resolve()`](Self::resolve), with the reason for failure.
    #[instrument(skip(self))]
    pub async fn try_resolve(&self, query: &str, version: &str) -> Result<Passage> {
        if query.trim().is_empty() {
            exn::bail!(ErrorKind::EmptyQuery);
        }
        let key = CacheKey::search(query, version);
        self.cached_or_generated(&key, query.trim(), version.trim()).await
    }

    /// Resolve a whole chapter picked from the book list, or `None`.
    pub async fn load_chapter(&self, book: &str, chapter: u32, version: &str) -> Option<Passage> {
        let query = format!("{book} {chapter}");
        self.try_load_chapter(book, chapter, version).await.inspect_err(|err| log_failure(&query, version, err)).ok()
    }

    /// Like [`load_chapter()`](Self::load_chapter), with the reason for
    /// failure. The book must be in the canon and have the chapter.
    #[instrument(skip(self))]
    pub async fn try_load_chapter(&self, book: &str, chapter: u32, version: &str) -> Result<Passage> {
        let Some(canonical) = find_book(book) else {
            exn::bail!(ErrorKind::UnknownBook(book.to_string()));
        };
        if !canonical.has_chapter(chapter) {
            exn::bail!(ErrorKind::ChapterOutOfRange { book: canonical.name.to_string(), chapter });
        }
        let key = CacheKey::chapter(canonical.name, chapter, version);
        let query = format!("{} {chapter}", canonical.name);
        self.cached_or_generated(&key, &query, version.trim()).await
    }

    async fn cached_or_generated(&self, key: &CacheKey, query: &str, version: &str) -> Result<Passage> {
        if let Some(passage) = self.cached(key).await {
            tracing::debug!(%key, "Passage served from cache");
            return Ok(passage);
        }
        if !self.connectivity.is_online() {
            exn::bail!(ErrorKind::Offline(key.to_string()));
        }
        let flight = self.flight(key).await;
        let _guard = flight.lock().await;
        // Another caller may have resolved this key while we were waiting.
        if let Some(passage) = self.cached(key).await {
            tracing::debug!(%key, "Passage resolved by a concurrent request");
            return Ok(passage);
        }
        let passage = self.generate(query, version).await?;
        self.remember(key, &passage).await;
        Ok(passage)
    }

    async fn generate(&self, query: &str, version: &str) -> Result<Passage> {
        let request = passage_request(&self.model, query, version);
        let raw = match self.backoff.run(|| self.generator.generate(&request)).await {
            Ok(raw) => raw,
            Err(err) => {
                let class = err.class();
                return Err(err.raise(ErrorKind::Generation(class)));
            },
        };
        parse_passage(&raw)
    }

    /// Read a cached passage. Unreadable entries count as a miss and get
    /// overwritten by the next success.
    async fn cached(&self, key: &CacheKey) -> Option<Passage> {
        match self.store.get_json::<Passage>(key.as_str()).await {
            Ok(passage) => passage,
            Err(err) => {
                tracing::warn!(%key, error = ?err, "Ignoring unreadable cache entry");
                None
            },
        }
    }

    /// Persist a resolved passage. A failed write is logged, not returned:
    /// the passage is still good, it just won't be available offline.
    async fn remember(&self, key: &CacheKey, passage: &Passage) {
        match self.store.set_json(key.as_str(), passage).await.or_raise(|| ErrorKind::Storage) {
            Ok(()) => tracing::debug!(%key, verses = passage.verses.len(), "Passage cached"),
            Err(err) => tracing::warn!(%key, error = ?err, "Could not cache passage"),
        }
    }

    async fn flight(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.retain(|_, flight| flight.strong_count() > 0);
        if let Some(flight) = in_flight.get(key).and_then(Weak::upgrade) {
            return flight;
        }
        let flight = Arc::new(Mutex::new(()));
        in_flight.insert(key.clone(), Arc::downgrade(&flight));
        flight
    }
}

fn log_failure(query: &str, version: &str, err: &exn::Exn<ErrorKind>) {
    tracing::warn!(query, version, class = %err.class(), error = ?err, "Could not resolve passage");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::NetworkSwitch;
    use std::time::Duration;
    use tokio::time::Instant;
    use verbum_genai::{MockGenerator, Reply};
    use verbum_retry::ErrorClass;
    use verbum_storage::KeyValueStore;
    use rstest::rstest;
    use verbum_storage::backend::{LocalStore, MemoryStore};

    const JOHN_3: &str = r#"{"reference":"João 3","book":"João","chapter":3,"verses":[{"num":1,"text":"Havia um fariseu chamado Nicodemos."},{"num":16,"text":"Porque Deus amou o mundo de tal maneira."}]}"#;
    const PSALM_23: &str = r#"{"reference":"Salmos 23","book":"Salmos","chapter":23,"verses":[{"num":1,"text":"O Senhor é o meu pastor; nada me faltará."}]}"#;

    struct Fixture {
        generator: Arc<MockGenerator>,
        store: Arc<MemoryStore>,
        resolver: PassageResolver,
    }

    fn fixture(generator: MockGenerator, store: MemoryStore, online: bool) -> Fixture {
        let generator = Arc::new(generator);
        let store = Arc::new(store);
        let resolver = PassageResolver::new(generator.clone(), store.clone(), Arc::new(NetworkSwitch::new(online)));
        Fixture { generator, store, resolver }
    }

    #[tokio::test]
    async fn test_resolves_and_caches() {
        let Fixture { generator, store, resolver } = fixture(MockGenerator::replying(JOHN_3), MemoryStore::default(), true);

        let first = resolver.resolve("João 3", "NVI").await.unwrap();
        assert_eq!(first.book, "João");
        assert_eq!(first.chapter, 3);
        assert!(!first.verses.is_empty());
        assert_eq!(generator.calls(), 1);
        assert!(store.get("bible_v3_search_joão3_nvi").await.unwrap().is_some());

        let second = resolver.resolve("João 3", "NVI").await.unwrap();
        assert_eq!(second, first);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_equivalent_query_is_a_cache_hit() {
        let Fixture { generator, resolver, .. } = fixture(MockGenerator::replying(JOHN_3), MemoryStore::default(), true);
        resolver.resolve("João 3", "NVI").await.unwrap();
        resolver.resolve("  joão 3 ", "nvi").await.unwrap();
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_query_is_not_looked_up() {
        let Fixture { generator, store, resolver } = fixture(MockGenerator::replying(JOHN_3), MemoryStore::default(), true);
        assert_eq!(resolver.resolve("   ", "ARA").await, None);
        let err = resolver.try_resolve("", "ARA").await.unwrap_err();
        assert_eq!(&*err, &ErrorKind::EmptyQuery);
        assert_eq!(generator.calls(), 0);
        assert_eq!(store.len().await, 0);
    }

    #[rstest]
    #[case::verse_range("Jo 3/16", "bible_v3_search_jo3/16_nvi")]
    #[case::backslash("Jo 3\\16", "bible_v3_search_jo3\\16_nvi")]
    #[tokio::test]
    async fn test_queries_with_separators_are_cached(#[case] query: &str, #[case] key: &str) {
        let Fixture { generator, store, resolver } = fixture(MockGenerator::replying(JOHN_3), MemoryStore::default(), true);
        resolver.resolve(query, "NVI").await.unwrap();
        resolver.resolve(query, "NVI").await.unwrap();
        assert_eq!(generator.calls(), 1);
        assert!(store.get(key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_long_topical_query_is_cached() {
        let query = "versículos sobre ansiedade, medo do futuro e confiança em Deus nos dias difíceis ".repeat(4);
        assert!(query.len() > 255);
        let Fixture { generator, store, resolver } = fixture(MockGenerator::replying(PSALM_23), MemoryStore::default(), true);
        resolver.resolve(&query, "ARA").await.unwrap();
        resolver.resolve(&query, "ARA").await.unwrap();
        assert_eq!(generator.calls(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_long_query_is_cached_on_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(MockGenerator::replying(JOHN_3));
        let store = Arc::new(LocalStore::new("device", temp_dir.path()).unwrap());
        let resolver = PassageResolver::new(generator.clone(), store.clone(), Arc::new(|| true));
        let query = format!("Jo 3/16 {}", "e o amor de Deus ".repeat(30));
        resolver.resolve(&query, "NVI").await.unwrap();
        resolver.resolve(&query, "NVI").await.unwrap();
        assert_eq!(generator.calls(), 1);
        assert_eq!(store.keys(None).await.unwrap(), [CacheKey::search(&query, "NVI").to_string()]);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_connectivity_and_model() {
        let store = MemoryStore::with_values([("bible_v3_search_joão3_nvi", JOHN_3)]);
        let Fixture { generator, resolver, .. } = fixture(MockGenerator::rejecting("400 INVALID_ARGUMENT"), store, false);
        let passage = resolver.resolve("João 3", "NVI").await.unwrap();
        assert_eq!(passage.reference, "João 3");
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_offline_miss_fails_fast() {
        let Fixture { generator, resolver, .. } = fixture(MockGenerator::replying(JOHN_3), MemoryStore::default(), false);
        assert_eq!(resolver.resolve("João 3", "NVI").await, None);
        let err = resolver.try_resolve("João 3", "NVI").await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Offline);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_closure_connectivity() {
        let generator = Arc::new(MockGenerator::replying(JOHN_3));
        let resolver = PassageResolver::new(generator.clone(), Arc::new(MemoryStore::default()), Arc::new(|| false));
        assert_eq!(resolver.resolve("João 3", "NVI").await, None);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_rate_limit_gives_up_after_full_schedule() {
        let Fixture { generator, store, resolver } =
            fixture(MockGenerator::rejecting("429 Too Many Requests"), MemoryStore::default(), true);
        let started = Instant::now();
        assert_eq!(resolver.resolve("João 3", "NVI").await, None);
        assert_eq!(generator.calls(), 5);
        assert!(started.elapsed() >= Duration::from_millis(60_000));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_then_success() {
        let generator = MockGenerator::scripted([Reply::reject("RESOURCE_EXHAUSTED")], Reply::text(JOHN_3));
        let Fixture { generator, resolver, .. } = fixture(generator, MemoryStore::default(), true);
        let passage = resolver.resolve("João 3", "NVI").await;
        assert!(passage.is_some());
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_is_not_retried() {
        let Fixture { generator, resolver, .. } =
            fixture(MockGenerator::rejecting("403 PERMISSION_DENIED"), MemoryStore::default(), true);
        let started = Instant::now();
        let err = resolver.try_resolve("João 3", "NVI").await.unwrap_err();
        assert_eq!(&*err, &ErrorKind::Generation(ErrorClass::Fatal));
        assert_eq!(generator.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_fenced_response_is_parsed_and_cached() {
        let fenced = format!("```json\n{JOHN_3}\n```");
        let Fixture { store, resolver, .. } = fixture(MockGenerator::replying(fenced), MemoryStore::default(), true);
        let passage = resolver.resolve("Jo 3", "ARA").await.unwrap();
        assert_eq!(passage.book, "João");
        let cached = store.get("bible_v3_search_jo3_ara").await.unwrap().unwrap();
        assert!(!cached.contains("```"));
        assert_eq!(serde_json::from_str::<Passage>(&cached).unwrap(), passage);
    }

    #[tokio::test]
    async fn test_unparseable_response_is_not_retried_or_cached() {
        let Fixture { generator, store, resolver } =
            fixture(MockGenerator::replying("Não encontrei."), MemoryStore::default(), true);
        let err = resolver.try_resolve("xyz", "ARA").await.unwrap_err();
        assert_eq!(&*err, &ErrorKind::Parse);
        assert_eq!(generator.calls(), 1);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_schema_violation_is_a_failure() {
        let duplicated = r#"{"reference":"João 3","book":"João","chapter":3,"verses":[{"num":1,"text":"a"},{"num":1,"text":"b"}]}"#;
        let Fixture { store, resolver, .. } = fixture(MockGenerator::replying(duplicated), MemoryStore::default(), true);
        assert_eq!(resolver.resolve("João 3", "NVI").await, None);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_replaced() {
        let store = MemoryStore::with_values([("bible_v3_search_joão3_nvi", "{truncated")]);
        let Fixture { generator, store, resolver } = fixture(MockGenerator::replying(JOHN_3), store, true);
        assert!(resolver.resolve("João 3", "NVI").await.is_some());
        assert_eq!(generator.calls(), 1);
        let cached = store.get("bible_v3_search_joão3_nvi").await.unwrap().unwrap();
        assert!(serde_json::from_str::<Passage>(&cached).is_ok());
    }

    #[tokio::test]
    async fn test_request_carries_schema_and_version() {
        let Fixture { generator, resolver, .. } = fixture(MockGenerator::replying(JOHN_3), MemoryStore::default(), true);
        resolver.resolve(" Jo 3 ", "NVI").await.unwrap();
        let requests = generator.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, DEFAULT_PASSAGE_MODEL);
        assert_eq!(requests[0].contents, "Consulta: \"Jo 3\". Tradução: \"NVI\".");
        assert!(requests[0].expects_json());
        assert!(requests[0].system_instruction.as_deref().unwrap().contains("NVI"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_identical_requests_share_one_generation() {
        let generator = MockGenerator::replying(JOHN_3).with_latency(Duration::from_millis(500));
        let Fixture { generator, resolver, .. } = fixture(generator, MemoryStore::default(), true);
        let (a, b, c) = tokio::join!(
            resolver.resolve("João 3", "NVI"),
            resolver.resolve("joão 3", "NVI"),
            resolver.resolve("João 3", "NVI"),
        );
        assert!(a.is_some() && b.is_some() && c.is_some());
        assert_eq!(a, b);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_different_requests_are_independent() {
        let generator = MockGenerator::scripted([Reply::text(JOHN_3), Reply::text(PSALM_23)], Reply::text(JOHN_3))
            .with_latency(Duration::from_millis(500));
        let Fixture { generator, resolver, .. } = fixture(generator, MemoryStore::default(), true);
        let (a, b) = tokio::join!(resolver.resolve("João 3", "NVI"), resolver.resolve("Salmos 23", "NVI"));
        assert!(a.is_some() && b.is_some());
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_load_chapter() {
        let Fixture { generator, store, resolver } = fixture(MockGenerator::replying(PSALM_23), MemoryStore::default(), true);
        let passage = resolver.load_chapter("salmos", 23, "ARA").await.unwrap();
        assert_eq!(passage.chapter, 23);
        assert!(store.get("bible_v3_salmos_23_ara").await.unwrap().is_some());
        assert_eq!(generator.requests().await[0].contents, "Consulta: \"Salmos 23\". Tradução: \"ARA\".");
        resolver.load_chapter("Salmos", 23, "ara").await.unwrap();
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_load_chapter_rejects_unknown_book_and_chapter() {
        let Fixture { generator, resolver, .. } = fixture(MockGenerator::replying(PSALM_23), MemoryStore::default(), true);
        let err = resolver.try_load_chapter("Hezequias", 1, "ARA").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnknownBook(_)));
        let err = resolver.try_load_chapter("Judas", 2, "ARA").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::ChapterOutOfRange { chapter: 2, .. }));
        assert_eq!(resolver.load_chapter("Salmos", 151, "ARA").await, None);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_custom_model() {
        let generator = Arc::new(MockGenerator::replying(JOHN_3));
        let resolver = PassageResolver::new(generator.clone(), Arc::new(MemoryStore::default()), Arc::new(|| true))
            .with_model("gemini-3-flash-preview")
            .with_backoff(Backoff::new(0, Duration::from_millis(1)));
        resolver.resolve("João 3", "NVI").await.unwrap();
        assert_eq!(generator.requests().await[0].model, "gemini-3-flash-preview");
    }
}
