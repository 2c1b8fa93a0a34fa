//! Cache keys for resolved passages.

use derive_more::Display;

/// Prefix shared by every cached passage. Bumping it orphans all existing
/// entries; nothing else ever invalidates them.
pub const CACHE_NAMESPACE: &str = "bible_v3_";

/// Storage key of one cached passage.
///
/// Built from lowercased, whitespace-free components, so requests that only
/// differ in case or spacing share an entry.
///
/// ```
/// use verbum_bible::CacheKey;
///
/// assert_eq!(CacheKey::search(" João 3 ", "NVI").as_str(), "bible_v3_search_joão3_nvi");
/// assert_eq!(CacheKey::search("joão 3", "nvi"), CacheKey::search("JOÃO  3", " Nvi "));
/// assert_eq!(CacheKey::chapter("Salmos", 23, "ARA").as_str(), "bible_v3_salmos_23_ara");
/// ```
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a free-text query (reference or theme).
    pub fn search(query: &str, version: &str) -> Self {
        Self(format!("{CACHE_NAMESPACE}search_{}_{}", normalize(query), normalize(version)))
    }

    /// Key for a whole chapter picked from the book list.
    pub fn chapter(book: &str, chapter: u32, version: &str) -> Self {
        Self(format!("{CACHE_NAMESPACE}{}_{chapter}_{}", normalize(book), normalize(version)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn normalize(component: &str) -> String {
    component
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("João 3", "NVI", "joão 3", "nvi")]
    #[case("João 3", "NVI", "  João 3\t", " NVI\n")]
    #[case("1 Coríntios 13", "ARA", "1CORÍNTIOS13", "ara")]
    #[case("ansiedade", "NVT", "Ansiedade ", "nvt")]
    fn test_equivalent_queries_share_a_key(
        #[case] query: &str,
        #[case] version: &str,
        #[case] other_query: &str,
        #[case] other_version: &str,
    ) {
        assert_eq!(CacheKey::search(query, version), CacheKey::search(other_query, other_version));
    }

    #[rstest]
    #[case("João 3", "NVI", "João 4", "NVI")]
    #[case("João 3", "NVI", "João 3", "ARA")]
    #[case("Jó 3", "ARA", "Jo 3", "ARA")]
    fn test_different_queries_differ(
        #[case] query: &str,
        #[case] version: &str,
        #[case] other_query: &str,
        #[case] other_version: &str,
    ) {
        assert_ne!(CacheKey::search(query, version), CacheKey::search(other_query, other_version));
    }

    #[test]
    fn test_search_and_chapter_keys_never_collide() {
        assert_ne!(CacheKey::search("salmos 23", "ara").as_str(), CacheKey::chapter("salmos", 23, "ara").as_str());
    }

    #[test]
    fn test_chapter_key() {
        assert_eq!(CacheKey::chapter("1 Samuel", 17, "KJA").as_str(), "bible_v3_1samuel_17_kja");
        assert_eq!(CacheKey::chapter(" gênesis", 1, "arc"), CacheKey::chapter("Gênesis", 1, "ARC"));
    }

    #[test]
    fn test_namespace_prefix() {
        assert!(CacheKey::search("x", "y").as_str().starts_with(CACHE_NAMESPACE));
        assert!(CacheKey::chapter("x", 1, "y").as_str().starts_with(CACHE_NAMESPACE));
    }
}
