//! The Protestant canon with Portuguese book names.

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Testament {
    /// Antigo Testamento
    #[display("AT")]
    AT,
    /// Novo Testamento
    #[display("NT")]
    NT,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BibleBook {
    pub name: &'static str,
    pub chapters: u32,
    pub testament: Testament,
}

impl BibleBook {
    const fn new(name: &'static str, chapters: u32, testament: Testament) -> Self {
        Self { name, chapters, testament }
    }

    pub fn has_chapter(&self, chapter: u32) -> bool {
        (1..=self.chapters).contains(&chapter)
    }
}

use Testament::{AT, NT};

/// All 66 books in canonical order.
pub static BIBLE_BOOKS: [BibleBook; 66] = [
    BibleBook::new("Gênesis", 50, AT),
    BibleBook::new("Êxodo", 40, AT),
    BibleBook::new("Levítico", 27, AT),
    BibleBook::new("Números", 36, AT),
    BibleBook::new("Deuteronômio", 34, AT),
    BibleBook::new("Josué", 24, AT),
    BibleBook::new("Juízes", 21, AT),
    BibleBook::new("Rute", 4, AT),
    BibleBook::new("1 Samuel", 31, AT),
    BibleBook::new("2 Samuel", 24, AT),
    BibleBook::new("1 Reis", 22, AT),
    BibleBook::new("2 Reis", 25, AT),
    BibleBook::new("1 Crônicas", 29, AT),
    BibleBook::new("2 Crônicas", 36, AT),
    BibleBook::new("Esdras", 10, AT),
    BibleBook::new("Neemias", 13, AT),
    BibleBook::new("Ester", 10, AT),
    BibleBook::new("Jó", 42, AT),
    BibleBook::new("Salmos", 150, AT),
    BibleBook::new("Provérbios", 31, AT),
    BibleBook::new("Eclesiastes", 12, AT),
    BibleBook::new("Cantares", 8, AT),
    BibleBook::new("Isaías", 66, AT),
    BibleBook::new("Jeremias", 52, AT),
    BibleBook::new("Lamentações", 5, AT),
    BibleBook::new("Ezequiel", 48, AT),
    BibleBook::new("Daniel", 12, AT),
    BibleBook::new("Oseias", 14, AT),
    BibleBook::new("Joel", 3, AT),
    BibleBook::new("Amós", 9, AT),
    BibleBook::new("Obadias", 1, AT),
    BibleBook::new("Jonas", 4, AT),
    BibleBook::new("Miqueias", 7, AT),
    BibleBook::new("Naum", 3, AT),
    BibleBook::new("Habacuque", 3, AT),
    BibleBook::new("Sofonias", 3, AT),
    BibleBook::new("Ageu", 2, AT),
    BibleBook::new("Zacarias", 14, AT),
    BibleBook::new("Malaquias", 4, AT),
    BibleBook::new("Mateus", 28, NT),
    BibleBook::new("Marcos", 16, NT),
    BibleBook::new("Lucas", 24, NT),
    BibleBook::new("João", 21, NT),
    BibleBook::new("Atos", 28, NT),
    BibleBook::new("Romanos", 16, NT),
    BibleBook::new("1 Coríntios", 16, NT),
    BibleBook::new("2 Coríntios", 13, NT),
    BibleBook::new("Gálatas", 6, NT),
    BibleBook::new("Efésios", 6, NT),
    BibleBook::new("Filipenses", 4, NT),
    BibleBook::new("Colossenses", 4, NT),
    BibleBook::new("1 Tessalonicenses", 5, NT),
    BibleBook::new("2 Tessalonicenses", 3, NT),
    BibleBook::new("1 Timóteo", 6, NT),
    BibleBook::new("2 Timóteo", 4, NT),
    BibleBook::new("Tito", 3, NT),
    BibleBook::new("Filemom", 1, NT),
    BibleBook::new("Hebreus", 13, NT),
    BibleBook::new("Tiago", 5, NT),
    BibleBook::new("1 Pedro", 5, NT),
    BibleBook::new("2 Pedro", 3, NT),
    BibleBook::new("1 João", 5, NT),
    BibleBook::new("2 João", 1, NT),
    BibleBook::new("3 João", 1, NT),
    BibleBook::new("Judas", 1, NT),
    BibleBook::new("Apocalipse", 22, NT),
];

/// Look a book up by its full name, ignoring case and surrounding whitespace.
///
/// ```
/// use verbum_bible::find_book;
///
/// assert_eq!(find_book("salmos").map(|b| b.chapters), Some(150));
/// assert_eq!(find_book(" 1 CORÍNTIOS ").map(|b| b.name), Some("1 Coríntios"));
/// assert!(find_book("Jo").is_none());
/// ```
pub fn find_book(name: &str) -> Option<&'static BibleBook> {
    let name = name.trim().to_lowercase();
    BIBLE_BOOKS.iter().find(|book| book.name.to_lowercase() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_canon() {
        assert_eq!(BIBLE_BOOKS.iter().filter(|b| b.testament == Testament::AT).count(), 39);
        assert_eq!(BIBLE_BOOKS.iter().filter(|b| b.testament == Testament::NT).count(), 27);
        assert_eq!(BIBLE_BOOKS.iter().map(|b| b.chapters).sum::<u32>(), 1189);
    }

    #[rstest]
    #[case("João", Some("João"))]
    #[case("joão", Some("João"))]
    #[case("Jó", Some("Jó"))]
    #[case("jo", None)]
    #[case("Apocalipse ", Some("Apocalipse"))]
    #[case("", None)]
    fn test_find_book(#[case] query: &str, #[case] expected: Option<&str>) {
        assert_eq!(find_book(query).map(|b| b.name), expected);
    }

    #[rstest]
    #[case("Salmos", 150, true)]
    #[case("Salmos", 151, false)]
    #[case("Judas", 1, true)]
    #[case("Judas", 0, false)]
    fn test_has_chapter(#[case] book: &str, #[case] chapter: u32, #[case] expected: bool) {
        assert_eq!(find_book(book).unwrap().has_chapter(chapter), expected);
    }
}
