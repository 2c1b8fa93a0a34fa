//! The passage model and parsing of model output into it.

use crate::books::{BibleBook, find_book};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One numbered verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    #[serde(deserialize_with = "whole_number")]
    pub num: u32,
    pub text: String,
}

/// A resolved passage: a chapter, a verse range, or the verses picked for a
/// theme.
///
/// Successfully resolved passages always have at least one verse, and verse
/// numbers are strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Display reference, e.g. `João 3:16`.
    pub reference: String,
    pub book: String,
    #[serde(deserialize_with = "whole_number")]
    pub chapter: u32,
    pub verses: Vec<Verse>,
}

impl Passage {
    /// Check the invariants the schema alone can't express.
    pub fn validate(&self) -> Result<()> {
        if self.verses.is_empty() {
            exn::bail!(ErrorKind::Schema(format!("{} has no verses", self.reference)));
        }
        if let Some(pair) = self.verses.windows(2).find(|pair| pair[0].num >= pair[1].num) {
            exn::bail!(ErrorKind::Schema(format!(
                "verse {} follows verse {} in {}",
                pair[1].num, pair[0].num, self.reference
            )));
        }
        Ok(())
    }

    /// The canon entry for [`book`](Self::book), if the model used a canonical
    /// name.
    pub fn canonical_book(&self) -> Option<&'static BibleBook> {
        find_book(&self.book)
    }
}

/// Remove Markdown code fences some models wrap JSON answers in.
///
/// ```
/// use verbum_bible::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
/// ```
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse raw model output into a validated [`Passage`].
///
/// Returns [`Parse`](ErrorKind::Parse) when the text is not passage JSON and
/// [`Schema`](ErrorKind::Schema) when it is but breaks an invariant.
pub fn parse_passage(raw: &str) -> Result<Passage> {
    let passage: Passage = serde_json::from_str(&strip_code_fences(raw)).or_raise(|| ErrorKind::Parse)?;
    passage.validate()?;
    Ok(passage)
}

/// Accept `3` as well as `3.0`: the schema type the model honours is a JSON
/// number, not necessarily an integer literal.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = number.as_u64() {
        return u32::try_from(n).map_err(D::Error::custom);
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => Ok(f as u32),
        _ => Err(D::Error::custom(format!("expected a whole non-negative number, found {number}"))),
    }
}
