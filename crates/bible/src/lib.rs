//! Bible passage resolution.
//!
//! A reader asks for a reference ("Jo 3", "Salmos 23") or a theme
//! ("ansiedade") in some translation. The [`PassageResolver`] answers from the
//! device cache when it can and otherwise asks the generative model for a
//! [`Passage`] under a strict JSON schema, validates it, and caches it
//! forever.
//!
//! # Architecture
//! - **Cache keys** ([`CacheKey`]) are namespaced (`bible_v3_`) and
//!   normalized, so equivalent requests share an entry.
//! - **Generation** goes through [`verbum_retry::Backoff`], so quota errors
//!   are waited out while anything else fails fast.
//! - **Connectivity** is an injected [`Connectivity`] check, consulted only on
//!   a cache miss.

mod books;
mod connectivity;
pub mod error;
mod key;
mod passage;
mod progress;
mod prompt;
mod resolver;
mod translation;

pub use crate::books::{BIBLE_BOOKS, BibleBook, Testament, find_book};
pub use crate::connectivity::{Connectivity, ConnectivityHandle, NetworkSwitch};
pub use crate::key::{CACHE_NAMESPACE, CacheKey};
pub use crate::passage::{Passage, Verse, parse_passage, strip_code_fences};
pub use crate::progress::ReadingProgress;
pub use crate::prompt::{passage_request, passage_schema};
pub use crate::resolver::{DEFAULT_PASSAGE_MODEL, PassageResolver};
pub use crate::translation::{DEFAULT_TRANSLATION, TRANSLATIONS, Translation, find_translation};
