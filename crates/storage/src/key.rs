//! Mapping keys to file names.
//!
//! Any string is a valid key. The directory-backed store needs a file name
//! per key, so keys are percent-encoded (`.` and `~` included, so an encoded
//! name never starts with a dot and never contains `~`). When the encoded
//! form is empty or too long for a file name, the name becomes a truncated
//! prefix, `~` and the BLAKE3 hash of the key, and the encoded key is kept on
//! the first line of the file instead.

/// Longest file name produced, in bytes. Leaves room for the staging name
/// (`.{name}.tmp`) under the usual 255 byte limit.
pub(crate) const MAX_FILE_NAME_LEN: usize = 200;
const HASH_SEPARATOR: char = '~';

/// File name for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileName {
    name: String,
    /// Encoded key, stored inside the file when the name alone can't hold it.
    header: Option<String>,
}

impl FileName {
    pub(crate) fn encode(key: &str) -> Self {
        let escaped = escape(key);
        if !escaped.is_empty() && escaped.len() <= MAX_FILE_NAME_LEN {
            return Self { name: escaped, header: None };
        }
        let hash = blake3::hash(key.as_bytes()).to_hex();
        let keep = (MAX_FILE_NAME_LEN - hash.len() - 1).min(escaped.len());
        // Escaped text is ASCII, so any index is a char boundary.
        let name = format!("{}{HASH_SEPARATOR}{hash}", &escaped[..keep]);
        Self { name, header: Some(escaped) }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.name
    }

    pub(crate) fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }
}

/// What a directory entry holds, judging by its name alone.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Entry {
    /// The key is the decoded name.
    Plain(String),
    /// The key is on the first line of the file.
    Hashed,
    /// Hidden, staging or foreign file.
    Ignored,
}

pub(crate) fn classify_file_name(name: &str) -> Entry {
    if name.starts_with('.') {
        return Entry::Ignored;
    }
    if name.contains(HASH_SEPARATOR) {
        return Entry::Hashed;
    }
    match unescape(name) {
        // Anything we did not write ourselves ("notes.txt") fails to re-encode to the same name.
        Some(key) if FileName::encode(&key).as_str() == name => Entry::Plain(key),
        _ => Entry::Ignored,
    }
}

fn escape(key: &str) -> String {
    urlencoding::encode(key).replace('.', "%2E").replace(HASH_SEPARATOR, "%7E")
}

pub(crate) fn unescape(escaped: &str) -> Option<String> {
    urlencoding::decode(escaped).ok().map(|key| key.into_owned())
}

/// Split a hashed file into its key and value.
pub(crate) fn split_header(contents: &str) -> Option<(String, &str)> {
    let (header, value) = contents.split_once('\n')?;
    Some((unescape(header)?, value))
}
