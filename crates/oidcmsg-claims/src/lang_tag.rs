//! Language-tagged claim keys (OpenID Connect Core §5.2)
//!
//! A localized claim is stored as a sibling key of its untagged form, joined
//! with `#`:
//!
//! ```text
//! "name"          untagged
//! "name#en"       RFC 5646 tag "en"
//! "name#ja-Kana-JP"
//! ```

pub use language_tags::LanguageTag;

/// Separator between a claim name and its language tag.
pub const LANG_TAG_SEPARATOR: char = '#';

/// How a stored key relates to a logical claim name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum KeyMatch {
    /// The key is the name itself.
    Untagged,
    /// The key is `name#tag` with a well-formed tag.
    Tagged(LanguageTag),
    /// The key is `name#rest` but `rest` is not a valid language tag.
    MalformedTag,
    /// The key belongs to another claim.
    Unrelated,
}

/// Build the storage key for `name`, optionally tagged.
#[must_use]
pub fn compose_key(name: &str, tag: Option<&LanguageTag>) -> String {
    match tag {
        Some(tag) => format!("{name}{LANG_TAG_SEPARATOR}{}", tag.as_str()),
        None => name.to_string(),
    }
}

/// Split a storage key into its base name and the raw tag suffix.
///
/// The split happens at the first `#`.
#[must_use]
pub fn split_key(key: &str) -> (&str, Option<&str>) {
    match key.split_once(LANG_TAG_SEPARATOR) {
        Some((name, tag)) => (name, Some(tag)),
        None => (key, None),
    }
}

pub(crate) fn match_key(name: &str, key: &str) -> KeyMatch {
    if key == name {
        return KeyMatch::Untagged;
    }

    // "namefoo" is never a variant of "name"
    let Some(suffix) = key
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix(LANG_TAG_SEPARATOR))
    else {
        return KeyMatch::Unrelated;
    };

    match LanguageTag::parse(suffix) {
        Ok(tag) => KeyMatch::Tagged(tag),
        Err(_) => KeyMatch::MalformedTag,
    }
}
