//! Generic claims container
//!
//! [`ClaimsSet`] stores named JSON values in insertion order and projects them
//! onto typed accessors. Accessors are total: a missing claim and a claim of
//! the wrong type both read as `None`.
//!
//! Language-tagged claims are plain sibling keys (`name`, `name#en`,
//! `name#fr-CA`); see [`crate::lang_tag`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::trace;
use url::Url;

use crate::error::ClaimsError;
use crate::lang_tag::{KeyMatch, LanguageTag, compose_key, match_key};
use crate::types::Email;

/// Ordered set of claims backed by a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimsSet {
    claims: Map<String, Value>,
}

impl ClaimsSet {
    /// Create an empty claims set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object
    #[must_use]
    pub fn from_map(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// Parse a JSON object string.
    ///
    /// # Errors
    ///
    /// [`ClaimsError::Json`] for malformed JSON, [`ClaimsError::NotAnObject`]
    /// when the document is valid JSON but not an object.
    pub fn parse(json: &str) -> Result<Self, ClaimsError> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from(value)
    }

    /// Number of stored keys (each language-tagged variant counts separately)
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether no claims are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Whether the exact key is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    /// Stored keys, in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.claims.keys().map(String::as_str)
    }

    /// Iterate over all stored entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.claims.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Raw value of a claim
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Raw value of one language-tagged variant of a claim
    #[must_use]
    pub fn get_with_lang_tag(&self, name: &str, tag: Option<&LanguageTag>) -> Option<&Value> {
        self.claims.get(&compose_key(name, tag))
    }

    /// String claim, borrowed
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// String claim
    #[must_use]
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get_str(name).map(ToString::to_string)
    }

    /// Boolean claim
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Numeric claim
    #[must_use]
    pub fn get_number(&self, name: &str) -> Option<&Number> {
        match self.get(name)? {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Integer claim; fractional numbers read as `None`
    #[must_use]
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get_number(name).and_then(Number::as_i64)
    }

    /// Absolute URI claim
    #[must_use]
    pub fn get_uri(&self, name: &str) -> Option<Url> {
        self.get_str(name).and_then(|s| Url::parse(s).ok())
    }

    /// E-mail address claim
    #[must_use]
    pub fn get_email(&self, name: &str) -> Option<Email> {
        self.get_str(name).and_then(Email::parse)
    }

    /// Date claim stored as seconds since the Unix epoch.
    ///
    /// Fractional seconds are truncated.
    #[must_use]
    pub fn get_date(&self, name: &str) -> Option<DateTime<Utc>> {
        let number = self.get_number(name)?;
        let seconds = match number.as_i64() {
            Some(s) => s,
            None => number.as_f64()?.trunc() as i64,
        };
        DateTime::from_timestamp(seconds, 0)
    }

    /// Array-of-strings claim. Any non-string element makes the whole claim read
    /// as `None`.
    #[must_use]
    pub fn get_string_list(&self, name: &str) -> Option<Vec<String>> {
        match self.get(name)? {
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(ToString::to_string))
                .collect(),
            _ => None,
        }
    }

    /// Claim that may be either a single string or an array of strings, such
    /// as `aud`.
    #[must_use]
    pub fn get_string_or_list(&self, name: &str) -> Option<Vec<String>> {
        match self.get(name)? {
            Value::String(s) => Some(vec![s.clone()]),
            Value::Array(_) => self.get_string_list(name),
            _ => None,
        }
    }

    /// Nested JSON object claim
    #[must_use]
    pub fn get_object(&self, name: &str) -> Option<&Map<String, Value>> {
        self.get(name).and_then(Value::as_object)
    }

    /// All variants of a claim, keyed by language tag (`None` for the untagged
    /// entry).
    ///
    /// Keys of the form `name#<tag>` whose tag does not parse as RFC 5646 are
    /// skipped so that one bad variant does not hide the others.
    #[must_use]
    pub fn get_lang_tagged(&self, name: &str) -> HashMap<Option<LanguageTag>, &Value> {
        let mut variants = HashMap::new();

        for (key, value) in &self.claims {
            match match_key(name, key) {
                KeyMatch::Untagged => {
                    variants.insert(None, value);
                }
                KeyMatch::Tagged(tag) => {
                    variants.insert(Some(tag), value);
                }
                KeyMatch::MalformedTag => {
                    trace!(claim = name, key = %key, "skipping claim with malformed language tag");
                }
                KeyMatch::Unrelated => {}
            }
        }

        variants
    }

    /// String variants of a language-tagged claim; non-string values are skipped.
    #[must_use]
    pub fn get_lang_tagged_strings(&self, name: &str) -> HashMap<Option<LanguageTag>, String> {
        self.get_lang_tagged(name)
            .into_iter()
            .filter_map(|(tag, value)| value.as_str().map(|s| (tag, s.to_string())))
            .collect()
    }

    /// Set a claim. A `null` value (including `None`) removes the key.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.set_with_lang_tag(name, value, None);
    }

    /// Set one language-tagged variant of a claim. A `null` value removes that
    /// variant only; other tags and the untagged entry are left alone.
    pub fn set_with_lang_tag(
        &mut self,
        name: &str,
        value: impl Into<Value>,
        tag: Option<&LanguageTag>,
    ) {
        let key = compose_key(name, tag);
        match value.into() {
            Value::Null => {
                self.claims.remove(&key);
            }
            value => {
                self.claims.insert(key, value);
            }
        }
    }

    /// Set a date claim as whole seconds since the epoch; `None` removes it.
    pub fn set_date(&mut self, name: &str, value: Option<DateTime<Utc>>) {
        self.set(name, value.map(|date| date.timestamp()));
    }

    /// Remove a claim by exact key
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.claims.remove(name)
    }

    /// Live view of the backing JSON object
    #[must_use]
    pub fn to_map(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// Take the backing JSON object
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.claims
    }

    /// Serialize to a compact JSON object string
    #[must_use]
    pub fn to_json_string(&self) -> String {
        Value::Object(self.claims.clone()).to_string()
    }
}

impl From<Map<String, Value>> for ClaimsSet {
    fn from(claims: Map<String, Value>) -> Self {
        Self::from_map(claims)
    }
}

impl From<ClaimsSet> for Map<String, Value> {
    fn from(set: ClaimsSet) -> Self {
        set.into_map()
    }
}

impl TryFrom<Value> for ClaimsSet {
    type Error = ClaimsError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(claims) => Ok(Self { claims }),
            _ => Err(ClaimsError::NotAnObject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tag(s: &str) -> LanguageTag {
        LanguageTag::parse(s).unwrap()
    }

    fn sample() -> ClaimsSet {
        ClaimsSet::parse(
            r#"{
                "sub": "248289761001",
                "email": "janedoe@example.com",
                "email_verified": true,
                "picture": "https://example.com/janedoe/me.jpg",
                "updated_at": 1311280970,
                "groups": ["admin", "audit"],
                "address": {"country": "NZ"},
                "ratio": 0.5
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn typed_accessors() {
        let claims = sample();
        assert_eq!(claims.get_str("sub"), Some("248289761001"));
        assert_eq!(claims.get_bool("email_verified"), Some(true));
        assert_eq!(
            claims.get_email("email").map(|e| e.to_string()),
            Some("janedoe@example.com".to_string())
        );
        assert_eq!(
            claims.get_uri("picture").map(|u| u.host_str().map(String::from)),
            Some(Some("example.com".to_string()))
        );
        assert_eq!(
            claims.get_date("updated_at").map(|d| d.timestamp()),
            Some(1_311_280_970)
        );
        assert_eq!(
            claims.get_string_list("groups"),
            Some(vec!["admin".to_string(), "audit".to_string()])
        );
        assert_eq!(
            claims.get_object("address").and_then(|a| a.get("country")),
            Some(&json!("NZ"))
        );
        assert_eq!(claims.get_i64("ratio"), None);
        assert_eq!(claims.get_number("ratio").and_then(Number::as_f64), Some(0.5));
    }

    #[test]
    fn type_mismatch_reads_as_absent() {
        let claims = sample();
        assert_eq!(claims.get_bool("sub"), None);
        assert_eq!(claims.get_str("email_verified"), None);
        assert_eq!(claims.get_date("sub"), None);
        assert_eq!(claims.get_string_list("sub"), None);
        assert_eq!(claims.get_uri("sub"), None);
        assert_eq!(claims.get_email("sub"), None);
        assert_eq!(claims.get_object("groups"), None);
        assert_eq!(claims.get_str("missing"), None);
    }

    #[test]
    fn string_list_rejects_mixed_arrays() {
        let mut claims = ClaimsSet::new();
        claims.set("mixed", json!(["a", 1]));
        assert_eq!(claims.get_string_list("mixed"), None);
    }

    #[test]
    fn string_or_list_accepts_both_shapes() {
        let mut claims = ClaimsSet::new();
        claims.set("aud", "https://rp.example.com");
        assert_eq!(
            claims.get_string_or_list("aud"),
            Some(vec!["https://rp.example.com".to_string()])
        );
        claims.set("aud", json!(["a", "b"]));
        assert_eq!(
            claims.get_string_or_list("aud"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        claims.set("aud", 7);
        assert_eq!(claims.get_string_or_list("aud"), None);
    }

    #[test]
    fn fractional_dates_truncate() {
        let mut claims = ClaimsSet::new();
        claims.set("iat", 1_700_000_000.9);
        assert_eq!(claims.get_date("iat").map(|d| d.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn set_null_removes() {
        let mut claims = ClaimsSet::new();
        claims.set("nonce", "n-0S6_WzA2Mj");
        assert!(claims.contains("nonce"));
        claims.set("nonce", None::<String>);
        assert!(!claims.contains("nonce"));
        claims.set("nonce", Value::Null);
        assert!(claims.is_empty());
    }

    #[test]
    fn lang_tagged_variants_are_independent() {
        let mut claims = ClaimsSet::new();
        claims.set("name", "John Doe");
        claims.set_with_lang_tag("name", "ジョン・ドウ", Some(&tag("ja-Kana-JP")));
        claims.set_with_lang_tag("name", "Jean Dupont", Some(&tag("fr")));
        claims.set("nickname", "Johnny");

        let names = claims.get_lang_tagged_strings("name");
        assert_eq!(names.len(), 3);
        assert_eq!(names.get(&None).map(String::as_str), Some("John Doe"));
        assert_eq!(
            names.get(&Some(tag("fr"))).map(String::as_str),
            Some("Jean Dupont")
        );
        assert_eq!(
            claims.get_with_lang_tag("name", Some(&tag("ja-Kana-JP"))),
            Some(&json!("ジョン・ドウ"))
        );
    }

    #[test]
    fn tag_scoped_deletion() {
        let mut claims = ClaimsSet::new();
        claims.set("name", "John Doe");
        claims.set_with_lang_tag("name", "Jean Dupont", Some(&tag("fr")));

        claims.set("name", Value::Null);
        assert!(!claims.contains("name"));
        assert!(claims.contains("name#fr"));

        claims.set_with_lang_tag("name", None::<String>, Some(&tag("fr")));
        assert!(claims.is_empty());
    }

    #[test]
    fn malformed_tags_are_skipped() {
        let claims = ClaimsSet::parse(
            r#"{"name": "A", "name#en": "B", "name#": "C", "name#%%": "D", "namefoo": "E"}"#,
        )
        .unwrap();
        let names = claims.get_lang_tagged("name");
        assert_eq!(names.len(), 2);
        assert_eq!(names.get(&Some(tag("en"))), Some(&&json!("B")));
    }

    #[test]
    fn map_round_trip() {
        let map = sample().into_map();
        let copy = map.clone();
        assert_eq!(ClaimsSet::from_map(map).into_map(), copy);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut claims = ClaimsSet::new();
        claims.set("z", 1);
        claims.set("a", 2);
        claims.set("m", 3);
        assert_eq!(claims.names().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(claims.to_json_string(), r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn parse_rejects_non_objects() {
        assert!(matches!(
            ClaimsSet::parse("[1, 2]"),
            Err(ClaimsError::NotAnObject)
        ));
        assert!(matches!(ClaimsSet::parse("{"), Err(ClaimsError::Json(_))));
    }
}
