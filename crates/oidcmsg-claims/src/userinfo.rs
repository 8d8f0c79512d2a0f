//! UserInfo claims set (OpenID Connect Core §5.1)

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use url::Url;

use crate::claims_set::ClaimsSet;
use crate::error::ClaimsError;
use crate::kind::{ClaimsSetKind, sealed};
use crate::lang_tag::LanguageTag;
use crate::types::Email;

/// Registered UserInfo claim names.
pub const USERINFO_CLAIM_NAMES: &[&str] = &[
    "sub",
    "name",
    "given_name",
    "family_name",
    "middle_name",
    "nickname",
    "preferred_username",
    "profile",
    "picture",
    "website",
    "email",
    "email_verified",
    "gender",
    "birthdate",
    "zoneinfo",
    "locale",
    "phone_number",
    "phone_number_verified",
    "address",
    "updated_at",
];

/// Claims returned by the UserInfo endpoint. `sub` is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct UserInfo {
    claims: ClaimsSet,
}

impl UserInfo {
    /// Create a UserInfo claims set for a subject
    pub fn new(subject: impl Into<String>) -> Self {
        let mut claims = ClaimsSet::new();
        claims.set("sub", subject.into());
        Self { claims }
    }

    /// Validate a generic claims set as UserInfo.
    ///
    /// # Errors
    ///
    /// [`ClaimsError::MissingClaim`] or [`ClaimsError::InvalidClaim`] for `sub`.
    pub fn from_claims_set(claims: ClaimsSet) -> Result<Self, ClaimsError> {
        match claims.get("sub") {
            None => Err(ClaimsError::MissingClaim("sub")),
            Some(sub) if !sub.is_string() => Err(ClaimsError::invalid("sub", "must be a string")),
            Some(_) => Ok(Self { claims }),
        }
    }

    /// Parse a UserInfo JSON response.
    ///
    /// # Errors
    ///
    /// See [`ClaimsSet::parse`] and [`UserInfo::from_claims_set`].
    pub fn parse(json: &str) -> Result<Self, ClaimsError> {
        Self::from_claims_set(ClaimsSet::parse(json)?)
    }

    /// Subject (`sub`)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.claims.get_str("sub").unwrap_or_default()
    }

    /// Full name, in the given language or untagged
    #[must_use]
    pub fn name(&self, tag: Option<&LanguageTag>) -> Option<&str> {
        self.claims
            .get_with_lang_tag("name", tag)
            .and_then(|v| v.as_str())
    }

    /// All language variants of `name`
    #[must_use]
    pub fn names(&self) -> HashMap<Option<LanguageTag>, String> {
        self.claims.get_lang_tagged_strings("name")
    }

    /// Set a language variant of `name`; `None` removes that variant.
    pub fn set_name(&mut self, name: Option<String>, tag: Option<&LanguageTag>) {
        self.claims.set_with_lang_tag("name", name, tag);
    }

    /// Given name, in the given language or untagged
    #[must_use]
    pub fn given_name(&self, tag: Option<&LanguageTag>) -> Option<&str> {
        self.claims
            .get_with_lang_tag("given_name", tag)
            .and_then(|v| v.as_str())
    }

    /// Set a language variant of `given_name`
    pub fn set_given_name(&mut self, given_name: Option<String>, tag: Option<&LanguageTag>) {
        self.claims.set_with_lang_tag("given_name", given_name, tag);
    }

    /// Family name, in the given language or untagged
    #[must_use]
    pub fn family_name(&self, tag: Option<&LanguageTag>) -> Option<&str> {
        self.claims
            .get_with_lang_tag("family_name", tag)
            .and_then(|v| v.as_str())
    }

    /// Set a language variant of `family_name`
    pub fn set_family_name(&mut self, family_name: Option<String>, tag: Option<&LanguageTag>) {
        self.claims.set_with_lang_tag("family_name", family_name, tag);
    }

    /// Casual name, in the given language or untagged
    #[must_use]
    pub fn nickname(&self, tag: Option<&LanguageTag>) -> Option<&str> {
        self.claims
            .get_with_lang_tag("nickname", tag)
            .and_then(|v| v.as_str())
    }

    /// Preferred e-mail address
    #[must_use]
    pub fn email(&self) -> Option<Email> {
        self.claims.get_email("email")
    }

    /// Set `email`
    pub fn set_email(&mut self, email: Option<Email>) {
        self.claims.set("email", email.map(String::from));
    }

    /// Whether the e-mail address has been verified
    #[must_use]
    pub fn email_verified(&self) -> Option<bool> {
        self.claims.get_bool("email_verified")
    }

    /// Set `email_verified`
    pub fn set_email_verified(&mut self, verified: Option<bool>) {
        self.claims.set("email_verified", verified);
    }

    /// Preferred telephone number
    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.claims.get_str("phone_number")
    }

    /// Profile picture URL
    #[must_use]
    pub fn picture(&self) -> Option<Url> {
        self.claims.get_uri("picture")
    }

    /// Set `picture`
    pub fn set_picture(&mut self, picture: Option<&Url>) {
        self.claims.set("picture", picture.map(Url::as_str));
    }

    /// Preferred locale
    #[must_use]
    pub fn locale(&self) -> Option<LanguageTag> {
        self.claims
            .get_str("locale")
            .and_then(|s| LanguageTag::parse(s).ok())
    }

    /// Time the information was last updated
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.claims.get_date("updated_at")
    }

    /// Set `updated_at`
    pub fn set_updated_at(&mut self, updated_at: Option<DateTime<Utc>>) {
        self.claims.set_date("updated_at", updated_at);
    }

    /// Take the underlying claims set
    #[must_use]
    pub fn into_claims_set(self) -> ClaimsSet {
        self.claims
    }
}

impl ClaimsSetKind for UserInfo {
    const REGISTERED_CLAIM_NAMES: &'static [&'static str] = USERINFO_CLAIM_NAMES;

    fn claims_set(&self) -> &ClaimsSet {
        &self.claims
    }
}

impl sealed::ClaimsSetMut for UserInfo {
    fn claims_set_mut(&mut self) -> &mut ClaimsSet {
        &mut self.claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> LanguageTag {
        LanguageTag::parse(s).unwrap()
    }

    #[test]
    fn localized_names() {
        let info = UserInfo::parse(
            r#"{
                "sub": "248289761001",
                "name": "Jane Doe",
                "name#ja-Kana-JP": "ジェーン・ドウ",
                "given_name#fr": "Jeanne",
                "locale": "en-US",
                "updated_at": 1311280970
            }"#,
        )
        .unwrap();

        assert_eq!(info.subject(), "248289761001");
        assert_eq!(info.name(None), Some("Jane Doe"));
        assert_eq!(info.name(Some(&tag("ja-Kana-JP"))), Some("ジェーン・ドウ"));
        assert_eq!(info.name(Some(&tag("de"))), None);
        assert_eq!(info.given_name(Some(&tag("fr"))), Some("Jeanne"));
        assert_eq!(info.given_name(None), None);
        assert_eq!(info.names().len(), 2);
        assert_eq!(info.locale(), Some(tag("en-US")));
        assert_eq!(info.updated_at().map(|t| t.timestamp()), Some(1_311_280_970));
    }

    #[test]
    fn setters_write_tagged_keys() {
        let mut info = UserInfo::new("alice");
        info.set_name(Some("Alice".into()), None);
        info.set_name(Some("Alicia".into()), Some(&tag("es")));
        info.set_family_name(Some("Liddell".into()), None);
        info.set_email(Email::parse("alice@example.com"));
        info.set_email_verified(Some(true));

        let map = info.to_json_object();
        assert_eq!(map.get("name#es").and_then(|v| v.as_str()), Some("Alicia"));
        assert_eq!(info.family_name(None), Some("Liddell"));
        assert_eq!(info.email().map(|e| e.domain().to_string()), Some("example.com".into()));
        assert_eq!(info.email_verified(), Some(true));

        info.set_name(None, None);
        assert_eq!(info.name(None), None);
        assert_eq!(info.name(Some(&tag("es"))), Some("Alicia"));
    }

    #[test]
    fn sub_is_required() {
        assert!(matches!(
            UserInfo::parse(r#"{"name": "anonymous"}"#),
            Err(ClaimsError::MissingClaim("sub"))
        ));
        assert!(matches!(
            UserInfo::parse(r#"{"sub": 42}"#),
            Err(ClaimsError::InvalidClaim { claim: "sub", .. })
        ));
    }
}
