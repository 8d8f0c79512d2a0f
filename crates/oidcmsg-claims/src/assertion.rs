//! Client authentication assertion claims (RFC 7523 §3, OpenID Connect Core §9)
//!
//! The JWT a client presents with `client_secret_jwt` or `private_key_jwt`:
//!
//! - `iss` and `sub` are both the client identifier
//! - `aud` names the token endpoint
//! - `exp` is mandatory; `nbf` and `iat` are optional
//! - `jti` is mandatory so the server can reject replays

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::claims_set::ClaimsSet;
use crate::error::ClaimsError;
use crate::kind::{ClaimsSetKind, sealed};
use crate::types::ClientId;

/// Default assertion lifetime when no expiration is given (5 minutes)
pub const DEFAULT_ASSERTION_LIFETIME_SECONDS: i64 = 300;

/// Registered assertion claim names.
pub const JWT_AUTH_CLAIM_NAMES: &[&str] = &["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// Claims set of a JWT client authentication assertion.
#[derive(Debug, Clone, PartialEq)]
pub struct JwtAuthClaimsSet {
    claims: ClaimsSet,
}

impl JwtAuthClaimsSet {
    /// Assertion for `client_id` addressed to `audience`, expiring in five
    /// minutes, issued now, with a random `jti`.
    ///
    /// # Errors
    ///
    /// As [`JwtAuthClaimsSetBuilder::build`].
    pub fn new<I, S>(client_id: &ClientId, audience: I) -> Result<Self, ClaimsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder(client_id, audience).build()
    }

    /// Start building an assertion
    pub fn builder<I, S>(client_id: &ClientId, audience: I) -> JwtAuthClaimsSetBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        JwtAuthClaimsSetBuilder {
            client_id: client_id.clone(),
            audience: audience.into_iter().map(Into::into).collect(),
            expires_at: None,
            not_before: None,
            issued_at: None,
            jwt_id: None,
        }
    }

    /// Validate a generic claims set as an assertion.
    ///
    /// # Errors
    ///
    /// - [`ClaimsError::MissingClaim`] for an absent `iss`, `sub`, `aud`, `exp` or `jti`
    /// - [`ClaimsError::InvalidClaim`] for a mistyped or empty claim
    /// - [`ClaimsError::IssuerSubjectMismatch`] when `iss != sub`
    pub fn from_claims_set(claims: ClaimsSet) -> Result<Self, ClaimsError> {
        let issuer = required_string(&claims, "iss")?;
        let subject = required_string(&claims, "sub")?;
        if issuer != subject {
            return Err(ClaimsError::IssuerSubjectMismatch);
        }

        if !claims.contains("aud") {
            return Err(ClaimsError::MissingClaim("aud"));
        }
        match claims.get_string_or_list("aud") {
            Some(aud) if !aud.is_empty() => {}
            _ => {
                return Err(ClaimsError::invalid(
                    "aud",
                    "must be a string or a non-empty array of strings",
                ));
            }
        }

        if !claims.contains("exp") {
            return Err(ClaimsError::MissingClaim("exp"));
        }
        for name in ["exp", "nbf", "iat"] {
            if claims.contains(name) && claims.get_date(name).is_none() {
                return Err(ClaimsError::invalid(name, "must be seconds since the epoch"));
            }
        }

        required_string(&claims, "jti")?;

        Ok(Self { claims })
    }

    /// Parse an assertion payload.
    ///
    /// # Errors
    ///
    /// See [`ClaimsSet::parse`] and [`JwtAuthClaimsSet::from_claims_set`].
    pub fn parse(json: &str) -> Result<Self, ClaimsError> {
        Self::from_claims_set(ClaimsSet::parse(json)?)
    }

    /// The client identifier (`iss`, equal to `sub`)
    #[must_use]
    pub fn client_id(&self) -> ClientId {
        ClientId::new(self.issuer())
    }

    /// Issuer (`iss`)
    #[must_use]
    pub fn issuer(&self) -> &str {
        self.claims.get_str("iss").unwrap_or_default()
    }

    /// Subject (`sub`)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.claims.get_str("sub").unwrap_or_default()
    }

    /// Audience (`aud`)
    #[must_use]
    pub fn audience(&self) -> Vec<String> {
        self.claims.get_string_or_list("aud").unwrap_or_default()
    }

    /// Expiration time (`exp`)
    #[must_use]
    pub fn expiration(&self) -> DateTime<Utc> {
        self.claims.get_date("exp").unwrap_or_default()
    }

    /// Not-before time (`nbf`)
    #[must_use]
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.claims.get_date("nbf")
    }

    /// Issue time (`iat`)
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.claims.get_date("iat")
    }

    /// JWT ID (`jti`)
    #[must_use]
    pub fn jwt_id(&self) -> &str {
        self.claims.get_str("jti").unwrap_or_default()
    }

    /// Take the underlying claims set
    #[must_use]
    pub fn into_claims_set(self) -> ClaimsSet {
        self.claims
    }
}

impl ClaimsSetKind for JwtAuthClaimsSet {
    const REGISTERED_CLAIM_NAMES: &'static [&'static str] = JWT_AUTH_CLAIM_NAMES;

    fn claims_set(&self) -> &ClaimsSet {
        &self.claims
    }
}

impl sealed::ClaimsSetMut for JwtAuthClaimsSet {
    fn claims_set_mut(&mut self) -> &mut ClaimsSet {
        &mut self.claims
    }
}

/// Builder for [`JwtAuthClaimsSet`]
#[derive(Debug, Clone)]
pub struct JwtAuthClaimsSetBuilder {
    client_id: ClientId,
    audience: Vec<String>,
    expires_at: Option<DateTime<Utc>>,
    not_before: Option<DateTime<Utc>>,
    issued_at: Option<DateTime<Utc>>,
    jwt_id: Option<String>,
}

impl JwtAuthClaimsSetBuilder {
    /// Expiration time; defaults to five minutes from now
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Not-before time
    pub fn not_before(mut self, not_before: DateTime<Utc>) -> Self {
        self.not_before = Some(not_before);
        self
    }

    /// Issue time; defaults to now
    pub fn issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    /// JWT ID; defaults to a random UUID
    pub fn jwt_id(mut self, jwt_id: impl Into<String>) -> Self {
        self.jwt_id = Some(jwt_id.into());
        self
    }

    /// Build the claims set
    ///
    /// # Errors
    ///
    /// [`ClaimsError::InvalidClaim`] for a blank client identifier (`iss`), or
    /// for an audience that is empty or holds a blank entry (`aud`).
    pub fn build(self) -> Result<JwtAuthClaimsSet, ClaimsError> {
        if self.client_id.as_str().trim().is_empty() {
            return Err(ClaimsError::invalid("iss", "must be a non-empty string"));
        }
        if self.audience.is_empty() || self.audience.iter().any(|aud| aud.trim().is_empty()) {
            return Err(ClaimsError::invalid(
                "aud",
                "must name at least one audience, none of them blank",
            ));
        }

        let now = Utc::now();
        let exp = self
            .expires_at
            .unwrap_or_else(|| now + Duration::seconds(DEFAULT_ASSERTION_LIFETIME_SECONDS));
        let jti = self.jwt_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut claims = ClaimsSet::new();
        claims.set("iss", self.client_id.as_str());
        claims.set("sub", self.client_id.as_str());
        claims.set("aud", self.audience);
        claims.set_date("exp", Some(exp));
        claims.set_date("nbf", self.not_before);
        claims.set_date("iat", Some(self.issued_at.unwrap_or(now)));
        claims.set("jti", jti);

        Ok(JwtAuthClaimsSet { claims })
    }
}

fn required_string<'a>(claims: &'a ClaimsSet, name: &'static str) -> Result<&'a str, ClaimsError> {
    match claims.get(name) {
        None => Err(ClaimsError::MissingClaim(name)),
        Some(value) => match value.as_str() {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(ClaimsError::invalid(name, "must be a non-empty string")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ClientId {
        ClientId::new("s6BhdRkqt3")
    }

    #[test]
    fn defaults() {
        let before = Utc::now();
        let claims = JwtAuthClaimsSet::new(&client(), ["https://server.example.com/token"]).unwrap();

        assert_eq!(claims.issuer(), "s6BhdRkqt3");
        assert_eq!(claims.subject(), "s6BhdRkqt3");
        assert_eq!(claims.client_id(), client());
        assert_eq!(claims.audience(), vec!["https://server.example.com/token".to_string()]);
        assert!(!claims.jwt_id().is_empty());
        assert!(claims.not_before().is_none());

        let lifetime = claims.expiration() - before;
        assert!(lifetime <= Duration::seconds(DEFAULT_ASSERTION_LIFETIME_SECONDS + 1));
        assert!(lifetime >= Duration::seconds(DEFAULT_ASSERTION_LIFETIME_SECONDS - 1));
    }

    #[test]
    fn fresh_jti_per_assertion() {
        let a = JwtAuthClaimsSet::new(&client(), ["aud"]).unwrap();
        let b = JwtAuthClaimsSet::new(&client(), ["aud"]).unwrap();
        assert_ne!(a.jwt_id(), b.jwt_id());
    }

    #[test]
    fn builder_overrides() {
        let exp = DateTime::from_timestamp(2_000_000_000, 0).unwrap();
        let nbf = DateTime::from_timestamp(1_999_999_000, 0).unwrap();
        let claims = JwtAuthClaimsSet::builder(&client(), ["a", "b"])
            .expires_at(exp)
            .not_before(nbf)
            .issued_at(nbf)
            .jwt_id("id-1")
            .build()
            .unwrap();

        assert_eq!(claims.expiration(), exp);
        assert_eq!(claims.not_before(), Some(nbf));
        assert_eq!(claims.issued_at(), Some(nbf));
        assert_eq!(claims.jwt_id(), "id-1");
        assert_eq!(claims.audience().len(), 2);

        let reparsed = JwtAuthClaimsSet::from_claims_set(claims.clone().into_claims_set()).unwrap();
        assert_eq!(reparsed, claims);
    }

    #[test]
    fn build_rejects_missing_audience_or_client() {
        let err = JwtAuthClaimsSet::new(&client(), Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ClaimsError::InvalidClaim { claim: "aud", .. }));

        let err = JwtAuthClaimsSet::builder(&client(), ["https://server.example.com/token", " "])
            .build()
            .unwrap_err();
        assert!(matches!(err, ClaimsError::InvalidClaim { claim: "aud", .. }));

        let err = JwtAuthClaimsSet::new(&ClientId::new(""), ["aud"]).unwrap_err();
        assert!(matches!(err, ClaimsError::InvalidClaim { claim: "iss", .. }));
    }

    #[test]
    fn parse_requires_matching_issuer_and_subject() {
        let err = JwtAuthClaimsSet::parse(
            r#"{"iss": "a", "sub": "b", "aud": "t", "exp": 2000000000, "jti": "x"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ClaimsError::IssuerSubjectMismatch));
    }

    #[test]
    fn parse_requires_exp_and_jti() {
        let err = JwtAuthClaimsSet::parse(r#"{"iss": "a", "sub": "a", "aud": "t", "jti": "x"}"#)
            .unwrap_err();
        assert!(matches!(err, ClaimsError::MissingClaim("exp")));

        let err =
            JwtAuthClaimsSet::parse(r#"{"iss": "a", "sub": "a", "aud": "t", "exp": 2000000000}"#)
                .unwrap_err();
        assert!(matches!(err, ClaimsError::MissingClaim("jti")));

        let err = JwtAuthClaimsSet::parse(
            r#"{"iss": "a", "sub": "a", "aud": "t", "exp": 2000000000, "jti": " "}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ClaimsError::InvalidClaim { claim: "jti", .. }));
    }

    #[test]
    fn parse_rejects_mistyped_times() {
        let err = JwtAuthClaimsSet::parse(
            r#"{"iss": "a", "sub": "a", "aud": ["t"], "exp": 2000000000, "iat": "now", "jti": "x"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ClaimsError::InvalidClaim { claim: "iat", .. }));
    }

    #[test]
    fn issuer_cannot_be_set_as_custom_claim() {
        let mut claims = JwtAuthClaimsSet::new(&client(), ["aud"]).unwrap();
        assert!(claims.set_custom_claim("iss", "someone-else").is_err());
        claims.set_custom_claim("tenant", json!("acme")).unwrap();
        assert_eq!(claims.custom_claims().count(), 1);
        assert_eq!(claims.issuer(), "s6BhdRkqt3");
    }
}
