//! ID token claims set (OpenID Connect Core §2)

use chrono::{DateTime, Utc};

use crate::algorithm::JwsAlgorithm;
use crate::claims_set::ClaimsSet;
use crate::error::{ClaimsError, HashClaimError};
use crate::hash::{AT_HASH, AccessTokenHash, C_HASH, CodeHash};
use crate::kind::{ClaimsSetKind, sealed};

/// Registered ID token claim names.
pub const ID_TOKEN_CLAIM_NAMES: &[&str] = &[
    "iss", "sub", "aud", "exp", "iat", "auth_time", "nonce", AT_HASH, C_HASH, "acr", "amr",
    "azp", "sid",
];

/// Claims of an OpenID Connect ID token.
///
/// `iss`, `sub`, `aud`, `exp` and `iat` are always present.
#[derive(Debug, Clone, PartialEq)]
pub struct IdTokenClaimsSet {
    claims: ClaimsSet,
}

impl IdTokenClaimsSet {
    /// Create an ID token claims set with the mandatory claims.
    ///
    /// # Errors
    ///
    /// [`ClaimsError::InvalidClaim`] for a blank `iss` or `sub`, or for an
    /// audience that is empty or holds a blank entry.
    pub fn new(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        audience: Vec<String>,
        expiration: DateTime<Utc>,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, ClaimsError> {
        let issuer = issuer.into();
        let subject = subject.into();
        for (name, value) in [("iss", &issuer), ("sub", &subject)] {
            if value.trim().is_empty() {
                return Err(ClaimsError::invalid(name, "must be a non-empty string"));
            }
        }
        if audience.is_empty() || audience.iter().any(|aud| aud.trim().is_empty()) {
            return Err(ClaimsError::invalid(
                "aud",
                "must name at least one audience, none of them blank",
            ));
        }

        let mut claims = ClaimsSet::new();
        claims.set("iss", issuer);
        claims.set("sub", subject);
        claims.set("aud", audience);
        claims.set_date("exp", Some(expiration));
        claims.set_date("iat", Some(issued_at));
        Ok(Self { claims })
    }

    /// Validate a generic claims set as an ID token.
    ///
    /// # Errors
    ///
    /// [`ClaimsError::MissingClaim`] naming the first absent mandatory claim, or
    /// [`ClaimsError::InvalidClaim`] when a mandatory claim has the wrong type.
    pub fn from_claims_set(claims: ClaimsSet) -> Result<Self, ClaimsError> {
        for name in ["iss", "sub"] {
            require(&claims, name)?;
            if claims.get_str(name).is_none() {
                return Err(ClaimsError::invalid(name, "must be a string"));
            }
        }

        require(&claims, "aud")?;
        match claims.get_string_or_list("aud") {
            Some(aud) if !aud.is_empty() => {}
            _ => {
                return Err(ClaimsError::invalid(
                    "aud",
                    "must be a string or a non-empty array of strings",
                ));
            }
        }

        for name in ["exp", "iat"] {
            require(&claims, name)?;
            if claims.get_date(name).is_none() {
                return Err(ClaimsError::invalid(name, "must be seconds since the epoch"));
            }
        }

        Ok(Self { claims })
    }

    /// Parse an ID token payload.
    ///
    /// # Errors
    ///
    /// See [`ClaimsSet::parse`] and [`IdTokenClaimsSet::from_claims_set`].
    pub fn parse(json: &str) -> Result<Self, ClaimsError> {
        Self::from_claims_set(ClaimsSet::parse(json)?)
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

    /// Issue time (`iat`)
    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.claims.get_date("iat").unwrap_or_default()
    }

    /// Time of the end-user authentication (`auth_time`)
    #[must_use]
    pub fn auth_time(&self) -> Option<DateTime<Utc>> {
        self.claims.get_date("auth_time")
    }

    /// Set `auth_time`
    pub fn set_auth_time(&mut self, auth_time: Option<DateTime<Utc>>) {
        self.claims.set_date("auth_time", auth_time);
    }

    /// Replay-protection nonce from the authentication request
    #[must_use]
    pub fn nonce(&self) -> Option<&str> {
        self.claims.get_str("nonce")
    }

    /// Set `nonce`
    pub fn set_nonce(&mut self, nonce: Option<String>) {
        self.claims.set("nonce", nonce);
    }

    /// `at_hash`
    #[must_use]
    pub fn access_token_hash(&self) -> Option<AccessTokenHash> {
        self.claims.get_str(AT_HASH).map(AccessTokenHash::from_value)
    }

    /// Set `at_hash`
    pub fn set_access_token_hash(&mut self, hash: Option<AccessTokenHash>) {
        self.claims.set(AT_HASH, hash.map(|h| h.value().to_string()));
    }

    /// `c_hash`
    #[must_use]
    pub fn code_hash(&self) -> Option<CodeHash> {
        self.claims.get_str(C_HASH).map(CodeHash::from_value)
    }

    /// Set `c_hash`
    pub fn set_code_hash(&mut self, hash: Option<CodeHash>) {
        self.claims.set(C_HASH, hash.map(|h| h.value().to_string()));
    }

    /// Authentication context class reference (`acr`)
    #[must_use]
    pub fn acr(&self) -> Option<&str> {
        self.claims.get_str("acr")
    }

    /// Set `acr`
    pub fn set_acr(&mut self, acr: Option<String>) {
        self.claims.set("acr", acr);
    }

    /// Authentication method references (`amr`)
    #[must_use]
    pub fn amr(&self) -> Option<Vec<String>> {
        self.claims.get_string_list("amr")
    }

    /// Set `amr`
    pub fn set_amr(&mut self, amr: Option<Vec<String>>) {
        self.claims.set("amr", amr);
    }

    /// Authorized party (`azp`)
    #[must_use]
    pub fn authorized_party(&self) -> Option<&str> {
        self.claims.get_str("azp")
    }

    /// Set `azp`
    pub fn set_authorized_party(&mut self, azp: Option<String>) {
        self.claims.set("azp", azp);
    }

    /// Session ID (`sid`)
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.claims.get_str("sid")
    }

    /// Set `sid`
    pub fn set_session_id(&mut self, sid: Option<String>) {
        self.claims.set("sid", sid);
    }

    /// Whether the hash claims required for `response_type` are present.
    ///
    /// ID tokens issued from the authorization endpoint together with an access
    /// token must carry `at_hash`; together with a code, `c_hash`
    /// (OpenID Connect Core §3.2.2.10 and §3.3.2.11). Tokens from the token
    /// endpoint (`response_type=code`) need neither.
    #[must_use]
    pub fn has_required_claims(&self, response_type: &str) -> bool {
        let parts: Vec<&str> = response_type.split_whitespace().collect();
        if !parts.contains(&"id_token") {
            return true;
        }
        let needs_at_hash = parts.contains(&"token");
        let needs_c_hash = parts.contains(&"code");

        (!needs_at_hash || self.claims.contains(AT_HASH))
            && (!needs_c_hash || self.claims.contains(C_HASH))
    }

    /// Verify `at_hash` against the access token returned with this ID token.
    ///
    /// # Errors
    ///
    /// [`HashClaimError::Missing`] if the claim is absent, otherwise as
    /// [`AccessTokenHash::verify`].
    pub fn verify_access_token_hash(
        &self,
        access_token: &str,
        alg: JwsAlgorithm,
    ) -> Result<(), HashClaimError> {
        self.access_token_hash()
            .ok_or(HashClaimError::Missing(AT_HASH))?
            .verify(access_token, alg)
    }

    /// Verify `c_hash` against the authorization code returned with this ID token.
    ///
    /// # Errors
    ///
    /// [`HashClaimError::Missing`] if the claim is absent, otherwise as
    /// [`CodeHash::verify`].
    pub fn verify_code_hash(&self, code: &str, alg: JwsAlgorithm) -> Result<(), HashClaimError> {
        self.code_hash()
            .ok_or(HashClaimError::Missing(C_HASH))?
            .verify(code, alg)
    }

    /// Take the underlying claims set
    #[must_use]
    pub fn into_claims_set(self) -> ClaimsSet {
        self.claims
    }
}

impl ClaimsSetKind for IdTokenClaimsSet {
    const REGISTERED_CLAIM_NAMES: &'static [&'static str] = ID_TOKEN_CLAIM_NAMES;

    fn claims_set(&self) -> &ClaimsSet {
        &self.claims
    }
}

impl sealed::ClaimsSetMut for IdTokenClaimsSet {
    fn claims_set_mut(&mut self) -> &mut ClaimsSet {
        &mut self.claims
    }
}

fn require(claims: &ClaimsSet, name: &'static str) -> Result<(), ClaimsError> {
    if claims.contains(name) {
        Ok(())
    } else {
        Err(ClaimsError::MissingClaim(name))
    }
}
