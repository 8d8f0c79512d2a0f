//! `at_hash` and `c_hash` token binding claims
//!
//! An ID token binds itself to a companion access token or authorization code
//! by carrying the left half of a digest of that value. The digest strength is
//! taken from the ID token's own signing algorithm:
//!
//! ```text
//! HS256 / RS256 / ES256 / PS256  ->  SHA-256  -> 16 bytes -> 22 chars
//! HS384 / RS384 / ES384 / PS384  ->  SHA-384  -> 24 bytes -> 32 chars
//! HS512 / RS512 / ES512 / PS512  ->  SHA-512  -> 32 bytes -> 43 chars
//! anything else                  ->  unsupported
//! ```
//!
//! An unsupported algorithm yields no hash at all. Callers must treat that as
//! "cannot be verified", never as a forged value.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::algorithm::{HashAlgorithm, JwsAlgorithm};
use crate::error::HashClaimError;

/// Claim name of the access token hash.
pub const AT_HASH: &str = "at_hash";

/// Claim name of the authorization code hash.
pub const C_HASH: &str = "c_hash";

/// A truncated, base64url-encoded digest of a bound value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashClaim(String);

impl HashClaim {
    /// Compute the hash of `value` for an ID token signed with `alg`.
    ///
    /// Returns `None` when `alg` has no associated digest.
    #[must_use]
    pub fn compute(value: &str, alg: JwsAlgorithm) -> Option<Self> {
        let digest = match alg.hash_algorithm()? {
            HashAlgorithm::Sha256 => Sha256::digest(value.as_bytes()).to_vec(),
            HashAlgorithm::Sha384 => Sha384::digest(value.as_bytes()).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(value.as_bytes()).to_vec(),
        };

        // Left-most half of the digest
        let half = &digest[..digest.len() / 2];
        Some(Self(URL_SAFE_NO_PAD.encode(half)))
    }

    /// Wrap an existing claim value, e.g. one read from an ID token.
    pub fn from_value(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The base64url claim value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison of two claim values.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }

    fn verify(&self, claim: &'static str, value: &str, alg: JwsAlgorithm) -> Result<(), HashClaimError> {
        let expected =
            Self::compute(value, alg).ok_or(HashClaimError::UnsupportedAlgorithm(alg))?;
        if expected.matches(self) {
            Ok(())
        } else {
            Err(HashClaimError::Mismatch(claim))
        }
    }
}

impl fmt::Display for HashClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access token hash (`at_hash`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessTokenHash(HashClaim);

impl AccessTokenHash {
    /// Compute the `at_hash` of a raw access token string.
    #[must_use]
    pub fn compute(access_token: &str, alg: JwsAlgorithm) -> Option<Self> {
        HashClaim::compute(access_token, alg).map(Self)
    }

    /// Wrap a claim value read from an ID token.
    pub fn from_value(value: impl Into<String>) -> Self {
        Self(HashClaim::from_value(value))
    }

    /// Check this claim against the access token issued alongside the ID token.
    ///
    /// # Errors
    ///
    /// [`HashClaimError::UnsupportedAlgorithm`] when `alg` has no digest,
    /// [`HashClaimError::Mismatch`] when the token does not hash to this value.
    pub fn verify(&self, access_token: &str, alg: JwsAlgorithm) -> Result<(), HashClaimError> {
        self.0.verify(AT_HASH, access_token, alg)
    }

    /// The base64url claim value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.0.value()
    }
}

/// Authorization code hash (`c_hash`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeHash(HashClaim);

impl CodeHash {
    /// Compute the `c_hash` of a raw authorization code string.
    #[must_use]
    pub fn compute(code: &str, alg: JwsAlgorithm) -> Option<Self> {
        HashClaim::compute(code, alg).map(Self)
    }

    /// Wrap a claim value read from an ID token.
    pub fn from_value(value: impl Into<String>) -> Self {
        Self(HashClaim::from_value(value))
    }

    /// Check this claim against the authorization code returned with the ID token.
    ///
    /// # Errors
    ///
    /// [`HashClaimError::UnsupportedAlgorithm`] when `alg` has no digest,
    /// [`HashClaimError::Mismatch`] when the code does not hash to this value.
    pub fn verify(&self, code: &str, alg: JwsAlgorithm) -> Result<(), HashClaimError> {
        self.0.verify(C_HASH, code, alg)
    }

    /// The base64url claim value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.0.value()
    }
}
