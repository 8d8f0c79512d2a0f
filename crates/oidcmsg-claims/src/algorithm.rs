//! JWS algorithm names (RFC 7518 §3.1)
//!
//! Only the algorithm *names* live here. Signing and verification are delegated
//! to a JOSE library by the crates that need them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// JSON Web Signature algorithm as declared in a JWS `alg` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JwsAlgorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    RS512,
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
    PS256,
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
    PS384,
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
    PS512,
    /// ECDSA using P-256 and SHA-256
    ES256,
    /// ECDSA using P-384 and SHA-384
    ES384,
    /// ECDSA using P-521 and SHA-512
    ES512,
    /// Edwards-curve signatures (RFC 8037)
    EdDSA,
    /// Unsecured JWS
    #[serde(rename = "none")]
    None,
}

/// Digest function selected by a JWS algorithm's strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl JwsAlgorithm {
    /// HMAC algorithms, usable with `client_secret_jwt`.
    pub const HMAC: [Self; 3] = [Self::HS256, Self::HS384, Self::HS512];

    /// RSA and ECDSA algorithms, usable with `private_key_jwt`.
    pub const ASYMMETRIC: [Self; 9] = [
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::PS256,
        Self::PS384,
        Self::PS512,
        Self::ES256,
        Self::ES384,
        Self::ES512,
    ];

    /// Get the algorithm name as registered in RFC 7518
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
            Self::EdDSA => "EdDSA",
            Self::None => "none",
        }
    }

    /// Look up an algorithm by its registered name. Names are case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let alg = match name {
            "HS256" => Self::HS256,
            "HS384" => Self::HS384,
            "HS512" => Self::HS512,
            "RS256" => Self::RS256,
            "RS384" => Self::RS384,
            "RS512" => Self::RS512,
            "PS256" => Self::PS256,
            "PS384" => Self::PS384,
            "PS512" => Self::PS512,
            "ES256" => Self::ES256,
            "ES384" => Self::ES384,
            "ES512" => Self::ES512,
            "EdDSA" => Self::EdDSA,
            "none" => Self::None,
            _ => return None,
        };
        Some(alg)
    }

    /// Whether this is one of the HMAC algorithms.
    #[must_use]
    pub fn is_hmac(self) -> bool {
        Self::HMAC.contains(&self)
    }

    /// Whether this is one of the RSA / ECDSA algorithms.
    #[must_use]
    pub fn is_asymmetric(self) -> bool {
        Self::ASYMMETRIC.contains(&self)
    }

    /// Digest used for `at_hash` / `c_hash` when an ID token is signed with
    /// this algorithm (OpenID Connect Core §3.1.3.6).
    ///
    /// Returns `None` for algorithms without a defined hash, such as `none`
    /// and `EdDSA`.
    #[must_use]
    pub fn hash_algorithm(self) -> Option<HashAlgorithm> {
        match self {
            Self::HS256 | Self::RS256 | Self::PS256 | Self::ES256 => Some(HashAlgorithm::Sha256),
            Self::HS384 | Self::RS384 | Self::PS384 | Self::ES384 => Some(HashAlgorithm::Sha384),
            Self::HS512 | Self::RS512 | Self::PS512 | Self::ES512 => Some(HashAlgorithm::Sha512),
            Self::EdDSA | Self::None => None,
        }
    }
}

impl fmt::Display for JwsAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for alg in JwsAlgorithm::HMAC
            .into_iter()
            .chain(JwsAlgorithm::ASYMMETRIC)
            .chain([JwsAlgorithm::EdDSA, JwsAlgorithm::None])
        {
            assert_eq!(JwsAlgorithm::from_name(alg.as_str()), Some(alg));
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(JwsAlgorithm::from_name("hs256"), None);
        assert_eq!(JwsAlgorithm::from_name("NONE"), None);
        assert_eq!(JwsAlgorithm::from_name(""), None);
    }

    #[test]
    fn families_are_disjoint() {
        assert!(JwsAlgorithm::HS384.is_hmac());
        assert!(!JwsAlgorithm::HS384.is_asymmetric());
        assert!(JwsAlgorithm::ES512.is_asymmetric());
        assert!(!JwsAlgorithm::None.is_hmac());
        assert!(!JwsAlgorithm::None.is_asymmetric());
        assert!(!JwsAlgorithm::EdDSA.is_asymmetric());
    }

    #[test]
    fn serde_uses_registered_names() {
        let json = serde_json::to_string(&JwsAlgorithm::None).unwrap();
        assert_eq!(json, "\"none\"");
        let alg: JwsAlgorithm = serde_json::from_str("\"PS384\"").unwrap();
        assert_eq!(alg, JwsAlgorithm::PS384);
    }

    #[test]
    fn hash_strength_follows_suffix() {
        assert_eq!(JwsAlgorithm::PS256.hash_algorithm(), Some(HashAlgorithm::Sha256));
        assert_eq!(JwsAlgorithm::ES384.hash_algorithm(), Some(HashAlgorithm::Sha384));
        assert_eq!(JwsAlgorithm::HS512.hash_algorithm(), Some(HashAlgorithm::Sha512));
        assert_eq!(JwsAlgorithm::None.hash_algorithm(), None);
    }
}
