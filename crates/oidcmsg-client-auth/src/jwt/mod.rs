//! JWT client assertions (RFC 7523 §2.2, OpenID Connect Core §9)
//!
//! A [`SignedAssertion`] is a compact JWS whose payload is a
//! [`JwtAuthClaimsSet`]. The two assertion-based methods differ only in the
//! key that signs it:
//!
//! - [`ClientSecretJwt`]: HMAC keyed with the client secret (`HS*`)
//! - [`PrivateKeyJwt`]: the client's private key (`RS*`, `PS*`, `ES*`)
//!
//! Signing and signature checks are delegated to `jsonwebtoken`; header and
//! payload decoding happen here so that an unsupported `alg` is reported as
//! such rather than as a malformed token.

mod client_secret_jwt;
mod private_key_jwt;

pub use client_secret_jwt::ClientSecretJwt;
pub use private_key_jwt::PrivateKeyJwt;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use oidcmsg_claims::{ClaimsError, ClaimsSet, ClaimsSetKind, ClientId, JwsAlgorithm, JwtAuthClaimsSet};
use serde_json::Value;
use tracing::debug;

use crate::error::ClientAuthError;
use crate::request::FormParams;

/// `client_assertion_type` value for JWT bearer assertions (RFC 7523 §2.2).
pub const CLIENT_ASSERTION_TYPE_JWT_BEARER: &str =
    "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Form parameter carrying the assertion.
pub const CLIENT_ASSERTION: &str = "client_assertion";

/// Form parameter carrying the assertion type.
pub const CLIENT_ASSERTION_TYPE: &str = "client_assertion_type";

/// A compact JWS client assertion with its decoded header and claims.
///
/// Parsing does not check the signature; see [`SignedAssertion::verify_signature`].
#[derive(Debug, Clone, PartialEq)]
pub struct SignedAssertion {
    raw: String,
    algorithm: JwsAlgorithm,
    key_id: Option<String>,
    claims: JwtAuthClaimsSet,
}

impl SignedAssertion {
    /// Decode a compact serialized assertion.
    ///
    /// # Errors
    ///
    /// - [`ClientAuthError::MalformedAssertion`] if it is not a three-part JWS
    ///   with a JSON header and payload
    /// - [`ClientAuthError::UnsupportedAlgorithm`] for an unknown `alg` or `none`
    /// - [`ClientAuthError::InvalidAssertionClaims`] if the payload is not a valid
    ///   assertion claims set
    pub fn parse(jwt: &str) -> Result<Self, ClientAuthError> {
        let jwt = jwt.trim();
        let segments: Vec<&str> = jwt.split('.').collect();
        let [header, payload, _signature] = segments.as_slice() else {
            return Err(ClientAuthError::MalformedAssertion(
                "expected three dot-separated segments".to_string(),
            ));
        };

        let header = decode_json_segment(header, "header")?;
        let alg = header
            .get("alg")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientAuthError::MalformedAssertion("missing alg header".to_string()))?;
        let algorithm = match JwsAlgorithm::from_name(alg) {
            Some(JwsAlgorithm::None) | None => {
                return Err(ClientAuthError::UnsupportedAlgorithm(alg.to_string()));
            }
            Some(algorithm) => algorithm,
        };
        let key_id = header.get("kid").and_then(Value::as_str).map(str::to_string);

        let claims = match ClaimsSet::try_from(decode_json_segment(payload, "payload")?) {
            Ok(claims) => claims,
            Err(ClaimsError::NotAnObject) => {
                return Err(ClientAuthError::MalformedAssertion(
                    "payload is not a JSON object".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            raw: jwt.to_string(),
            algorithm,
            key_id,
            claims: JwtAuthClaimsSet::from_claims_set(claims)?,
        })
    }

    /// Sign `claims` as a compact JWS.
    ///
    /// # Errors
    ///
    /// - [`ClientAuthError::UnsupportedAlgorithm`] if the JWS library cannot sign with `alg`
    /// - [`ClientAuthError::Signing`] if signing fails, e.g. the key does not fit `alg`
    pub fn sign(
        claims: JwtAuthClaimsSet,
        alg: JwsAlgorithm,
        key: &EncodingKey,
        key_id: Option<String>,
    ) -> Result<Self, ClientAuthError> {
        let mut header = Header::new(jose_algorithm(alg)?);
        header.kid.clone_from(&key_id);

        let raw = encode(&header, claims.to_json_object(), key)
            .map_err(|e| ClientAuthError::Signing(e.to_string()))?;

        Ok(Self {
            raw,
            algorithm: alg,
            key_id,
            claims,
        })
    }

    /// Check the signature with `key`.
    ///
    /// Only the signature is checked here; time, audience and replay checks are
    /// made by the verifier against its own policy.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::InvalidSignature`] if `key` does not verify the
    /// assertion, [`ClientAuthError::UnsupportedAlgorithm`] if the JWS library
    /// cannot verify `alg`.
    pub fn verify_signature(&self, key: &DecodingKey) -> Result<(), ClientAuthError> {
        let mut validation = Validation::new(jose_algorithm(self.algorithm)?);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<Value>(&self.raw, key, &validation)
            .map(|_| ())
            .map_err(|e| {
                debug!(error = %e, algorithm = %self.algorithm, "client assertion signature rejected");
                ClientAuthError::InvalidSignature
            })
    }

    /// The compact serialization
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Declared `alg`
    #[must_use]
    pub fn algorithm(&self) -> JwsAlgorithm {
        self.algorithm
    }

    /// Declared `kid`
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    /// Decoded claims
    #[must_use]
    pub fn claims(&self) -> &JwtAuthClaimsSet {
        &self.claims
    }

    /// The client the assertion was issued by (`iss`)
    #[must_use]
    pub fn client_id(&self) -> ClientId {
        self.claims.client_id()
    }

    /// `client_assertion_type` and `client_assertion` form parameters
    #[must_use]
    pub fn to_form_params(&self) -> FormParams {
        let mut params = FormParams::new();
        params.append(CLIENT_ASSERTION_TYPE, CLIENT_ASSERTION_TYPE_JWT_BEARER);
        params.append(CLIENT_ASSERTION, self.raw.as_str());
        params
    }
}

/// `jsonwebtoken` counterpart of a JWS algorithm, if it supports it.
fn jose_algorithm(alg: JwsAlgorithm) -> Result<Algorithm, ClientAuthError> {
    let mapped = match alg {
        JwsAlgorithm::HS256 => Algorithm::HS256,
        JwsAlgorithm::HS384 => Algorithm::HS384,
        JwsAlgorithm::HS512 => Algorithm::HS512,
        JwsAlgorithm::RS256 => Algorithm::RS256,
        JwsAlgorithm::RS384 => Algorithm::RS384,
        JwsAlgorithm::RS512 => Algorithm::RS512,
        JwsAlgorithm::PS256 => Algorithm::PS256,
        JwsAlgorithm::PS384 => Algorithm::PS384,
        JwsAlgorithm::PS512 => Algorithm::PS512,
        JwsAlgorithm::ES256 => Algorithm::ES256,
        JwsAlgorithm::ES384 => Algorithm::ES384,
        JwsAlgorithm::EdDSA => Algorithm::EdDSA,
        // ES512 has no implementation in jsonwebtoken
        JwsAlgorithm::ES512 | JwsAlgorithm::None => {
            return Err(ClientAuthError::UnsupportedAlgorithm(alg.to_string()));
        }
    };
    Ok(mapped)
}

fn decode_json_segment(segment: &str, name: &str) -> Result<Value, ClientAuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| ClientAuthError::MalformedAssertion(format!("{name} is not base64url: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ClientAuthError::MalformedAssertion(format!("{name} is not JSON: {e}")))
}
