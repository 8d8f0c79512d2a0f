use jsonwebtoken::{DecodingKey, EncodingKey};
use oidcmsg_claims::{ClientId, JwsAlgorithm, JwtAuthClaimsSet};

use super::SignedAssertion;
use crate::error::ClientAuthError;
use crate::method::ClientAuthMethod;
use crate::request::FormParams;
use crate::secret::Secret;

/// `client_secret_jwt`: an assertion MACed with the client secret.
///
/// Only `HS256`, `HS384` and `HS512` assertions can be wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSecretJwt {
    assertion: SignedAssertion,
}

impl ClientSecretJwt {
    /// Wrap a parsed assertion.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::UnsupportedAlgorithm`] unless the assertion uses an HMAC algorithm.
    pub fn new(assertion: SignedAssertion) -> Result<Self, ClientAuthError> {
        check_algorithm(assertion.algorithm())?;
        Ok(Self { assertion })
    }

    /// Sign `claims` with `secret`.
    ///
    /// # Errors
    ///
    /// - [`ClientAuthError::UnsupportedAlgorithm`] unless `alg` is an HMAC algorithm
    /// - [`ClientAuthError::ErasedSecret`] if the secret has been erased
    /// - [`ClientAuthError::Signing`] if the JWS library fails
    pub fn sign(
        claims: JwtAuthClaimsSet,
        alg: JwsAlgorithm,
        secret: &Secret,
    ) -> Result<Self, ClientAuthError> {
        check_algorithm(alg)?;
        let key = EncodingKey::from_secret(secret.require_value()?);
        let assertion = SignedAssertion::sign(claims, alg, &key, None)?;
        Ok(Self { assertion })
    }

    /// Check the MAC with a candidate client secret.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::ErasedSecret`] for an erased secret,
    /// [`ClientAuthError::InvalidSignature`] if the MAC does not match.
    pub fn verify(&self, secret: &Secret) -> Result<(), ClientAuthError> {
        let key = DecodingKey::from_secret(secret.require_value()?);
        self.assertion.verify_signature(&key)
    }

    /// The client identifier (assertion `iss`)
    #[must_use]
    pub fn client_id(&self) -> ClientId {
        self.assertion.client_id()
    }

    /// The signed assertion
    #[must_use]
    pub fn assertion(&self) -> &SignedAssertion {
        &self.assertion
    }

    /// Always [`ClientAuthMethod::ClientSecretJwt`]
    #[must_use]
    pub const fn method(&self) -> ClientAuthMethod {
        ClientAuthMethod::ClientSecretJwt
    }

    /// `client_assertion` form parameters
    #[must_use]
    pub fn to_form_params(&self) -> FormParams {
        self.assertion.to_form_params()
    }
}

fn check_algorithm(alg: JwsAlgorithm) -> Result<(), ClientAuthError> {
    if alg.is_hmac() {
        Ok(())
    } else {
        Err(ClientAuthError::UnsupportedAlgorithm(alg.to_string()))
    }
}
