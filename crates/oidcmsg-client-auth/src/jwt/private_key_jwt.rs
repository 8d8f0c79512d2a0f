use jsonwebtoken::{DecodingKey, EncodingKey};
use oidcmsg_claims::{ClientId, JwsAlgorithm, JwtAuthClaimsSet};

use super::SignedAssertion;
use crate::error::ClientAuthError;
use crate::method::ClientAuthMethod;
use crate::request::FormParams;

/// `private_key_jwt`: an assertion signed with the client's private key.
///
/// Only RSA (`RS*`, `PS*`) and ECDSA (`ES*`) assertions can be wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateKeyJwt {
    assertion: SignedAssertion,
}

impl PrivateKeyJwt {
    /// Wrap a parsed assertion.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::UnsupportedAlgorithm`] unless the assertion uses an
    /// RSA or ECDSA algorithm.
    pub fn new(assertion: SignedAssertion) -> Result<Self, ClientAuthError> {
        check_algorithm(assertion.algorithm())?;
        Ok(Self { assertion })
    }

    /// Sign `claims` with the client's private key.
    ///
    /// # Errors
    ///
    /// - [`ClientAuthError::UnsupportedAlgorithm`] unless `alg` is RSA or ECDSA
    /// - [`ClientAuthError::Signing`] if the key does not fit `alg`
    pub fn sign(
        claims: JwtAuthClaimsSet,
        alg: JwsAlgorithm,
        key: &EncodingKey,
        key_id: Option<String>,
    ) -> Result<Self, ClientAuthError> {
        check_algorithm(alg)?;
        let assertion = SignedAssertion::sign(claims, alg, key, key_id)?;
        Ok(Self { assertion })
    }

    /// Check the signature with a registered public key of the client.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::InvalidSignature`] if `key` does not verify the assertion.
    pub fn verify(&self, key: &DecodingKey) -> Result<(), ClientAuthError> {
        self.assertion.verify_signature(key)
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

    /// Always [`ClientAuthMethod::PrivateKeyJwt`]
    #[must_use]
    pub const fn method(&self) -> ClientAuthMethod {
        ClientAuthMethod::PrivateKeyJwt
    }

    /// `client_assertion` form parameters
    #[must_use]
    pub fn to_form_params(&self) -> FormParams {
        self.assertion.to_form_params()
    }
}

fn check_algorithm(alg: JwsAlgorithm) -> Result<(), ClientAuthError> {
    if alg.is_asymmetric() {
        Ok(())
    } else {
        Err(ClientAuthError::UnsupportedAlgorithm(alg.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_rejected() {
        let claims = JwtAuthClaimsSet::new(&ClientId::new("c"), ["aud"]).unwrap();
        let result = PrivateKeyJwt::sign(
            claims,
            JwsAlgorithm::HS256,
            &EncodingKey::from_secret(b"0123456789abcdef0123456789abcdef"),
            None,
        );
        assert!(matches!(result, Err(ClientAuthError::UnsupportedAlgorithm(alg)) if alg == "HS256"));
    }

    #[test]
    fn hmac_assertion_cannot_be_wrapped() {
        let claims = JwtAuthClaimsSet::new(&ClientId::new("c"), ["aud"]).unwrap();
        let assertion = SignedAssertion::sign(
            claims,
            JwsAlgorithm::HS256,
            &EncodingKey::from_secret(b"0123456789abcdef0123456789abcdef"),
            None,
        )
        .unwrap();
        assert!(matches!(
            PrivateKeyJwt::new(assertion),
            Err(ClientAuthError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn eddsa_rejected() {
        let claims = JwtAuthClaimsSet::new(&ClientId::new("c"), ["aud"]).unwrap();
        let result = PrivateKeyJwt::sign(
            claims,
            JwsAlgorithm::EdDSA,
            &EncodingKey::from_secret(b"unused"),
            None,
        );
        assert!(matches!(result, Err(ClientAuthError::UnsupportedAlgorithm(_))));
    }
}
