//! Client authentication errors.
//!
//! Every failure maps onto an OAuth 2.0 token endpoint error code (RFC 6749
//! §5.2) so a server can answer with [`ClientAuthError::to_error_response`].

use http::StatusCode;
use oidcmsg_claims::ClaimsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::method::ClientAuthMethod;

/// Errors raised while parsing, building or verifying client authentication.
#[derive(Debug, Error)]
pub enum ClientAuthError {
    // Structural: the request itself is malformed
    /// The `Authorization` header is not `Basic <credentials>`.
    #[error("malformed Authorization header: expected the Basic scheme")]
    MalformedAuthorizationHeader,

    /// The Basic credentials are not valid Base64 or not UTF-8.
    #[error("invalid Basic credentials encoding")]
    InvalidBasicEncoding,

    /// The decoded Basic credentials contain no `:`.
    #[error("missing credentials delimiter")]
    MissingCredentialsDelimiter,

    /// A Basic credential part is not valid form-url-encoding.
    #[error("invalid {0} encoding")]
    InvalidCredentialsEncoding(&'static str),

    /// A required form parameter is absent or blank.
    #[error("missing or empty parameter {0:?}")]
    MissingParameter(&'static str),

    /// `client_assertion_type` is not the JWT bearer URN.
    #[error("invalid client assertion type")]
    InvalidAssertionType,

    /// `client_assertion` is not a compact signed JWT.
    #[error("malformed client assertion: {0}")]
    MalformedAssertion(String),

    // Resource state
    /// A secret was created from an empty value.
    #[error("client secret must not be empty")]
    EmptySecret,

    /// A secret was used after it was erased.
    #[error("client secret has been erased")]
    ErasedSecret,

    // Policy
    /// The assertion's `alg` is not allowed for its authentication method.
    #[error("unsupported client assertion algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// An explicit `client_id` parameter differs from the assertion issuer.
    #[error("client identifier doesn't match assertion subject/issuer")]
    ClientIdMismatch,

    /// The assertion claims set is structurally invalid.
    #[error("invalid client assertion claims: {0}")]
    InvalidAssertionClaims(#[from] ClaimsError),

    /// The method is not enabled for this endpoint.
    #[error("client authentication method {0} is not allowed")]
    MethodNotAllowed(ClientAuthMethod),

    // Verification
    /// Unknown client or wrong secret.
    #[error("invalid client credentials")]
    InvalidCredentials,

    /// Every registered secret of the client has expired.
    #[error("client secret has expired")]
    ExpiredSecret,

    /// No candidate key verifies the assertion signature.
    #[error("invalid client assertion signature")]
    InvalidSignature,

    /// The assertion `exp` is in the past.
    #[error("client assertion has expired")]
    ExpiredAssertion,

    /// The assertion `nbf` or `iat` is in the future.
    #[error("client assertion is not yet valid")]
    AssertionNotYetValid,

    /// The assertion audience does not name this endpoint.
    #[error("client assertion audience does not include this endpoint")]
    AudienceMismatch,

    /// `exp - iat` exceeds the configured maximum lifetime.
    #[error("client assertion lifetime exceeds the allowed maximum")]
    AssertionLifetimeExceeded,

    /// The assertion `jti` has been seen before.
    #[error("client assertion has already been used")]
    ReplayedAssertion,

    // Collaborator failures
    /// The credential registry failed.
    #[error("credential lookup failed: {0}")]
    CredentialLookup(String),

    /// The JWS library failed to sign.
    #[error("assertion signing failed: {0}")]
    Signing(String),
}

impl ClientAuthError {
    /// OAuth 2.0 error code for the token endpoint response.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedAuthorizationHeader
            | Self::InvalidBasicEncoding
            | Self::MissingCredentialsDelimiter
            | Self::InvalidCredentialsEncoding(_)
            | Self::MissingParameter(_)
            | Self::InvalidAssertionType
            | Self::MalformedAssertion(_) => "invalid_request",
            Self::MethodNotAllowed(_) => "unauthorized_client",
            Self::ErasedSecret | Self::CredentialLookup(_) | Self::Signing(_) => "server_error",
            Self::EmptySecret
            | Self::UnsupportedAlgorithm(_)
            | Self::ClientIdMismatch
            | Self::InvalidAssertionClaims(_)
            | Self::InvalidCredentials
            | Self::ExpiredSecret
            | Self::InvalidSignature
            | Self::ExpiredAssertion
            | Self::AssertionNotYetValid
            | Self::AudienceMismatch
            | Self::AssertionLifetimeExceeded
            | Self::ReplayedAssertion => "invalid_client",
        }
    }

    /// HTTP status for the token endpoint response.
    #[must_use]
    pub fn http_status(&self) -> StatusCode {
        match self.error_code() {
            "invalid_request" | "unauthorized_client" => StatusCode::BAD_REQUEST,
            "invalid_client" => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure came from the client's request rather than from
    /// this server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::ErasedSecret | Self::CredentialLookup(_) | Self::Signing(_)
        )
    }

    /// Error response body for the token endpoint.
    ///
    /// Server errors carry no description so internal details are not leaked.
    #[must_use]
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.error_code().to_string(),
            error_description: self.is_client_error().then(|| self.to_string()),
            error_uri: None,
        }
    }
}

/// OAuth 2.0 error response body (RFC 6749 §5.2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code
    pub error: String,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    /// URI of a page describing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_errors_are_invalid_request() {
        for err in [
            ClientAuthError::MalformedAuthorizationHeader,
            ClientAuthError::InvalidBasicEncoding,
            ClientAuthError::MissingCredentialsDelimiter,
            ClientAuthError::InvalidCredentialsEncoding("client_id"),
            ClientAuthError::MissingParameter("client_assertion"),
            ClientAuthError::InvalidAssertionType,
        ] {
            assert_eq!(err.error_code(), "invalid_request", "{err}");
            assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn verification_errors_are_invalid_client() {
        for err in [
            ClientAuthError::ClientIdMismatch,
            ClientAuthError::UnsupportedAlgorithm("none".into()),
            ClientAuthError::InvalidCredentials,
            ClientAuthError::ReplayedAssertion,
        ] {
            assert_eq!(err.error_code(), "invalid_client", "{err}");
            assert_eq!(err.http_status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn method_not_allowed_is_unauthorized_client() {
        let err = ClientAuthError::MethodNotAllowed(ClientAuthMethod::ClientSecretPost);
        assert_eq!(err.error_code(), "unauthorized_client");
        assert_eq!(
            err.to_string(),
            "client authentication method client_secret_post is not allowed"
        );
    }

    #[test]
    fn server_errors_hide_details() {
        let response = ClientAuthError::CredentialLookup("db down".into()).to_error_response();
        assert_eq!(response.error, "server_error");
        assert_eq!(response.error_description, None);

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"error":"server_error"}"#);
    }

    #[test]
    fn mismatch_message() {
        let response = ClientAuthError::ClientIdMismatch.to_error_response();
        assert_eq!(
            response.error_description.as_deref(),
            Some("client identifier doesn't match assertion subject/issuer")
        );
    }
}
