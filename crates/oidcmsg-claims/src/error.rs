//! Claims error types.
//!
//! Structural failures are raised once, when a claims set of a given kind is
//! constructed from an external map. After construction every accessor is total.

use thiserror::Error;

use crate::algorithm::JwsAlgorithm;

/// Errors raised while building or parsing a claims set.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// A claim mandated by the claims set kind is absent.
    #[error("missing required claim {0:?}")]
    MissingClaim(&'static str),

    /// A claim is present but its value has the wrong shape.
    #[error("invalid claim {claim:?}: {reason}")]
    InvalidClaim {
        /// Claim name
        claim: &'static str,
        /// What was wrong with the value
        reason: String,
    },

    /// A custom claim tried to use a registered claim name.
    #[error("claim name {0:?} is reserved and cannot be set as a custom claim")]
    ReservedClaimName(String),

    /// The issuer and subject of a client assertion differ.
    #[error("issuer and subject must both equal the client identifier")]
    IssuerSubjectMismatch,

    /// The JSON document is not an object.
    #[error("claims set must be a JSON object")]
    NotAnObject,

    /// The JSON document could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClaimsError {
    pub(crate) fn invalid(claim: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidClaim {
            claim,
            reason: reason.into(),
        }
    }
}

/// Errors raised when verifying an `at_hash` or `c_hash` claim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashClaimError {
    /// The signing algorithm has no associated digest; the hash cannot be
    /// checked either way.
    #[error("no hash function is defined for JWS algorithm {0}")]
    UnsupportedAlgorithm(JwsAlgorithm),

    /// The ID token carries no hash claim of this kind.
    #[error("missing {0} claim")]
    Missing(&'static str),

    /// The recomputed hash differs from the claim value.
    #[error("{0} does not match the bound value")]
    Mismatch(&'static str),
}
