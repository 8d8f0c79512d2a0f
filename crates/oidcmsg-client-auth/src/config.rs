//! Verifier configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::method::ClientAuthMethod;

/// Token endpoint client authentication policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientAuthConfig {
    /// Audience values an assertion may name (the token endpoint URI, and
    /// optionally the issuer identifier)
    #[serde(default)]
    pub expected_audience: Vec<String>,

    /// Methods accepted at this endpoint
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<ClientAuthMethod>,

    /// Tolerance applied to `exp`, `nbf` and `iat`
    #[serde(default = "default_clock_skew")]
    pub clock_skew: Duration,

    /// Longest accepted `exp - iat` span
    #[serde(default = "default_max_assertion_lifetime")]
    pub max_assertion_lifetime: Duration,

    /// Reject assertions whose `jti` has been seen before
    #[serde(default = "default_require_unique_jti")]
    pub require_unique_jti: bool,
}

fn default_allowed_methods() -> Vec<ClientAuthMethod> {
    ClientAuthMethod::AUTHENTICATED.to_vec()
}

fn default_clock_skew() -> Duration {
    Duration::from_secs(60)
}

fn default_max_assertion_lifetime() -> Duration {
    Duration::from_secs(300)
}

fn default_require_unique_jti() -> bool {
    true
}

impl Default for ClientAuthConfig {
    fn default() -> Self {
        Self {
            expected_audience: Vec::new(),
            allowed_methods: default_allowed_methods(),
            clock_skew: default_clock_skew(),
            max_assertion_lifetime: default_max_assertion_lifetime(),
            require_unique_jti: default_require_unique_jti(),
        }
    }
}

impl ClientAuthConfig {
    /// Policy for a token endpoint at `token_endpoint`
    pub fn new(token_endpoint: impl Into<String>) -> Self {
        Self {
            expected_audience: vec![token_endpoint.into()],
            ..Self::default()
        }
    }

    /// Also accept `audience` in assertions
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.expected_audience.push(audience.into());
        self
    }

    /// Replace the accepted methods
    #[must_use]
    pub fn with_allowed_methods(mut self, methods: impl IntoIterator<Item = ClientAuthMethod>) -> Self {
        self.allowed_methods = methods.into_iter().collect();
        self
    }

    /// Set the clock skew tolerance
    #[must_use]
    pub fn with_clock_skew(mut self, skew: Duration) -> Self {
        self.clock_skew = skew;
        self
    }

    /// Set the longest accepted assertion lifetime
    #[must_use]
    pub fn with_max_assertion_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_assertion_lifetime = lifetime;
        self
    }

    /// Enable or disable `jti` replay checks
    #[must_use]
    pub fn with_unique_jti(mut self, required: bool) -> Self {
        self.require_unique_jti = required;
        self
    }

    /// Whether `method` is accepted
    #[must_use]
    pub fn allows(&self, method: ClientAuthMethod) -> bool {
        self.allowed_methods.contains(&method)
    }
}
