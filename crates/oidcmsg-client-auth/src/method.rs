//! Token endpoint authentication method names
//! (OpenID Connect Core §9, RFC 7591 `token_endpoint_auth_method`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Client authentication method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
    /// HTTP Basic with the client secret
    ClientSecretBasic,
    /// Client secret in the form body
    ClientSecretPost,
    /// JWT assertion MACed with the client secret
    ClientSecretJwt,
    /// JWT assertion signed with the client's private key
    PrivateKeyJwt,
    /// Public client; no authentication
    None,
}

impl ClientAuthMethod {
    /// The four methods that authenticate a confidential client.
    pub const AUTHENTICATED: [Self; 4] = [
        Self::ClientSecretBasic,
        Self::ClientSecretPost,
        Self::ClientSecretJwt,
        Self::PrivateKeyJwt,
    ];

    /// Registered method name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientSecretBasic => "client_secret_basic",
            Self::ClientSecretPost => "client_secret_post",
            Self::ClientSecretJwt => "client_secret_jwt",
            Self::PrivateKeyJwt => "private_key_jwt",
            Self::None => "none",
        }
    }

    /// Whether the method presents a shared secret, directly or as a MAC key
    #[must_use]
    pub const fn uses_client_secret(self) -> bool {
        matches!(
            self,
            Self::ClientSecretBasic | Self::ClientSecretPost | Self::ClientSecretJwt
        )
    }

    /// Whether the method presents a JWT assertion
    #[must_use]
    pub const fn uses_assertion(self) -> bool {
        matches!(self, Self::ClientSecretJwt | Self::PrivateKeyJwt)
    }
}

impl fmt::Display for ClientAuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown authentication method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown client authentication method {0:?}")]
pub struct UnknownMethod(pub String);

impl FromStr for ClientAuthMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client_secret_basic" => Ok(Self::ClientSecretBasic),
            "client_secret_post" => Ok(Self::ClientSecretPost),
            "client_secret_jwt" => Ok(Self::ClientSecretJwt),
            "private_key_jwt" => Ok(Self::PrivateKeyJwt),
            "none" => Ok(Self::None),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}
