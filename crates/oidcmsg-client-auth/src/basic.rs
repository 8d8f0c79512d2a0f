//! `client_secret_basic` (RFC 6749 §2.3.1)
//!
//! The client id and secret are each form-url-encoded, joined with `:` and
//! sent Base64-encoded in an `Authorization: Basic` header.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use oidcmsg_claims::ClientId;
use percent_encoding::percent_decode;
use url::form_urlencoded;

use crate::error::ClientAuthError;
use crate::method::ClientAuthMethod;
use crate::secret::Secret;

/// Authentication scheme of the header.
pub const BASIC_SCHEME: &str = "Basic";

/// HTTP Basic client authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSecretBasic {
    client_id: ClientId,
    secret: Secret,
}

impl ClientSecretBasic {
    /// Credentials for `client_id`
    pub fn new(client_id: impl Into<ClientId>, secret: Secret) -> Self {
        Self {
            client_id: client_id.into(),
            secret,
        }
    }

    /// Parse an `Authorization` header value.
    ///
    /// # Errors
    ///
    /// - [`ClientAuthError::MalformedAuthorizationHeader`] if the scheme is not `Basic`
    /// - [`ClientAuthError::InvalidBasicEncoding`] if the credentials are not Base64 UTF-8
    /// - [`ClientAuthError::MissingCredentialsDelimiter`] if there is no `:`,
    ///   raw or percent-encoded
    /// - [`ClientAuthError::InvalidCredentialsEncoding`] if a part is not valid form encoding
    /// - [`ClientAuthError::MissingParameter`] / [`ClientAuthError::EmptySecret`] for empty parts
    pub fn parse(header_value: &str) -> Result<Self, ClientAuthError> {
        let (scheme, credentials) = header_value
            .trim()
            .split_once(' ')
            .ok_or(ClientAuthError::MalformedAuthorizationHeader)?;
        if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
            return Err(ClientAuthError::MalformedAuthorizationHeader);
        }

        let decoded = STANDARD
            .decode(credentials.trim())
            .map_err(|_| ClientAuthError::InvalidBasicEncoding)?;
        let decoded = String::from_utf8(decoded).map_err(|_| ClientAuthError::InvalidBasicEncoding)?;

        let (client_id, secret) = split_credentials(&decoded)?;
        if client_id.is_empty() {
            return Err(ClientAuthError::MissingParameter("client_id"));
        }

        Ok(Self {
            client_id: ClientId::new(client_id),
            secret: Secret::new(secret)?,
        })
    }

    /// `Authorization` header value for these credentials.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::ErasedSecret`] if the secret has been erased.
    pub fn to_header_value(&self) -> Result<String, ClientAuthError> {
        let secret = self.secret.require_value()?;
        let credentials = format!(
            "{}:{}",
            form_urlencoded::byte_serialize(self.client_id.as_str().as_bytes()).collect::<String>(),
            form_urlencoded::byte_serialize(secret).collect::<String>(),
        );
        Ok(format!("{BASIC_SCHEME} {}", STANDARD.encode(credentials)))
    }

    /// Client identifier
    #[must_use]
    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Client secret
    #[must_use]
    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    /// Always [`ClientAuthMethod::ClientSecretBasic`]
    #[must_use]
    pub const fn method(&self) -> ClientAuthMethod {
        ClientAuthMethod::ClientSecretBasic
    }
}

/// Split decoded Basic credentials into client id and secret.
///
/// Normally each side of the first raw `:` is form-decoded on its own. Some
/// clients form-encode the joined `id:secret` string instead, so when there is
/// no raw `:` the whole string is decoded first and split at the first `:`.
fn split_credentials(decoded: &str) -> Result<(String, Vec<u8>), ClientAuthError> {
    if let Some((client_id, secret)) = decoded.split_once(':') {
        let client_id = String::from_utf8(form_url_decode(client_id))
            .map_err(|_| ClientAuthError::InvalidCredentialsEncoding("client_id"))?;
        return Ok((client_id, form_url_decode(secret)));
    }

    let whole = form_url_decode(decoded);
    let colon = whole
        .iter()
        .position(|&b| b == b':')
        .ok_or(ClientAuthError::MissingCredentialsDelimiter)?;
    let (client_id, secret) = whole.split_at(colon);
    let client_id = String::from_utf8(client_id.to_vec())
        .map_err(|_| ClientAuthError::InvalidCredentialsEncoding("client_id"))?;
    Ok((client_id, secret[1..].to_vec()))
}

/// `application/x-www-form-urlencoded` decoding of one component
fn form_url_decode(value: &str) -> Vec<u8> {
    let plus_as_space = value.replace('+', " ");
    percent_decode(plus_as_space.as_bytes()).collect()
}
