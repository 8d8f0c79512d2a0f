//! `client_secret_post` (RFC 6749 §2.3.1)

use oidcmsg_claims::ClientId;

use crate::error::ClientAuthError;
use crate::method::ClientAuthMethod;
use crate::request::FormParams;
use crate::secret::Secret;

/// Form parameter carrying the client identifier.
pub const CLIENT_ID: &str = "client_id";

/// Form parameter carrying the client secret.
pub const CLIENT_SECRET: &str = "client_secret";

/// Client credentials in the request body.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSecretPost {
    client_id: ClientId,
    secret: Secret,
}

impl ClientSecretPost {
    /// Credentials for `client_id`
    pub fn new(client_id: impl Into<ClientId>, secret: Secret) -> Self {
        Self {
            client_id: client_id.into(),
            secret,
        }
    }

    /// Read `client_id` and `client_secret` from form parameters.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::MissingParameter`] if either is absent or blank.
    pub fn parse(params: &FormParams) -> Result<Self, ClientAuthError> {
        let client_id = params
            .get_non_blank(CLIENT_ID)
            .ok_or(ClientAuthError::MissingParameter(CLIENT_ID))?;
        let secret = params
            .get_non_blank(CLIENT_SECRET)
            .ok_or(ClientAuthError::MissingParameter(CLIENT_SECRET))?;

        Ok(Self {
            client_id: ClientId::new(client_id),
            secret: Secret::new(secret)?,
        })
    }

    /// Form parameters for these credentials.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::ErasedSecret`] if the secret has been erased.
    pub fn to_form_params(&self) -> Result<FormParams, ClientAuthError> {
        let secret = self
            .secret
            .value_str()
            .ok_or(ClientAuthError::ErasedSecret)?;

        let mut params = FormParams::new();
        params.append(CLIENT_ID, self.client_id.as_str());
        params.append(CLIENT_SECRET, secret);
        Ok(params)
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

    /// Always [`ClientAuthMethod::ClientSecretPost`]
    #[must_use]
    pub const fn method(&self) -> ClientAuthMethod {
        ClientAuthMethod::ClientSecretPost
    }
}
