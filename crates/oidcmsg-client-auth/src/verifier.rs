//! Verification of a resolved client authentication
//!
//! The resolver only says *which* credentials a request carries. This module
//! checks them against what the server has registered for the client:
//!
//! - `client_secret_basic` / `client_secret_post`: constant-time comparison
//!   against the client's unexpired secrets
//! - `client_secret_jwt`: claims checks, then the MAC against each unexpired secret
//! - `private_key_jwt`: claims checks, then the signature against each public key
//!
//! A successful JWT check records the assertion `jti` so that it cannot be
//! presented again while it is still valid.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::DecodingKey;
use oidcmsg_claims::{ClientId, JwsAlgorithm};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::ClientAuthConfig;
use crate::error::ClientAuthError;
use crate::jwt::SignedAssertion;
use crate::method::ClientAuthMethod;
use crate::resolver::ClientAuthentication;
use crate::secret::Secret;

/// Source of the credentials a server has registered for its clients.
pub trait ClientCredentialsSelector: Send + Sync {
    /// Secrets registered for `client_id`, for a secret-based `method`.
    /// An unknown client yields an empty list.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::CredentialLookup`] if the registry cannot be read.
    fn select_secrets(
        &self,
        client_id: &ClientId,
        method: ClientAuthMethod,
    ) -> Result<Vec<Secret>, ClientAuthError>;

    /// Public keys registered for `client_id` that may verify `alg`,
    /// narrowed to `key_id` when the assertion names one.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::CredentialLookup`] if the registry cannot be read.
    fn select_public_keys(
        &self,
        client_id: &ClientId,
        alg: JwsAlgorithm,
        key_id: Option<&str>,
    ) -> Result<Vec<DecodingKey>, ClientAuthError>;
}

/// One-time use record of assertion identifiers.
pub trait JtiTracker: Send + Sync + fmt::Debug {
    /// Record `jti` for `client_id` until `expires_at`, as of `now`.
    ///
    /// Returns `false` if the pair is already recorded and has not expired
    /// by `now`.
    fn record(
        &self,
        client_id: &ClientId,
        jti: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool;

    /// Drop records that expired before `now`; returns how many were dropped.
    fn purge_expired(&self, now: DateTime<Utc>) -> usize;
}

/// In-memory [`JtiTracker`] for single-instance deployments and tests
#[derive(Debug, Default)]
pub struct MemoryJtiTracker {
    seen: Mutex<HashMap<(String, String), DateTime<Utc>>>,
}

impl MemoryJtiTracker {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    /// Whether there are no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}

impl JtiTracker for MemoryJtiTracker {
    fn record(
        &self,
        client_id: &ClientId,
        jti: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        let mut seen = self.seen.lock();
        seen.retain(|_, expiry| *expiry >= now);

        let key = (client_id.as_str().to_string(), jti.to_string());
        if seen.contains_key(&key) {
            return false;
        }
        seen.insert(key, expires_at);
        true
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut seen = self.seen.lock();
        let before = seen.len();
        seen.retain(|_, expiry| *expiry >= now);
        before - seen.len()
    }
}

/// Checks client authentication against registered credentials.
pub struct ClientAuthVerifier<S> {
    config: ClientAuthConfig,
    credentials: S,
    jti_tracker: Arc<dyn JtiTracker>,
}

impl<S> fmt::Debug for ClientAuthVerifier<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientAuthVerifier")
            .field("config", &self.config)
            .field("jti_tracker", &self.jti_tracker)
            .finish_non_exhaustive()
    }
}

impl<S: ClientCredentialsSelector> ClientAuthVerifier<S> {
    /// Verifier with an in-memory `jti` tracker
    pub fn new(config: ClientAuthConfig, credentials: S) -> Self {
        Self::with_jti_tracker(config, credentials, Arc::new(MemoryJtiTracker::new()))
    }

    /// Verifier sharing a `jti` tracker
    pub fn with_jti_tracker(
        config: ClientAuthConfig,
        credentials: S,
        jti_tracker: Arc<dyn JtiTracker>,
    ) -> Self {
        Self {
            config,
            credentials,
            jti_tracker,
        }
    }

    /// The active policy
    #[must_use]
    pub fn config(&self) -> &ClientAuthConfig {
        &self.config
    }

    /// Verify `auth` at the current time and return the authenticated client.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::MethodNotAllowed`] for a disabled method, otherwise
    /// the first failed check.
    pub fn verify(&self, auth: &ClientAuthentication) -> Result<ClientId, ClientAuthError> {
        self.verify_at(auth, Utc::now())
    }

    /// Verify `auth` as of `now`.
    ///
    /// # Errors
    ///
    /// As [`ClientAuthVerifier::verify`].
    pub fn verify_at(
        &self,
        auth: &ClientAuthentication,
        now: DateTime<Utc>,
    ) -> Result<ClientId, ClientAuthError> {
        let client_id = auth.client_id();
        let method = auth.method();

        let result = self.check(auth, &client_id, method, now);
        match &result {
            Ok(()) => debug!(client_id = %client_id, method = %method, "client authenticated"),
            Err(e) => warn!(
                client_id = %client_id,
                method = %method,
                error = %e,
                "client authentication failed"
            ),
        }
        result.map(|()| client_id)
    }

    fn check(
        &self,
        auth: &ClientAuthentication,
        client_id: &ClientId,
        method: ClientAuthMethod,
        now: DateTime<Utc>,
    ) -> Result<(), ClientAuthError> {
        if !self.config.allows(method) {
            return Err(ClientAuthError::MethodNotAllowed(method));
        }

        match auth {
            ClientAuthentication::ClientSecretBasic(basic) => {
                self.check_secret(client_id, method, basic.secret(), now)
            }
            ClientAuthentication::ClientSecretPost(post) => {
                self.check_secret(client_id, method, post.secret(), now)
            }
            ClientAuthentication::ClientSecretJwt(jwt) => {
                self.check_assertion_claims(jwt.assertion(), now)?;
                let secrets = self.live_secrets(client_id, method, now)?;
                if !secrets.iter().any(|secret| jwt.verify(secret).is_ok()) {
                    return Err(ClientAuthError::InvalidSignature);
                }
                self.check_replay(jwt.assertion(), now)
            }
            ClientAuthentication::PrivateKeyJwt(jwt) => {
                self.check_assertion_claims(jwt.assertion(), now)?;
                let assertion = jwt.assertion();
                let keys = self.credentials.select_public_keys(
                    client_id,
                    assertion.algorithm(),
                    assertion.key_id(),
                )?;
                if !keys.iter().any(|key| jwt.verify(key).is_ok()) {
                    return Err(ClientAuthError::InvalidSignature);
                }
                self.check_replay(assertion, now)
            }
        }
    }

    fn check_secret(
        &self,
        client_id: &ClientId,
        method: ClientAuthMethod,
        presented: &Secret,
        now: DateTime<Utc>,
    ) -> Result<(), ClientAuthError> {
        presented.require_value()?;
        let secrets = self.live_secrets(client_id, method, now)?;
        if secrets.iter().any(|secret| secret == presented) {
            Ok(())
        } else {
            Err(ClientAuthError::InvalidCredentials)
        }
    }

    /// Registered secrets that have not expired. Having secrets that all
    /// expired is reported apart from having none.
    fn live_secrets(
        &self,
        client_id: &ClientId,
        method: ClientAuthMethod,
        now: DateTime<Utc>,
    ) -> Result<Vec<Secret>, ClientAuthError> {
        let registered = self.credentials.select_secrets(client_id, method)?;
        if registered.is_empty() {
            return Err(ClientAuthError::InvalidCredentials);
        }

        let now = std::time::SystemTime::from(now);
        let live: Vec<Secret> = registered
            .into_iter()
            .filter(|secret| !secret.expired_at(now))
            .collect();
        if live.is_empty() {
            return Err(ClientAuthError::ExpiredSecret);
        }
        Ok(live)
    }

    fn check_assertion_claims(
        &self,
        assertion: &SignedAssertion,
        now: DateTime<Utc>,
    ) -> Result<(), ClientAuthError> {
        let claims = assertion.claims();
        let skew = to_chrono(self.config.clock_skew);

        if !claims
            .audience()
            .iter()
            .any(|aud| self.config.expected_audience.contains(aud))
        {
            return Err(ClientAuthError::AudienceMismatch);
        }

        if claims
            .expiration()
            .checked_add_signed(skew)
            .is_some_and(|latest| latest < now)
        {
            return Err(ClientAuthError::ExpiredAssertion);
        }

        let in_future = |instant: DateTime<Utc>| {
            instant
                .checked_sub_signed(skew)
                .is_some_and(|earliest| earliest > now)
        };

        if claims.not_before().is_some_and(in_future) {
            return Err(ClientAuthError::AssertionNotYetValid);
        }

        let max_lifetime = to_chrono(self.config.max_assertion_lifetime);
        match claims.issued_at() {
            Some(iat) => {
                if in_future(iat) {
                    return Err(ClientAuthError::AssertionNotYetValid);
                }
                if claims.expiration() - iat > max_lifetime {
                    return Err(ClientAuthError::AssertionLifetimeExceeded);
                }
            }
            // Without `iat` the remaining lifetime is bounded instead
            None => {
                let allowed = max_lifetime.checked_add(&skew).unwrap_or(ChronoDuration::MAX);
                if claims.expiration().signed_duration_since(now) > allowed {
                    return Err(ClientAuthError::AssertionLifetimeExceeded);
                }
            }
        }

        Ok(())
    }

    fn check_replay(
        &self,
        assertion: &SignedAssertion,
        now: DateTime<Utc>,
    ) -> Result<(), ClientAuthError> {
        if !self.config.require_unique_jti {
            return Ok(());
        }

        let claims = assertion.claims();
        let expires_at = claims
            .expiration()
            .checked_add_signed(to_chrono(self.config.clock_skew))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        if self
            .jti_tracker
            .record(&claims.client_id(), claims.jwt_id(), expires_at, now)
        {
            Ok(())
        } else {
            Err(ClientAuthError::ReplayedAssertion)
        }
    }
}

fn to_chrono(duration: std::time::Duration) -> ChronoDuration {
    ChronoDuration::from_std(duration).unwrap_or(ChronoDuration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_tracker_rejects_second_use() {
        let tracker = MemoryJtiTracker::new();
        let client = ClientId::new("c1");
        let now = Utc::now();
        let exp = now + ChronoDuration::minutes(5);

        assert!(tracker.record(&client, "j1", exp, now));
        assert!(!tracker.record(&client, "j1", exp, now));
        assert!(tracker.record(&client, "j2", exp, now));
        assert!(tracker.record(&ClientId::new("c2"), "j1", exp, now));
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn memory_tracker_purges() {
        let tracker = MemoryJtiTracker::new();
        let client = ClientId::new("c1");
        let now = Utc::now();

        tracker.record(&client, "old", now + ChronoDuration::seconds(1), now);
        tracker.record(&client, "new", now + ChronoDuration::minutes(5), now);

        assert_eq!(tracker.purge_expired(now + ChronoDuration::seconds(2)), 1);
        assert_eq!(tracker.len(), 1);
        assert!(!tracker.is_empty());
    }

    #[test]
    fn memory_tracker_uses_callers_clock() {
        let tracker = MemoryJtiTracker::new();
        let client = ClientId::new("c1");
        let now = Utc::now();
        let exp = now + ChronoDuration::minutes(5);

        assert!(tracker.record(&client, "j1", exp, now));
        assert!(!tracker.record(&client, "j1", exp, now + ChronoDuration::minutes(4)));

        // Expired as of the supplied time even though the wall clock says otherwise
        let later = now + ChronoDuration::minutes(6);
        assert!(tracker.record(&client, "j1", later + ChronoDuration::minutes(5), later));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn duration_conversion_saturates() {
        assert_eq!(to_chrono(std::time::Duration::from_secs(60)), ChronoDuration::seconds(60));
        assert_eq!(to_chrono(std::time::Duration::MAX), ChronoDuration::MAX);
    }
}
