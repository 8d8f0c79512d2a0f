//! Client secret material
//!
//! A [`Secret`] owns its bytes. [`Secret::erase`] overwrites them with zeros and
//! releases the buffer; the same happens on drop. Erasure is one-way.

use std::fmt;
use std::num::NonZeroUsize;
use std::time::SystemTime;

use rand::Rng;
use rand::distr::Alphanumeric;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::ClientAuthError;

/// Length of a generated secret when none is given.
pub const DEFAULT_SECRET_LENGTH: usize = 32;

/// A client secret with an optional expiry.
pub struct Secret {
    /// `None` once erased
    value: Option<Vec<u8>>,
    expires_at: Option<SystemTime>,
}

impl Secret {
    /// Wrap secret bytes with no expiry.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::EmptySecret`] if `value` is empty.
    pub fn new(value: impl Into<Vec<u8>>) -> Result<Self, ClientAuthError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ClientAuthError::EmptySecret);
        }
        Ok(Self {
            value: Some(value),
            expires_at: None,
        })
    }

    /// Wrap secret bytes that stop being valid at `expires_at`.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::EmptySecret`] if `value` is empty.
    pub fn with_expiry(
        value: impl Into<Vec<u8>>,
        expires_at: SystemTime,
    ) -> Result<Self, ClientAuthError> {
        let mut secret = Self::new(value)?;
        secret.expires_at = Some(expires_at);
        Ok(secret)
    }

    /// Generate a random secret of `length` mixed-case alphanumeric ASCII characters.
    #[must_use]
    pub fn generate(length: NonZeroUsize) -> Self {
        let value: Vec<u8> = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(length.get())
            .collect();
        Self {
            value: Some(value),
            expires_at: None,
        }
    }

    /// Current bytes, or `None` after [`Secret::erase`].
    #[must_use]
    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// Current value as UTF-8, if not erased and valid UTF-8.
    #[must_use]
    pub fn value_str(&self) -> Option<&str> {
        self.value().and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Current bytes, failing once erased.
    ///
    /// # Errors
    ///
    /// [`ClientAuthError::ErasedSecret`] after [`Secret::erase`].
    pub fn require_value(&self) -> Result<&[u8], ClientAuthError> {
        self.value().ok_or(ClientAuthError::ErasedSecret)
    }

    /// Whether the secret has been erased
    #[must_use]
    pub fn is_erased(&self) -> bool {
        self.value.is_none()
    }

    /// Zero the bytes and drop the buffer. Safe to call more than once.
    pub fn erase(&mut self) {
        if let Some(mut value) = self.value.take() {
            value.zeroize();
        }
    }

    /// Expiry instant, if any
    #[must_use]
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires_at
    }

    /// Whether the secret has expired. A secret without expiry never does.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expired_at(SystemTime::now())
    }

    /// Whether the secret is expired at `now`.
    #[must_use]
    pub fn expired_at(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|expires| now > expires)
    }
}

impl Default for Secret {
    fn default() -> Self {
        Self::generate(NonZeroUsize::MIN.saturating_add(DEFAULT_SECRET_LENGTH - 1))
    }
}

impl Clone for Secret {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            expires_at: self.expires_at,
        }
    }
}

/// Constant-time over the current values. An erased secret equals nothing,
/// not even another erased secret.
impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        match (self.value(), other.value()) {
            (Some(a), Some(b)) => a.ct_eq(b).into(),
            _ => false,
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_erased() { "erased" } else { "[REDACTED]" };
        f.debug_struct("Secret")
            .field("value", &state)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.erase();
    }
}
