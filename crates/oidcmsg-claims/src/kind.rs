//! Claims set kinds and their registered claim names
//!
//! Each concrete claims set (ID token, UserInfo, client assertion) declares the
//! claim names it owns as a compile-time constant. Custom claims go through
//! [`ClaimsSetKind::set_custom_claim`], which refuses those names. Mutable
//! access to the underlying container stays inside this crate, so an
//! application can never overwrite `exp` or `sub` on a typed claims set.

use serde_json::{Map, Value};

use crate::claims_set::ClaimsSet;
use crate::error::ClaimsError;
use crate::lang_tag::split_key;

pub(crate) mod sealed {
    use crate::claims_set::ClaimsSet;

    /// Write access to a typed claims set, for this crate only.
    pub trait ClaimsSetMut {
        fn claims_set_mut(&mut self) -> &mut ClaimsSet;
    }
}

/// A claims set with a fixed set of registered claim names.
///
/// Implemented only by the claims set types of this crate. Registered claims
/// cannot be written from outside:
///
/// ```compile_fail
/// use oidcmsg_claims::{ClaimsSetKind, ClientId, JwtAuthClaimsSet};
///
/// let mut claims = JwtAuthClaimsSet::new(&ClientId::new("c"), ["aud"]).unwrap();
/// claims.claims_set_mut().set("iss", "someone-else");
/// ```
pub trait ClaimsSetKind: sealed::ClaimsSetMut {
    /// Claim names owned by this kind.
    const REGISTERED_CLAIM_NAMES: &'static [&'static str];

    /// The underlying container
    fn claims_set(&self) -> &ClaimsSet;

    /// Whether `name` (or the base name of `name#tag`) is registered.
    fn is_registered(name: &str) -> bool {
        let (base, _) = split_key(name);
        Self::REGISTERED_CLAIM_NAMES.contains(&base)
    }

    /// Set a custom claim.
    ///
    /// # Errors
    ///
    /// [`ClaimsError::ReservedClaimName`] if `name` is registered for this kind.
    fn set_custom_claim(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ClaimsError> {
        if Self::is_registered(name) {
            return Err(ClaimsError::ReservedClaimName(name.to_string()));
        }
        self.claims_set_mut().set(name, value);
        Ok(())
    }

    /// Entries that are not registered claims.
    fn custom_claims(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.claims_set()
            .iter()
            .filter(|(name, _)| !Self::is_registered(name))
    }

    /// JSON object view of all claims
    fn to_json_object(&self) -> &Map<String, Value> {
        self.claims_set().to_map()
    }
}
