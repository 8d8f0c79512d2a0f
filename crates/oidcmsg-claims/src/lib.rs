//! # oidcmsg-claims - OpenID Connect claims sets
//!
//! Typed access to the claims carried by ID tokens, UserInfo responses and JWT
//! client authentication assertions, built on one generic JSON-object container.
//!
//! ## Architecture
//!
//! - [`claims_set`] - `ClaimsSet`, the ordered name/value container with total,
//!   typed accessors
//! - [`lang_tag`] - RFC 5646 language-tagged claim keys (`name#ja-Kana-JP`)
//! - [`kind`] - `ClaimsSetKind`, registered claim names per claims set kind
//! - [`id_token`] - `IdTokenClaimsSet`
//! - [`userinfo`] - `UserInfo`
//! - [`assertion`] - `JwtAuthClaimsSet` for `client_secret_jwt` / `private_key_jwt`
//! - [`algorithm`] - JWS algorithm names and their digest strength
//! - [`hash`] - `at_hash` / `c_hash` computation and verification
//!
//! ## Quick Start
//!
//! ```rust
//! use oidcmsg_claims::{ClaimsSet, LanguageTag};
//!
//! let mut claims = ClaimsSet::new();
//! claims.set("name", "John Doe");
//! let fr = LanguageTag::parse("fr").unwrap();
//! claims.set_with_lang_tag("name", "Jean Dupont", Some(&fr));
//!
//! assert_eq!(claims.get_lang_tagged("name").len(), 2);
//! assert_eq!(claims.to_json_string(), r#"{"name":"John Doe","name#fr":"Jean Dupont"}"#);
//! ```
//!
//! ## Standards Compliance
//!
//! - **OpenID Connect Core 1.0** - ID token, UserInfo, claim internationalization
//! - **RFC 5646** - Tags for Identifying Languages
//! - **RFC 7519** - JSON Web Token (JWT)
//! - **RFC 7523** - JWT Profile for OAuth 2.0 Client Authentication

#![forbid(unsafe_code)]

pub mod algorithm;
pub mod assertion;
pub mod claims_set;
pub mod error;
pub mod hash;
pub mod id_token;
pub mod kind;
pub mod lang_tag;
pub mod types;
pub mod userinfo;

pub use algorithm::{HashAlgorithm, JwsAlgorithm};
pub use assertion::{JwtAuthClaimsSet, JwtAuthClaimsSetBuilder};
pub use claims_set::ClaimsSet;
pub use error::{ClaimsError, HashClaimError};
pub use hash::{AccessTokenHash, CodeHash, HashClaim};
pub use id_token::IdTokenClaimsSet;
pub use kind::ClaimsSetKind;
pub use lang_tag::LanguageTag;
pub use types::{ClientId, Email};
pub use userinfo::UserInfo;

/// Claims result type
pub type Result<T> = std::result::Result<T, ClaimsError>;
