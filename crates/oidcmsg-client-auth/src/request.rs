//! Token endpoint request helpers: form bodies and the `Authorization` header.

use http::{HeaderValue, Method, Request, header};
use url::form_urlencoded;

/// Media type of token endpoint request bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Decoded `application/x-www-form-urlencoded` parameters, in body order.
///
/// Lookups return the first occurrence of a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    /// Empty parameter list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a form body. Invalid percent-escapes decode lossily.
    #[must_use]
    pub fn parse(body: &[u8]) -> Self {
        Self {
            pairs: form_urlencoded::parse(body).into_owned().collect(),
        }
    }

    /// First value for `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First value for `name`, treating blank values as absent
    #[must_use]
    pub fn get_non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    /// Append a parameter
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Add every parameter of `other` after the current ones
    pub fn extend(&mut self, other: Self) {
        self.pairs.extend(other.pairs);
    }

    /// Whether there are no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over parameters in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as a form body
    #[must_use]
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Whether the request is a `POST` with a form-url-encoded body.
///
/// Media type parameters such as `charset` are ignored.
pub fn is_form_post<B>(request: &Request<B>) -> bool {
    if request.method() != Method::POST {
        return false;
    }

    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}

/// The `Authorization` header value, if present and visible ASCII.
pub fn authorization_header<B>(request: &Request<B>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Set the body of a request to `params`, with the matching content type.
pub fn set_form_body(request: &mut Request<String>, params: &FormParams) {
    request.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(FORM_URLENCODED),
    );
    *request.body_mut() = params.encode();
}
