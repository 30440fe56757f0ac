//! Signature base string construction (RFC 5849 Section 3.4.1).

use ureq::http::Uri;

use crate::encoding::{form_pairs, percent_encode};
use crate::error::{OAuthError, Result};
use crate::params::ParamKey;

/// Builds the canonical `METHOD&url&params` string that gets signed.
///
/// Parameters are kept as a list so repeated names survive; ordering is
/// applied in [`build`](Self::build), so insertion order never matters.
/// An `oauth_signature` parameter is never part of the signed set.
#[derive(Debug, Clone)]
pub struct SignatureBaseStringBuilder {
    method: String,
    base_url: String,
    params: Vec<(String, String)>,
}

impl SignatureBaseStringBuilder {
    /// Start from a request URI: the base URL is normalized and the query
    /// parameters are collected for signing.
    pub fn new(method: &str, uri: &Uri) -> Result<Self> {
        let base_url = normalize_url(uri)?;
        let params = uri.query().map(form_pairs).unwrap_or_default();
        Ok(Self {
            method: method.to_ascii_uppercase(),
            base_url,
            params,
        })
    }

    /// Start from an already-normalized base URL with no parameters.
    pub fn from_parts(method: &str, base_url: &str) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            base_url: base_url.to_owned(),
            params: Vec::new(),
        }
    }

    /// Add one parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add several parameters.
    #[must_use]
    pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Normalized base URL (scheme, host, non-default port, path).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Produce the signature base string.
    pub fn build(&self) -> String {
        // Normalize parameters: encode keys/values, sort by key then value
        let mut encoded: Vec<(String, String)> = self
            .params
            .iter()
            .filter(|(k, _)| k != ParamKey::Signature.as_str())
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect();
        encoded.sort_unstable();

        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}&{}&{}",
            self.method,
            percent_encode(&self.base_url),
            percent_encode(&param_string)
        )
    }
}

/// Base string URI per RFC 5849 Section 3.4.1.2.
///
/// Scheme and host are lowercased, default ports dropped, query and
/// fragment removed. An empty path becomes `/`.
pub fn normalize_url(uri: &Uri) -> Result<String> {
    let scheme = uri
        .scheme_str()
        .ok_or_else(|| OAuthError::InvalidUrl(format!("{uri}: missing scheme")))?
        .to_ascii_lowercase();
    let host = uri
        .host()
        .ok_or_else(|| OAuthError::InvalidUrl(format!("{uri}: missing host")))?
        .to_ascii_lowercase();

    let port = match (scheme.as_str(), uri.port_u16()) {
        ("http", Some(80)) | ("https", Some(443)) | (_, None) => String::new(),
        (_, Some(port)) => format!(":{port}"),
    };

    let path = match uri.path() {
        "" => "/",
        path => path,
    };

    Ok(format!("{scheme}://{host}{port}{path}"))
}
