//! Outbound request abstraction used by the authorizer.

use ureq::http::header::{AUTHORIZATION, CONTENT_TYPE};
use ureq::http::{HeaderValue, Request, Uri};

use crate::encoding::{form_decode, form_pairs, percent_encode};
use crate::error::{OAuthError, Result};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A request that can be signed in place.
///
/// Implemented for [`http::Request`](ureq::http::Request); transport layers
/// with their own request type implement it directly.
pub trait SignableRequest {
    /// HTTP method, e.g. `GET`.
    fn method(&self) -> &str;

    /// Full request URI, including the query string.
    fn uri(&self) -> &Uri;

    /// Decoded pairs of a form-encoded body; empty for any other body.
    fn form_params(&self) -> Vec<(String, String)>;

    /// Set the `Authorization` header, replacing any existing value.
    fn set_authorization(&mut self, value: &str) -> Result<()>;

    /// Replace the request URI.
    fn set_uri(&mut self, uri: Uri);
}

impl<B: AsRef<[u8]>> SignableRequest for Request<B> {
    fn method(&self) -> &str {
        Request::method(self).as_str()
    }

    fn uri(&self) -> &Uri {
        Request::uri(self)
    }

    fn form_params(&self) -> Vec<(String, String)> {
        let is_form = self
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_form_content_type);
        if !is_form {
            return Vec::new();
        }

        form_pairs(&String::from_utf8_lossy(self.body().as_ref()))
    }

    fn set_authorization(&mut self, value: &str) -> Result<()> {
        let value = HeaderValue::from_str(value).map_err(|_| OAuthError::InvalidHeader)?;
        self.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }

    fn set_uri(&mut self, uri: Uri) {
        *self.uri_mut() = uri;
    }
}

/// Media type comparison ignores case and any `;` parameters.
fn is_form_content_type(value: &str) -> bool {
    let media_type = value.split_once(';').map_or(value, |(media_type, _)| media_type);
    media_type.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE)
}

/// Remove the query pairs whose decoded name matches `remove`.
///
/// The remaining pairs keep their original encoding and order.
pub(crate) fn remove_query_params(uri: &Uri, remove: impl Fn(&str) -> bool) -> Result<Uri> {
    let Some(query) = uri.query() else {
        return Ok(uri.clone());
    };

    let pairs: Vec<&str> = query.split('&').collect();
    let kept: Vec<&str> = pairs
        .iter()
        .copied()
        .filter(|pair| {
            let name = pair.split_once('=').map_or(*pair, |(name, _)| name);
            !remove(&form_decode(name))
        })
        .collect();
    if kept.len() == pairs.len() {
        return Ok(uri.clone());
    }

    let path_and_query = if kept.is_empty() {
        uri.path().to_owned()
    } else {
        format!("{}?{}", uri.path(), kept.join("&"))
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(
        path_and_query
            .parse()
            .map_err(|e| OAuthError::InvalidUrl(format!("{e}")))?,
    );
    Uri::from_parts(parts).map_err(|e| OAuthError::InvalidUrl(format!("{e}")))
}

/// Append percent-encoded pairs to the query string of `uri`.
pub(crate) fn append_query(uri: &Uri, pairs: &[(String, String)]) -> Result<Uri> {
    if pairs.is_empty() {
        return Ok(uri.clone());
    }

    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = match uri.query() {
        Some("") => "",
        Some(_) => "&",
        None => "?",
    };

    format!("{uri}{separator}{query}")
        .parse()
        .map_err(|e| OAuthError::InvalidUrl(format!("{e}")))
}
