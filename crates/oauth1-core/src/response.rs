//! Parsing of form-encoded provider responses.

use std::collections::HashMap;

use crate::encoding::percent_decode;
use crate::error::{OAuthError, Result};

/// Parse a `k=v&k2=v2` response body into a mapping.
///
/// Keys and values are percent-decoded. Later duplicates win. Entries
/// without `=` are skipped; a body with no valid entries yields an empty
/// mapping.
pub fn dictionary_from_response_str(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in body.trim().split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            params.insert(percent_decode(key), percent_decode(value));
        } else if !pair.is_empty() {
            tracing::debug!(entry = pair, "Skipping response entry without '='");
        }
    }

    if params.is_empty() && !body.trim().is_empty() {
        tracing::warn!(length = body.len(), "Response contained no key/value pairs");
    }
    params
}

/// Parse raw response bytes. Invalid UTF-8 is replaced before parsing.
pub fn dictionary_from_response_bytes(data: &[u8]) -> HashMap<String, String> {
    dictionary_from_response_str(&String::from_utf8_lossy(data))
}

/// Like [`dictionary_from_response_str`], but an empty result is an error.
pub fn parse_response(body: &str) -> Result<HashMap<String, String>> {
    let params = dictionary_from_response_str(body);
    if params.is_empty() {
        return Err(OAuthError::MalformedResponse);
    }
    Ok(params)
}
