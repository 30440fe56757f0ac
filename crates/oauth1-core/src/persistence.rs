//! Token persistence string: `oauth_token=<enc>&oauth_token_secret=<enc>`.

use crate::encoding::percent_encode;
use crate::params::{ParamKey, ParameterStore};
use crate::response::dictionary_from_response_str;

/// Token state kept in external storage.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PersistedToken {
    pub token: Option<String>,
    pub token_secret: Option<String>,
}

impl PersistedToken {
    /// Take the token and secret from a parameter store.
    pub fn from_params(params: &ParameterStore) -> Self {
        Self {
            token: params.token().map(str::to_owned),
            token_secret: params.token_secret().map(str::to_owned),
        }
    }

    /// Parse a persistence string. Unknown keys are ignored and missing
    /// keys stay `None`.
    pub fn parse(text: &str) -> Self {
        let mut dict = dictionary_from_response_str(text);
        Self {
            token: dict.remove(ParamKey::Token.as_str()),
            token_secret: dict.remove(ParamKey::TokenSecret.as_str()),
        }
    }

    /// Format as `oauth_token=<enc>&oauth_token_secret=<enc>`.
    ///
    /// Returns `None` without a token; a missing secret is written empty.
    pub fn serialize(&self) -> Option<String> {
        let token = self.token.as_deref()?;
        Some(format!(
            "{}={}&{}={}",
            ParamKey::Token,
            percent_encode(token),
            ParamKey::TokenSecret,
            percent_encode(self.token_secret.as_deref().unwrap_or_default())
        ))
    }

    /// A fresh parameter store holding only the token fields.
    pub fn into_params(self) -> ParameterStore {
        let mut params = ParameterStore::new();
        if let Some(token) = self.token {
            params.set_token(token);
        }
        if let Some(secret) = self.token_secret {
            params.set_token_secret(secret);
        }
        params
    }
}

impl std::fmt::Debug for PersistedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedToken")
            .field("token", &self.token)
            .field("token_secret", &self.token_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialize_encodes_values() {
        let token = PersistedToken {
            token: Some("1/abc def".to_owned()),
            token_secret: Some("s+e=c".to_owned()),
        };
        assert_eq!(
            token.serialize().unwrap(),
            "oauth_token=1%2Fabc%20def&oauth_token_secret=s%2Be%3Dc"
        );
    }

    #[test]
    fn test_serialize_without_token() {
        let token = PersistedToken {
            token: None,
            token_secret: Some("s".to_owned()),
        };
        assert_eq!(token.serialize(), None);
    }

    #[test]
    fn test_serialize_parse_is_identity() {
        for text in [
            "oauth_token=abc&oauth_token_secret=xyz",
            "oauth_token=1%2Fabc%20def&oauth_token_secret=s%2Be%3Dc",
            "oauth_token=abc&oauth_token_secret=",
        ] {
            assert_eq!(PersistedToken::parse(text).serialize().unwrap(), text);
        }
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let token = PersistedToken::parse("foo=bar&oauth_token=t&oauth_verifier=v");
        assert_eq!(token.token.as_deref(), Some("t"));
        assert_eq!(token.token_secret, None);
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(PersistedToken::parse("not a token"), PersistedToken::default());
    }

    #[test]
    fn test_roundtrip_through_params() {
        let mut params = ParameterStore::new();
        params.set_token("1/token");
        params.set_token_secret("secret");
        params.set_consumer_key("anonymous");
        params.set_scope("https://example.com/feeds/");

        let text = PersistedToken::from_params(&params).serialize().unwrap();
        let restored = PersistedToken::parse(&text).into_params();

        assert_eq!(restored.token(), Some("1/token"));
        assert_eq!(restored.token_secret(), Some("secret"));
        assert_eq!(restored.consumer_key(), None);
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let token = PersistedToken {
            token: Some("t".to_owned()),
            token_secret: Some("hunter2".to_owned()),
        };
        assert!(!format!("{token:?}").contains("hunter2"));
    }
}
