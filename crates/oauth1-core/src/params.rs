//! Parameter container for OAuth protocol and pass-through parameters.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name of a parameter held by a [`ParameterStore`].
///
/// Known names get their own variant; anything else is kept verbatim in
/// [`ParamKey::Other`]. Equality, ordering and hashing all follow the wire
/// name, so `ParamKey::Other("oauth_token".into())` equals `ParamKey::Token`.
#[derive(Debug, Clone)]
pub enum ParamKey {
    ConsumerKey,
    Token,
    SignatureMethod,
    Timestamp,
    Nonce,
    Version,
    Callback,
    Verifier,
    TokenSecret,
    CallbackConfirmed,
    Signature,
    Scope,
    DisplayName,
    HostedDomain,
    Language,
    Mobile,
    Other(String),
}

impl ParamKey {
    /// Wire name of the parameter.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ConsumerKey => "oauth_consumer_key",
            Self::Token => "oauth_token",
            Self::SignatureMethod => "oauth_signature_method",
            Self::Timestamp => "oauth_timestamp",
            Self::Nonce => "oauth_nonce",
            Self::Version => "oauth_version",
            Self::Callback => "oauth_callback",
            Self::Verifier => "oauth_verifier",
            Self::TokenSecret => "oauth_token_secret",
            Self::CallbackConfirmed => "oauth_callback_confirmed",
            Self::Signature => "oauth_signature",
            Self::Scope => "scope",
            Self::DisplayName => "xoauth_displayname",
            Self::HostedDomain => "hd",
            Self::Language => "hl",
            Self::Mobile => "btmpl",
            Self::Other(name) => name,
        }
    }

    /// Map a wire name to its key, falling back to [`ParamKey::Other`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "oauth_consumer_key" => Self::ConsumerKey,
            "oauth_token" => Self::Token,
            "oauth_signature_method" => Self::SignatureMethod,
            "oauth_timestamp" => Self::Timestamp,
            "oauth_nonce" => Self::Nonce,
            "oauth_version" => Self::Version,
            "oauth_callback" => Self::Callback,
            "oauth_verifier" => Self::Verifier,
            "oauth_token_secret" => Self::TokenSecret,
            "oauth_callback_confirmed" => Self::CallbackConfirmed,
            "oauth_signature" => Self::Signature,
            "scope" => Self::Scope,
            "xoauth_displayname" => Self::DisplayName,
            "hd" => Self::HostedDomain,
            "hl" => Self::Language,
            "btmpl" => Self::Mobile,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Whether this is an `oauth_`-prefixed protocol parameter.
    pub fn is_protocol(&self) -> bool {
        self.as_str().starts_with("oauth_")
    }
}

impl PartialEq for ParamKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ParamKey {}

impl Hash for ParamKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialOrd for ParamKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParamKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// Generates a typed getter and setter for a known parameter.
macro_rules! accessors {
    ($($(#[$doc:meta])* $get:ident, $set:ident => $key:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $get(&self) -> Option<&str> {
                self.get(&ParamKey::$key)
            }

            #[doc = concat!("Set the `", stringify!($get), "` parameter.")]
            pub fn $set(&mut self, value: impl Into<String>) {
                self.set(ParamKey::$key, value);
            }
        )*
    };
}

/// Key/value store for OAuth parameters.
///
/// Each key appears at most once. An absent key means "unset": it is left
/// out of signatures and headers rather than sent as an empty string.
/// Iteration is ordered by wire name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterStore {
    values: BTreeMap<ParamKey, String>,
}

impl ParameterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a parameter.
    pub fn get(&self, key: &ParamKey) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up a parameter by wire name.
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        self.get(&ParamKey::from_name(name))
    }

    /// Set a parameter, replacing any previous value.
    pub fn set(&mut self, key: impl Into<ParamKey>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Remove a parameter, returning its previous value.
    pub fn remove(&mut self, key: &ParamKey) -> Option<String> {
        self.values.remove(key)
    }

    /// Whether the parameter is set.
    pub fn contains(&self, key: &ParamKey) -> bool {
        self.values.contains_key(key)
    }

    /// Number of parameters set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over parameters in wire-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParamKey, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Opaque application parameters (everything in [`ParamKey::Other`]).
    pub fn extra_params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter(|(k, _)| matches!(k, ParamKey::Other(_)))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    accessors! {
        /// Consumer key identifying the client application.
        consumer_key, set_consumer_key => ConsumerKey;
        /// Request or access token.
        token, set_token => Token;
        /// Signature method name, e.g. `HMAC-SHA1`.
        signature_method, set_signature_method => SignatureMethod;
        /// Protocol version, normally `1.0`.
        version, set_version => Version;
        /// Callback URL sent with the request token call.
        callback, set_callback => Callback;
        /// Verifier returned to the callback after user consent.
        verifier, set_verifier => Verifier;
        /// Secret matching the current token.
        token_secret, set_token_secret => TokenSecret;
        /// Whether the provider confirmed the callback.
        callback_confirmed, set_callback_confirmed => CallbackConfirmed;
        /// Scope of access requested (Google extension).
        scope, set_scope => Scope;
        /// Application name shown on the consent page.
        display_name, set_display_name => DisplayName;
        /// Hosted domain of the account.
        hosted_domain, set_hosted_domain => HostedDomain;
        /// Language of the consent page.
        language, set_language => Language;
        /// Template for the consent page on mobile devices.
        mobile, set_mobile => Mobile;
    }
}

impl<K: Into<ParamKey>, V: Into<String>> FromIterator<(K, V)> for ParameterStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl<K: Into<ParamKey>, V: Into<String>> Extend<(K, V)> for ParameterStore {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_names_roundtrip() {
        for name in [
            "oauth_consumer_key",
            "oauth_token",
            "oauth_signature_method",
            "oauth_timestamp",
            "oauth_nonce",
            "oauth_version",
            "oauth_callback",
            "oauth_verifier",
            "oauth_token_secret",
            "oauth_callback_confirmed",
            "oauth_signature",
            "scope",
            "xoauth_displayname",
            "hd",
            "hl",
            "btmpl",
        ] {
            let key = ParamKey::from_name(name);
            assert!(!matches!(key, ParamKey::Other(_)), "{name} should be known");
            assert_eq!(key.as_str(), name);
        }
    }

    #[test]
    fn test_other_equals_known_variant() {
        assert_eq!(ParamKey::Other("oauth_token".to_owned()), ParamKey::Token);

        let mut store = ParameterStore::new();
        store.set(ParamKey::Other("oauth_token".to_owned()), "a");
        store.set(ParamKey::Token, "b");
        assert_eq!(store.len(), 1);
        assert_eq!(store.token(), Some("b"));
    }

    #[test]
    fn test_is_protocol() {
        assert!(ParamKey::Verifier.is_protocol());
        assert!(!ParamKey::Scope.is_protocol());
        assert!(!ParamKey::from_name("alt").is_protocol());
    }

    #[test]
    fn test_absent_is_unset() {
        let mut store = ParameterStore::new();
        assert_eq!(store.consumer_key(), None);

        store.set_consumer_key("");
        assert_eq!(store.consumer_key(), Some(""));

        store.remove(&ParamKey::ConsumerKey);
        assert_eq!(store.consumer_key(), None);
    }

    #[test]
    fn test_set_replaces() {
        let mut store = ParameterStore::new();
        store.set_scope("one");
        store.set_scope("two");
        assert_eq!(store.scope(), Some("two"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_iteration_is_ordered_by_name() {
        let store: ParameterStore = [
            ("scope", "s"),
            ("oauth_version", "1.0"),
            ("hd", "example.com"),
            ("oauth_consumer_key", "key"),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = store.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["hd", "oauth_consumer_key", "oauth_version", "scope"]
        );
    }

    #[test]
    fn test_extra_params() {
        let mut store = ParameterStore::new();
        store.set_scope("s");
        store.set("alt", "json");
        store.set("xoauth_requestor_id", "user@example.com");

        let extras: Vec<(&str, &str)> = store.extra_params().collect();
        assert_eq!(
            extras,
            vec![("alt", "json"), ("xoauth_requestor_id", "user@example.com")]
        );
    }

    #[test]
    fn test_get_by_name() {
        let mut store = ParameterStore::new();
        store.set_hosted_domain("example.com");
        assert_eq!(store.get_by_name("hd"), Some("example.com"));
        assert_eq!(store.get_by_name("hl"), None);
    }
}
