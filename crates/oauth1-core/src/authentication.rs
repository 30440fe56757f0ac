//! The [`Authentication`] aggregate and the four request-signing phases.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
#[cfg(feature = "rsa-sha1")]
use std::sync::OnceLock;

use ureq::http::Uri;

use crate::base_string::SignatureBaseStringBuilder;
use crate::clock::{ClockAndNonceSource, SystemClock};
use crate::encoding::percent_encode;
use crate::error::{OAuthError, Result};
use crate::params::{ParamKey, ParameterStore};
use crate::persistence::PersistedToken;
use crate::request::{SignableRequest, append_query, remove_query_params};
use crate::response::{dictionary_from_response_bytes, dictionary_from_response_str};
#[cfg(feature = "rsa-sha1")]
use crate::signer::RsaSha1Signer;
use crate::signer::{HmacSha1Signer, SignatureMethod, Signer};

/// Service provider label used by [`Authentication::for_installed_app`].
pub const SERVICE_PROVIDER_GOOGLE: &str = "Google";

/// Value of `oauth_version` set on construction.
pub const OAUTH_VERSION: &str = "1.0";

/// Consumer key and secret of installed applications.
const INSTALLED_APP_CREDENTIAL: &str = "anonymous";

/// Keys copied from a provider response into the parameter store.
const RESPONSE_KEYS: [ParamKey; 3] = [
    ParamKey::Token,
    ParamKey::TokenSecret,
    ParamKey::CallbackConfirmed,
];

const REQUEST_TOKEN_KEYS: &[ParamKey] = &[
    ParamKey::ConsumerKey,
    ParamKey::SignatureMethod,
    ParamKey::Callback,
    ParamKey::Timestamp,
    ParamKey::Nonce,
    ParamKey::Version,
];

const AUTHORIZE_TOKEN_KEYS: &[ParamKey] = &[ParamKey::Token];

const ACCESS_TOKEN_KEYS: &[ParamKey] = &[
    ParamKey::ConsumerKey,
    ParamKey::Token,
    ParamKey::SignatureMethod,
    ParamKey::Timestamp,
    ParamKey::Nonce,
    ParamKey::Version,
    ParamKey::Verifier,
];

const RESOURCE_KEYS: &[ParamKey] = &[
    ParamKey::ConsumerKey,
    ParamKey::Token,
    ParamKey::SignatureMethod,
    ParamKey::Timestamp,
    ParamKey::Nonce,
    ParamKey::Version,
];

const REQUEST_TOKEN_APP_KEYS: &[ParamKey] = &[ParamKey::Scope, ParamKey::DisplayName];

const AUTHORIZE_TOKEN_APP_KEYS: &[ParamKey] = &[
    ParamKey::HostedDomain,
    ParamKey::Language,
    ParamKey::Mobile,
];

/// Step of the three-legged token exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    RequestToken,
    AuthorizeToken,
    AccessToken,
    Resource,
}

impl Phase {
    const fn name(self) -> &'static str {
        match self {
            Self::RequestToken => "request_token",
            Self::AuthorizeToken => "authorize_token",
            Self::AccessToken => "access_token",
            Self::Resource => "resource",
        }
    }

    /// Protocol parameters the phase sends.
    const fn protocol_keys(self) -> &'static [ParamKey] {
        match self {
            Self::RequestToken => REQUEST_TOKEN_KEYS,
            Self::AuthorizeToken => AUTHORIZE_TOKEN_KEYS,
            Self::AccessToken => ACCESS_TOKEN_KEYS,
            Self::Resource => RESOURCE_KEYS,
        }
    }

    /// Known application parameters the phase sends in the URL query.
    const fn application_keys(self) -> &'static [ParamKey] {
        match self {
            Self::RequestToken => REQUEST_TOKEN_APP_KEYS,
            Self::AuthorizeToken => AUTHORIZE_TOKEN_APP_KEYS,
            Self::AccessToken | Self::Resource => &[],
        }
    }
}

/// Protocol and application parameters of one signed call.
struct SignedParams {
    /// Request URI without the parameters this call writes.
    uri: Uri,
    /// Sorted by name, `oauth_signature` last.
    protocol: Vec<(String, String)>,
    /// Always sent in the URL query.
    application: Vec<(String, String)>,
}

/// OAuth 1.0a client state for one session.
///
/// Holds the consumer credentials and the token being exchanged. Signing
/// methods take `&self`: each call draws its own timestamp and nonce from
/// the clock and never writes them back, so a shared instance can sign
/// concurrently. Mutation (setters, response parsing) needs `&mut self`.
///
/// `U` is an opaque caller payload the library never inspects.
///
/// # Example
///
/// ```
/// use oauth1_core::Authentication;
/// use ureq::http::Request;
///
/// let mut auth = Authentication::for_installed_app();
/// auth.params_mut().set_callback("oob");
///
/// let mut request = Request::get("https://www.google.com/accounts/OAuthGetRequestToken")
///     .body(Vec::<u8>::new())
///     .unwrap();
/// auth.add_request_token_header(&mut request).unwrap();
/// assert!(request.headers().contains_key("authorization"));
/// ```
#[derive(Clone)]
pub struct Authentication<U = ()> {
    params: ParameterStore,
    realm: Option<String>,
    private_key: String,
    service_provider: Option<String>,
    has_access_token: bool,
    clock: Arc<dyn ClockAndNonceSource>,
    /// Parsed from `private_key` on first RSA-SHA1 signing.
    #[cfg(feature = "rsa-sha1")]
    rsa_signer: OnceLock<Arc<RsaSha1Signer>>,
    user_data: Option<U>,
}

impl Authentication {
    /// Create an authentication object for the given consumer.
    ///
    /// `private_key` is the consumer secret for HMAC-SHA1, or a PEM encoded
    /// RSA key for RSA-SHA1. Version is preset to `1.0`.
    pub fn new(
        signature_method: SignatureMethod,
        consumer_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        let mut params = ParameterStore::new();
        params.set_signature_method(signature_method.as_str());
        params.set_consumer_key(consumer_key);
        params.set_version(OAUTH_VERSION);

        Self {
            params,
            realm: None,
            private_key: private_key.into(),
            service_provider: None,
            has_access_token: false,
            clock: Arc::new(SystemClock),
            #[cfg(feature = "rsa-sha1")]
            rsa_signer: OnceLock::new(),
            user_data: None,
        }
    }

    /// HMAC-SHA1 with `anonymous` as consumer key and secret.
    pub fn for_installed_app() -> Self {
        let mut auth = Self::new(
            SignatureMethod::HmacSha1,
            INSTALLED_APP_CREDENTIAL,
            INSTALLED_APP_CREDENTIAL,
        );
        auth.service_provider = Some(SERVICE_PROVIDER_GOOGLE.to_owned());
        auth
    }
}

impl<U> Authentication<U> {
    /// Replace the timestamp/nonce source.
    #[must_use]
    pub fn with_clock(mut self, clock: impl ClockAndNonceSource + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Attach a caller payload, changing the payload type.
    pub fn with_user_data<V>(self, user_data: V) -> Authentication<V> {
        Authentication {
            params: self.params,
            realm: self.realm,
            private_key: self.private_key,
            service_provider: self.service_provider,
            has_access_token: self.has_access_token,
            clock: self.clock,
            #[cfg(feature = "rsa-sha1")]
            rsa_signer: self.rsa_signer,
            user_data: Some(user_data),
        }
    }

    pub fn user_data(&self) -> Option<&U> {
        self.user_data.as_ref()
    }

    pub fn user_data_mut(&mut self) -> Option<&mut U> {
        self.user_data.as_mut()
    }

    pub fn set_user_data(&mut self, user_data: Option<U>) {
        self.user_data = user_data;
    }

    /// OAuth parameters.
    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }

    /// Realm placed in the `Authorization` header; never signed.
    pub fn realm(&self) -> Option<&str> {
        self.realm.as_deref()
    }

    pub fn set_realm(&mut self, realm: Option<String>) {
        self.realm = realm;
    }

    /// Consumer secret or PEM key. Never transmitted.
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn set_private_key(&mut self, private_key: impl Into<String>) {
        self.private_key = private_key.into();
        #[cfg(feature = "rsa-sha1")]
        {
            self.rsa_signer = OnceLock::new();
        }
    }

    /// Provider label such as `Google`; not used for signing.
    pub fn service_provider(&self) -> Option<&str> {
        self.service_provider.as_deref()
    }

    pub fn set_service_provider(&mut self, service_provider: Option<String>) {
        self.service_provider = service_provider;
    }

    /// Whether the stored token is an access token rather than a request token.
    pub fn has_access_token(&self) -> bool {
        self.has_access_token
    }

    pub fn set_has_access_token(&mut self, has_access_token: bool) {
        self.has_access_token = has_access_token;
    }

    /// The token, if it is an access token.
    pub fn access_token(&self) -> Option<&str> {
        if self.has_access_token {
            self.params.token()
        } else {
            None
        }
    }

    /// Store a previously authorized access token.
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.params.set_token(token);
        self.has_access_token = true;
    }

    /// Whether consumer key and signature method are both set.
    ///
    /// Says nothing about token state.
    pub fn can_authorize(&self) -> bool {
        self.params.consumer_key().is_some() && self.params.signature_method().is_some()
    }

    /// Sign a resource request with an `Authorization` header.
    ///
    /// Fails with [`OAuthError::NotAuthorized`] until an access token has
    /// been obtained.
    pub fn authorize_request<R: SignableRequest + ?Sized>(&self, request: &mut R) -> Result<()> {
        self.require_credentials()?;
        if !self.has_access_token {
            return Err(OAuthError::NotAuthorized);
        }
        self.apply_header(Phase::Resource, request)
    }

    /// Sign a request-token call with an `Authorization` header.
    ///
    /// Application parameters (scope, display name, extras) are signed and
    /// appended to the URL query.
    pub fn add_request_token_header<R: SignableRequest + ?Sized>(
        &self,
        request: &mut R,
    ) -> Result<()> {
        self.apply_header(Phase::RequestToken, request)
    }

    /// Sign a request-token call with all parameters in the URL query.
    pub fn add_request_token_params<R: SignableRequest + ?Sized>(
        &self,
        request: &mut R,
    ) -> Result<()> {
        self.apply_params(Phase::RequestToken, request)
    }

    /// Add the request token (and `hd`/`hl`/`btmpl`) to the user's
    /// authorization redirect. Nothing is signed.
    pub fn add_authorize_token_params<R: SignableRequest + ?Sized>(
        &self,
        request: &mut R,
    ) -> Result<()> {
        let uri = self.authorize_token_uri(request.uri())?;
        request.set_uri(uri);
        Ok(())
    }

    /// The authorization redirect URL for `uri`.
    pub fn authorize_token_uri(&self, uri: &Uri) -> Result<Uri> {
        self.require_token(Phase::AuthorizeToken)?;
        let mut pairs = self.protocol_params(Phase::AuthorizeToken, "", "");
        pairs.extend(self.application_params(Phase::AuthorizeToken));
        let uri = remove_query_params(uri, |name| pairs.iter().any(|(k, _)| k == name))?;
        append_query(&uri, &pairs)
    }

    /// Sign an access-token call with an `Authorization` header.
    pub fn add_access_token_header<R: SignableRequest + ?Sized>(
        &self,
        request: &mut R,
    ) -> Result<()> {
        self.apply_header(Phase::AccessToken, request)
    }

    /// Sign an access-token call with all parameters in the URL query.
    pub fn add_access_token_params<R: SignableRequest + ?Sized>(
        &self,
        request: &mut R,
    ) -> Result<()> {
        self.apply_params(Phase::AccessToken, request)
    }

    /// Sign a resource request with an `Authorization` header.
    ///
    /// Unlike [`authorize_request`](Self::authorize_request), this does not
    /// check [`has_access_token`](Self::has_access_token).
    pub fn add_resource_token_header<R: SignableRequest + ?Sized>(
        &self,
        request: &mut R,
    ) -> Result<()> {
        self.apply_header(Phase::Resource, request)
    }

    /// Sign a resource request with all parameters in the URL query.
    pub fn add_resource_token_params<R: SignableRequest + ?Sized>(
        &self,
        request: &mut R,
    ) -> Result<()> {
        self.apply_params(Phase::Resource, request)
    }

    /// Copy `oauth_token`, `oauth_token_secret` and
    /// `oauth_callback_confirmed` from a response body.
    pub fn set_keys_for_response_str(&mut self, body: &str) {
        let dict = dictionary_from_response_str(body);
        self.copy_response_keys(&dict);
    }

    /// Same as [`set_keys_for_response_str`](Self::set_keys_for_response_str)
    /// for raw bytes.
    pub fn set_keys_for_response_data(&mut self, data: &[u8]) {
        let dict = dictionary_from_response_bytes(data);
        self.copy_response_keys(&dict);
    }

    /// `oauth_token=...&oauth_token_secret=...` for external storage.
    ///
    /// `None` when no token is set.
    pub fn persistence_response_string(&self) -> Option<String> {
        PersistedToken::from_params(&self.params).serialize()
    }

    /// Restore the token and secret from a persistence string.
    ///
    /// Previous token fields are cleared first; a restored token is treated
    /// as an access token.
    pub fn restore_from_persistence(&mut self, text: &str) {
        let persisted = PersistedToken::parse(text);
        self.params.remove(&ParamKey::Token);
        self.params.remove(&ParamKey::TokenSecret);

        let restored = persisted.token.is_some();
        if let Some(token) = persisted.token {
            self.params.set_token(token);
        }
        if let Some(secret) = persisted.token_secret {
            self.params.set_token_secret(secret);
        }
        self.has_access_token = restored;
        tracing::debug!(restored, "Restored persisted token");
    }

    fn copy_response_keys(&mut self, dict: &HashMap<String, String>) {
        let mut copied = 0;
        for key in RESPONSE_KEYS {
            if let Some(value) = dict.get(key.as_str()) {
                self.params.set(key, value.clone());
                copied += 1;
            }
        }
        tracing::debug!(copied, total = dict.len(), "Applied provider response");
    }

    fn require_credentials(&self) -> Result<SignatureMethod> {
        if self.params.consumer_key().is_none() {
            return Err(OAuthError::MissingCredentials("oauth_consumer_key"));
        }
        self.params
            .signature_method()
            .ok_or(OAuthError::MissingCredentials("oauth_signature_method"))?
            .parse()
    }

    fn require_token(&self, phase: Phase) -> Result<()> {
        if phase != Phase::RequestToken && self.params.token().is_none() {
            return Err(OAuthError::MissingCredentials("oauth_token"));
        }
        Ok(())
    }

    /// Protocol parameters present in the store, with the given timestamp
    /// and nonce, sorted by name.
    fn protocol_params(&self, phase: Phase, timestamp: &str, nonce: &str) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = phase
            .protocol_keys()
            .iter()
            .filter_map(|key| {
                let value = match key {
                    ParamKey::Timestamp => Some(timestamp),
                    ParamKey::Nonce => Some(nonce),
                    key => self.params.get(key),
                };
                value.map(|v| (key.as_str().to_owned(), v.to_owned()))
            })
            .collect();
        pairs.sort();
        pairs
    }

    /// Non-protocol parameters the phase sends in the URL query.
    fn application_params(&self, phase: Phase) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = phase
            .application_keys()
            .iter()
            .filter_map(|key| {
                self.params
                    .get(key)
                    .map(|v| (key.as_str().to_owned(), v.to_owned()))
            })
            .collect();

        if phase == Phase::RequestToken {
            pairs.extend(
                self.params
                    .extra_params()
                    .map(|(k, v)| (k.to_owned(), v.to_owned())),
            );
        }
        pairs
    }

    /// Compute the signature for `phase` over the request as it is now.
    fn sign_phase<R: SignableRequest + ?Sized>(
        &self,
        phase: Phase,
        request: &R,
    ) -> Result<SignedParams> {
        let method = self.require_credentials()?;
        self.require_token(phase)?;

        match phase {
            Phase::Resource if !self.has_access_token => {
                tracing::warn!("Signing resource request without an access token");
            }
            Phase::AccessToken if self.has_access_token => {
                tracing::warn!("Exchanging a token that is already an access token");
            }
            _ => {}
        }

        let timestamp = self.clock.timestamp();
        let nonce = self.clock.nonce();
        let mut protocol = self.protocol_params(phase, &timestamp, &nonce);
        let application = self.application_params(phase);

        // Signing the same request again replaces what the last call wrote
        let uri = remove_query_params(request.uri(), |name| {
            ParamKey::from_name(name).is_protocol() || application.iter().any(|(k, _)| k == name)
        })?;

        let base_string = SignatureBaseStringBuilder::new(request.method(), &uri)?
            .params(request.form_params())
            .params(protocol.iter().cloned())
            .params(application.iter().cloned())
            .build();
        tracing::debug!(phase = phase.name(), %method, base_string = %base_string, "Built signature base string");

        // The request token call happens before any token secret exists
        let token_secret = match phase {
            Phase::RequestToken => None,
            _ => self.params.token_secret(),
        };
        let signature = match method {
            SignatureMethod::HmacSha1 => {
                HmacSha1Signer::new(&self.private_key, token_secret).sign(&base_string)?
            }
            #[cfg(feature = "rsa-sha1")]
            SignatureMethod::RsaSha1 => self.rsa_signer()?.sign(&base_string)?,
        };
        protocol.push((ParamKey::Signature.as_str().to_owned(), signature));

        Ok(SignedParams {
            uri,
            protocol,
            application,
        })
    }

    /// The RSA signer for `private_key`, parsed once and then reused.
    #[cfg(feature = "rsa-sha1")]
    fn rsa_signer(&self) -> Result<&RsaSha1Signer> {
        if let Some(signer) = self.rsa_signer.get() {
            return Ok(signer.as_ref());
        }
        let signer = Arc::new(RsaSha1Signer::from_pem(&self.private_key)?);
        tracing::debug!("Parsed RSA private key");
        Ok(self.rsa_signer.get_or_init(|| signer).as_ref())
    }

    fn apply_header<R: SignableRequest + ?Sized>(&self, phase: Phase, request: &mut R) -> Result<()> {
        let signed = self.sign_phase(phase, request)?;
        let header = self.authorization_header(&signed.protocol);
        let uri = append_query(&signed.uri, &signed.application)?;

        request.set_authorization(&header)?;
        request.set_uri(uri);
        Ok(())
    }

    fn apply_params<R: SignableRequest + ?Sized>(&self, phase: Phase, request: &mut R) -> Result<()> {
        let SignedParams {
            uri,
            mut protocol,
            application,
        } = self.sign_phase(phase, request)?;
        protocol.extend(application);

        let uri = append_query(&uri, &protocol)?;
        request.set_uri(uri);
        Ok(())
    }

    /// `OAuth realm="...", key="value", ...` with every value percent-encoded.
    fn authorization_header(&self, protocol: &[(String, String)]) -> String {
        let realm = self
            .realm
            .iter()
            .map(|realm| format!("realm=\"{}\"", percent_encode(realm)));
        let params = protocol
            .iter()
            .map(|(k, v)| format!("{k}=\"{}\"", percent_encode(v)));

        format!("OAuth {}", realm.chain(params).collect::<Vec<_>>().join(", "))
    }
}

impl<U> fmt::Debug for Authentication<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<(&str, &str)> = self
            .params
            .iter()
            .map(|(k, v)| {
                let v = if *k == ParamKey::TokenSecret { "[REDACTED]" } else { v };
                (k.as_str(), v)
            })
            .collect();

        f.debug_struct("Authentication")
            .field("params", &params)
            .field("realm", &self.realm)
            .field("private_key", &"[REDACTED]")
            .field("service_provider", &self.service_provider)
            .field("has_access_token", &self.has_access_token)
            .field("has_user_data", &self.user_data.is_some())
            .finish_non_exhaustive()
    }
}
