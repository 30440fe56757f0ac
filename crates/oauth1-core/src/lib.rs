//! OAuth 1.0a client-side request signing.
//!
//! This crate computes everything an OAuth 1.0a consumer has to attach to
//! its HTTP requests, without performing any I/O:
//! - [`Authentication`]: credentials, token state and the four signing phases
//!   (request token, authorize token, access token, resource access)
//! - [`SignatureBaseStringBuilder`]: canonical string that gets signed
//! - [`Signer`] implementations for HMAC-SHA1 and RSA-SHA1
//! - [`dictionary_from_response_str`]: parser for form-encoded provider responses
//! - [`PersistedToken`]: `oauth_token=...&oauth_token_secret=...` persistence
//!
//! RSA-SHA1 support is behind the `rsa-sha1` feature (enabled by default).
//!
//! # Token exchange
//!
//! ```ignore
//! use oauth1_core::Authentication;
//! use ureq::http::Request;
//!
//! let mut auth = Authentication::for_installed_app();
//! auth.params_mut().set_scope("https://www.google.com/calendar/feeds/");
//! auth.params_mut().set_callback("oob");
//!
//! let mut request = Request::get(REQUEST_TOKEN_URL).body(Vec::new())?;
//! auth.add_request_token_header(&mut request)?;
//! // ... send it, then:
//! auth.set_keys_for_response_str(&body);
//! ```

// Errors
pub mod error;
pub use error::{OAuthError, Result};
#[cfg(feature = "rsa-sha1")]
pub use error::RsaKeyError;

// Encoding helpers
mod encoding;
pub use encoding::{base64_encode, percent_decode, percent_encode};

// Parameters
mod params;
pub use params::{ParamKey, ParameterStore};

// Timestamp and nonce
mod clock;
pub use clock::{ClockAndNonceSource, FixedClock, SystemClock};

// Signing
mod base_string;
pub use base_string::{SignatureBaseStringBuilder, normalize_url};

#[cfg(feature = "rsa-sha1")]
mod key;
#[cfg(feature = "rsa-sha1")]
pub use key::{load_private_key, read_private_key};

mod signer;
pub use signer::{HmacSha1Signer, SIGNATURE_METHOD_HMAC_SHA1, SignatureMethod, Signer, signer_for};
#[cfg(feature = "rsa-sha1")]
pub use signer::{RsaSha1Signer, SIGNATURE_METHOD_RSA_SHA1};

// Request integration
mod request;
pub use request::SignableRequest;

// Responses and persistence
mod response;
pub use response::{dictionary_from_response_bytes, dictionary_from_response_str, parse_response};

mod persistence;
pub use persistence::PersistedToken;

// Authentication state
mod authentication;
pub use authentication::{Authentication, OAUTH_VERSION, SERVICE_PROVIDER_GOOGLE};
