//! Error types for OAuth 1.0a signing and token handling.

#[cfg(feature = "rsa-sha1")]
use std::str::Utf8Error;

/// Error from signing, authorization or token parsing.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// A parameter required for signing is not set.
    #[error("missing credentials: {0} is not set")]
    MissingCredentials(&'static str),

    /// Signature method is unknown or not compiled in.
    #[error("unsupported signature method: {0}")]
    UnsupportedSignatureMethod(String),

    /// RSA private key could not be parsed.
    #[cfg(feature = "rsa-sha1")]
    #[error("invalid private key")]
    InvalidPrivateKey(#[from] RsaKeyError),

    /// Signature computation failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Provider response contained no key/value pairs.
    #[error("malformed response: no key/value pairs found")]
    MalformedResponse,

    /// Resource access attempted without an access token.
    #[error("not authorized: access token has not been obtained")]
    NotAuthorized,

    /// Request URL cannot be normalized or rebuilt.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Authorization header value contains characters not allowed in headers.
    #[error("invalid Authorization header value")]
    InvalidHeader,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// RSA key loading/parsing error.
#[cfg(feature = "rsa-sha1")]
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RsaKeyError {
    /// Invalid UTF-8 in key data.
    #[error("invalid UTF-8 in key")]
    InvalidUtf8(#[from] Utf8Error),

    /// PKCS#1 key parsing error.
    #[error("PKCS#1 key error")]
    Pkcs1(#[from] rsa::pkcs1::Error),

    /// PKCS#8 key parsing error (returned when both formats fail).
    #[error("PKCS#8 key error")]
    Pkcs8(#[from] rsa::pkcs8::Error),
}

/// Result alias for OAuth operations.
pub type Result<T> = std::result::Result<T, OAuthError>;
