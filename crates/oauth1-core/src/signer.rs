//! Signature methods: HMAC-SHA1 and (with the `rsa-sha1` feature) RSA-SHA1.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
#[cfg(feature = "rsa-sha1")]
use rsa::RsaPrivateKey;
#[cfg(feature = "rsa-sha1")]
use rsa::pkcs1v15::SigningKey;
#[cfg(feature = "rsa-sha1")]
use rsa::signature::{SignatureEncoding, Signer as _};
use sha1::Sha1;

use crate::encoding::{base64_encode, percent_encode};
use crate::error::{OAuthError, Result};

type HmacSha1 = Hmac<Sha1>;

/// `oauth_signature_method` value for HMAC-SHA1.
pub const SIGNATURE_METHOD_HMAC_SHA1: &str = "HMAC-SHA1";

/// `oauth_signature_method` value for RSA-SHA1.
#[cfg(feature = "rsa-sha1")]
pub const SIGNATURE_METHOD_RSA_SHA1: &str = "RSA-SHA1";

/// Supported signature methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMethod {
    HmacSha1,
    #[cfg(feature = "rsa-sha1")]
    RsaSha1,
}

impl SignatureMethod {
    /// Wire name of the method.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha1 => SIGNATURE_METHOD_HMAC_SHA1,
            #[cfg(feature = "rsa-sha1")]
            Self::RsaSha1 => SIGNATURE_METHOD_RSA_SHA1,
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureMethod {
    type Err = OAuthError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            SIGNATURE_METHOD_HMAC_SHA1 => Ok(Self::HmacSha1),
            #[cfg(feature = "rsa-sha1")]
            SIGNATURE_METHOD_RSA_SHA1 => Ok(Self::RsaSha1),
            other => Err(OAuthError::UnsupportedSignatureMethod(other.to_owned())),
        }
    }
}

/// Produces the Base64 `oauth_signature` value for a signature base string.
pub trait Signer {
    /// Method this signer implements.
    fn method(&self) -> SignatureMethod;

    /// Sign the base string and return the Base64-encoded signature.
    ///
    /// The result is not percent-encoded.
    fn sign(&self, base_string: &str) -> Result<String>;
}

/// HMAC-SHA1 keyed with `encode(consumer_secret)&encode(token_secret)`.
pub struct HmacSha1Signer {
    key: String,
}

impl HmacSha1Signer {
    /// An absent token secret contributes an empty string to the key.
    pub fn new(consumer_secret: &str, token_secret: Option<&str>) -> Self {
        Self {
            key: format!(
                "{}&{}",
                percent_encode(consumer_secret),
                percent_encode(token_secret.unwrap_or(""))
            ),
        }
    }
}

impl fmt::Debug for HmacSha1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSha1Signer")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl Signer for HmacSha1Signer {
    fn method(&self) -> SignatureMethod {
        SignatureMethod::HmacSha1
    }

    fn sign(&self, base_string: &str) -> Result<String> {
        let mut mac = HmacSha1::new_from_slice(self.key.as_bytes())
            .map_err(|e| OAuthError::Signing(e.to_string()))?;
        mac.update(base_string.as_bytes());
        Ok(base64_encode(&mac.finalize().into_bytes()))
    }
}

/// RSA-SHA1 (PKCS#1 v1.5 over the SHA-1 digest of the base string).
#[cfg(feature = "rsa-sha1")]
pub struct RsaSha1Signer {
    key: SigningKey<Sha1>,
}

#[cfg(feature = "rsa-sha1")]
impl RsaSha1Signer {
    pub fn new(private_key: RsaPrivateKey) -> Self {
        Self {
            key: SigningKey::<Sha1>::new(private_key),
        }
    }

    /// Parse a PKCS#8 or PKCS#1 PEM key.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let private_key = crate::key::load_private_key(pem.as_bytes())?;
        Ok(Self::new(private_key))
    }
}

#[cfg(feature = "rsa-sha1")]
impl fmt::Debug for RsaSha1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSha1Signer")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(feature = "rsa-sha1")]
impl Signer for RsaSha1Signer {
    fn method(&self) -> SignatureMethod {
        SignatureMethod::RsaSha1
    }

    fn sign(&self, base_string: &str) -> Result<String> {
        let signature = self
            .key
            .try_sign(base_string.as_bytes())
            .map_err(|e| OAuthError::Signing(e.to_string()))?;
        Ok(base64_encode(&signature.to_bytes()))
    }
}

/// Build the signer for `method`.
///
/// `private_key` is the consumer secret for HMAC-SHA1 and a PEM key for
/// RSA-SHA1. RSA-SHA1 ignores the token secret. The PEM key is parsed
/// on each call, so keep the returned signer when signing repeatedly.
pub fn signer_for(
    method: SignatureMethod,
    private_key: &str,
    token_secret: Option<&str>,
) -> Result<Box<dyn Signer>> {
    match method {
        SignatureMethod::HmacSha1 => Ok(Box::new(HmacSha1Signer::new(private_key, token_secret))),
        #[cfg(feature = "rsa-sha1")]
        SignatureMethod::RsaSha1 => Ok(Box::new(RsaSha1Signer::from_pem(private_key)?)),
    }
}
