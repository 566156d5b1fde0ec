//! Request signing for the Pritunl management API.
//!
//! Pritunl authenticates API calls with four headers. The signature is an
//! HMAC-SHA256 over `token&timestamp&nonce&METHOD&path`, keyed with the API
//! secret and base64 encoded. The timestamp and nonce make each signature
//! unique per request; the server rejects stale timestamps and replayed nonces.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::fmt;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Header carrying the API token.
pub const AUTH_TOKEN_HEADER: &str = "Auth-Token";
/// Header carrying the unix timestamp (seconds).
pub const AUTH_TIMESTAMP_HEADER: &str = "Auth-Timestamp";
/// Header carrying the per-request nonce.
pub const AUTH_NONCE_HEADER: &str = "Auth-Nonce";
/// Header carrying the request signature.
pub const AUTH_SIGNATURE_HEADER: &str = "Auth-Signature";

/// Signs outbound requests with an API token and secret.
pub struct RequestSigner {
    token: String,
    secret: SecretString,
}

impl RequestSigner {
    /// Create a signer from an API token and secret.
    #[must_use]
    pub fn new(token: impl Into<String>, secret: SecretString) -> Self {
        Self {
            token: token.into(),
            secret,
        }
    }

    /// Returns the API token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Sign a request using the current time and a fresh random nonce.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be used as a header value.
    pub fn sign(&self, method: &Method, path: &str) -> Result<AuthHeaders> {
        let timestamp = chrono::Utc::now().timestamp();
        let nonce = Uuid::new_v4().simple().to_string();
        self.sign_with(method, path, timestamp, &nonce)
    }

    /// Sign a request with an explicit timestamp and nonce.
    ///
    /// The output is fully determined by the inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be used as a header value.
    pub fn sign_with(
        &self,
        method: &Method,
        path: &str,
        timestamp: i64,
        nonce: &str,
    ) -> Result<AuthHeaders> {
        let timestamp = timestamp.to_string();
        let auth_string = [
            self.token.as_str(),
            timestamp.as_str(),
            nonce,
            method.as_str(),
            path,
        ]
        .join("&");

        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| Error::Config(format!("Invalid API secret: {e}")))?;
        mac.update(auth_string.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        Ok(AuthHeaders {
            token: self.token.clone(),
            timestamp,
            nonce: nonce.to_string(),
            signature,
        })
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("token", &self.token)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// The set of `Auth-*` headers for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    /// API token
    pub token: String,
    /// Unix timestamp in seconds
    pub timestamp: String,
    /// Random nonce
    pub nonce: String,
    /// Base64 HMAC-SHA256 signature
    pub signature: String,
}

impl AuthHeaders {
    /// Convert into a header map ready to attach to a request.
    ///
    /// # Errors
    ///
    /// Returns an error if any value contains characters not allowed in headers.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::with_capacity(4);
        for (name, value) in [
            (AUTH_TOKEN_HEADER, &self.token),
            (AUTH_TIMESTAMP_HEADER, &self.timestamp),
            (AUTH_NONCE_HEADER, &self.nonce),
            (AUTH_SIGNATURE_HEADER, &self.signature),
        ] {
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Config(format!("Invalid {name} header value: {e}")))?;
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("Invalid header name {name}: {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}
