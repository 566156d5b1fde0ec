//! Configuration for connecting to a Pritunl server.
//!
//! This module provides the connection settings (base URL, API credentials and
//! TLS policy) together with validation and environment loading.

use crate::Error;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Environment variable holding the Pritunl base URL.
pub const ENV_URL: &str = "PRITUNL_URL";
/// Environment variable holding the API token.
pub const ENV_TOKEN: &str = "PRITUNL_TOKEN";
/// Environment variable holding the API secret.
pub const ENV_SECRET: &str = "PRITUNL_SECRET";
/// Environment variable toggling certificate verification off.
pub const ENV_INSECURE: &str = "PRITUNL_INSECURE";

/// Connection settings for a Pritunl client.
#[derive(Debug, Validate)]
pub struct PritunlConfig {
    /// Pritunl base URL (e.g. `https://vpn.example.com`)
    #[validate(url)]
    pub url: String,

    /// API token
    #[validate(length(min = 1))]
    pub token: String,

    /// API secret
    pub secret: SecretString,

    /// Skip TLS certificate verification (self-signed lab deployments)
    pub insecure: bool,

    /// Optional per-request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: Option<u64>,
}

impl PritunlConfig {
    /// Create a new configuration with required parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the token is empty.
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, Error> {
        let config = Self {
            url: url.into(),
            token: token.into(),
            secret: SecretString::from(secret.into()),
            insecure: false,
            request_timeout_secs: None,
        };

        config
            .validate()
            .map_err(|e| Error::Config(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Load the configuration from `PRITUNL_URL`, `PRITUNL_TOKEN`,
    /// `PRITUNL_SECRET` and the optional `PRITUNL_INSECURE`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing or a value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::Config(format!("{key} is not set")))
        };

        let insecure = match lookup(ENV_INSECURE) {
            Some(value) => parse_flag(&value)
                .ok_or_else(|| Error::Config(format!("{ENV_INSECURE} has invalid value {value:?}")))?,
            None => false,
        };

        Ok(Self::new(required(ENV_URL)?, required(ENV_TOKEN)?, required(ENV_SECRET)?)?
            .with_insecure(insecure))
    }

    /// Set whether to skip TLS certificate verification.
    #[must_use]
    pub const fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Get the request timeout as a Duration, if set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Parse and validate the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_url(&self) -> Result<Url, Error> {
        Url::parse(&self.url).map_err(|e| Error::Config(format!("Invalid Pritunl URL: {e}")))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
