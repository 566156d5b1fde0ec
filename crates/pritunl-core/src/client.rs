//! Signed HTTP client for the Pritunl API.
//!
//! [`ServiceClient`] owns the underlying `reqwest` client, the base URL and the
//! request signer. Every request it sends carries fresh `Auth-*` headers. The
//! response body is always read in full, so callers can embed it in errors.
//!
//! There is no retry, caching or rate limiting here; each call performs
//! exactly one HTTP round-trip.

use crate::auth::RequestSigner;
use crate::config::PritunlConfig;
use crate::error::{Error, Result};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

const JSON: &str = "application/json";

/// HTTP client configuration.
///
/// Configures HTTP engine behavior: timeouts, connection pooling and logging.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: None,
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    base_url: Url,
    signer: Option<Arc<RequestSigner>>,
    http_config: ClientConfig,
    user_agent: Option<String>,
    tls_verify: bool,
}

impl ServiceClientBuilder {
    /// Create a builder for the specified base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or cannot carry a path.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }

        Ok(Self {
            base_url,
            signer: None,
            http_config: ClientConfig::default(),
            user_agent: None,
            tls_verify: true,
        })
    }

    /// Create a builder from a validated [`PritunlConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL is invalid.
    pub fn from_config(config: PritunlConfig) -> Result<Self> {
        let mut http_config = ClientConfig::default();
        if let Some(timeout) = config.timeout() {
            http_config = http_config.with_timeout(timeout);
        }

        Ok(Self::new(&config.url)?
            .with_credentials(config.token, config.secret)
            .with_tls_verify(!config.insecure)
            .with_http_config(http_config))
    }

    /// Sign every request with the given API token and secret.
    #[must_use]
    pub fn with_credentials(mut self, token: impl Into<String>, secret: SecretString) -> Self {
        self.signer = Some(Arc::new(RequestSigner::new(token, secret)));
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let mut builder = reqwest::Client::builder()
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .gzip(self.http_config.enable_compression)
            .danger_accept_invalid_certs(!self.tls_verify);

        if let Some(timeout) = self.http_config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        if !self.tls_verify {
            tracing::warn!(base_url = %self.base_url, "TLS certificate verification disabled");
        }

        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(ServiceClient {
            http,
            base_url: self.base_url,
            signer: self.signer,
            config: self.http_config,
        })
    }
}

/// HTTP client bound to one Pritunl server.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: Url,
    signer: Option<Arc<RequestSigner>>,
    config: ClientConfig,
}

impl ServiceClient {
    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments against the base URL.
    ///
    /// Each segment is percent-encoded on its own, so identifiers can never
    /// escape their position in the path.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::InvalidEndpoint(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a signed request and read the full response.
    ///
    /// Only transport failures are errors here; status classification is left
    /// to [`RawResponse`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the body cannot be serialized and
    /// [`Error::Request`] if no response could be obtained.
    pub async fn execute<B>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
        params: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let mut url = self.endpoint(segments)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(ACCEPT, HeaderValue::from_static(JSON))
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON));

        if let Some(payload) = body {
            let bytes = serde_json::to_vec(payload).map_err(|e| Error::Encode {
                operation,
                message: e.to_string(),
            })?;
            request = request.body(bytes);
        }

        if let Some(signer) = &self.signer {
            let headers = signer.sign(&method, url.path())?.to_header_map()?;
            request = request.headers(headers);
        }

        if self.config.enable_logging {
            tracing::debug!(operation, %method, %url, "sending Pritunl API request");
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::request(operation, &e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::request(operation, &e))?;

        if self.config.enable_logging {
            if status == StatusCode::OK {
                tracing::debug!(operation, status = status.as_u16(), "Pritunl API response");
            } else {
                tracing::warn!(operation, status = status.as_u16(), "Pritunl API returned non-200 status");
            }
        }

        Ok(RawResponse {
            operation,
            status,
            body,
            logging: self.config.enable_logging,
        })
    }
}

/// A fully-read response awaiting classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    operation: &'static str,
    status: StatusCode,
    body: String,
    logging: bool,
}

impl RawResponse {
    /// Construct a response by hand (tests and adapters).
    #[must_use]
    pub fn new(operation: &'static str, status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            operation,
            status,
            body: body.into(),
            logging: true,
        }
    }

    /// Enable or disable the decode-failure log.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.logging = enabled;
        self
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Fail unless the status is exactly 200.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedStatus`] carrying the raw body.
    pub fn ensure_ok(self) -> Result<Self> {
        if self.status == StatusCode::OK {
            Ok(self)
        } else {
            Err(Error::UnexpectedStatus {
                operation: self.operation,
                status: self.status.as_u16(),
                body: self.body,
            })
        }
    }

    /// Check the status and decode the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedStatus`] for a non-200 status and
    /// [`Error::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        self.json_with_body().map(|(value, _)| value)
    }

    /// Like [`RawResponse::json`], but also hands back the raw body.
    ///
    /// # Errors
    ///
    /// Same as [`RawResponse::json`].
    pub fn json_with_body<T: DeserializeOwned>(self) -> Result<(T, String)> {
        let response = self.ensure_ok()?;
        match serde_json::from_str(&response.body) {
            Ok(value) => Ok((value, response.body)),
            Err(e) => {
                if response.logging {
                    tracing::warn!(
                        operation = response.operation,
                        error = %e,
                        "failed to decode Pritunl API response"
                    );
                }
                Err(Error::Decode {
                    operation: response.operation,
                    message: e.to_string(),
                    body: response.body,
                })
            }
        }
    }
}
