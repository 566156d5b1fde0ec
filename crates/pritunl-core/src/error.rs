//! Error types for Pritunl operations.
//!
//! Every remote call is classified into one of three outcomes besides success:
//! no response at all ([`Error::Request`]), a response with a status other than
//! 200 ([`Error::UnexpectedStatus`]) or a 200 whose body does not match the
//! expected shape ([`Error::Decode`]). Client-side precondition failures are
//! reported as [`Error::Validation`] before anything is sent.

use thiserror::Error;

/// Main error type for Pritunl operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request produced no response (DNS, connect, TLS, timeout, body read).
    #[error("{operation}: error on HTTP request: {message}")]
    Request {
        /// Operation that issued the request
        operation: &'static str,
        /// Underlying transport error
        message: String,
    },

    /// The server answered with a status other than 200.
    #[error("{operation}: unexpected response status {status}\nbody={body}")]
    UnexpectedStatus {
        /// Operation that issued the request
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The server answered 200 but the body did not decode.
    #[error("{operation}: failed to decode response: {message}\nbody={body}")]
    Decode {
        /// Operation that issued the request
        operation: &'static str,
        /// Decoder error
        message: String,
        /// Raw response body
        body: String,
    },

    /// The request body could not be serialized.
    #[error("{operation}: failed to encode request body: {message}")]
    Encode {
        /// Operation that built the body
        operation: &'static str,
        /// Serializer error
        message: String,
    },

    /// A client-side precondition was violated; nothing was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A list-then-filter lookup found no entry with the requested id.
    #[error("{operation}: {resource} {id} not found")]
    NotFound {
        /// Operation that performed the lookup
        operation: &'static str,
        /// Resource kind (e.g. "link")
        resource: &'static str,
        /// Requested identifier
        id: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Invalid resource identifier
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}

/// Specialized result type for Pritunl operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds a [`Error::Request`] from a transport error.
    #[must_use]
    pub fn request(operation: &'static str, err: &reqwest::Error) -> Self {
        Self::Request {
            operation,
            message: err.to_string(),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Request { .. } => "REQUEST_FAILED",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::Decode { .. } => "DECODE_FAILED",
            Self::Encode { .. } => "ENCODE_FAILED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidId(_) => "INVALID_ID",
        }
    }

    /// Name of the client operation that failed, when known.
    #[must_use]
    pub const fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Request { operation, .. }
            | Self::UnexpectedStatus { operation, .. }
            | Self::Decode { operation, .. }
            | Self::Encode { operation, .. }
            | Self::NotFound { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// HTTP status of the offending response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Decode { .. } => Some(200),
            _ => None,
        }
    }

    /// Raw response body, if one was received.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::UnexpectedStatus { body, .. } | Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// True for both a remote 404 and a local list-then-filter miss.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::UnexpectedStatus { status: 404, .. }
        )
    }

    /// True when the server rejected the token or signature.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { status: 401, .. })
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Config(err.to_string())
        } else {
            Self::request("http", &err)
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Config(err.to_string())
    }
}
