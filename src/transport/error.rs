//! Error types for the transport layer.
//!
//! [`HttpError`] describes a failure of the underlying HTTP capability
//! (no response was received). [`ApiError`] is the single structured
//! failure value returned to callers of [`Transport::execute`].
//!
//! [`Transport::execute`]: super::Transport::execute

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured per-attempt timeout.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    ///
    /// This typically indicates a configuration error rather than
    /// a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The client was closed before the request was issued.
    #[error("Client is closed")]
    Closed,
}

impl HttpError {
    /// Returns true if the failure is potentially transient.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout => true,
            Self::InvalidUrl(_) | Self::Closed => false,
        }
    }
}

/// Classification of a failed API call.
///
/// Derived deterministically from the HTTP status code, or
/// [`ApiErrorKind::Network`] when no response was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 400: request parameters were rejected.
    Validation,
    /// 401: the API key is invalid or missing.
    Authentication,
    /// 403: access denied.
    Forbidden,
    /// 404: resource not found.
    NotFound,
    /// 409: idempotency key conflicts with an existing resource.
    Idempotency,
    /// 429: rate limit exceeded.
    RateLimit,
    /// Any other non-success status, 5xx included.
    Api,
    /// No response at all (connection, timeout, closed client).
    Network,
}

impl ApiErrorKind {
    /// Returns the stable machine-readable code for this kind.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::Authentication => "authentication_error",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Idempotency => "idempotency_error",
            Self::RateLimit => "rate_limit_error",
            Self::Api => "api_error",
            Self::Network => "network_error",
        }
    }

    /// Maps an HTTP status code to its error kind.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 => Self::Validation,
            401 => Self::Authentication,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Idempotency,
            429 => Self::RateLimit,
            _ => Self::Api,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Rate-limit details attached to a 429 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimitInfo {
    /// Value of the reset header, treated as an opaque integer.
    pub retry_after: Option<i64>,
    /// Whether the daily quota (rather than the burst limit) was exceeded.
    pub is_daily: bool,
}

/// A failed API call.
///
/// Every failure surfaced by the transport is one of these, distinguishable
/// by [`ApiError::kind`]. Transport-level failures carry status 0 and the
/// underlying [`HttpError`] as their source.
#[derive(Debug, Error)]
#[error("{kind}: {message} (status {status})")]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    status: u16,
    details: Option<Vec<Value>>,
    rate_limit: Option<RateLimitInfo>,
    #[source]
    source: Option<HttpError>,
}

impl ApiError {
    /// Creates an error of the given kind.
    #[must_use]
    pub fn new(kind: ApiErrorKind, message: impl Into<String>, status: u16) -> Self {
        Self {
            kind,
            message: message.into(),
            status,
            details: None,
            rate_limit: None,
            source: None,
        }
    }

    /// Creates a `network_error` for a request that never produced a response.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message, 0)
    }

    /// Attaches structured validation details.
    #[must_use]
    pub fn with_details(mut self, details: Vec<Value>) -> Self {
        self.details = Some(details);
        self
    }

    /// Attaches rate-limit information.
    #[must_use]
    pub const fn with_rate_limit(mut self, info: RateLimitInfo) -> Self {
        self.rate_limit = Some(info);
        self
    }

    /// The error classification.
    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// Stable machine-readable code, e.g. `"not_found"`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Human-readable message from the server or the transport.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code, or 0 when no response was received.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Structured validation issues from a 400 response body.
    #[must_use]
    pub fn details(&self) -> Option<&[Value]> {
        self.details.as_deref()
    }

    /// Rate-limit information from a 429 response.
    #[must_use]
    pub const fn rate_limit(&self) -> Option<&RateLimitInfo> {
        self.rate_limit.as_ref()
    }

    /// Seconds (or epoch) from the rate-limit reset header, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<i64> {
        self.rate_limit.and_then(|info| info.retry_after)
    }

    /// Whether the daily quota was exceeded.
    #[must_use]
    pub fn is_daily_limit(&self) -> bool {
        self.rate_limit.is_some_and(|info| info.is_daily)
    }
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        Self {
            message: err.to_string(),
            source: Some(err),
            ..Self::network(String::new())
        }
    }
}

/// The credential cannot be sent as an HTTP header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidCredential {
    /// The key is empty.
    #[error("API key is empty")]
    Empty,

    /// The key contains characters that are not allowed in a header value.
    #[error("API key contains characters not allowed in an HTTP header")]
    NotHeaderSafe,
}
