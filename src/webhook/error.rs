//! Error types for webhook verification and parsing.

use std::fmt;

use thiserror::Error;

/// The webhook body could not be parsed into a payload.
///
/// Raised for invalid JSON and for missing or mistyped required fields.
#[derive(Debug, Error)]
#[error("Invalid webhook payload: {source}")]
pub struct PayloadError {
    #[from]
    source: serde_json::Error,
}

impl PayloadError {
    /// Returns true if the body was not syntactically valid JSON.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        self.source.is_syntax() || self.source.is_eof()
    }

    /// Returns true if the JSON was valid but did not match the payload shape.
    #[must_use]
    pub fn is_data(&self) -> bool {
        self.source.is_data()
    }
}

/// Why [`construct_event`](super::construct_event) refused a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureFailure {
    /// Missing input, stale or malformed timestamp, or signature mismatch.
    Unverified,
    /// The signature was valid but the body is not a webhook payload.
    InvalidPayload,
}

impl fmt::Display for SignatureFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unverified => f.write_str("Webhook signature verification failed"),
            Self::InvalidPayload => f.write_str("Invalid webhook payload"),
        }
    }
}

/// A webhook that must not be trusted.
///
/// Both failure causes share this one error type so receivers have a single
/// "reject" path; [`failure`](Self::failure) tells them apart.
#[derive(Debug, Error)]
#[error("{failure}")]
pub struct WebhookSignatureError {
    failure: SignatureFailure,
    #[source]
    source: Option<PayloadError>,
}

impl WebhookSignatureError {
    /// Stable machine-readable code shared by every failure cause.
    pub const CODE: &'static str = "webhook_signature_error";

    pub(crate) const fn unverified() -> Self {
        Self {
            failure: SignatureFailure::Unverified,
            source: None,
        }
    }

    pub(crate) const fn invalid_payload(source: PayloadError) -> Self {
        Self {
            failure: SignatureFailure::InvalidPayload,
            source: Some(source),
        }
    }

    /// The failure cause.
    #[must_use]
    pub const fn failure(&self) -> SignatureFailure {
        self.failure
    }

    /// Always [`Self::CODE`].
    #[must_use]
    pub const fn code(&self) -> &'static str {
        Self::CODE
    }
}
