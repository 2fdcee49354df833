//! Verified webhook construction.

use std::ops::Deref;

use http::HeaderMap;
use tracing::debug;

use crate::time::{Clock, SystemClock};

use super::diagnostics::{DiagnosticSink, TracingSink};
use super::error::{PayloadError, WebhookSignatureError};
use super::payload::{WebhookPayload, parse_with_sink};
use super::signature::{DEFAULT_TOLERANCE_SECS, SIGNATURE_HEADER, TIMESTAMP_HEADER, verify_at};

/// A webhook payload whose signature and timestamp were checked.
///
/// Only [`WebhookVerifier::construct_event`] (and the free
/// [`construct_event`]) produce one, so holding a `WebhookEvent` means the
/// body came from someone who knows the secret within the replay window.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    payload: WebhookPayload,
}

impl WebhookEvent {
    /// The verified payload.
    #[must_use]
    pub const fn payload(&self) -> &WebhookPayload {
        &self.payload
    }

    /// Unwraps the verified payload.
    #[must_use]
    pub fn into_payload(self) -> WebhookPayload {
        self.payload
    }
}

impl Deref for WebhookEvent {
    type Target = WebhookPayload;

    fn deref(&self) -> &Self::Target {
        &self.payload
    }
}

/// Verifies and parses webhooks against an injected clock.
///
/// # Type Parameters
///
/// - `C`: Source of "now" for the replay window
/// - `D`: Receiver of non-fatal parse diagnostics
///
/// # Example
///
/// ```
/// use payzcore::time::FixedClock;
/// use payzcore::webhook::{WebhookVerifier, compute_signature};
///
/// let body = br#"{"event":"payment.completed","payment_id":"pay_1","external_ref":"o1",
///     "network":"TRC20","address":"T1","expected_amount":"10.00","paid_amount":"10.00",
///     "status":"paid","timestamp":"2024-01-01T00:00:00Z"}"#;
/// let ts = "2024-01-01T00:00:00Z";
/// let sig = compute_signature("whsec_test", ts, body);
///
/// let verifier = WebhookVerifier::new().with_clock(FixedClock::from_unix_secs(1_704_067_200));
/// let event = verifier.construct_event(body, &sig, "whsec_test", Some(ts)).unwrap();
/// assert_eq!(event.payment_id, "pay_1");
/// ```
#[derive(Debug, Clone)]
pub struct WebhookVerifier<C = SystemClock, D = TracingSink> {
    clock: C,
    sink: D,
    tolerance_secs: u64,
}

impl WebhookVerifier {
    /// Creates a verifier using the system clock, tracing diagnostics and a
    /// five-minute replay window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clock: SystemClock,
            sink: TracingSink,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

impl Default for WebhookVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, D> WebhookVerifier<C, D>
where
    C: Clock,
    D: DiagnosticSink,
{
    /// Replaces the clock.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> WebhookVerifier<C2, D> {
        WebhookVerifier {
            clock,
            sink: self.sink,
            tolerance_secs: self.tolerance_secs,
        }
    }

    /// Replaces the diagnostic sink.
    #[must_use]
    pub fn with_sink<D2: DiagnosticSink>(self, sink: D2) -> WebhookVerifier<C, D2> {
        WebhookVerifier {
            clock: self.clock,
            sink,
            tolerance_secs: self.tolerance_secs,
        }
    }

    /// Sets the replay window in seconds.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance_secs: u64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Returns the replay window in seconds.
    #[must_use]
    pub const fn tolerance_secs(&self) -> u64 {
        self.tolerance_secs
    }

    /// Checks a signature without parsing the body.
    ///
    /// Returns false for any missing, stale, malformed or mismatching input.
    #[must_use]
    pub fn verify_signature(
        &self,
        body: &[u8],
        signature: &str,
        secret: &str,
        timestamp: Option<&str>,
    ) -> bool {
        verify_at(
            body,
            signature,
            secret,
            timestamp,
            self.tolerance_secs,
            self.clock.now(),
        )
    }

    /// Parses a body without checking its signature.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if the body is not JSON or lacks a required
    /// field.
    pub fn parse(&self, body: &[u8]) -> Result<WebhookPayload, PayloadError> {
        parse_with_sink(body, &self.sink)
    }

    /// Verifies the signature, then parses the body.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookSignatureError`] with
    /// [`SignatureFailure::Unverified`](super::SignatureFailure::Unverified)
    /// if verification fails, or
    /// [`SignatureFailure::InvalidPayload`](super::SignatureFailure::InvalidPayload)
    /// if the signed body cannot be parsed.
    pub fn construct_event(
        &self,
        body: &[u8],
        signature: &str,
        secret: &str,
        timestamp: Option<&str>,
    ) -> Result<WebhookEvent, WebhookSignatureError> {
        if !self.verify_signature(body, signature, secret, timestamp) {
            return Err(WebhookSignatureError::unverified());
        }

        let payload = self
            .parse(body)
            .map_err(WebhookSignatureError::invalid_payload)?;
        debug!(
            payment_id = %payload.payment_id,
            event = %payload.event,
            "Webhook verified"
        );
        Ok(WebhookEvent { payload })
    }

    /// Like [`construct_event`](Self::construct_event), reading the
    /// signature and timestamp from request headers.
    ///
    /// A missing or non-UTF-8 signature header fails verification.
    ///
    /// # Errors
    ///
    /// Same as [`construct_event`](Self::construct_event).
    pub fn construct_from_headers(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        secret: &str,
    ) -> Result<WebhookEvent, WebhookSignatureError> {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        let signature = header(SIGNATURE_HEADER).unwrap_or_default();
        self.construct_event(body, signature, secret, header(TIMESTAMP_HEADER))
    }
}

/// Checks a webhook signature against the system clock.
///
/// `tolerance_secs` is the replay window; pass
/// [`DEFAULT_TOLERANCE_SECS`] for the standard five minutes.
#[must_use]
pub fn verify_signature(
    body: &[u8],
    signature: &str,
    secret: &str,
    timestamp: Option<&str>,
    tolerance_secs: u64,
) -> bool {
    WebhookVerifier::new()
        .with_tolerance(tolerance_secs)
        .verify_signature(body, signature, secret, timestamp)
}

/// Parses a webhook body without verifying it.
///
/// Unknown networks and tokens are kept and logged as warnings.
///
/// # Errors
///
/// Returns [`PayloadError`] if the body is not JSON or lacks a required
/// field.
pub fn parse_webhook(body: &[u8]) -> Result<WebhookPayload, PayloadError> {
    WebhookVerifier::new().parse(body)
}

/// Verifies and parses a webhook against the system clock.
///
/// # Errors
///
/// See [`WebhookVerifier::construct_event`].
pub fn construct_event(
    body: &[u8],
    signature: &str,
    secret: &str,
    timestamp: Option<&str>,
    tolerance_secs: u64,
) -> Result<WebhookEvent, WebhookSignatureError> {
    WebhookVerifier::new()
        .with_tolerance(tolerance_secs)
        .construct_event(body, signature, secret, timestamp)
}
