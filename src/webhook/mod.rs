//! Webhook signature verification and payload parsing.
//!
//! PayzCore signs every webhook with the project's webhook secret. A
//! receiver should pass the raw request body and the two signature headers
//! to [`construct_event`] (or a configured [`WebhookVerifier`]) and act only
//! on the returned [`WebhookEvent`].
//!
//! # Architecture
//!
//! - `signature`: HMAC computation and the replay window
//! - `payload`: Typed payload and its wire mapping
//! - `verifier`: Clock-injected verification producing [`WebhookEvent`]
//! - `diagnostics`: Non-fatal reports about unknown enum values

mod diagnostics;
mod error;
mod payload;
mod signature;
mod verifier;

#[cfg(test)]
mod payload_tests;

pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::{PayloadError, SignatureFailure, WebhookSignatureError};
pub use payload::{PaymentLink, WebhookPayload};
pub use signature::{DEFAULT_TOLERANCE_SECS, SIGNATURE_HEADER, TIMESTAMP_HEADER, compute_signature};
pub use verifier::{WebhookEvent, WebhookVerifier, construct_event, parse_webhook, verify_signature};

pub use crate::types::{SUPPORTED_NETWORKS, SUPPORTED_TOKENS};
