//! HMAC-SHA256 webhook signatures with replay protection.
//!
//! The server signs `timestamp + "." + body` with the project's webhook
//! secret and sends the lowercase hex digest in the signature header. A
//! signature is accepted only if the timestamp is within the tolerance
//! window of the receiver's clock.

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Default replay window in seconds (five minutes).
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "x-payzcore-signature";

/// Header carrying the ISO-8601 signing timestamp.
pub const TIMESTAMP_HEADER: &str = "x-payzcore-timestamp";

/// Computes the expected signature for a webhook.
///
/// Returns the lowercase hex HMAC-SHA256 of `timestamp || "." || body`
/// keyed with `secret`. The body must be the exact bytes sent on the wire.
///
/// # Example
///
/// ```
/// use payzcore::webhook::compute_signature;
///
/// let sig = compute_signature("whsec_test", "2024-01-01T00:00:00Z", br#"{"a":1}"#);
/// assert_eq!(sig.len(), 64);
/// ```
#[must_use]
pub fn compute_signature(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Checks a signature against an explicit "now".
///
/// Never fails: any missing, malformed, stale or mismatching input yields
/// `false`. Checks run in order: empty inputs, timestamp presence and
/// format, replay window, then the constant-time digest comparison.
pub(crate) fn verify_at(
    body: &[u8],
    signature: &str,
    secret: &str,
    timestamp: Option<&str>,
    tolerance_secs: u64,
    now: SystemTime,
) -> bool {
    if secret.is_empty() || signature.is_empty() || body.is_empty() {
        debug!("Webhook rejected: empty secret, signature or body");
        return false;
    }

    let Some(timestamp) = timestamp.filter(|t| !t.is_empty()) else {
        debug!("Webhook rejected: missing timestamp");
        return false;
    };

    let Ok(signed_at) = DateTime::parse_from_rfc3339(timestamp) else {
        debug!(timestamp, "Webhook rejected: malformed timestamp");
        return false;
    };

    if !within_tolerance(signed_at.with_timezone(&Utc), now, tolerance_secs) {
        debug!(timestamp, tolerance_secs, "Webhook rejected: outside replay window");
        return false;
    }

    let expected = compute_signature(secret, timestamp, body);
    let matches: bool = signature.as_bytes().ct_eq(expected.as_bytes()).into();
    if !matches {
        debug!("Webhook rejected: signature mismatch");
    }
    matches
}

fn within_tolerance(signed_at: DateTime<Utc>, now: SystemTime, tolerance_secs: u64) -> bool {
    let now: DateTime<Utc> = now.into();
    let Some(skew_micros) = now.signed_duration_since(signed_at).num_microseconds() else {
        return false;
    };
    skew_micros.unsigned_abs() <= tolerance_secs.saturating_mul(1_000_000)
}
