//! Mapping of HTTP outcomes to success values or [`ApiError`]s.
//!
//! Every attempt ends in exactly one [`Outcome`]. Only server errors and
//! retryable transport failures are [`Outcome::Retryable`]; everything else
//! that is not a success terminates the call.

use serde_json::Value;

use super::{ApiError, ApiErrorKind, HttpError, HttpResponse, RateLimitInfo};

/// Header holding the rate-limit reset value.
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Header set to `"true"` when the daily quota is exhausted.
pub const RATE_LIMIT_DAILY_HEADER: &str = "x-ratelimit-daily";

const UNKNOWN_ERROR: &str = "Unknown error";

/// Result of a single attempt.
#[derive(Debug)]
pub(crate) enum Outcome {
    Success(Value),
    Retryable(ApiError),
    Terminal(ApiError),
}

/// Classifies a response that reached us.
pub(crate) fn classify_response(response: &HttpResponse) -> Outcome {
    if response.is_success() {
        return match parse_success_body(&response.body) {
            Ok(value) => Outcome::Success(value),
            Err(e) => Outcome::Terminal(ApiError::new(
                ApiErrorKind::Api,
                format!("Invalid JSON in response body: {e}"),
                response.status.as_u16(),
            )),
        };
    }

    let error = error_from_response(response);
    if response.status.is_server_error() {
        Outcome::Retryable(error)
    } else {
        Outcome::Terminal(error)
    }
}

/// Classifies a failure where no response was received.
pub(crate) fn classify_transport_error(err: HttpError) -> Outcome {
    if err.is_retryable() {
        Outcome::Retryable(err.into())
    } else {
        Outcome::Terminal(err.into())
    }
}

fn parse_success_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}

/// Builds the structured error for a non-success response.
///
/// The message comes from the body's `error` field; a body that is not JSON
/// falls back to the status reason phrase. The kind is derived from the
/// status alone.
#[must_use]
pub fn error_from_response(response: &HttpResponse) -> ApiError {
    let status = response.status.as_u16();
    let kind = ApiErrorKind::from_status(status);

    let Ok(body) = serde_json::from_slice::<Value>(&response.body) else {
        let reason = response.status.canonical_reason().unwrap_or(UNKNOWN_ERROR);
        return attach_extras(ApiError::new(kind, reason, status), kind, response, None);
    };

    let message = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_ERROR);

    attach_extras(
        ApiError::new(kind, message, status),
        kind,
        response,
        Some(&body),
    )
}

fn attach_extras(
    error: ApiError,
    kind: ApiErrorKind,
    response: &HttpResponse,
    body: Option<&Value>,
) -> ApiError {
    match kind {
        ApiErrorKind::Validation => {
            let details = body
                .and_then(|b| b.get("details"))
                .and_then(Value::as_array)
                .cloned();
            match details {
                Some(details) => error.with_details(details),
                None => error,
            }
        }
        ApiErrorKind::RateLimit => error.with_rate_limit(rate_limit_info(response)),
        _ => error,
    }
}

fn rate_limit_info(response: &HttpResponse) -> RateLimitInfo {
    let retry_after = response
        .header_str(RATE_LIMIT_RESET_HEADER)
        .and_then(|v| v.trim().parse::<i64>().ok());
    let is_daily = response.header_str(RATE_LIMIT_DAILY_HEADER) == Some("true");

    RateLimitInfo {
        retry_after,
        is_daily,
    }
}
