//! Typed wrappers over the payments and projects endpoints.
//!
//! Each handle borrows a [`Transport`](crate::transport::Transport) and maps
//! its JSON into the structs in this module. The mapping is strict about
//! required fields: a response that does not match the declared shape
//! becomes an `api_error` with status 0.

mod payments;
mod projects;

#[cfg(test)]
mod test_client;

pub use payments::{
    AvailableNetwork, CancelPaymentResponse, ConfirmPaymentResponse, CreatePaymentParams,
    CreatePaymentResponse, GetPaymentResponse, ListPaymentsParams, ListPaymentsResponse, Payment,
    PaymentDetail, PaymentListItem, Payments, Transaction,
};
pub use projects::{
    CreateProjectParams, CreateProjectResponse, ListProjectsResponse, Project, ProjectListItem,
    Projects,
};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::transport::{ApiError, ApiErrorKind};

/// Characters left as-is in a path segment: RFC 3986 unreserved.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes `id` so it stays a single path segment.
///
/// Empty ids and the dot segments `.` and `..` are rejected: URL parsing
/// would resolve them against the parent path, escaped or not.
fn encode_segment(id: &str) -> Result<String, ApiError> {
    if matches!(id, "" | "." | "..") {
        return Err(ApiError::new(
            ApiErrorKind::Validation,
            format!("Invalid path segment '{id}'"),
            0,
        ));
    }
    Ok(utf8_percent_encode(id, PATH_SEGMENT).to_string())
}

fn encode_body<T: Serialize>(params: &T) -> Result<Value, ApiError> {
    serde_json::to_value(params)
        .map_err(|e| ApiError::network(format!("Failed to encode request body: {e}")))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| {
        ApiError::new(
            ApiErrorKind::Api,
            format!("Unexpected response shape: {e}"),
            0,
        )
    })
}
