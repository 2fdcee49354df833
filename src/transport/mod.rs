//! Transport core for talking to the PayzCore API.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`]) and logical calls ([`RequestSpec`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Authenticated calls with retries ([`Transport`], [`Credential`])
//! - Retry policy configuration ([`RetryPolicy`])
//! - Status-to-error classification ([`ApiError`], [`ApiErrorKind`])

mod classify;
mod client;
mod credential;
mod executor;
mod error;
mod http;
mod retry;

#[cfg(test)]
mod classify_tests;
#[cfg(test)]
mod http_tests;

pub use classify::{RATE_LIMIT_DAILY_HEADER, RATE_LIMIT_RESET_HEADER, error_from_response};
pub use client::ReqwestClient;
pub use credential::{Credential, MASTER_KEY_HEADER, PROJECT_KEY_HEADER, RequestSpec};
pub use error::{ApiError, ApiErrorKind, HttpError, InvalidCredential, RateLimitInfo};
pub use executor::{Transport, USER_AGENT_VALUE};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use retry::RetryPolicy;
