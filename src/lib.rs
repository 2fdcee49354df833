//! PayzCore: client for a blockchain payment monitoring API
//!
//! A library for creating and tracking stablecoin payments over the
//! PayzCore REST API, and for verifying the webhooks it sends.
//!
//! - [`PayzCore`] issues authenticated requests with bounded retries
//! - [`webhook`] checks HMAC signatures and parses notifications
//! - [`config`] loads client settings from TOML and the environment
//!
//! The library logs through `tracing` and never installs a subscriber.

pub mod client;
pub mod config;
pub mod resources;
pub mod time;
pub mod transport;
pub mod types;
pub mod webhook;

#[cfg(test)]
mod client_tests;

pub use client::PayzCore;
pub use config::{ClientConfig, ConfigError};
pub use transport::{ApiError, ApiErrorKind, Credential, RetryPolicy};
pub use types::{Network, PaymentStatus, Token, WebhookEventKind};
pub use webhook::{WebhookEvent, WebhookPayload, WebhookSignatureError, construct_event};
