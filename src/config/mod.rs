//! Configuration layer for the PayzCore client.
//!
//! This module provides:
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ClientConfig`])
//! - A commented starter file ([`default_config_template`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! The API key is resolved from (highest to lowest):
//!
//! 1. **TOML config file** - `client.api_key` or `client.master_key`
//! 2. **Environment** - `PAYZCORE_API_KEY` (project key only)
//!
//! Every other option comes from the file or falls back to its built-in
//! default. Setting both keys in the file is an error.
//!
//! # Immutability
//!
//! A [`ClientConfig`] is consumed when the client is built. Credential,
//! base URL, timeout and retry policy cannot change for the lifetime of
//! that client.

pub mod defaults;
mod error;
mod toml;
mod validated;


pub use error::{ConfigError, field};
pub use toml::{ClientSection, RetrySection, TomlConfig, default_config_template};
pub use validated::ClientConfig;
