//! Validated client configuration.
//!
//! This module contains the final, validated configuration used to build a
//! [`PayzCore`](crate::PayzCore) client. All validation is performed during
//! construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::transport::{Credential, RetryPolicy};

use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the client.
///
/// # Construction
///
/// Use [`ClientConfig::new`] with a credential and adjust with the
/// `with_*` builders, or [`ClientConfig::from_raw`] / [`ClientConfig::load`]
/// to read a TOML file with an environment fallback for the key.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Credential sent with every request
    pub credential: Credential,

    /// API base URL
    pub base_url: Url,

    /// Per-attempt request timeout
    pub timeout: Duration,

    /// Retry policy for 5xx and connection failures
    pub retry_policy: RetryPolicy,
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key_kind = if self.credential.is_master() {
            "master"
        } else {
            "project"
        };

        write!(
            f,
            "Config {{ base_url: {}, key: {key_kind} (redacted), timeout: {}s, retry: {}x/{}ms }}",
            self.base_url,
            self.timeout.as_secs(),
            self.retry_policy.max_retries,
            self.retry_policy.base_delay.as_millis(),
        )
    }
}

impl ClientConfig {
    /// Creates a configuration with default base URL, timeout and retries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiKey`] if the key is empty or cannot
    /// be sent as a header.
    pub fn new(credential: Credential) -> Result<Self, ConfigError> {
        credential.header_value()?;

        Ok(Self {
            credential,
            base_url: default_base_url()?,
            timeout: defaults::timeout(),
            retry_policy: RetryPolicy::new(),
        })
    }

    /// Replaces the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the URL is not absolute http(s).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Replaces the per-attempt timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDuration`] if the timeout is zero.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }
        self.timeout = timeout;
        Ok(self)
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Creates a validated configuration from an optional TOML config and
    /// an optional key taken from the environment.
    ///
    /// A key in the file takes precedence over `env_api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No key is configured anywhere
    /// - Both `api_key` and `master_key` are set
    /// - The key is empty or not header-safe
    /// - The base URL is invalid
    /// - The timeout is zero
    /// - `max_delay_ms` is below `base_delay_ms`
    pub fn from_raw(
        toml: Option<&TomlConfig>,
        env_api_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let credential = Self::resolve_credential(toml, env_api_key)?;
        credential.header_value()?;

        let base_url = match toml.and_then(|t| t.client.base_url.as_deref()) {
            Some(url) => parse_base_url(url)?,
            None => default_base_url()?,
        };

        let timeout = Self::resolve_timeout(toml)?;
        let retry_policy = Self::build_retry_policy(toml)?;

        Ok(Self {
            credential,
            base_url,
            timeout,
            retry_policy,
        })
    }

    /// Loads configuration from a TOML file, falling back to the
    /// `PAYZCORE_API_KEY` environment variable for the key.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let toml = TomlConfig::load(path)?;
        Self::from_raw(Some(&toml), std::env::var(defaults::API_KEY_ENV).ok())
    }

    fn resolve_credential(
        toml: Option<&TomlConfig>,
        env_api_key: Option<String>,
    ) -> Result<Credential, ConfigError> {
        let client = toml.map(|t| &t.client);
        let api_key = client.and_then(|c| c.api_key.clone());
        let master_key = client.and_then(|c| c.master_key.clone());

        match (api_key, master_key) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingCredentials),
            (None, Some(key)) => Ok(Credential::master_key(key)),
            (Some(key), None) => Ok(Credential::project_key(key)),
            (None, None) => env_api_key.map(Credential::project_key).ok_or_else(|| {
                ConfigError::missing(
                    field::API_KEY,
                    "Set client.api_key in the config file or the PAYZCORE_API_KEY environment variable",
                )
            }),
        }
    }

    fn resolve_timeout(toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let seconds = toml
            .and_then(|t| t.client.timeout)
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn build_retry_policy(toml: Option<&TomlConfig>) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        let max_retries = retry
            .and_then(|r| r.max_retries)
            .unwrap_or(defaults::MAX_RETRIES);

        let base_delay_ms = retry
            .and_then(|r| r.base_delay_ms)
            .unwrap_or(defaults::BASE_DELAY_MS);

        let max_delay_ms = retry.and_then(|r| r.max_delay_ms);
        let jitter = retry.and_then(|r| r.jitter).unwrap_or(false);

        let mut policy = RetryPolicy::new()
            .with_max_retries(max_retries)
            .with_base_delay(Duration::from_millis(base_delay_ms))
            .with_jitter(jitter);

        if let Some(max_delay_ms) = max_delay_ms {
            if max_delay_ms < base_delay_ms {
                return Err(ConfigError::InvalidRetry(format!(
                    "max_delay_ms ({max_delay_ms}) must be >= base_delay_ms ({base_delay_ms})"
                )));
            }
            policy = policy.with_max_delay(Duration::from_millis(max_delay_ms));
        }

        Ok(policy)
    }
}

fn default_base_url() -> Result<Url, ConfigError> {
    parse_base_url(defaults::BASE_URL)
}

fn parse_base_url(url_str: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
        url: url_str.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: "must not contain a query or fragment".to_string(),
        });
    }

    Ok(url)
}
