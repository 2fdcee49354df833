//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional so a partial file can be merged with the
/// environment and built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Connection and credential settings
    #[serde(default)]
    pub client: ClientSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,
}

/// Client configuration section.
#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Project API key (sent as `x-api-key`)
    pub api_key: Option<String>,

    /// Master key (sent as `x-master-key`)
    pub master_key: Option<String>,

    /// API base URL
    pub base_url: Option<String>,

    /// Per-attempt request timeout in seconds
    pub timeout: Option<u64>,
}

impl std::fmt::Debug for ClientSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ClientSection")
            .field("api_key", &redact(&self.api_key))
            .field("master_key", &redact(&self.master_key))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Retries after the first attempt
    pub max_retries: Option<u32>,

    /// Delay before the first retry in milliseconds
    pub base_delay_ms: Option<u64>,

    /// Upper bound for any single retry delay in milliseconds
    pub max_delay_ms: Option<u64>,

    /// Randomize each delay between zero and its computed value
    pub jitter: Option<bool>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# PayzCore client configuration

[client]
# Project API key (required unless PAYZCORE_API_KEY is set)
# api_key = "pk_live_..."

# Master key for project management; use instead of api_key
# master_key = "mk_..."

# API base URL (default: https://api.payzcore.com)
# base_url = "https://api.payzcore.com"

# Per-attempt request timeout in seconds (default: 30)
# timeout = 30

[retry]
# Retries after the first attempt for 5xx and connection failures (default: 2)
# max_retries = 2

# Delay before the first retry in milliseconds, doubled each retry (default: 200)
# base_delay_ms = 200

# Upper bound for a single retry delay in milliseconds (default: unbounded)
# max_delay_ms = 5000

# Randomize each delay between zero and its computed value (default: false)
# jitter = false
"#
    .to_string()
}
