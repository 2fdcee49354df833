//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Production API endpoint.
pub const BASE_URL: &str = "https://api.payzcore.com";

/// Default per-attempt request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Default number of retries after the first attempt.
pub const MAX_RETRIES: u32 = 2;

/// Default delay before the first retry, in milliseconds.
pub const BASE_DELAY_MS: u64 = 200;

/// Environment variable consulted when the file has no key.
pub const API_KEY_ENV: &str = "PAYZCORE_API_KEY";

/// Default per-attempt request timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}

/// Default base retry delay as Duration.
#[must_use]
pub const fn base_delay() -> Duration {
    Duration::from_millis(BASE_DELAY_MS)
}
