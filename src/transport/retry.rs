//! Retry policy configuration for API calls.

use std::time::Duration;

use rand::Rng;

/// Configuration for exponential backoff retry behavior.
///
/// Attempt 0 fires immediately. Before attempt `i` (`i >= 1`) the transport
/// waits `base_delay * 2^(i-1)`. Only server errors and transport failures
/// are retried; the policy decides how long to wait, not whether to retry.
///
/// # Defaults
///
/// - `max_retries`: 2 (three attempts in total)
/// - `base_delay`: 200 milliseconds
/// - `max_delay`: none (delays grow without a cap)
/// - `jitter`: disabled
///
/// # Example
///
/// ```
/// use payzcore::transport::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .with_max_retries(4)
///     .with_base_delay(Duration::from_millis(100))
///     .with_max_delay(Duration::from_secs(2))
///     .with_jitter(true);
///
/// assert_eq!(policy.delay_for_retry(3), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of retries after the initial attempt.
    ///
    /// A value of 0 means only the initial attempt is made.
    pub max_retries: u32,

    /// Delay before the first retry; doubled for each subsequent retry.
    pub base_delay: Duration,

    /// Optional upper bound on a single delay.
    pub max_delay: Option<Duration>,

    /// Draw each delay uniformly from `[0, delay]` instead of using it as-is.
    pub jitter: bool,
}

impl RetryPolicy {
    /// Default number of retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 2;

    /// Default base delay (200 milliseconds).
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(200);

    /// Creates a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: None,
            jitter: false,
        }
    }

    /// Sets the number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base delay.
    ///
    /// Zero delay is supported (useful in tests) but creates a tight retry loop.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Caps every individual delay at `delay`.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Enables or disables full jitter.
    #[must_use]
    pub const fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Total number of attempts, including the initial one.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Computes the nominal delay before attempt `attempt` (1-indexed retry).
    ///
    /// Returns zero for attempt 0. The result saturates instead of
    /// overflowing and is capped at `max_delay` when one is set.
    #[must_use]
    pub fn delay_for_retry(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let factor = 2u32.checked_pow(attempt - 1).unwrap_or(u32::MAX);
        let delay = self.base_delay.saturating_mul(factor);

        match self.max_delay {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }

    /// Computes the delay to actually sleep before attempt `attempt`.
    ///
    /// Equal to [`delay_for_retry`](Self::delay_for_retry) unless jitter is
    /// enabled, in which case it is drawn uniformly from `[0, nominal]`.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let nominal = self.delay_for_retry(attempt);
        if !self.jitter || nominal.is_zero() {
            return nominal;
        }

        let millis = u64::try_from(nominal.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rand::rng().random_range(0..=millis))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
