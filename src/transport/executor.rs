//! The request/retry loop shared by every API call.

use std::sync::atomic::{AtomicBool, Ordering};

use http::HeaderMap;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::{debug, warn};

use crate::time::{Sleeper, TokioSleeper};

use super::classify::{Outcome, classify_response, classify_transport_error};
use super::{
    ApiError, Credential, HttpClient, HttpRequest, InvalidCredential, RequestSpec, RetryPolicy,
};

/// `User-Agent` sent with every request.
pub const USER_AGENT_VALUE: &str = concat!("payzcore-rust/", env!("CARGO_PKG_VERSION"));

/// Authenticated, retrying transport over an injected [`HttpClient`].
///
/// Configuration (credential, base URL, retry policy) is fixed at
/// construction. A single instance may be shared between concurrent callers;
/// each [`execute`](Self::execute) call retries independently and its backoff
/// only suspends the calling task.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used between attempts (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use payzcore::transport::{Credential, ReqwestClient, RequestSpec, Transport};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = Transport::new(
///     ReqwestClient::new(),
///     &Url::parse("https://api.payzcore.com")?,
///     &Credential::project_key("pk_live_xxx"),
/// )?;
/// let payments = transport.execute(&RequestSpec::get("/v1/payments")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Transport<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    base_url: String,
    headers: HeaderMap,
    retry_policy: RetryPolicy,
    closed: AtomicBool,
}

impl<H> Transport<H, TokioSleeper> {
    /// Creates a transport with the default retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCredential`] if the key cannot be sent as a header.
    pub fn new(
        client: H,
        base_url: &url::Url,
        credential: &Credential,
    ) -> Result<Self, InvalidCredential> {
        let auth_name = HeaderName::from_static(credential.header_name());
        let auth_value = credential.header_value()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(auth_name, auth_value);

        Ok(Self {
            client,
            sleeper: TokioSleeper,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            headers,
            retry_policy: RetryPolicy::default(),
            closed: AtomicBool::new(false),
        })
    }
}

impl<H, S> Transport<H, S> {
    /// Sets a custom sleeper for retry delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Transport<H, S2> {
        Transport {
            client: self.client,
            sleeper,
            base_url: self.base_url,
            headers: self.headers,
            retry_policy: self.retry_policy,
            closed: self.closed,
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }

    /// Returns true once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn build_request(&self, spec: &RequestSpec) -> Result<HttpRequest, ApiError> {
        let raw = format!("{}{}", self.base_url, spec.path());
        let url = url::Url::parse(&raw)
            .map_err(|e| ApiError::network(format!("Invalid URL '{raw}': {e}")))?;

        let mut request =
            HttpRequest::new(spec.method().clone(), url).with_headers(self.headers.clone());

        if let Some(body) = spec.body() {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| ApiError::network(format!("Failed to encode request body: {e}")))?;
            request = request.with_body(bytes);
        }

        Ok(request)
    }
}

impl<H: HttpClient, S: Sleeper> Transport<H, S> {
    /// Performs one logical API call.
    ///
    /// Attempts the request up to `max_retries + 1` times. Server errors and
    /// transient transport failures are retried after an exponential
    /// backoff; every other failure is returned on first occurrence. After
    /// the last attempt the most recent failure is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] classified by status code, or a `network_error`
    /// when no response was received or the transport has been closed.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<Value, ApiError> {
        let request = self.build_request(spec)?;
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..self.retry_policy.max_attempts() {
            if attempt > 0 {
                let delay = self.retry_policy.backoff(attempt);
                debug!(attempt, delay = ?delay, "Backing off before retry");
                self.sleeper.sleep(delay).await;
            }

            if self.is_closed() {
                return Err(ApiError::network("Client is closed"));
            }

            debug!(method = %request.method, url = %request.url, attempt, "Sending request");

            let outcome = match self.client.request(request.clone()).await {
                Ok(response) => classify_response(&response),
                Err(e) => classify_transport_error(e),
            };

            match outcome {
                Outcome::Success(value) => return Ok(value),
                Outcome::Terminal(error) => return Err(error),
                Outcome::Retryable(error) => {
                    warn!(
                        method = %request.method,
                        url = %request.url,
                        attempt,
                        status = error.status(),
                        "Retryable failure: {}",
                        error.message()
                    );
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::network("Request failed after retries")))
    }

    /// Performs a `GET` request.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(&RequestSpec::get(path)).await
    }

    /// Performs a `POST` request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.execute(&RequestSpec::post(path, body)).await
    }

    /// Performs a `PATCH` request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn patch(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.execute(&RequestSpec::patch(path, body)).await
    }

    /// Stops new attempts and releases the connection pool.
    ///
    /// Attempts already on the wire complete or fail normally; pending
    /// retries and new calls fail with a `network_error`. Returns `true` if
    /// this call performed the close, `false` if it was already closed.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.client.close();
        debug!(base_url = %self.base_url, "Transport closed");
        true
    }
}
