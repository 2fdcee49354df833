//! The `PayzCore` client.

use std::sync::Arc;

use tracing::debug;

use crate::config::{ClientConfig, ConfigError};
use crate::resources::{Payments, Projects};
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, ReqwestClient, Transport};

/// Entry point for the PayzCore API.
///
/// Cheap to clone; clones share one connection pool and one closed flag.
///
/// # Example
///
/// ```no_run
/// use payzcore::{ClientConfig, Credential, PayzCore};
/// use payzcore::resources::CreatePaymentParams;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = PayzCore::new(ClientConfig::new(Credential::project_key("pk_live_xxx"))?)?;
/// let created = client
///     .payments()
///     .create(&CreatePaymentParams::new(10.0, "order-42"))
///     .await?;
/// println!("Pay to {:?}", created.payment.address);
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PayzCore<H = ReqwestClient, S = TokioSleeper> {
    transport: Arc<Transport<H, S>>,
}

impl<H, S> Clone for PayzCore<H, S> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl PayzCore {
    /// Builds a client over reqwest from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be
    /// built, or [`ConfigError::InvalidApiKey`] if the key is not
    /// header-safe.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http = ReqwestClient::with_timeout(config.timeout).map_err(ConfigError::HttpClient)?;
        let transport = Transport::new(http, &config.base_url, &config.credential)?
            .with_retry_policy(config.retry_policy);

        debug!(
            base_url = %config.base_url,
            master = config.credential.is_master(),
            "PayzCore client created"
        );
        Ok(Self::from_transport(transport))
    }
}

impl<H, S> PayzCore<H, S> {
    /// Wraps an already configured transport.
    #[must_use]
    pub fn from_transport(transport: Transport<H, S>) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &Transport<H, S> {
        &self.transport
    }
}

impl<H: HttpClient, S: Sleeper> PayzCore<H, S> {
    /// Payment endpoints.
    #[must_use]
    pub fn payments(&self) -> Payments<'_, H, S> {
        Payments::new(&self.transport)
    }

    /// Project endpoints; require a master key.
    #[must_use]
    pub fn projects(&self) -> Projects<'_, H, S> {
        Projects::new(&self.transport)
    }

    /// Closes the client for every clone.
    ///
    /// In-flight attempts finish normally; new calls and pending retries
    /// fail with a `network_error`. Returns `false` if it was already
    /// closed.
    pub fn close(&self) -> bool {
        self.transport.close()
    }

    /// Returns true once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }
}
