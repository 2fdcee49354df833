//! Payment monitoring requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use url::form_urlencoded;

use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{ApiError, HttpClient, Transport};
use crate::types::{Network, PaymentStatus, Token};

use super::{decode, encode_body, encode_segment};

/// Parameters for [`Payments::create`].
///
/// Unset optional fields are left out of the request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePaymentParams {
    /// Amount in stablecoin units.
    pub amount: f64,
    /// Merchant reference for this payment.
    pub external_ref: String,
    /// Network to monitor; when unset the buyer picks one on the payment page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    /// Token to accept; the server defaults to USDT.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<Token>,
    /// Merchant order id; repeating it returns the existing payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_order_id: Option<String>,
    /// Static address to assign (dedicated-address projects only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Expiry in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u32>,
    /// Free-form metadata echoed back in webhooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CreatePaymentParams {
    /// Creates parameters with the two required fields.
    #[must_use]
    pub fn new(amount: f64, external_ref: impl Into<String>) -> Self {
        Self {
            amount,
            external_ref: external_ref.into(),
            network: None,
            token: None,
            external_order_id: None,
            address: None,
            expires_in: None,
            metadata: None,
        }
    }

    /// Sets the network.
    #[must_use]
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    /// Sets the token.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the idempotency order id.
    #[must_use]
    pub fn with_external_order_id(mut self, id: impl Into<String>) -> Self {
        self.external_order_id = Some(id.into());
        self
    }

    /// Pre-assigns a static address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the expiry in seconds.
    #[must_use]
    pub const fn with_expires_in(mut self, seconds: u32) -> Self {
        self.expires_in = Some(seconds);
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A network the buyer may choose on the payment page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableNetwork {
    /// Network code.
    pub network: Network,
    /// Display name.
    pub name: String,
    /// Tokens accepted on this network.
    pub tokens: Vec<Token>,
}

/// A newly created (or existing) payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment id.
    pub id: String,
    /// Deposit address; `None` until the buyer picks a network.
    pub address: Option<String>,
    /// Amount the buyer must send, as a decimal string.
    pub amount: String,
    /// Monitored network; `None` until the buyer picks one.
    pub network: Option<Network>,
    /// Accepted token.
    pub token: Option<Token>,
    /// Current status.
    pub status: PaymentStatus,
    /// Expiry time (ISO-8601).
    pub expires_at: String,
    /// Merchant order id, if one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_order_id: Option<String>,
    /// QR code image for the deposit address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    /// Instructions to show the buyer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// Amount before any unique-amount adjustment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<String>,
    /// True when the buyer must submit a transaction hash via `confirm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_txid: Option<bool>,
    /// Path of the confirm endpoint for this payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_endpoint: Option<String>,
    /// True while the buyer has not chosen a network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awaiting_network: Option<bool>,
    /// Hosted payment page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    /// Networks offered on the payment page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_networks: Option<Vec<AvailableNetwork>>,
}

/// Result of [`Payments::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentResponse {
    /// True if `external_order_id` matched an earlier payment.
    pub existing: bool,
    /// The created or matched payment.
    pub payment: Payment,
}

/// Filters for [`Payments::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPaymentsParams {
    /// Only payments in this status.
    pub status: Option<PaymentStatus>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Number of results to skip.
    pub offset: Option<u32>,
}

impl ListPaymentsParams {
    /// No filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by status.
    #[must_use]
    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Limits the number of results.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips the first `offset` results.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Form-encoded query, empty when no filter is set.
    fn query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(status) = &self.status {
            query.append_pair("status", status.as_str());
        }
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = self.offset {
            query.append_pair("offset", &offset.to_string());
        }
        query.finish()
    }
}

/// One row of [`Payments::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentListItem {
    /// Payment id.
    pub id: String,
    /// Merchant reference.
    pub external_ref: String,
    /// Merchant order id, if one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_order_id: Option<String>,
    /// Monitored network.
    pub network: Option<Network>,
    /// Accepted token.
    pub token: Option<Token>,
    /// Deposit address.
    pub address: Option<String>,
    /// Amount requested, as a decimal string.
    pub expected_amount: String,
    /// Amount received so far, as a decimal string.
    pub paid_amount: String,
    /// Current status.
    pub status: PaymentStatus,
    /// Hash of the matching transfer, once seen.
    pub tx_hash: Option<String>,
    /// Expiry time (ISO-8601).
    pub expires_at: String,
    /// Time the payment completed (ISO-8601).
    pub paid_at: Option<String>,
    /// Creation time (ISO-8601).
    pub created_at: String,
}

/// Result of [`Payments::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPaymentsResponse {
    /// Matching payments, newest first.
    pub payments: Vec<PaymentListItem>,
}

/// An on-chain transfer observed for a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction hash.
    pub tx_hash: String,
    /// Amount transferred, as a decimal string.
    pub amount: String,
    /// Sending address.
    #[serde(rename = "from")]
    pub from_address: String,
    /// Whether the transfer has enough confirmations.
    pub confirmed: bool,
    /// Confirmations seen so far.
    #[serde(default)]
    pub confirmations: u64,
}

/// Full payment state with its transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetail {
    /// Payment id.
    pub id: String,
    /// Current status.
    pub status: PaymentStatus,
    /// Amount requested, as a decimal string.
    pub expected_amount: String,
    /// Amount received so far, as a decimal string.
    pub paid_amount: String,
    /// Deposit address.
    pub address: Option<String>,
    /// Monitored network.
    pub network: Option<Network>,
    /// Accepted token.
    pub token: Option<Token>,
    /// Hash of the matching transfer, once seen.
    pub tx_hash: Option<String>,
    /// Expiry time (ISO-8601).
    pub expires_at: String,
    /// Transfers observed to the deposit address.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// True while the buyer has not chosen a network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awaiting_network: Option<bool>,
}

/// Result of [`Payments::get`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPaymentResponse {
    /// The payment.
    pub payment: PaymentDetail,
}

/// Result of [`Payments::cancel`]; the payment is returned as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelPaymentResponse {
    /// The cancelled payment as raw JSON.
    pub payment: Map<String, Value>,
}

/// Result of [`Payments::confirm`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPaymentResponse {
    /// Status after verification.
    pub status: PaymentStatus,
    /// Whether the transaction matched the payment.
    pub verified: bool,
    /// Amount found in the transaction.
    #[serde(default)]
    pub amount_received: Option<String>,
    /// Amount the payment expects.
    #[serde(default)]
    pub amount_expected: Option<String>,
    /// Explanation when verification failed.
    #[serde(default)]
    pub message: Option<String>,
}

/// Handle for the `/v1/payments` endpoints.
///
/// Obtained from [`PayzCore::payments`](crate::PayzCore::payments).
#[derive(Debug)]
pub struct Payments<'a, H, S = TokioSleeper> {
    transport: &'a Transport<H, S>,
}

impl<'a, H, S> Payments<'a, H, S>
where
    H: HttpClient,
    S: Sleeper,
{
    /// Wraps a transport.
    #[must_use]
    pub const fn new(transport: &'a Transport<H, S>) -> Self {
        Self { transport }
    }

    /// Creates a payment monitoring request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] from the transport, or an `api_error` with
    /// status 0 if the response has an unexpected shape.
    pub async fn create(
        &self,
        params: &CreatePaymentParams,
    ) -> Result<CreatePaymentResponse, ApiError> {
        let body = encode_body(params)?;
        decode(self.transport.post("/v1/payments", body).await?)
    }

    /// Lists payments of the project, newest first.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub async fn list(&self, params: &ListPaymentsParams) -> Result<ListPaymentsResponse, ApiError> {
        let query = params.query();
        let path = if query.is_empty() {
            "/v1/payments".to_string()
        } else {
            format!("/v1/payments?{query}")
        };
        decode(self.transport.get(&path).await?)
    }

    /// Fetches one payment with its transactions.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub async fn get(&self, payment_id: &str) -> Result<GetPaymentResponse, ApiError> {
        let path = format!("/v1/payments/{}", encode_segment(payment_id)?);
        decode(self.transport.get(&path).await?)
    }

    /// Cancels a pending payment.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub async fn cancel(&self, payment_id: &str) -> Result<CancelPaymentResponse, ApiError> {
        let path = format!("/v1/payments/{}", encode_segment(payment_id)?);
        decode(
            self.transport
                .patch(&path, json!({ "status": "cancelled" }))
                .await?,
        )
    }

    /// Submits a transaction hash for verification.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub async fn confirm(
        &self,
        payment_id: &str,
        tx_hash: &str,
    ) -> Result<ConfirmPaymentResponse, ApiError> {
        let path = format!("/v1/payments/{}/confirm", encode_segment(payment_id)?);
        decode(
            self.transport
                .post(&path, json!({ "tx_hash": tx_hash }))
                .await?,
        )
    }
}
