//! Typed webhook payload.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::types::{Network, PaymentStatus, Token, WebhookEventKind};

use super::diagnostics::{Diagnostic, DiagnosticSink};
use super::error::PayloadError;

/// Buyer details attached to payments created from a payment link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentLink {
    /// Buyer e-mail address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,
    /// Buyer display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,
    /// Free-form note left by the buyer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_note: Option<String>,
    /// Identifier of the payment link.
    #[serde(rename = "payment_link_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// URL slug of the payment link.
    #[serde(rename = "payment_link_slug", skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl PaymentLink {
    fn is_empty(&self) -> bool {
        self.buyer_email.is_none()
            && self.buyer_name.is_none()
            && self.buyer_note.is_none()
            && self.id.is_none()
            && self.slug.is_none()
    }
}

/// Parsed body of a payment webhook.
///
/// Amounts are kept as the decimal strings the server sent. This is plain
/// data: holding one says nothing about authenticity. Use
/// [`WebhookEvent`](super::WebhookEvent) for a payload whose signature was
/// checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPayload")]
pub struct WebhookPayload {
    /// Notification kind.
    pub event: WebhookEventKind,
    /// PayzCore payment identifier.
    pub payment_id: String,
    /// Merchant reference supplied at creation.
    pub external_ref: String,
    /// Merchant order id used for idempotency, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_order_id: Option<String>,
    /// Network the payment was made on.
    pub network: Network,
    /// Token the payment was made in.
    pub token: Token,
    /// Deposit address.
    pub address: String,
    /// Amount requested, as a decimal string.
    pub expected_amount: String,
    /// Amount received so far, as a decimal string.
    pub paid_amount: String,
    /// Transaction hash of the settling transfer.
    pub tx_hash: Option<String>,
    /// Payment status after this event.
    pub status: PaymentStatus,
    /// When the payment was completed; only set for completed/overpaid events.
    pub paid_at: Option<String>,
    /// Merchant metadata supplied at creation.
    pub metadata: Map<String, Value>,
    /// When the notification was produced.
    pub timestamp: String,
    /// Buyer details, present only for payment-link payments.
    #[serde(flatten)]
    pub payment_link: Option<PaymentLink>,
}

/// Wire shape; converted into [`WebhookPayload`].
#[derive(Deserialize)]
struct RawPayload {
    event: WebhookEventKind,
    payment_id: String,
    external_ref: String,
    external_order_id: Option<String>,
    network: Network,
    #[serde(default, deserialize_with = "null_as_default")]
    token: Token,
    address: String,
    expected_amount: String,
    paid_amount: String,
    tx_hash: Option<String>,
    status: PaymentStatus,
    paid_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    metadata: Map<String, Value>,
    timestamp: String,
    buyer_email: Option<String>,
    buyer_name: Option<String>,
    buyer_note: Option<String>,
    payment_link_id: Option<String>,
    payment_link_slug: Option<String>,
}

impl From<RawPayload> for WebhookPayload {
    fn from(raw: RawPayload) -> Self {
        let link = PaymentLink {
            buyer_email: raw.buyer_email,
            buyer_name: raw.buyer_name,
            buyer_note: raw.buyer_note,
            id: raw.payment_link_id,
            slug: raw.payment_link_slug,
        };

        Self {
            event: raw.event,
            payment_id: raw.payment_id,
            external_ref: raw.external_ref,
            external_order_id: raw.external_order_id,
            network: raw.network,
            token: raw.token,
            address: raw.address,
            expected_amount: raw.expected_amount,
            paid_amount: raw.paid_amount,
            tx_hash: raw.tx_hash,
            status: raw.status,
            paid_at: raw.paid_at,
            metadata: raw.metadata,
            timestamp: raw.timestamp,
            payment_link: (!link.is_empty()).then_some(link),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses a body and reports unknown network/token values to `sink`.
pub(crate) fn parse_with_sink<D: DiagnosticSink + ?Sized>(
    body: &[u8],
    sink: &D,
) -> Result<WebhookPayload, PayloadError> {
    let payload: WebhookPayload = serde_json::from_slice(body)?;

    if let Network::Other(network) = &payload.network {
        sink.emit(&Diagnostic::UnknownNetwork(network.clone()));
    }
    if let Token::Other(token) = &payload.token {
        sink.emit(&Diagnostic::UnknownToken(token.clone()));
    }

    Ok(payload)
}
