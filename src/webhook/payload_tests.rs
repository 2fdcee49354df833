//! Tests for webhook payload parsing.

use std::sync::Mutex;

use serde_json::{Value, json};

use super::diagnostics::Diagnostic;
use super::payload::{WebhookPayload, parse_with_sink};
use crate::types::{Network, PaymentStatus, Token, WebhookEventKind};

fn completed() -> Value {
    json!({
        "event": "payment.completed",
        "payment_id": "pay_123",
        "external_ref": "order-42",
        "network": "TRC20",
        "token": "USDT",
        "address": "TXyz",
        "expected_amount": "10.00",
        "paid_amount": "10.00",
        "tx_hash": "0xabc",
        "status": "paid",
        "paid_at": "2024-01-01T00:00:00Z",
        "metadata": {"customer": "c_1"},
        "timestamp": "2024-01-01T00:00:05Z"
    })
}

#[derive(Default)]
struct Collect(Mutex<Vec<Diagnostic>>);

impl Collect {
    fn emitted(&self) -> Vec<Diagnostic> {
        self.0.lock().unwrap().clone()
    }
}

impl super::diagnostics::DiagnosticSink for Collect {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.0.lock().unwrap().push(diagnostic.clone());
    }
}

fn parse(value: &Value) -> (Result<WebhookPayload, super::PayloadError>, Vec<Diagnostic>) {
    let sink = Collect::default();
    let result = parse_with_sink(value.to_string().as_bytes(), &sink);
    (result, sink.emitted())
}

mod fields {
    use super::*;

    #[test]
    fn maps_every_field() {
        let (result, diagnostics) = parse(&completed());
        let payload = result.unwrap();

        assert_eq!(payload.event, WebhookEventKind::Completed);
        assert_eq!(payload.payment_id, "pay_123");
        assert_eq!(payload.external_ref, "order-42");
        assert_eq!(payload.network, Network::Trc20);
        assert_eq!(payload.token, Token::Usdt);
        assert_eq!(payload.address, "TXyz");
        assert_eq!(payload.expected_amount, "10.00");
        assert_eq!(payload.paid_amount, "10.00");
        assert_eq!(payload.tx_hash.as_deref(), Some("0xabc"));
        assert_eq!(payload.status, PaymentStatus::Paid);
        assert_eq!(payload.paid_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(payload.metadata["customer"], "c_1");
        assert_eq!(payload.timestamp, "2024-01-01T00:00:05Z");
        assert!(payload.payment_link.is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn missing_token_defaults_to_usdt() {
        let mut body = completed();
        body.as_object_mut().unwrap().remove("token");

        assert_eq!(parse(&body).0.unwrap().token, Token::Usdt);
    }

    #[test]
    fn null_token_defaults_to_usdt() {
        let mut body = completed();
        body["token"] = Value::Null;

        assert_eq!(parse(&body).0.unwrap().token, Token::Usdt);
    }

    #[test]
    fn missing_or_null_metadata_is_empty() {
        let mut missing = completed();
        missing.as_object_mut().unwrap().remove("metadata");
        let mut null = completed();
        null["metadata"] = Value::Null;

        assert!(parse(&missing).0.unwrap().metadata.is_empty());
        assert!(parse(&null).0.unwrap().metadata.is_empty());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let mut body = completed();
        let obj = body.as_object_mut().unwrap();
        obj.remove("tx_hash");
        obj.remove("paid_at");

        let payload = parse(&body).0.unwrap();

        assert!(payload.tx_hash.is_none());
        assert!(payload.paid_at.is_none());
    }

    #[test]
    fn payment_link_fields_are_grouped() {
        let mut body = completed();
        body["buyer_email"] = json!("buyer@example.com");
        body["payment_link_slug"] = json!("coffee");

        let link = parse(&body).0.unwrap().payment_link.unwrap();

        assert_eq!(link.buyer_email.as_deref(), Some("buyer@example.com"));
        assert_eq!(link.slug.as_deref(), Some("coffee"));
        assert!(link.id.is_none());
    }

    #[test]
    fn all_null_payment_link_fields_mean_no_link() {
        let mut body = completed();
        body["buyer_email"] = Value::Null;
        body["payment_link_id"] = Value::Null;

        assert!(parse(&body).0.unwrap().payment_link.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut body = completed();
        body["confirmations"] = json!(12);

        assert!(parse(&body).0.is_ok());
    }

    #[test]
    fn serializes_back_to_wire_names() {
        let mut body = completed();
        body["payment_link_id"] = json!("pl_1");

        let payload = parse(&body).0.unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["network"], "TRC20");
        assert_eq!(json["event"], "payment.completed");
        assert_eq!(json["payment_link_id"], "pl_1");
        assert!(json.get("payment_link").is_none());
    }
}

mod failures {
    use super::*;

    #[test]
    fn missing_required_field_is_data_error() {
        let mut body = completed();
        body.as_object_mut().unwrap().remove("payment_id");

        let err = parse(&body).0.unwrap_err();

        assert!(err.is_data());
        assert!(err.to_string().contains("payment_id"));
    }

    #[test]
    fn invalid_json_is_syntax_error() {
        let sink = Collect::default();
        let err = parse_with_sink(b"{not json", &sink).unwrap_err();

        assert!(err.is_syntax());
        assert!(err.to_string().starts_with("Invalid webhook payload"));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let (result, _) = parse(&json!([1, 2, 3]));

        assert!(result.is_err());
    }
}

mod unknown_values {
    use super::*;

    #[test]
    fn unknown_network_is_preserved_and_reported() {
        let mut body = completed();
        body["network"] = json!("SOLANA");

        let (result, diagnostics) = parse(&body);

        assert_eq!(result.unwrap().network, Network::Other("SOLANA".into()));
        assert_eq!(diagnostics, vec![Diagnostic::UnknownNetwork("SOLANA".into())]);
    }

    #[test]
    fn unknown_token_is_preserved_and_reported() {
        let mut body = completed();
        body["token"] = json!("DAI");

        let (result, diagnostics) = parse(&body);

        assert_eq!(result.unwrap().token, Token::Other("DAI".into()));
        assert_eq!(diagnostics, vec![Diagnostic::UnknownToken("DAI".into())]);
    }

    #[test]
    fn unknown_event_and_status_are_silent() {
        let mut body = completed();
        body["event"] = json!("payment.refunded");
        body["status"] = json!("refunded");

        let (result, diagnostics) = parse(&body);
        let payload = result.unwrap();

        assert_eq!(payload.event, WebhookEventKind::Other("payment.refunded".into()));
        assert_eq!(payload.status, PaymentStatus::Other("refunded".into()));
        assert!(diagnostics.is_empty());
    }
}
