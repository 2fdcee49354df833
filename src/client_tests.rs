//! Tests for the `PayzCore` facade.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::client::PayzCore;
use crate::config::ClientConfig;
use crate::time::InstantSleeper;
use crate::transport::{
    ApiErrorKind, Credential, HttpClient, HttpError, HttpRequest, HttpResponse, RetryPolicy,
    Transport,
};

/// Always answers 500 and counts calls.
#[derive(Debug, Default)]
struct FailingClient {
    calls: AtomicUsize,
}

impl HttpClient for FailingClient {
    async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HttpResponse::new(
            http::StatusCode::INTERNAL_SERVER_ERROR,
            http::HeaderMap::new(),
            br#"{"error":"boom"}"#.to_vec(),
        ))
    }
}

fn client(policy: RetryPolicy) -> PayzCore<FailingClient, InstantSleeper> {
    let base = url::Url::parse("https://api.payzcore.com").unwrap();
    let transport = Transport::new(FailingClient::default(), &base, &Credential::project_key("pk"))
        .unwrap()
        .with_sleeper(InstantSleeper)
        .with_retry_policy(policy);
    PayzCore::from_transport(transport)
}

#[test]
fn new_applies_config() {
    let config = ClientConfig::new(Credential::project_key("pk_live_abc"))
        .unwrap()
        .with_base_url("http://127.0.0.1:8080/")
        .unwrap()
        .with_timeout(Duration::from_secs(5))
        .unwrap()
        .with_retry_policy(RetryPolicy::new().with_max_retries(4));

    let client = PayzCore::new(config).unwrap();

    assert_eq!(client.transport().base_url(), "http://127.0.0.1:8080");
    assert_eq!(client.transport().retry_policy().max_retries, 4);
    assert!(!client.is_closed());
}

#[tokio::test]
async fn uses_configured_retry_policy() {
    let client = client(RetryPolicy::new().with_max_retries(3));

    let err = client.projects().list().await.unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::Api);
    assert_eq!(err.status(), 500);
    assert_eq!(client.transport().client().calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn close_is_shared_between_clones() {
    let client = client(RetryPolicy::new());
    let clone = client.clone();

    assert!(clone.close());
    assert!(!client.close());
    assert!(client.is_closed());

    let err = client.payments().get("pay_1").await.unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::Network);
    assert_eq!(err.status(), 0);
    assert_eq!(client.transport().client().calls.load(Ordering::SeqCst), 0);
}

#[test]
fn client_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PayzCore>();
}

#[tokio::test]
async fn resource_handles_borrow_shared_transport() {
    let client = client(RetryPolicy::new().with_max_retries(0));

    let payments = client.payments();
    let projects = client.projects();
    let _ = payments.list(&crate::resources::ListPaymentsParams::new()).await;
    let _ = projects.list().await;

    assert_eq!(client.transport().client().calls.load(Ordering::SeqCst), 2);
}
