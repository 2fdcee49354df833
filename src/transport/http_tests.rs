//! Tests for HTTP request/response types and errors.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

fn url() -> url::Url {
    url::Url::parse("https://api.payzcore.com/v1/payments").unwrap()
}

mod http_request {
    use super::*;

    #[test]
    fn new_creates_request_with_method_and_url() {
        let req = HttpRequest::new(http::Method::PATCH, url());

        assert_eq!(req.method, http::Method::PATCH);
        assert_eq!(req.url, url());
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn with_body_sets_body() {
        let body = br#"{"amount":50}"#.to_vec();
        let req = HttpRequest::new(http::Method::POST, url()).with_body(body.clone());

        assert_eq!(req.body, Some(body));
    }

    #[test]
    fn with_headers_replaces_headers() {
        let mut headers = http::HeaderMap::new();
        headers.insert("x-api-key", http::HeaderValue::from_static("pk_test"));

        let req = HttpRequest::new(http::Method::GET, url()).with_headers(headers);

        assert_eq!(req.headers.get("x-api-key").unwrap(), "pk_test");
        assert_eq!(req.headers.len(), 1);
    }
}

mod http_response {
    use super::*;

    #[test]
    fn is_success_covers_2xx_only() {
        let ok = HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), vec![]);
        let created = HttpResponse::new(http::StatusCode::CREATED, http::HeaderMap::new(), vec![]);
        let not_found =
            HttpResponse::new(http::StatusCode::NOT_FOUND, http::HeaderMap::new(), vec![]);

        assert!(ok.is_success());
        assert!(created.is_success());
        assert!(!not_found.is_success());
    }

    #[test]
    fn header_str_is_case_insensitive() {
        let mut headers = http::HeaderMap::new();
        headers.insert("x-ratelimit-reset", http::HeaderValue::from_static("60"));
        let resp = HttpResponse::new(http::StatusCode::TOO_MANY_REQUESTS, headers, vec![]);

        assert_eq!(resp.header_str("X-RateLimit-Reset"), Some("60"));
        assert_eq!(resp.header_str("x-ratelimit-daily"), None);
    }

    #[test]
    fn header_str_skips_non_utf8_values() {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            "x-ratelimit-reset",
            http::HeaderValue::from_bytes(&[0xFF, 0xFE]).unwrap(),
        );
        let resp = HttpResponse::new(http::StatusCode::TOO_MANY_REQUESTS, headers, vec![]);

        assert_eq!(resp.header_str("x-ratelimit-reset"), None);
    }
}

mod http_error {
    use super::*;
    use std::error::Error;

    #[test]
    fn connection_error_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = HttpError::Connection(Box::new(io));

        assert!(err.to_string().contains("refused"));
        assert!(err.source().is_some());
    }

    #[test]
    fn transient_errors_are_retryable() {
        let io = std::io::Error::other("reset");

        assert!(HttpError::Connection(Box::new(io)).is_retryable());
        assert!(HttpError::Timeout.is_retryable());
    }

    #[test]
    fn configuration_errors_are_not_retryable() {
        assert!(!HttpError::InvalidUrl("bad".into()).is_retryable());
        assert!(!HttpError::Closed.is_retryable());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpError>();
    }
}

mod http_client_trait {
    use super::*;

    struct StaticClient;

    impl HttpClient for StaticClient {
        async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
            Ok(HttpResponse::new(
                http::StatusCode::OK,
                http::HeaderMap::new(),
                b"{}".to_vec(),
            ))
        }
    }

    #[tokio::test]
    async fn default_close_is_a_no_op() {
        let client = StaticClient;

        client.close();
        client.close();
        let resp = client
            .request(HttpRequest::new(http::Method::GET, url()))
            .await
            .unwrap();

        assert!(resp.is_success());
    }
}
