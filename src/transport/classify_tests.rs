//! Tests for status and transport-failure classification.

use super::classify::{Outcome, classify_response, classify_transport_error};
use super::{ApiErrorKind, HttpError, HttpResponse, error_from_response};
use serde_json::json;

fn response(status: u16, body: &[u8]) -> HttpResponse {
    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        body.to_vec(),
    )
}

fn response_with_headers(status: u16, body: &[u8], headers: &[(&str, &str)]) -> HttpResponse {
    let mut resp = response(status, body);
    for (name, value) in headers {
        resp.headers.insert(
            http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
            http::HeaderValue::from_str(value).unwrap(),
        );
    }
    resp
}

mod status_mapping {
    use super::*;

    #[test]
    fn each_client_status_maps_to_its_kind() {
        let cases = [
            (400, ApiErrorKind::Validation, "validation_error"),
            (401, ApiErrorKind::Authentication, "authentication_error"),
            (403, ApiErrorKind::Forbidden, "forbidden"),
            (404, ApiErrorKind::NotFound, "not_found"),
            (409, ApiErrorKind::Idempotency, "idempotency_error"),
            (429, ApiErrorKind::RateLimit, "rate_limit_error"),
        ];

        for (status, kind, code) in cases {
            let err = error_from_response(&response(status, br#"{"error":"nope"}"#));
            assert_eq!(err.kind(), kind, "status {status}");
            assert_eq!(err.code(), code, "status {status}");
            assert_eq!(err.status(), status);
            assert_eq!(err.message(), "nope");
        }
    }

    #[test]
    fn server_and_unlisted_statuses_are_generic() {
        for status in [402, 405, 422, 500, 502, 503] {
            let err = error_from_response(&response(status, b"{}"));
            assert_eq!(err.kind(), ApiErrorKind::Api, "status {status}");
            assert_eq!(err.code(), "api_error");
        }
    }
}

mod error_body {
    use super::*;

    #[test]
    fn message_comes_from_error_field() {
        let err = error_from_response(&response(500, br#"{"error":"database unavailable"}"#));

        assert_eq!(err.message(), "database unavailable");
    }

    #[test]
    fn json_without_error_field_is_unknown_error() {
        let err = error_from_response(&response(404, br#"{"status":"missing"}"#));

        assert_eq!(err.message(), "Unknown error");
    }

    #[test]
    fn non_json_body_uses_reason_phrase() {
        let err = error_from_response(&response(502, b"<html>bad gateway</html>"));

        assert_eq!(err.message(), "Bad Gateway");
        assert_eq!(err.status(), 502);
    }

    #[test]
    fn non_json_body_without_reason_phrase_is_unknown_error() {
        let err = error_from_response(&response(599, b"oops"));

        assert_eq!(err.message(), "Unknown error");
    }

    #[test]
    fn validation_error_carries_details() {
        let body = json!({
            "error": "Invalid amount",
            "details": [{"path": ["amount"], "message": "must be positive"}]
        });
        let err = error_from_response(&response(400, body.to_string().as_bytes()));

        let details = err.details().unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0]["message"], "must be positive");
    }

    #[test]
    fn validation_error_without_details_has_none() {
        let err = error_from_response(&response(400, br#"{"error":"bad"}"#));

        assert!(err.details().is_none());
    }

    #[test]
    fn details_only_attached_for_validation() {
        let err = error_from_response(&response(404, br#"{"error":"x","details":[1]}"#));

        assert!(err.details().is_none());
    }
}

mod rate_limit {
    use super::*;

    #[test]
    fn reads_reset_and_daily_headers() {
        let resp = response_with_headers(
            429,
            br#"{"error":"Daily limit reached"}"#,
            &[("X-RateLimit-Reset", "1704067200"), ("X-RateLimit-Daily", "true")],
        );

        let err = error_from_response(&resp);

        assert_eq!(err.retry_after(), Some(1_704_067_200));
        assert!(err.is_daily_limit());
    }

    #[test]
    fn missing_headers_mean_no_retry_after_and_not_daily() {
        let err = error_from_response(&response(429, br#"{"error":"slow down"}"#));

        assert_eq!(err.retry_after(), None);
        assert!(!err.is_daily_limit());
        assert!(err.rate_limit().is_some());
    }

    #[test]
    fn daily_flag_requires_exact_true() {
        for value in ["True", "1", "yes", "TRUE"] {
            let resp = response_with_headers(429, b"{}", &[("x-ratelimit-daily", value)]);
            assert!(!error_from_response(&resp).is_daily_limit(), "value {value}");
        }
    }

    #[test]
    fn non_integer_reset_is_ignored() {
        let resp = response_with_headers(429, b"{}", &[("x-ratelimit-reset", "soon")]);

        assert_eq!(error_from_response(&resp).retry_after(), None);
    }

    #[test]
    fn rate_limit_info_only_on_429() {
        let resp = response_with_headers(503, b"{}", &[("x-ratelimit-reset", "30")]);

        assert!(error_from_response(&resp).rate_limit().is_none());
    }
}

mod outcomes {
    use super::*;

    #[test]
    fn success_body_is_parsed() {
        let outcome = classify_response(&response(200, br#"{"success":true}"#));

        assert!(matches!(outcome, Outcome::Success(v) if v == json!({"success": true})));
    }

    #[test]
    fn empty_success_body_is_null() {
        let outcome = classify_response(&response(204, b""));

        assert!(matches!(outcome, Outcome::Success(serde_json::Value::Null)));
    }

    #[test]
    fn invalid_success_body_is_terminal() {
        let outcome = classify_response(&response(200, b"not json"));

        let Outcome::Terminal(err) = outcome else {
            panic!("expected terminal outcome");
        };
        assert_eq!(err.kind(), ApiErrorKind::Api);
        assert_eq!(err.status(), 200);
    }

    #[test]
    fn server_errors_are_retryable() {
        for status in [500, 502, 503, 504] {
            assert!(matches!(
                classify_response(&response(status, b"{}")),
                Outcome::Retryable(_)
            ));
        }
    }

    #[test]
    fn client_errors_and_429_are_terminal() {
        for status in [400, 401, 403, 404, 408, 409, 422, 429] {
            assert!(
                matches!(
                    classify_response(&response(status, b"{}")),
                    Outcome::Terminal(_)
                ),
                "status {status}"
            );
        }
    }

    #[test]
    fn transient_transport_failures_are_retryable_network_errors() {
        let Outcome::Retryable(err) = classify_transport_error(HttpError::Timeout) else {
            panic!("expected retryable outcome");
        };

        assert_eq!(err.kind(), ApiErrorKind::Network);
        assert_eq!(err.status(), 0);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn closed_client_is_terminal() {
        assert!(matches!(
            classify_transport_error(HttpError::Closed),
            Outcome::Terminal(_)
        ));
    }
}
