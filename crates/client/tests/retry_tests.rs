//! Retry behavior tests.
//!
//! This module tests the request dispatcher's retry logic:
//! - No retries by default
//! - 502/503/504/429 retried with exponential backoff when enabled
//! - 500 and auth failures never retried
//!
//! # Invariants
//! - `max_retries = 0` sends each request exactly once
//! - Exhausted retries surface `MaxRetriesExceeded`
//!
//! # What this does NOT handle
//! - Session teardown (see interceptor_tests.rs)

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};

fn retrying_client(server: &MockServer, retries: usize) -> ApiClient {
    ApiClient::builder()
        .base_url(server.uri())
        .max_retries(retries)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/campanias/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get::<Value>("/api/campanias/")
        .await
        .unwrap_err();

    match err {
        ClientError::ApiError {
            status, message, ..
        } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_retry_on_503_then_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/campanias/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/campanias/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let start = std::time::Instant::now();
    let result: Value = retrying_client(&mock_server, 2)
        .get("/api/campanias/")
        .await
        .unwrap();

    assert_eq!(result, json!([]));
    // One backoff of 2^0 = 1 second.
    assert!(start.elapsed() >= std::time::Duration::from_millis(900));
}

#[tokio::test]
async fn test_retry_exhaustion() {
    let mock_server = MockServer::start().await;
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_clone = attempts.clone();

    Mock::given(method("POST"))
        .and(path("/api/labores/"))
        .respond_with(move |_: &wiremock::Request| {
            attempts_clone.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(429)
        })
        .mount(&mock_server)
        .await;

    let err = retrying_client(&mock_server, 1)
        .post::<Value, _>("/api/labores/", &json!({"tipo": "siembra"}))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::MaxRetriesExceeded(2)));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_no_retry_on_500_or_auth_failure() {
    for status in [500u16, 401] {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/socios/"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = retrying_client(&mock_server, 3)
            .get::<Value>("/api/socios/")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(status));
    }
}

#[tokio::test]
async fn test_request_id_captured() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/socios/"))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("X-Request-Id", "req-42")
                .set_body_json(json!({"message": "Filtro inválido"})),
        )
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get::<Value>("/api/socios/")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Filtro inválido"));
    assert!(err.to_string().contains("[Request ID: req-42]"));
}
