//! Session lifecycle tests.
//!
//! This module tests [`SessionManager`] against a mock server:
//! - Two-phase login (seed fetch, credential submit) and its token precedence
//! - Login failure paths and the cleared state they leave behind
//! - Logout tolerance
//! - Session checks, bootstrap, and admin pass-through calls
//!
//! # Invariants
//! - A failed login leaves `user_data` and `csrf_token` absent
//! - A failing seed fetch never fails the login
//! - `logout` never returns an error
//! - `check_session` failures always read "Sesión expirada"
//!
//! # What this does NOT handle
//! - Token propagation on ordinary calls (see interceptor_tests.rs)

mod common;

use std::sync::Arc;

use common::*;
use coop_client::{CSRF_TOKEN_KEY, USER_DATA_KEY};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};

async fn mount_seed(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/auth/csrf/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("auth/csrf.json")))
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_round_trip() {
    let mock_server = MockServer::start().await;
    mount_seed(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({"username": "ana", "password": "secreto"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("auth/login_success.json")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/parcelas/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let manager = SessionManager::new(client_for(&mock_server));
    let outcome = manager.login(&credentials()).await.unwrap();

    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({"usuario": {"id": 1, "username": "ana"}, "csrf_token": "abc123"})
    );
    assert_eq!(manager.client().state().user(), Some(user(1, "ana")));
    assert_eq!(manager.current_user(), Some(user(1, "ana")));

    let _: Value = manager.client().get("/api/parcelas/").await.unwrap();
    assert_eq!(
        csrf_headers_for(&mock_server, "/api/parcelas/").await,
        vec![Some("abc123".to_string())]
    );
}

#[tokio::test]
async fn test_login_sends_seed_token() {
    let mock_server = MockServer::start().await;
    mount_seed(&mock_server).await;
    mount_login(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(load_fixture("auth/login_success.json")),
    )
    .await;

    let manager = SessionManager::new(client_for(&mock_server));
    manager.login(&credentials()).await.unwrap();

    assert_eq!(
        csrf_headers_for(&mock_server, "/api/auth/login/").await,
        vec![Some("seed-token".to_string())]
    );
}

#[tokio::test]
async fn test_login_token_falls_back_to_cookie_then_seed() {
    let mock_server = MockServer::start().await;
    mount_seed(&mock_server).await;
    mount_login(
        &mock_server,
        ResponseTemplate::new(200)
            .insert_header("set-cookie", "csrftoken=cookie-token; Path=/")
            .set_body_json(json!({"usuario": {"id": 1, "username": "ana"}})),
    )
    .await;

    let manager = SessionManager::new(client_for(&mock_server));
    let outcome = manager.login(&credentials()).await.unwrap();
    assert_eq!(outcome.token.as_deref(), Some("cookie-token"));

    let mock_server = MockServer::start().await;
    mount_seed(&mock_server).await;
    mount_login(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(json!({"usuario": {"id": 1}})),
    )
    .await;

    let manager = SessionManager::new(client_for(&mock_server));
    let outcome = manager.login(&credentials()).await.unwrap();
    assert_eq!(outcome.token.as_deref(), Some("seed-token"));
    assert_eq!(manager.client().state().token().as_deref(), Some("seed-token"));
}

#[tokio::test]
async fn test_login_survives_seed_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/csrf/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_login(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(load_fixture("auth/login_success.json")),
    )
    .await;

    let manager = SessionManager::new(client_for(&mock_server));
    let outcome = manager.login(&credentials()).await.unwrap();

    assert_eq!(outcome.token.as_deref(), Some("abc123"));
    assert_eq!(
        csrf_headers_for(&mock_server, "/api/auth/login/").await,
        vec![None]
    );
}

#[tokio::test]
async fn test_login_seed_403_does_not_tear_down() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/csrf/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;
    mount_login(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(load_fixture("auth/login_success.json")),
    )
    .await;

    let (observer, mut rx) = ChannelObserver::new();
    let manager = SessionManager::new(client_with_observer(&mock_server, Arc::new(observer)));
    manager.login(&credentials()).await.unwrap();

    let events = drain(&mut rx);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, SessionEvent::Expired { .. })),
        "unexpected events: {events:?}"
    );
    assert!(events.contains(&SessionEvent::LoggedIn {
        username: Some("ana".to_string())
    }));
}

/// Seed a previous session so failures can be checked for leftovers.
fn with_stale_session(manager: &SessionManager) {
    let state = manager.client().state();
    state.set_user(&user(99, "previo"));
    state.set_token("stale");
}

#[tokio::test]
async fn test_login_rejected_uses_server_message() {
    let mock_server = MockServer::start().await;
    mount_seed(&mock_server).await;
    mount_login(
        &mock_server,
        ResponseTemplate::new(401).set_body_json(load_fixture("auth/login_invalid_creds.json")),
    )
    .await;

    let manager = SessionManager::new(client_for(&mock_server));
    with_stale_session(&manager);

    let err = manager.login(&credentials()).await.unwrap_err();

    match err {
        ClientError::AuthFailed(message) => assert_eq!(message, "Credenciales inválidas"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(manager.client().state().is_cleared());
    assert!(!manager.is_authenticated());
}

#[tokio::test]
async fn test_login_rejected_without_message() {
    let mock_server = MockServer::start().await;
    mount_seed(&mock_server).await;
    mount_login(
        &mock_server,
        ResponseTemplate::new(500).set_body_string("<h1>Server Error</h1>"),
    )
    .await;

    let manager = SessionManager::new(client_for(&mock_server));
    let err = manager.login(&credentials()).await.unwrap_err();

    assert_eq!(err.to_string(), "Authentication failed: Error 500");
    assert!(manager.client().state().is_cleared());
}

#[tokio::test]
async fn test_login_missing_user_is_malformed() {
    let mock_server = MockServer::start().await;
    mount_seed(&mock_server).await;
    mount_login(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(load_fixture("auth/login_missing_user.json")),
    )
    .await;

    let manager = SessionManager::new(client_for(&mock_server));
    with_stale_session(&manager);

    let err = manager.login(&credentials()).await.unwrap_err();

    match err {
        ClientError::InvalidResponse(message) => {
            assert_eq!(message, coop_client::error::MISSING_USER_MESSAGE)
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(manager.client().state().is_cleared());
}

#[tokio::test]
async fn test_login_network_failure_clears_state() {
    let manager = SessionManager::new(unreachable_client());
    with_stale_session(&manager);

    let err = manager.login(&credentials()).await.unwrap_err();

    assert!(err.is_transport_error());
    assert!(manager.client().state().is_cleared());
}

#[tokio::test]
async fn test_logout_clears_state_on_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = SessionManager::new(client_for(&mock_server));
    with_stale_session(&manager);
    manager.logout().await;

    assert!(manager.client().state().is_cleared());
    let headers = csrf_headers_for(&mock_server, "/api/auth/logout/").await;
    assert_eq!(headers, vec![Some("stale".to_string())]);
}

#[tokio::test]
async fn test_logout_tolerates_server_rejection() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let (observer, mut rx) = ChannelObserver::new();
    let manager = SessionManager::new(client_with_observer(&mock_server, Arc::new(observer)));
    with_stale_session(&manager);

    manager.logout().await;

    assert!(manager.client().state().is_cleared());
    assert_eq!(drain(&mut rx), vec![SessionEvent::LoggedOut]);
}

#[tokio::test]
async fn test_logout_tolerates_network_failure() {
    let manager = SessionManager::new(unreachable_client());
    with_stale_session(&manager);

    manager.logout().await;

    let store = manager.client().state();
    assert!(store.user().is_none());
    assert!(store.token().is_none());
}

#[tokio::test]
async fn test_check_session_network_failure_message() {
    let manager = SessionManager::new(unreachable_client());
    let err = manager.check_session().await.unwrap_err();
    assert_eq!(err.to_string(), "Sesión expirada");
}

#[tokio::test]
async fn test_check_session_http_failure_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/status/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let manager = SessionManager::new(client_for(&mock_server));
    let err = manager.check_session().await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired));
}

#[tokio::test]
async fn test_check_session_refreshes_user() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/status/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(load_fixture("auth/status_authenticated.json")),
        )
        .mount(&mock_server)
        .await;

    let manager = SessionManager::new(client_for(&mock_server));
    let status = manager.check_session().await.unwrap();

    assert!(status.authenticated);
    let stored = manager.client().state().user().unwrap();
    assert_eq!(stored.email.as_deref(), Some("ana@coop.example"));
    assert!(manager.is_staff());
}

#[tokio::test]
async fn test_check_session_anonymous_leaves_user_untouched() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/status/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("auth/status_anonymous.json")),
        )
        .mount(&mock_server)
        .await;

    let manager = SessionManager::new(client_for(&mock_server));
    let status = manager.check_session().await.unwrap();

    assert!(!status.authenticated);
    assert!(manager.client().state().user().is_none());
}

#[tokio::test]
async fn test_bootstrap_validates_persisted_user() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/status/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(load_fixture("auth/status_authenticated.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.set(USER_DATA_KEY, r#"{"id":1,"username":"ana"}"#);
    store.set(CSRF_TOKEN_KEY, "persisted");
    let client = ApiClient::builder()
        .base_url(mock_server.uri())
        .store(store)
        .build()
        .unwrap();
    let manager = SessionManager::new(client);

    let user = manager.bootstrap().await.unwrap();

    assert_eq!(user.username.as_deref(), Some("ana"));
    assert_eq!(
        csrf_headers_for(&mock_server, "/api/auth/status/").await,
        vec![Some("persisted".to_string())]
    );
}

#[tokio::test]
async fn test_bootstrap_failure_logs_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/status/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = SessionManager::new(client_for(&mock_server));
    with_stale_session(&manager);

    assert!(manager.bootstrap().await.is_none());
    assert!(manager.client().state().is_cleared());
    assert!(!manager.is_authenticated());
}

#[tokio::test]
async fn test_bootstrap_unauthenticated_logs_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/status/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("auth/status_anonymous.json")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = SessionManager::new(client_for(&mock_server));
    with_stale_session(&manager);

    assert!(manager.bootstrap().await.is_none());
    assert!(manager.client().state().is_cleared());
}

#[tokio::test]
async fn test_session_info_passes_through() {
    let mock_server = MockServer::start().await;
    let fixture = load_fixture("auth/session_info.json");
    Mock::given(method("GET"))
        .and(path("/api/auth/session-info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&fixture))
        .mount(&mock_server)
        .await;

    let manager = SessionManager::new(client_for(&mock_server));
    assert_eq!(manager.session_info().await.unwrap(), fixture);
}

#[tokio::test]
async fn test_admin_calls_propagate_errors() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/invalidate-sessions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"invalidadas": 4})))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/force-logout/7/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "No existe"})))
        .mount(&mock_server)
        .await;

    let manager = SessionManager::new(client_for(&mock_server));

    assert_eq!(
        manager.invalidate_all_sessions().await.unwrap(),
        json!({"invalidadas": 4})
    );
    let err = manager.force_logout_user(7).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}
