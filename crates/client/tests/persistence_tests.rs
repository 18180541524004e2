//! Persisted client state tests.
//!
//! This module tests that session state written through one client is
//! visible to a fresh client sharing the same state file, which is how
//! a restarted process resumes its session.
//!
//! # Invariants
//! - Login writes both `user_data` and `csrf_token` to the file
//! - Logout removes both
//! - The server's session cookie is kept beside the state file and removed on logout
//!
//! # What this does NOT handle
//! - File format details (see the `store::file` unit tests)

mod common;

use std::path::Path;

use common::*;
use coop_client::FileStore;
use coop_config::Config;
use tempfile::TempDir;
use wiremock::matchers::{header_regex, method, path};

fn file_client(server: &MockServer, state_path: &Path) -> ApiClient {
    let config = Config::with_base_url(server.uri(), state_path.to_path_buf());
    ApiClient::builder().from_config(&config).build().unwrap()
}

#[tokio::test]
async fn test_session_survives_restart_and_logout_clears_file() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("session.json");

    Mock::given(method("GET"))
        .and(path("/api/auth/csrf/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("auth/csrf.json")))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("auth/login_success.json")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/status/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(load_fixture("auth/status_authenticated.json")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let first = SessionManager::new(file_client(&mock_server, &state_path));
    first.login(&credentials()).await.unwrap();
    drop(first);

    let on_disk = FileStore::new(&state_path);
    assert_eq!(on_disk.get(coop_client::CSRF_TOKEN_KEY).as_deref(), Some("abc123"));
    assert!(on_disk.get(coop_client::USER_DATA_KEY).is_some());

    let second = SessionManager::new(file_client(&mock_server, &state_path));
    let user = second.bootstrap().await.unwrap();
    assert_eq!(user.username.as_deref(), Some("ana"));
    assert_eq!(
        csrf_headers_for(&mock_server, "/api/auth/status/").await,
        vec![Some("abc123".to_string())]
    );

    second.logout().await;
    assert!(on_disk.get(coop_client::CSRF_TOKEN_KEY).is_none());
    assert!(on_disk.get(coop_client::USER_DATA_KEY).is_none());
}

#[tokio::test]
async fn test_session_cookie_resumed_after_restart() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("session.json");
    let config = Config::with_base_url(mock_server.uri(), state_path.clone());

    Mock::given(method("GET"))
        .and(path("/api/auth/csrf/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("auth/csrf.json")))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "sessionid=s1; Path=/; HttpOnly")
                .set_body_json(load_fixture("auth/login_success.json")),
        )
        .mount(&mock_server)
        .await;
    // Only a request carrying the session cookie is authenticated.
    Mock::given(method("GET"))
        .and(path("/api/auth/status/"))
        .and(header_regex("cookie", r"(^|; )sessionid=s1(;|$)"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(load_fixture("auth/status_authenticated.json")),
        )
        .with_priority(1)
        .mount(&mock_server)
        .await;
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
        .mount(&mock_server)
        .await;

    let first = SessionManager::new(file_client(&mock_server, &state_path));
    first.login(&credentials()).await.unwrap();
    assert!(first.check_session().await.unwrap().authenticated);
    drop(first);
    assert!(config.cookie_path().exists());

    let second = SessionManager::new(file_client(&mock_server, &state_path));
    let user = second.bootstrap().await;
    assert_eq!(user.and_then(|u| u.username).as_deref(), Some("ana"));

    second.logout().await;
    assert!(!config.cookie_path().exists());

    let third = SessionManager::new(file_client(&mock_server, &state_path));
    assert!(third.bootstrap().await.is_none());
    assert!(!third.check_session().await.unwrap().authenticated);
}
