//! Common test utilities for integration tests.
//!
//! This module provides shared helper functions and re-exports commonly used
//! types for testing the coop client. All integration tests should use
//! these utilities to ensure consistency.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - Every client built here shares nothing with any other client
//!
//! # What this does NOT handle
//! - Endpoint-specific mocks (mount them in the test that needs them)

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

#[allow(unused_imports)]
pub use coop_client::testing::{load_fixture, user};
#[allow(unused_imports)]
pub use coop_client::{
    ApiClient, CSRF_HEADER, ChannelObserver, ClientError, Credentials, MemoryStore,
    SessionEvent, SessionManager, SessionObserver, SessionStore,
};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client bound to the mock server with an in-memory store.
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::builder()
        .base_url(server.uri())
        .build()
        .expect("client builds")
}

/// Client bound to the mock server reporting to `observer`.
#[allow(dead_code)]
pub fn client_with_observer(server: &MockServer, observer: Arc<dyn SessionObserver>) -> ApiClient {
    ApiClient::builder()
        .base_url(server.uri())
        .observer(observer)
        .build()
        .expect("client builds")
}

/// Client bound to an address nothing listens on.
#[allow(dead_code)]
pub fn unreachable_client() -> ApiClient {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    ApiClient::builder()
        .base_url(format!("http://127.0.0.1:{port}"))
        .build()
        .expect("client builds")
}

#[allow(dead_code)]
pub fn credentials() -> Credentials {
    Credentials::new("ana", "secreto")
}

/// Values of `X-CSRFToken` on every request the server received for `path`.
#[allow(dead_code)]
pub async fn csrf_headers_for(server: &MockServer, path: &str) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .iter()
        .filter(|r| r.url.path() == path)
        .map(|r| {
            r.headers
                .get(CSRF_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .collect()
}

/// Drain every event published so far.
#[allow(dead_code)]
pub fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Origin answering canned JSON per path, holding back one path until released.
///
/// wiremock answers from a single-threaded runtime while holding its state
/// lock, so a responder cannot wait on the test; this origin can.
#[allow(dead_code)]
pub struct GatedOrigin {
    uri: String,
    gate: Arc<Notify>,
}

#[allow(dead_code)]
impl GatedOrigin {
    /// Serve `ready` immediately and `held` only after [`GatedOrigin::release`].
    pub async fn start(ready: (&str, Value), held: (&str, Value)) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let uri = format!("http://{}", listener.local_addr().expect("addr"));
        let gate = Arc::new(Notify::new());

        let routes: Arc<HashMap<String, (Value, bool)>> = Arc::new(HashMap::from([
            (ready.0.to_string(), (ready.1, false)),
            (held.0.to_string(), (held.1, true)),
        ]));
        let server_gate = gate.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve_one(stream, routes.clone(), server_gate.clone()));
            }
        });

        Self { uri, gate }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Let the held response go out. A release before the request arrives is kept.
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[allow(dead_code)]
async fn serve_one(
    mut stream: TcpStream,
    routes: Arc<HashMap<String, (Value, bool)>>,
    gate: Arc<Notify>,
) {
    // Headers only: every request sent here is a bodiless GET.
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&chunk[..n]),
        }
    }
    let head = String::from_utf8_lossy(&head);
    let path = head.split_whitespace().nth(1).unwrap_or("/");

    let (status, body) = match routes.get(path) {
        Some((body, held)) => {
            if *held {
                gate.notified().await;
            }
            ("200 OK", body.to_string())
        }
        None => ("404 Not Found", "{}".to_string()),
    };
    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
