//! CSRF-aware request/response interceptor.
//!
//! Every call made through [`crate::ApiClient`] passes through this pipeline:
//!
//! - Request phase: unless the URL is the login or CSRF-seed endpoint, the
//!   current token (persisted state first, then the `csrftoken` cookie) is
//!   attached as `X-CSRFToken`. A missing token is not an error.
//! - Response phase, success: a `csrf_token` body field is persisted, then the
//!   `csrftoken` cookie is re-read and, when present, persisted as well.
//!   The cookie write comes last and wins.
//! - Response phase, 401/403: unless the request opted out, and unless the
//!   host is on its login route, both persisted entries and the cookie jar
//!   are cleared and a
//!   [`SessionEvent::Expired`] is published. The error is always re-raised
//!   by the caller.
//!
//! # Invariants
//! - The interceptor never fails; it only decorates requests and records state.
//! - The token store is a last-write-wins register shared by all in-flight calls.

use std::fmt;
use std::sync::Arc;

use reqwest::{RequestBuilder, Url};
use serde_json::Value;
use tracing::debug;

use crate::cookies::CookieSource;
use crate::endpoints::{CSRF_PATH, LOGIN_PATH};
use crate::error::ClientError;
use crate::metrics::MetricsCollector;
use crate::observer::{SessionEvent, SessionObserver};
use crate::store::SessionState;

/// Request header carrying the CSRF token.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Response body field carrying a fresh CSRF token.
pub const CSRF_BODY_FIELD: &str = "csrf_token";

/// Per-request switches for the response phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Propagate 401/403 without clearing state or publishing events.
    pub skip_auth_handling: bool,
}

impl RequestOptions {
    /// Options for calls that must tolerate authentication failures (logout, seed fetch).
    pub fn tolerant() -> Self {
        Self {
            skip_auth_handling: true,
        }
    }
}

/// Where the token attached to a request came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Stored(String),
    Cookie(String),
}

impl TokenSource {
    pub fn value(&self) -> &str {
        match self {
            Self::Stored(v) | Self::Cookie(v) => v,
        }
    }
}

/// The CSRF interceptor pipeline shared by every request of one client.
#[derive(Clone)]
pub struct CsrfInterceptor {
    state: SessionState,
    cookies: CookieSource,
    observer: Arc<dyn SessionObserver>,
    metrics: Option<MetricsCollector>,
}

impl CsrfInterceptor {
    pub fn new(
        state: SessionState,
        cookies: CookieSource,
        observer: Arc<dyn SessionObserver>,
        metrics: Option<MetricsCollector>,
    ) -> Self {
        Self {
            state,
            cookies,
            observer,
            metrics,
        }
    }

    /// Requests to the login and CSRF-seed endpoints never carry a token.
    pub fn is_exempt(url: &Url) -> bool {
        let path = url.path();
        path.ends_with(LOGIN_PATH) || path.ends_with(CSRF_PATH)
    }

    /// Current token: persisted state first, then the `csrftoken` cookie.
    pub fn resolve_token(&self) -> Option<TokenSource> {
        if let Some(token) = self.state.token() {
            return Some(TokenSource::Stored(token));
        }
        self.cookies.csrf_token().map(TokenSource::Cookie)
    }

    /// Token to attach to a request for `url`, if any.
    pub fn token_for(&self, url: &Url) -> Option<String> {
        if Self::is_exempt(url) {
            return None;
        }
        self.resolve_token().map(|source| source.value().to_string())
    }

    /// Request phase.
    pub fn on_request(&self, url: &Url, builder: RequestBuilder) -> RequestBuilder {
        match self.token_for(url) {
            Some(token) => builder.header(CSRF_HEADER, token),
            None => {
                debug!(url = %url, "Sending request without CSRF token");
                builder
            }
        }
    }

    /// Response phase for a successful response.
    pub fn on_response(&self, body: Option<&Value>) {
        if let Some(token) = body
            .and_then(|b| b.get(CSRF_BODY_FIELD))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
        {
            debug!("Storing CSRF token from response body");
            self.state.set_token(token);
        }

        if let Some(token) = self.cookies.csrf_token() {
            self.state.set_token(&token);
        }
    }

    /// Response phase for a failed response. Returns true when the session was torn down.
    pub fn on_error(&self, error: &ClientError, options: RequestOptions) -> bool {
        let Some(status) = error.status().filter(|s| ClientError::is_auth_status(*s)) else {
            return false;
        };

        if options.skip_auth_handling {
            debug!(status, "Auth failure on tolerant request, leaving session untouched");
            return false;
        }

        if self.observer.on_login_page() {
            debug!(status, "Auth failure while on login route, no teardown");
            return false;
        }

        tracing::info!(status, "Authentication rejected, clearing session");
        self.state.clear();
        self.cookies.clear();
        if let Some(metrics) = &self.metrics {
            metrics.record_session_teardown(status);
        }
        self.observer.notify(SessionEvent::expired(status));
        true
    }
}

impl fmt::Debug for CsrfInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrfInterceptor")
            .field("state", &self.state)
            .field("cookies", &self.cookies)
            .finish_non_exhaustive()
    }
}
