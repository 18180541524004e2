//! Client builder for constructing [`ApiClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Normalizing the base URL (removing trailing slashes)
//! - Wiring the shared cookie jar, session state, observer and interceptor
//! - Configuring the underlying HTTP client (JSON headers, timeouts, TLS verification)
//!
//! # What this module does NOT handle:
//! - Actual API calls (handled by [`ApiClient`] methods in `mod.rs`)
//! - Session lifecycle (handled by [`crate::auth::SessionManager`])
//!
//! # Invariants
//! - `base_url` is required and must parse as an absolute http(s) URL
//! - No request timeout is applied unless one is configured
//! - `skip_verify` only affects HTTPS connections; HTTP connections log a warning

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::Url;

use coop_config::Config;
use coop_config::constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES};

use super::{ApiClient, Inner};
use crate::cookies::{CookieJar, CookieSource};
use crate::error::{ClientError, Result};
use crate::interceptor::CsrfInterceptor;
use crate::metrics::MetricsCollector;
use crate::observer::{LoggingObserver, SessionObserver};
use crate::store::{FileStore, MemoryStore, SessionState, SessionStore};

/// Builder for creating a new [`ApiClient`].
///
/// # Example
///
/// ```rust,ignore
/// use coop_client::{ApiClient, FileStore};
/// use std::sync::Arc;
///
/// let client = ApiClient::builder()
///     .base_url("https://coop.example.com".to_string())
///     .store(Arc::new(FileStore::new("/tmp/session.json")))
///     .build()?;
/// ```
pub struct ApiClientBuilder {
    base_url: Option<String>,
    store: Option<Arc<dyn SessionStore>>,
    cookie_jar: Option<Arc<CookieJar>>,
    observer: Option<Arc<dyn SessionObserver>>,
    skip_verify: bool,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_retries: usize,
    metrics: Option<MetricsCollector>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            store: None,
            cookie_jar: None,
            observer: None,
            skip_verify: false,
            timeout: None,
            connect_timeout: None,
            max_retries: DEFAULT_MAX_RETRIES,
            metrics: None,
        }
    }
}

impl ApiClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API origin, e.g. `https://coop.example.com`.
    ///
    /// Trailing slashes will be automatically removed.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the persistent store. Defaults to an in-memory store.
    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the cookie jar. Defaults to an in-memory jar.
    pub fn cookie_jar(mut self, jar: Arc<CookieJar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Set the host observer. Defaults to [`LoggingObserver`].
    pub fn observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Set whether to skip TLS certificate verification.
    ///
    /// # Security Warning
    /// Only use this in development or testing environments.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Set the total request timeout. Unset by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout. Unset by default.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries for 429/502/503/504 responses.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the metrics collector for API call performance tracking.
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create a client builder from configuration.
    ///
    /// Session state is persisted to `config.state_path` and the server's
    /// cookies to `config.cookie_path()`, so a later process resumes the session.
    pub fn from_config(mut self, config: &Config) -> Self {
        self.base_url = Some(config.connection.base_url.clone());
        self.skip_verify = config.connection.skip_verify;
        self.timeout = config.connection.timeout;
        self.connect_timeout = config.connection.connect_timeout;
        self.max_retries = config.connection.max_retries;
        self.store = Some(Arc::new(FileStore::new(config.state_path.clone())));
        self.cookie_jar = Some(Arc::new(CookieJar::persistent(config.cookie_path())));
        self
    }

    /// Normalize a base URL by removing trailing slashes.
    ///
    /// - `"https://coop.example.com/"` -> `"https://coop.example.com"`
    /// - `"https://coop.example.com//"` -> `"https://coop.example.com"`
    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Build the [`ApiClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` is missing or unparseable.
    /// Returns `ClientError::HttpError` if the HTTP client fails to build.
    pub fn build(self) -> Result<ApiClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = Self::normalize_base_url(base_url);
        let origin = Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }

        let jar = self
            .cookie_jar
            .unwrap_or_else(|| Arc::new(CookieJar::in_memory()));

        let mut http_builder = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .default_headers(Self::default_headers())
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if let Some(timeout) = self.timeout {
            http_builder = http_builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            http_builder = http_builder.connect_timeout(timeout);
        }

        if self.skip_verify {
            if origin.scheme() == "https" {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    "skip_verify=true has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                );
            }
        }

        let http = http_builder.build()?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let state = SessionState::new(store);
        let cookies = CookieSource::new(jar, origin);
        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(LoggingObserver));
        let interceptor = CsrfInterceptor::new(
            state.clone(),
            cookies.clone(),
            observer.clone(),
            self.metrics.clone(),
        );

        Ok(ApiClient {
            inner: Arc::new(Inner {
                http,
                base_url,
                interceptor,
                state,
                cookies,
                observer,
                max_retries: self.max_retries,
                metrics: self.metrics,
            }),
        })
    }
}
