//! The HTTP client every API call goes through.
//!
//! [`ApiClient`] owns one `reqwest::Client` whose cookie jar is shared with
//! the [`CookieSource`] the interceptor reads from. Each call runs:
//!
//! 1. the request phase of [`CsrfInterceptor`],
//! 2. [`send_request_with_retry`],
//! 3. the matching response phase, then returns the decoded body or the error.
//!
//! # What this module does NOT handle
//! - Login, logout and session checks (see [`crate::auth::SessionManager`]).
//! - Resource-specific paths (see [`crate::services`]).
//!
//! # Invariants
//! - Cloning an `ApiClient` shares the HTTP pool, cookie jar and session state.
//! - Error responses are always re-raised after the response phase has run.

pub mod builder;

use std::fmt;
use std::sync::Arc;

use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cookies::CookieSource;
use crate::endpoints::send_request_with_retry;
use crate::error::{ClientError, Result};
use crate::interceptor::{CsrfInterceptor, RequestOptions};
use crate::metrics::MetricsCollector;
use crate::observer::SessionObserver;
use crate::store::SessionState;

pub use builder::ApiClientBuilder;

/// Session-aware client for the cooperative REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    interceptor: CsrfInterceptor,
    state: SessionState,
    cookies: CookieSource,
    observer: Arc<dyn SessionObserver>,
    max_retries: usize,
    metrics: Option<MetricsCollector>,
}

impl ApiClient {
    /// Create a new client builder.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    /// Origin every relative path is resolved against, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The underlying HTTP client. Shares the cookie jar but skips the interceptor.
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub fn state(&self) -> &SessionState {
        &self.inner.state
    }

    pub fn cookies(&self) -> &CookieSource {
        &self.inner.cookies
    }

    pub fn interceptor(&self) -> &CsrfInterceptor {
        &self.inner.interceptor
    }

    pub fn observer(&self) -> &Arc<dyn SessionObserver> {
        &self.inner.observer
    }

    pub fn metrics(&self) -> Option<&MetricsCollector> {
        self.inner.metrics.as_ref()
    }

    /// Resolve `path` against the origin. Absolute URLs (e.g. pagination links) pass through.
    pub fn url(&self, path: &str) -> Result<Url> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.inner.base_url, path)
        } else {
            format!("{}/{}", self.inner.base_url, path)
        };
        Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Run one call through the interceptor pipeline.
    ///
    /// Returns `None` for an empty 2xx body (e.g. `204 No Content`).
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<Option<Value>> {
        let inner = &self.inner;
        let mut builder = inner.http.request(method, url.clone());
        if let Some(body) = &body {
            builder = builder.json(body);
        }
        builder = inner.interceptor.on_request(&url, builder);

        let response =
            match send_request_with_retry(builder, inner.max_retries, inner.metrics.as_ref()).await
            {
                Ok(response) => response,
                Err(err) => {
                    inner.interceptor.on_error(&err, options);
                    return Err(err);
                }
            };

        let bytes = response.bytes().await?;
        let decoded = if bytes.iter().all(u8::is_ascii_whitespace) {
            Ok(None)
        } else {
            serde_json::from_slice::<Value>(&bytes).map(Some)
        };

        match decoded {
            Ok(body) => {
                inner.interceptor.on_response(body.as_ref());
                Ok(body)
            }
            Err(e) => {
                inner.interceptor.on_response(None);
                Err(ClientError::Json(e))
            }
        }
    }

    /// Send and decode the body into `T`. An empty body decodes from `null`.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let body = body.map(serde_json::to_value).transpose()?;
        let value = self.send(method, url, body, options).await?;
        Ok(serde_json::from_value(value.unwrap_or(Value::Null))?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, Value>(Method::GET, path, None, RequestOptions::default())
            .await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        self.request::<T, Value>(Method::GET, path, None, options).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body), RequestOptions::default())
            .await
    }

    /// POST without a body.
    pub async fn post_empty_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        self.request::<T, Value>(Method::POST, path, None, options)
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body), RequestOptions::default())
            .await
    }

    /// DELETE, discarding any body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        self.send(Method::DELETE, url, None, RequestOptions::default())
            .await
            .map(|_| ())
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("max_retries", &self.inner.max_retries)
            .field("state", &self.inner.state)
            .finish_non_exhaustive()
    }
}
