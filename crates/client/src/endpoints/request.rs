//! Request dispatch with retry and exponential backoff.
//!
//! Responses with status 429, 502, 503 or 504 are retried up to
//! `max_retries` times, sleeping `2^attempt` seconds between attempts.
//! Every other non-2xx response becomes [`ClientError::ApiError`] with the
//! most useful message the body offers.
//!
//! # What this does NOT handle
//! - CSRF headers or session teardown (see [`crate::interceptor`]).
//! - Retrying on 401/403: authentication failures surface immediately.

use std::time::{Duration, Instant};

use reqwest::{RequestBuilder, Response};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::ApiErrorBody;

/// Header carrying the server-side request identifier, when the API sets one.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Sends a request, retrying transient failures.
///
/// `max_retries` of zero sends exactly once.
///
/// # Errors
///
/// - [`ClientError::HttpError`] when no response arrives.
/// - [`ClientError::ApiError`] for a non-2xx response.
/// - [`ClientError::MaxRetriesExceeded`] when every retry hit a transient status.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let (client, request) = builder.build_split();
    let request = request?;
    let method = request.method().to_string();
    let endpoint = request.url().path().to_string();

    for attempt in 0..=max_retries {
        let Some(attempt_request) = request.try_clone() else {
            if attempt == 0 {
                debug!("Request body cannot be cloned, single attempt only");
                return client.execute(request).await.map_err(ClientError::from);
            }
            return Err(ClientError::MaxRetriesExceeded(attempt));
        };

        if let Some(m) = metrics {
            m.record_request(&endpoint, &method);
            if attempt > 0 {
                m.record_retry(&endpoint, &method, attempt);
            }
        }

        let started = Instant::now();
        let response = match client.execute(attempt_request).await {
            Ok(response) => response,
            Err(e) => {
                let err = ClientError::from(e);
                if let Some(m) = metrics {
                    m.record_request_duration(&endpoint, &method, started.elapsed(), None);
                    m.record_client_error(&endpoint, &method, &err);
                }
                return Err(err);
            }
        };

        let status = response.status().as_u16();
        if let Some(m) = metrics {
            m.record_request_duration(&endpoint, &method, started.elapsed(), Some(status));
        }

        if response.status().is_success() {
            if attempt > 0 {
                debug!(attempt = attempt + 1, "Request succeeded after retry");
            }
            return Ok(response);
        }

        if ClientError::is_retryable_status(status) && attempt < max_retries {
            let backoff_secs = 2u64.pow(attempt as u32);
            debug!(
                status,
                attempt = attempt + 1,
                max_retries = max_retries + 1,
                backoff_secs,
                "Transient failure, retrying with exponential backoff"
            );
            tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
            continue;
        }

        let err = if attempt > 0 && ClientError::is_retryable_status(status) {
            debug!(attempts = attempt + 1, "Max retries exhausted");
            ClientError::MaxRetriesExceeded(attempt + 1)
        } else {
            api_error(response).await
        };
        if let Some(m) = metrics {
            m.record_client_error(&endpoint, &method, &err);
        }
        return Err(err);
    }

    Err(ClientError::MaxRetriesExceeded(max_retries + 1))
}

/// Convert a non-2xx response into [`ClientError::ApiError`].
pub async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    let message = ApiErrorBody::parse(&body)
        .best_message()
        .unwrap_or(body);

    ClientError::ApiError {
        status,
        url,
        message,
        request_id,
    }
}
