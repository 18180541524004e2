//! Direct login call.
//!
//! Login does not go through the interceptor: it attaches the seed token
//! itself and interprets failures differently from ordinary API calls.

use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::debug;

use coop_config::Credentials;

use crate::endpoints::LOGIN_PATH;
use crate::error::{ClientError, MISSING_USER_MESSAGE, Result};
use crate::interceptor::CSRF_HEADER;
use crate::models::{ApiErrorBody, LoginResponse};

/// POST the credentials to the login endpoint.
///
/// # Errors
///
/// - [`ClientError::AuthFailed`] for a non-2xx response, with the server's
///   `error` or `message` field, or `Error <status>` when neither is present.
/// - [`ClientError::InvalidResponse`] when a 2xx body cannot be decoded.
/// - [`ClientError::HttpError`] when no response arrives.
pub async fn submit_login(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    seed_token: Option<&str>,
) -> Result<LoginResponse> {
    debug!("Logging in as {}", credentials.username);

    let url = format!("{base_url}{LOGIN_PATH}");
    let mut builder = client.post(&url).json(&json!({
        "username": credentials.username,
        "password": credentials.password.expose_secret(),
    }));
    if let Some(token) = seed_token {
        builder = builder.header(CSRF_HEADER, token);
    }

    let response = builder.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ClientError::AuthFailed(rejection_message(status, &body)));
    }

    serde_json::from_str(&body).map_err(|e| {
        debug!(error = %e, "Undecodable login response");
        ClientError::InvalidResponse(MISSING_USER_MESSAGE.to_string())
    })
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    ApiErrorBody::parse(body)
        .login_message()
        .unwrap_or_else(|| format!("Error {}", status.as_u16()))
}
