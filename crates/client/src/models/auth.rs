//! Authentication endpoint payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::first_non_empty;
use super::user::User;

/// Body of `GET /api/auth/csrf/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Body of a successful `POST /api/auth/login/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub usuario: Option<User>,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiErrorBody {
    /// Parse an error body leniently; non-JSON bodies yield an empty record.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// The login flow's message: `error`, then `message`.
    pub fn login_message(&self) -> Option<String> {
        first_non_empty([self.error.as_deref(), self.message.as_deref()])
    }

    /// Best message for generic API errors: `error`, `message`, then `detail`.
    pub fn best_message(&self) -> Option<String> {
        first_non_empty([
            self.error.as_deref(),
            self.message.as_deref(),
            self.detail.as_deref(),
        ])
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginOutcome {
    #[serde(rename = "usuario")]
    pub user: User,
    #[serde(rename = "csrf_token")]
    pub token: Option<String>,
}

/// Body of `GET /api/auth/status/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    #[serde(rename = "autenticado", default)]
    pub authenticated: bool,
    #[serde(rename = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
