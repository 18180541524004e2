//! Error types for the cooperative API client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Fixed message surfaced when the login response lacks the user record.
pub const MISSING_USER_MESSAGE: &str = "Respuesta de login inválida: falta el usuario";

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Credentials were rejected by the login endpoint.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Transport error: the request never reached the server or no response arrived.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-2xx response from the API.
    #[error("API error ({status}) at {url}: {message}{}", .request_id.as_ref().map(|id| format!(" [Request ID: {id}]")).unwrap_or_default())]
    ApiError {
        status: u16,
        url: String,
        message: String,
        request_id: Option<String>,
    },

    /// The session could not be validated.
    #[error("Sesión expirada")]
    SessionExpired,

    /// 2xx response whose body is missing an expected field.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Response body could not be decoded as the expected JSON shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Maximum retries exceeded.
    #[error("Maximum retries exceeded ({0} attempts)")]
    MaxRetriesExceeded(usize),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(e) => e.is_timeout() || e.is_connect(),
            Self::ApiError { status, .. } => Self::is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if an HTTP status code is retryable.
    ///
    /// Retryable: 429, 502, 503, 504. Everything else fails immediately.
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }

    /// Check if an HTTP status code signals an authentication failure.
    pub fn is_auth_status(status: u16) -> bool {
        matches!(status, 401 | 403)
    }

    /// Check if this error indicates authentication failure.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::AuthFailed(_) | Self::SessionExpired => true,
            Self::ApiError { status, .. } => Self::is_auth_status(*status),
            _ => false,
        }
    }

    /// Check if this error is a validation/business error (4xx other than 401/403).
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. }
            if (400..500).contains(status) && !Self::is_auth_status(*status) && *status != 404)
    }

    /// Check if this is a transport-level failure.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::HttpError(_))
    }
}
