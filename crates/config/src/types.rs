//! Configuration types.
//!
//! Responsibilities:
//! - Define connection settings (origin, TLS verification, optional timeouts, retries).
//! - Define login credentials with the password held as a secret.
//! - Define the top-level `Config` combining connection, credentials and state path.
//!
//! Does NOT handle:
//! - Loading from environment or `.env` (see `loader`).
//! - Network access (see the client crate).
//!
//! Invariants:
//! - `timeout` and `connect_timeout` default to `None`: requests are unbounded
//!   unless a limit is configured explicitly.
//! - Passwords never appear in `Debug` output.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{COOKIE_FILE_EXTENSION, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES};

/// Connection configuration for the cooperative REST API.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Origin of the API server (e.g., `https://coop.example.com`), without trailing slash.
    pub base_url: String,
    /// Whether to skip TLS verification (for self-signed development certificates).
    pub skip_verify: bool,
    /// Total request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// Connect timeout. `None` leaves connection establishment unbounded.
    pub connect_timeout: Option<Duration>,
    /// Maximum number of retries for 429/502/503/504 responses.
    pub max_retries: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            skip_verify: false,
            timeout: None,
            connect_timeout: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Username and password used by the login flow.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into().into()),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionConfig,
    /// Credentials for non-interactive login, when configured
    pub credentials: Option<Credentials>,
    /// Where the persisted client state lives
    pub state_path: PathBuf,
}

impl Config {
    /// Convenience constructor used by tests and embedders.
    pub fn with_base_url(base_url: impl Into<String>, state_path: PathBuf) -> Self {
        Self {
            connection: ConnectionConfig {
                base_url: base_url.into(),
                ..ConnectionConfig::default()
            },
            credentials: None,
            state_path,
        }
    }

    /// Where the server's cookies are kept, beside the state file.
    pub fn cookie_path(&self) -> PathBuf {
        self.state_path.with_extension(COOKIE_FILE_EXTENSION)
    }
}
