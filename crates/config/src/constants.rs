//! Centralized constants for the coop-admin workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication.

// =============================================================================
// Connection Defaults
// =============================================================================

/// Default API origin used for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default maximum number of retries for rate-limited or unavailable responses.
///
/// Zero means every request is attempted exactly once.
pub const DEFAULT_MAX_RETRIES: usize = 0;

// =============================================================================
// Configuration Bounds
// =============================================================================

/// Maximum allowed request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Maximum allowed number of retries.
pub const MAX_MAX_RETRIES: usize = 10;

// =============================================================================
// Persisted State
// =============================================================================

/// Directory name used under the platform configuration directory.
pub const APP_DIR_NAME: &str = "coop-admin";

/// File name of the persisted client state (user record and CSRF token).
pub const STATE_FILE_NAME: &str = "session.json";

/// Extension of the cookie file kept beside the state file (`session.cookies.json`).
pub const COOKIE_FILE_EXTENSION: &str = "cookies.json";
