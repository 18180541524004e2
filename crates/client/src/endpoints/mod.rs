//! REST endpoint paths and the raw calls that bypass the interceptor.

pub mod auth;
mod request;

pub use auth::submit_login;
pub use request::{REQUEST_ID_HEADER, api_error, send_request_with_retry};

/// Seeds the CSRF cookie and returns a token in the body.
pub const CSRF_PATH: &str = "/api/auth/csrf/";
/// Exchanges credentials for a session.
pub const LOGIN_PATH: &str = "/api/auth/login/";
pub const LOGOUT_PATH: &str = "/api/auth/logout/";
/// Reports whether the current session is authenticated.
pub const STATUS_PATH: &str = "/api/auth/status/";
pub const SESSION_INFO_PATH: &str = "/api/auth/session-info/";
/// Admin: invalidate every session on the server.
pub const INVALIDATE_SESSIONS_PATH: &str = "/api/auth/invalidate-sessions/";

/// Admin: terminate every session of one user.
pub fn force_logout_path(user_id: i64) -> String {
    format!("/api/auth/force-logout/{user_id}/")
}
