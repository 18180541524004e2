//! Tests for the configuration loader.
//!
//! Invariants:
//! - Tests use `serial_test` and `env_lock()` to prevent environment variable pollution.
//! - Every test that reads `COOP_*` variables unsets the ones it does not set.

use std::sync::Mutex;


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// All variables read by `apply_env`, for resetting in tests.
pub const COOP_VARS: [&str; 8] = [
    "COOP_BASE_URL",
    "COOP_USERNAME",
    "COOP_PASSWORD",
    "COOP_SKIP_VERIFY",
    "COOP_TIMEOUT",
    "COOP_CONNECT_TIMEOUT",
    "COOP_MAX_RETRIES",
    "COOP_STATE_PATH",
];

/// Build a var list that unsets every `COOP_*` variable except the given ones.
pub fn with_only(set: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
    COOP_VARS
        .iter()
        .map(|name| {
            let value = set.iter().find(|(k, _)| k == name).map(|(_, v)| *v);
            (*name, value)
        })
        .collect()
}
