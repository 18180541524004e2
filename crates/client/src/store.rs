//! Persisted client state.
//!
//! The durable key-value store that survives restarts, holding at most two
//! entries: the serialized current user record (`user_data`) and the CSRF
//! token (`csrf_token`).
//!
//! # Submodules
//! - `memory`: process-local store, used by tests and short-lived hosts
//! - `file`: JSON file store with atomic replace-on-write
//! - `state`: typed facade over the two known keys
//!
//! # Invariants
//! - Every write is a single key replace; concurrent writers are last-write-wins.
//! - [`SessionState::clear`] removes both keys, whatever their prior value.

mod file;
mod memory;
mod state;

pub use file::FileStore;
pub(crate) use file::write_atomic;
pub use memory::MemoryStore;
pub use state::SessionState;

/// Key holding the JSON-serialized current user record.
pub const USER_DATA_KEY: &str = "user_data";

/// Key holding the raw CSRF token string.
pub const CSRF_TOKEN_KEY: &str = "csrf_token";

/// String key-value storage backing the session state.
///
/// Implementations must be safe to share between tasks; each operation is
/// independent and no transaction spans two calls.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str);

    /// Delete `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str);
}
