//! Typed access to the two persisted session entries.

use std::fmt;
use std::sync::Arc;

use super::{CSRF_TOKEN_KEY, MemoryStore, SessionStore, USER_DATA_KEY};
use crate::models::User;

/// Typed facade over a [`SessionStore`] for the user record and CSRF token.
///
/// Cloning shares the underlying store.
#[derive(Clone)]
pub struct SessionState {
    store: Arc<dyn SessionStore>,
}

impl SessionState {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// State backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The persisted user record, if present and decodable.
    pub fn user(&self) -> Option<User> {
        let raw = self.store.get(USER_DATA_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding undecodable persisted user record");
                None
            }
        }
    }

    pub fn set_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => self.store.set(USER_DATA_KEY, &raw),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize user record"),
        }
    }

    /// The persisted CSRF token. Empty values read as absent.
    pub fn token(&self) -> Option<String> {
        self.store.get(CSRF_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: &str) {
        self.store.set(CSRF_TOKEN_KEY, token);
    }

    /// Remove both the user record and the CSRF token.
    pub fn clear(&self) {
        self.store.remove(USER_DATA_KEY);
        self.store.remove(CSRF_TOKEN_KEY);
    }

    /// True when neither entry is present.
    pub fn is_cleared(&self) -> bool {
        self.store.get(USER_DATA_KEY).is_none() && self.store.get(CSRF_TOKEN_KEY).is_none()
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("has_user", &self.store.get(USER_DATA_KEY).is_some())
            .field("has_token", &self.store.get(CSRF_TOKEN_KEY).is_some())
            .finish()
    }
}
