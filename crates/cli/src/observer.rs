//! Session observer for terminal sessions.
//!
//! Invariants:
//! - Expiry is reported on stderr so stdout stays machine-readable.
//! - The login command marks the host as being on its login route.

use std::sync::atomic::{AtomicBool, Ordering};

use coop_client::{SessionEvent, SessionObserver};

#[derive(Debug, Default)]
pub struct CliObserver {
    logging_in: AtomicBool,
}

impl CliObserver {
    pub fn set_logging_in(&self, value: bool) {
        self.logging_in.store(value, Ordering::SeqCst);
    }
}

impl SessionObserver for CliObserver {
    fn on_login_page(&self) -> bool {
        self.logging_in.load(Ordering::SeqCst)
    }

    fn notify(&self, event: SessionEvent) {
        match event {
            SessionEvent::Expired { status, .. } => {
                tracing::info!(status, "Session expired");
                eprintln!("Sesión expirada ({status}). Ejecute `coop login` para continuar.");
            }
            SessionEvent::LoggedIn { username } => {
                tracing::debug!(username = ?username, "Logged in");
            }
            SessionEvent::LoggedOut => tracing::debug!("Logged out"),
        }
    }
}
