//! Session lifecycle events published to the hosting application.
//!
//! The client never navigates by itself. When an authentication failure
//! tears the session down it emits [`SessionEvent::Expired`] carrying the
//! route the host should navigate to, and the host decides how to get there.
//!
//! # Invariants
//! - `Expired` is only emitted when the host reports it is not already on the login route.
//! - Observers must not block: they are called inline from the response phase.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

/// Route the host should show after the session expires.
pub const LOGIN_ROUTE: &str = "/login";

/// Session lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A 401/403 cleared the session; the host should navigate to `redirect_to`.
    Expired { status: u16, redirect_to: String },
    /// Login completed for the given username.
    LoggedIn { username: Option<String> },
    /// Local session state was cleared by logout.
    LoggedOut,
}

impl SessionEvent {
    pub(crate) fn expired(status: u16) -> Self {
        Self::Expired {
            status,
            redirect_to: LOGIN_ROUTE.to_string(),
        }
    }
}

/// Hook through which the client learns about and reports to its host.
#[cfg_attr(test, mockall::automock)]
pub trait SessionObserver: Send + Sync {
    /// Whether the host is currently showing its login route.
    fn on_login_page(&self) -> bool;

    /// Receive a lifecycle event.
    fn notify(&self, event: SessionEvent);
}

/// Observer that only logs; the host is never on a login page.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl SessionObserver for LoggingObserver {
    fn on_login_page(&self) -> bool {
        false
    }

    fn notify(&self, event: SessionEvent) {
        match event {
            SessionEvent::Expired {
                status,
                redirect_to,
            } => tracing::info!(status, redirect_to = %redirect_to, "Session expired"),
            SessionEvent::LoggedIn { username } => {
                tracing::info!(username = ?username, "Logged in")
            }
            SessionEvent::LoggedOut => tracing::info!("Logged out"),
        }
    }
}

/// Observer that forwards events over a channel and tracks the host's route.
#[derive(Debug)]
pub struct ChannelObserver {
    on_login_page: AtomicBool,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiver the host should drain.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                on_login_page: AtomicBool::new(false),
                tx,
            },
            rx,
        )
    }

    /// Record whether the host is on its login route.
    pub fn set_on_login_page(&self, value: bool) {
        self.on_login_page.store(value, Ordering::SeqCst);
    }
}

impl SessionObserver for ChannelObserver {
    fn on_login_page(&self) -> bool {
        self.on_login_page.load(Ordering::SeqCst)
    }

    fn notify(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Session event receiver dropped");
        }
    }
}
