//! Session lifecycle: login, logout, session checks and bootstrap.
//!
//! [`SessionManager`] is the only writer of the persisted user record. It
//! wraps an [`ApiClient`] and keeps an in-memory copy of the current user so
//! hosts can query it without touching the store.
//!
//! # Invariants
//! - A failed login leaves both persisted entries cleared.
//! - `logout` never fails and always leaves both persisted entries cleared.
//! - `check_session` reports every failure as [`ClientError::SessionExpired`].
//!
//! # What this module does NOT handle
//! - Token propagation on ordinary calls (see [`crate::interceptor`]).
//! - Navigation after expiry; hosts react to [`SessionEvent`]s.

use std::sync::RwLock;

use serde_json::Value;
use tracing::{debug, info, warn};

use coop_config::Credentials;

use crate::client::ApiClient;
use crate::endpoints::{
    CSRF_PATH, INVALIDATE_SESSIONS_PATH, LOGOUT_PATH, SESSION_INFO_PATH, STATUS_PATH,
    force_logout_path, submit_login,
};
use crate::error::{ClientError, MISSING_USER_MESSAGE, Result};
use crate::interceptor::RequestOptions;
use crate::models::{LoginOutcome, SessionStatus, TokenResponse, User, first_non_empty};
use crate::observer::SessionEvent;

/// Coordinates login state across the persisted store and the in-memory cache.
#[derive(Debug)]
pub struct SessionManager {
    client: ApiClient,
    current_user: RwLock<Option<User>>,
}

impl SessionManager {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            current_user: RwLock::new(None),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The cached current user.
    pub fn current_user(&self) -> Option<User> {
        self.current_user
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Whether the current user has staff or superuser rights.
    pub fn is_staff(&self) -> bool {
        self.current_user().is_some_and(|u| u.is_admin())
    }

    fn set_current_user(&self, user: Option<User>) {
        match self.current_user.write() {
            Ok(mut guard) => *guard = user,
            Err(poisoned) => *poisoned.into_inner() = user,
        }
    }

    fn clear_local(&self) {
        self.client.state().clear();
        self.client.cookies().clear();
        self.set_current_user(None);
    }

    /// Two-phase login: fetch a CSRF seed, then submit the credentials.
    ///
    /// # Errors
    ///
    /// - [`ClientError::AuthFailed`] when the server rejects the credentials.
    /// - [`ClientError::InvalidResponse`] when the response lacks the user record.
    /// - [`ClientError::HttpError`] when the login request gets no response.
    ///
    /// A failing seed fetch is logged and does not fail the login.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        self.clear_local();

        let result = self.try_login(credentials).await;

        if let Some(metrics) = self.client.metrics() {
            metrics.record_login(result.is_ok());
        }

        match result {
            Ok(outcome) => {
                info!(username = %credentials.username, "Login succeeded");
                self.client.observer().notify(SessionEvent::LoggedIn {
                    username: outcome.user.username.clone(),
                });
                Ok(outcome)
            }
            Err(e) => {
                warn!(username = %credentials.username, error = %e, "Login failed");
                self.clear_local();
                Err(e)
            }
        }
    }

    async fn try_login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        let seed = self.fetch_seed_token().await;

        let response = submit_login(
            self.client.http(),
            self.client.base_url(),
            credentials,
            seed.as_deref(),
        )
        .await?;

        let user = response
            .usuario
            .ok_or_else(|| ClientError::InvalidResponse(MISSING_USER_MESSAGE.to_string()))?;

        let state = self.client.state();
        state.set_user(&user);

        let cookie_token = self.client.cookies().csrf_token();
        let token = first_non_empty([
            response.csrf_token.as_deref(),
            cookie_token.as_deref(),
            seed.as_deref(),
        ]);
        if let Some(token) = &token {
            state.set_token(token);
        }

        self.set_current_user(Some(user.clone()));
        Ok(LoginOutcome { user, token })
    }

    /// Fetch the CSRF seed. Auth failures here never tear the session down.
    async fn fetch_seed_token(&self) -> Option<String> {
        match self
            .client
            .get_with::<Option<TokenResponse>>(CSRF_PATH, RequestOptions::tolerant())
            .await
        {
            Ok(body) => {
                let cookie_token = self.client.cookies().csrf_token();
                first_non_empty([
                    body.as_ref().and_then(|b| b.csrf_token.as_deref()),
                    cookie_token.as_deref(),
                ])
            }
            Err(e) => {
                warn!(error = %e, "Could not fetch CSRF seed, continuing without it");
                None
            }
        }
    }

    /// Best-effort server logout. Never fails; local state is always cleared.
    pub async fn logout(&self) {
        if let Err(e) = self
            .client
            .post_empty_with::<Option<Value>>(LOGOUT_PATH, RequestOptions::tolerant())
            .await
        {
            warn!(error = %e, "Logout request failed, clearing local session anyway");
        }

        self.clear_local();
        self.client.observer().notify(SessionEvent::LoggedOut);
    }

    /// Ask the server whether the session is still valid.
    ///
    /// When the server reports an authenticated session with a user, the
    /// cached and persisted user record is refreshed.
    ///
    /// # Errors
    ///
    /// Always [`ClientError::SessionExpired`]; the cause is only logged.
    pub async fn check_session(&self) -> Result<SessionStatus> {
        let status = self
            .client
            .get::<SessionStatus>(STATUS_PATH)
            .await
            .map_err(|e| {
                debug!(error = %e, "Session check failed");
                ClientError::SessionExpired
            })?;

        if status.authenticated
            && let Some(user) = &status.user
        {
            self.client.state().set_user(user);
            self.set_current_user(Some(user.clone()));
        }

        Ok(status)
    }

    /// One-shot startup validation of a persisted session.
    ///
    /// Returns the validated user, or `None` after clearing local state.
    pub async fn bootstrap(&self) -> Option<User> {
        let persisted = self.client.state().user()?;
        self.set_current_user(Some(persisted));

        match self.check_session().await {
            Ok(status) if status.authenticated => self.current_user(),
            Ok(_) => {
                info!("Persisted session is no longer authenticated");
                self.logout().await;
                None
            }
            Err(e) => {
                info!(error = %e, "Persisted session could not be validated");
                self.logout().await;
                None
            }
        }
    }

    /// Metadata about the current session.
    pub async fn session_info(&self) -> Result<Value> {
        self.client.get(SESSION_INFO_PATH).await
    }

    /// Admin: invalidate every session on the server.
    pub async fn invalidate_all_sessions(&self) -> Result<Value> {
        self.client
            .post_empty_with::<Option<Value>>(INVALIDATE_SESSIONS_PATH, RequestOptions::default())
            .await
            .map(|v| v.unwrap_or(Value::Null))
    }

    /// Admin: terminate every session of `user_id`.
    pub async fn force_logout_user(&self, user_id: i64) -> Result<Value> {
        self.client
            .post_empty_with::<Option<Value>>(&force_logout_path(user_id), RequestOptions::default())
            .await
            .map(|v| v.unwrap_or(Value::Null))
    }
}
