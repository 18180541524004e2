//! Session-aware REST client for the cooperative administration API.
//!
//! This crate provides the HTTP client every API call goes through, the
//! CSRF interceptor pipeline, the persisted client state, the session
//! lifecycle manager and typed services for the cooperative's resources.

pub mod auth;
pub mod client;
pub mod cookies;
pub mod endpoints;
pub mod error;
pub mod interceptor;
pub mod metrics;
pub mod models;
pub mod observer;
pub mod services;
pub mod store;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::SessionManager;
pub use client::{ApiClient, ApiClientBuilder};
pub use cookies::{CSRF_COOKIE_NAME, CookieSource, find_cookie};
pub use error::{ClientError, Result};
pub use interceptor::{CSRF_HEADER, CsrfInterceptor, RequestOptions};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use models::{
    Campaign, Labor, ListResponse, LoginOutcome, Member, Plot, Resource, SessionStatus, User,
};
pub use observer::{
    ChannelObserver, LOGIN_ROUTE, LoggingObserver, SessionEvent, SessionObserver,
};
pub use services::{
    CampaignService, LaborService, MemberService, PlotService, ResourceService, Services,
};
pub use store::{CSRF_TOKEN_KEY, FileStore, MemoryStore, SessionState, SessionStore, USER_DATA_KEY};

pub use coop_config::Credentials;
