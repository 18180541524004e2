//! Data models for the cooperative REST API.
//!
//! The core only depends on a handful of field names (`usuario`,
//! `csrf_token`, `autenticado`, `error`, `message`); everything else in the
//! server's payloads is carried opaquely.

pub mod auth;
pub mod common;
pub mod resources;
pub mod user;

pub use auth::{ApiErrorBody, LoginOutcome, LoginResponse, SessionStatus, TokenResponse};
pub use common::{ListResponse, first_non_empty};
pub use resources::{Campaign, Labor, Member, Plot, Resource};
pub use user::User;
