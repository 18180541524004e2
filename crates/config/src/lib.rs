//! Configuration management for the cooperative admin client.
//!
//! This crate provides types and loaders for the API connection settings,
//! login credentials and the location of the persisted client state, read
//! from `.env` files, environment variables and explicit overrides.

pub mod constants;
mod loader;
pub mod persistence;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use persistence::default_state_path;
pub use types::{Config, ConnectionConfig, Credentials};
