//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `commands` module).
//! - Does not validate configuration values (see `coop_config::ConfigLoader`).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "coop")]
#[command(about = "Coop admin CLI - Manage the cooperative API from the command line", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  coop login -u ana\n  coop status\n  coop list parcelas --filter campania=3\n  coop create campanias '{\"nombre\": \"Soja 2027\"}'\n  coop delete labores 12 --force\n  coop shell\n"
)]
pub struct Cli {
    /// Origin of the cooperative API (e.g., https://coop.example.com)
    #[arg(short, long, global = true, env = "COOP_BASE_URL")]
    pub base_url: Option<String>,

    /// Username for login
    #[arg(short, long, global = true, env = "COOP_USERNAME")]
    pub username: Option<String>,

    /// Password for login
    #[arg(short, long, global = true, env = "COOP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Total request timeout in seconds (unbounded when unset)
    #[arg(long, global = true, env = "COOP_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Connect timeout in seconds (unbounded when unset)
    #[arg(long, global = true, env = "COOP_CONNECT_TIMEOUT")]
    pub connect_timeout: Option<u64>,

    /// Maximum number of retries for 429/502/503/504 responses
    #[arg(long, global = true, env = "COOP_MAX_RETRIES")]
    pub max_retries: Option<usize>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true, env = "COOP_SKIP_VERIFY")]
    pub skip_verify: bool,

    /// File holding the persisted session (user record and CSRF token)
    #[arg(long, global = true, env = "COOP_STATE_PATH", value_name = "FILE")]
    pub state_path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and persist the session
    Login,

    /// Log out and clear the persisted session
    Logout,

    /// Show whether the persisted session is still valid
    Status,

    /// Show server-side metadata about the current session
    SessionInfo,

    /// Invalidate every session on the server (admin)
    InvalidateSessions {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Terminate every session of one user (admin)
    ForceLogout {
        /// Id of the user to log out
        user_id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List a resource collection
    List {
        resource: ResourceKind,
        /// Page number for paginated collections
        #[arg(long)]
        page: Option<u32>,
        /// Filter as key=value (repeatable)
        #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        filters: Vec<(String, String)>,
    },

    /// Show one entity
    Get { resource: ResourceKind, id: i64 },

    /// Create an entity from a JSON object
    Create {
        resource: ResourceKind,
        /// Field values, e.g. '{"nombre": "Lote Norte"}'
        data: String,
    },

    /// Update selected fields of an entity from a JSON object
    Update {
        resource: ResourceKind,
        id: i64,
        /// Field values to change
        data: String,
    },

    /// Delete an entity
    Delete {
        resource: ResourceKind,
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Run commands interactively against one session
    Shell,
}

/// Resource collections exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    #[value(alias = "campanias")]
    Campaigns,
    #[value(alias = "labores")]
    Labors,
    #[value(alias = "parcelas")]
    Plots,
    #[value(alias = "socios")]
    Members,
}

/// Parse a `key=value` pair.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    if key.trim().is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{s}`"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}
