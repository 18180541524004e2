//! Coop CLI - Command-line interface for the cooperative administration API.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Build the configuration and the session-aware client.
//! - Map failures to structured exit codes.
//!
//! Does NOT handle:
//! - REST API or session logic (see `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing to allow `.env` to provide clap defaults.
//! - Logs go to stderr; stdout carries command output only.

mod args;
mod commands;
mod error;
mod interactive;
mod observer;
mod output;

use std::time::Duration;

use anyhow::Result;
use args::Cli;
use clap::Parser;
use commands::CommandContext;
use coop_config::{Config, ConfigLoader};
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Build configuration from env vars with CLI overrides on top.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut loader = ConfigLoader::new().from_env()?;

    if let Some(ref url) = cli.base_url {
        loader = loader.with_base_url(url.clone());
    }
    if let Some(ref username) = cli.username {
        loader = loader.with_username(username.clone());
    }
    if let Some(ref password) = cli.password {
        loader = loader.with_password(password.clone());
    }
    if let Some(secs) = cli.timeout {
        loader = loader.with_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = cli.connect_timeout {
        loader = loader.with_connect_timeout(Duration::from_secs(secs));
    }
    if let Some(retries) = cli.max_retries {
        loader = loader.with_max_retries(retries);
    }
    if cli.skip_verify {
        loader = loader.with_skip_verify(true);
    }
    if let Some(ref path) = cli.state_path {
        loader = loader.with_state_path(path.clone());
    }

    Ok(loader.build()?)
}

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to build configuration: {:#}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let ctx = match CommandContext::new(&config, cli.username.clone(), cli.output) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(e.exit_code().as_i32());
        }
    };

    let exit_code = tokio::select! {
        result = commands::run(cli.command, &ctx) => match result {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("{:#}", e);
                e.exit_code()
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            eprintln!("Operation cancelled by user");
            ExitCode::Interrupted
        }
    };

    std::process::exit(exit_code.as_i32());
}
