//! CLI command implementations.
//!
//! Every invocation except `logout` validates the persisted session once
//! before running its command; the interactive shell reuses that one session.

pub mod admin;
pub mod auth;
pub mod resources;
pub mod shell;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use coop_client::{ApiClient, MetricsCollector, Services, SessionManager};
use coop_config::{Config, Credentials};

use crate::args::Commands;
use crate::observer::CliObserver;
use crate::output::OutputFormat;

/// Everything a command needs: one client shared by the session manager and services.
pub struct CommandContext {
    pub manager: SessionManager,
    pub services: Services,
    pub observer: Arc<CliObserver>,
    /// Complete credentials from flags or environment, if both were given.
    pub credentials: Option<Credentials>,
    /// Username given without a password; the password is prompted for.
    pub username: Option<String>,
    pub output: OutputFormat,
}

impl CommandContext {
    pub fn new(config: &Config, username: Option<String>, output: OutputFormat) -> Result<Self> {
        let observer = Arc::new(CliObserver::default());
        let client = ApiClient::builder()
            .from_config(config)
            .observer(observer.clone())
            .metrics(MetricsCollector::new())
            .build()
            .context("Failed to build API client")?;

        Ok(Self {
            services: Services::new(&client),
            manager: SessionManager::new(client),
            observer,
            credentials: config.credentials.clone(),
            username,
            output,
        })
    }
}

/// Bootstrap the persisted session, then run `command`.
///
/// `logout` skips the bootstrap: a stale session would otherwise be logged
/// out once by the failed check and again by the command.
pub async fn run(command: Commands, ctx: &CommandContext) -> Result<()> {
    if needs_bootstrap(&command)
        && let Some(user) = ctx.manager.bootstrap().await
    {
        tracing::debug!(user = %user.display_name(), "Resumed persisted session");
    }

    match command {
        Commands::Shell => shell::run(ctx).await,
        other => run_one(other, ctx).await,
    }
}

fn needs_bootstrap(command: &Commands) -> bool {
    !matches!(command, Commands::Logout)
}

/// Run a single non-interactive command.
pub async fn run_one(command: Commands, ctx: &CommandContext) -> Result<()> {
    match command {
        Commands::Login => auth::login(ctx).await,
        Commands::Logout => auth::logout(ctx).await,
        Commands::Status => auth::status(ctx).await,
        Commands::SessionInfo => admin::session_info(ctx).await,
        Commands::InvalidateSessions { force } => admin::invalidate_sessions(ctx, force).await,
        Commands::ForceLogout { user_id, force } => {
            admin::force_logout(ctx, user_id, force).await
        }
        Commands::List {
            resource,
            page,
            filters,
        } => resources::list(ctx, resource, page, filters).await,
        Commands::Get { resource, id } => resources::get(ctx, resource, id).await,
        Commands::Create { resource, data } => resources::create(ctx, resource, &data).await,
        Commands::Update { resource, id, data } => {
            resources::update(ctx, resource, id, &data).await
        }
        Commands::Delete {
            resource,
            id,
            force,
        } => resources::delete(ctx, resource, id, force).await,
        Commands::Shell => bail!("Already in an interactive shell"),
    }
}
