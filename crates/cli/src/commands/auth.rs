//! Login, logout and session status commands.
//!
//! Does NOT handle:
//! - Admin session management (see `admin`).
//!
//! Invariants:
//! - Missing credentials are prompted for; the password is never echoed.
//! - `logout` always succeeds.

use anyhow::{Context, Result};
use coop_config::Credentials;
use serde_json::json;
use tracing::info;

use super::CommandContext;
use crate::interactive::{prompt_password, prompt_username};
use crate::output::{OutputFormat, print_value};

fn resolve_credentials(ctx: &CommandContext) -> Result<Credentials> {
    if let Some(credentials) = &ctx.credentials {
        return Ok(credentials.clone());
    }
    let username = match &ctx.username {
        Some(username) => username.clone(),
        None => prompt_username()?,
    };
    let password = prompt_password()?;
    Ok(Credentials::new(username, password))
}

pub async fn login(ctx: &CommandContext) -> Result<()> {
    let credentials = resolve_credentials(ctx)?;

    ctx.observer.set_logging_in(true);
    let result = ctx.manager.login(&credentials).await;
    ctx.observer.set_logging_in(false);

    let outcome = result.context("Login failed")?;
    info!(username = %credentials.username, "Logged in");

    match ctx.output {
        OutputFormat::Json => print_value(&serde_json::to_value(&outcome)?, ctx.output),
        OutputFormat::Table => println!("Sesión iniciada como {}", outcome.user.display_name()),
    }
    Ok(())
}

pub async fn logout(ctx: &CommandContext) -> Result<()> {
    ctx.manager.logout().await;
    match ctx.output {
        OutputFormat::Json => print_value(&json!({"ok": true}), ctx.output),
        OutputFormat::Table => println!("Sesión cerrada"),
    }
    Ok(())
}

pub async fn status(ctx: &CommandContext) -> Result<()> {
    let status = ctx.manager.check_session().await?;
    print_value(&serde_json::to_value(&status)?, ctx.output);
    Ok(())
}
