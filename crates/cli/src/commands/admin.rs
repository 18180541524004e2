//! Server-side session administration.
//!
//! Invariants:
//! - Destructive calls ask for confirmation unless `--force` is given.

use anyhow::{Context, Result};

use super::CommandContext;
use crate::interactive::confirm;
use crate::output::print_value;

pub async fn session_info(ctx: &CommandContext) -> Result<()> {
    let info = ctx
        .manager
        .session_info()
        .await
        .context("Failed to get session info")?;
    print_value(&info, ctx.output);
    Ok(())
}

pub async fn invalidate_sessions(ctx: &CommandContext, force: bool) -> Result<()> {
    if !force && !confirm("Invalidate every session on the server?")? {
        return Ok(());
    }
    let result = ctx
        .manager
        .invalidate_all_sessions()
        .await
        .context("Failed to invalidate sessions")?;
    print_value(&result, ctx.output);
    Ok(())
}

pub async fn force_logout(ctx: &CommandContext, user_id: i64, force: bool) -> Result<()> {
    if !force && !confirm(&format!("Log out every session of user {user_id}?"))? {
        return Ok(());
    }
    let result = ctx
        .manager
        .force_logout_user(user_id)
        .await
        .with_context(|| format!("Failed to log out user {user_id}"))?;
    print_value(&result, ctx.output);
    Ok(())
}
