//! Resource CRUD commands.
//!
//! Responsibilities:
//! - List, show, create, update and delete campaigns, labors, plots and members
//! - Format output via the shared output module
//!
//! Does NOT handle:
//! - Field validation (the server rejects invalid data)
//!
//! Invariants:
//! - Delete operations require confirmation unless --force is used
//! - Create/update data must be a JSON object

use anyhow::{Context, Result, bail};
use coop_client::{Resource, ResourceService};
use serde_json::{Map, Value};
use tracing::info;

use super::CommandContext;
use crate::args::ResourceKind;
use crate::interactive::confirm_delete;
use crate::output::print_value;

/// Run `$body` with `$svc` bound to the service for `$kind`.
macro_rules! with_service {
    ($ctx:expr, $kind:expr, |$svc:ident| $body:expr) => {
        match $kind {
            ResourceKind::Campaigns => {
                let $svc = &$ctx.services.campaigns;
                $body
            }
            ResourceKind::Labors => {
                let $svc = &$ctx.services.labors;
                $body
            }
            ResourceKind::Plots => {
                let $svc = &$ctx.services.plots;
                $body
            }
            ResourceKind::Members => {
                let $svc = &$ctx.services.members;
                $body
            }
        }
    };
}

/// Parse command-line data as a JSON object.
pub fn parse_fields(data: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(data).context("Data is not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("Data must be a JSON object, got: {other}"),
    }
}

pub async fn list(
    ctx: &CommandContext,
    kind: ResourceKind,
    page: Option<u32>,
    filters: Vec<(String, String)>,
) -> Result<()> {
    let mut query: Vec<(String, String)> = filters;
    if let Some(page) = page {
        query.push(("page".to_string(), page.to_string()));
    }
    with_service!(ctx, kind, |svc| list_in(ctx, svc, &query).await)
}

async fn list_in<R: Resource>(
    ctx: &CommandContext,
    service: &ResourceService<R>,
    query: &[(String, String)],
) -> Result<()> {
    let pairs: Vec<(&str, &str)> = query
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let page = service
        .list_with_query(&pairs)
        .await
        .with_context(|| format!("Failed to list {}", R::NAME))?;

    print_value(&serde_json::to_value(&page.items)?, ctx.output);
    if let Some(count) = page.count {
        eprintln!("{} de {count}", page.items.len());
    }
    if page.next.is_some() {
        eprintln!("Hay más resultados: use --page para continuar");
    }
    Ok(())
}

pub async fn get(ctx: &CommandContext, kind: ResourceKind, id: i64) -> Result<()> {
    with_service!(ctx, kind, |svc| get_in(ctx, svc, id).await)
}

async fn get_in<R: Resource>(
    ctx: &CommandContext,
    service: &ResourceService<R>,
    id: i64,
) -> Result<()> {
    let entity = service
        .get(id)
        .await
        .with_context(|| format!("Failed to get {} {id}", R::NAME))?;
    print_value(&serde_json::to_value(&entity)?, ctx.output);
    Ok(())
}

pub async fn create(ctx: &CommandContext, kind: ResourceKind, data: &str) -> Result<()> {
    let fields = parse_fields(data)?;
    with_service!(ctx, kind, |svc| create_in(ctx, svc, fields).await)
}

async fn create_in<R: Resource>(
    ctx: &CommandContext,
    service: &ResourceService<R>,
    fields: Map<String, Value>,
) -> Result<()> {
    let draft: R = serde_json::from_value(Value::Object(fields))
        .with_context(|| format!("Invalid {} data", R::NAME))?;
    let created = service
        .create(&draft)
        .await
        .with_context(|| format!("Failed to create {}", R::NAME))?;
    info!(resource = R::NAME, id = ?created.id(), "Created");
    print_value(&serde_json::to_value(&created)?, ctx.output);
    Ok(())
}

pub async fn update(ctx: &CommandContext, kind: ResourceKind, id: i64, data: &str) -> Result<()> {
    let fields = Value::Object(parse_fields(data)?);
    with_service!(ctx, kind, |svc| update_in(ctx, svc, id, &fields).await)
}

async fn update_in<R: Resource>(
    ctx: &CommandContext,
    service: &ResourceService<R>,
    id: i64,
    fields: &Value,
) -> Result<()> {
    let updated = service
        .partial_update(id, fields)
        .await
        .with_context(|| format!("Failed to update {} {id}", R::NAME))?;
    print_value(&serde_json::to_value(&updated)?, ctx.output);
    Ok(())
}

pub async fn delete(ctx: &CommandContext, kind: ResourceKind, id: i64, force: bool) -> Result<()> {
    with_service!(ctx, kind, |svc| delete_in(svc, id, force).await)
}

async fn delete_in<R: Resource>(service: &ResourceService<R>, id: i64, force: bool) -> Result<()> {
    if !force && !confirm_delete(&id.to_string(), R::NAME)? {
        return Ok(());
    }
    service
        .delete(id)
        .await
        .with_context(|| format!("Failed to delete {} {id}", R::NAME))?;
    info!(resource = R::NAME, id, "Deleted");
    println!("{} {id} eliminado", R::NAME);
    Ok(())
}
