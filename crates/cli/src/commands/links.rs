// `linkdeck links` — list and mutate link records.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use linkdeck_common::types::{CollectionId, Link, LinkDraft, LinkId, LinkPatch};
use linkdeck_common::validation::{parse_tags, validate_link};
use linkdeck_engine::conflict::ConfirmPrompt;
use linkdeck_engine::store::RemoteStore;

use crate::commands::store_context;
use crate::output::{self, OutputFormat};
use crate::prompt;

#[derive(Debug, Subcommand)]
pub enum LinksCommand {
    /// List all links
    Ls(LsArgs),
    /// Add a link
    Add(AddArgs),
    /// Delete a link
    Rm(RmArgs),
    /// Toggle the favorite flag
    Fav(FavArgs),
}

pub async fn run(cmd: LinksCommand) -> Result<()> {
    match cmd {
        LinksCommand::Ls(args) => run_ls(args).await,
        LinksCommand::Add(args) => run_add(args).await,
        LinksCommand::Rm(args) => run_rm(args).await,
        LinksCommand::Fav(args) => run_fav(args).await,
    }
}

// ── ls ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LsArgs {
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct LsResult {
    links: Vec<Link>,
}

async fn run_ls(args: LsArgs) -> Result<()> {
    let format = OutputFormat::detect(args.json);
    let (store, owner) = store_context()?;
    let links = store.list_links(&owner).await.context("failed to list links")?;
    output::print_output(format, &LsResult { links }, format_links)?;
    Ok(())
}

fn format_links(result: &LsResult) -> String {
    if result.links.is_empty() {
        return "No links yet.".into();
    }

    let mut lines = Vec::new();
    lines.push(format!("{} link(s)", result.links.len()));
    for link in &result.links {
        let star = if link.is_favorite { "★ " } else { "" };
        let collection = link
            .collection_id
            .as_ref()
            .map(|id| format!(" [collection {id}]"))
            .unwrap_or_default();
        let tags = if link.tags.is_empty() {
            String::new()
        } else {
            format!(" #{}", link.tags.join(" #"))
        };
        lines.push(format!("  {} {star}{} — {}{collection}{tags}", link.id, link.title, link.url));
    }
    lines.join("\n")
}

// ── add ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Link title.
    #[arg(long)]
    title: String,
    /// Target URL (absolute http/https).
    #[arg(long)]
    url: String,
    /// Comma-separated tags.
    #[arg(long)]
    tags: Option<String>,
    /// Collection to place the link into.
    #[arg(long)]
    collection: Option<String>,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

async fn run_add(args: AddArgs) -> Result<()> {
    let format = OutputFormat::detect(args.json);
    let draft = LinkDraft {
        title: args.title,
        url: args.url,
        short_url: None,
        tags: args.tags.as_deref().map(parse_tags).unwrap_or_default(),
        collection_id: args.collection.map(CollectionId::new),
    };
    validate_link(&draft)?;

    let (store, owner) = store_context()?;
    let link = store.create_link(&owner, draft).await.context("failed to create link")?;
    output::print_output(format, &link, |link| format!("Added {} ({})", link.title, link.id))?;
    Ok(())
}

// ── rm ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RmArgs {
    /// Id of the link to delete.
    id: String,
    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct RmResult {
    deleted: String,
}

async fn run_rm(args: RmArgs) -> Result<()> {
    let format = OutputFormat::detect(args.json);
    let confirm = prompt::select(args.yes);
    if !confirm.confirm("Really delete this link?").await {
        output::print_warning(format, "CANCELLED", "link deletion cancelled");
        return Ok(());
    }

    let (store, _owner) = store_context()?;
    let id = LinkId::new(args.id.clone());
    store
        .delete_link(&id)
        .await
        .with_context(|| format!("failed to delete link `{id}`"))?;
    output::print_output(format, &RmResult { deleted: args.id }, |r| {
        format!("Deleted link {}", r.deleted)
    })?;
    Ok(())
}

// ── fav ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FavArgs {
    /// Id of the link to favorite.
    id: String,
    /// Clear the flag instead of setting it.
    #[arg(long)]
    off: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

async fn run_fav(args: FavArgs) -> Result<()> {
    let format = OutputFormat::detect(args.json);
    let (store, _owner) = store_context()?;
    let id = LinkId::new(args.id);
    if id.is_empty() {
        return Err(anyhow!("link id must not be empty"));
    }
    let link = store
        .update_link(&id, LinkPatch::favorite(!args.off))
        .await
        .with_context(|| format!("failed to update link `{id}`"))?;
    output::print_output(format, &link, |link| {
        if link.is_favorite {
            format!("Marked {} as favorite", link.title)
        } else {
            format!("Removed favorite from {}", link.title)
        }
    })?;
    Ok(())
}
