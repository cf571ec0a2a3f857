// `linkdeck collections` — manage collections and their members.
//
// `new` and `edit` drive a full edit session: fetch state, seed the
// selection, gate moves through the confirmation prompt, then save
// (upsert, reconcile membership, refresh).

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use linkdeck_common::types::{Collection, CollectionDraft, CollectionId, Link, LinkId, Visibility};
use linkdeck_engine::conflict::ConfirmPrompt;
use linkdeck_engine::session::{EditSession, SaveOutcome};
use linkdeck_engine::store::RemoteStore;

use crate::commands::store_context;
use crate::output::{self, OutputFormat};
use crate::prompt;

#[derive(Debug, Subcommand)]
pub enum CollectionsCommand {
    /// List collections with member counts
    Ls(LsArgs),
    /// Create a collection and pick its members
    New(NewArgs),
    /// Edit a collection's fields and members
    Edit(EditArgs),
    /// Delete a collection (its links keep existing, without it)
    Rm(RmArgs),
}

pub async fn run(cmd: CollectionsCommand) -> Result<()> {
    match cmd {
        CollectionsCommand::Ls(args) => run_ls(args).await,
        CollectionsCommand::New(args) => run_new(args).await,
        CollectionsCommand::Edit(args) => run_edit(args).await,
        CollectionsCommand::Rm(args) => run_rm(args).await,
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
    collections: Vec<CollectionEntry>,
}

#[derive(Debug, Serialize)]
struct CollectionEntry {
    #[serde(flatten)]
    collection: Collection,
    members: usize,
}

async fn run_ls(args: LsArgs) -> Result<()> {
    let format = OutputFormat::detect(args.json);
    let (store, owner) = store_context()?;
    let links = store.list_links(&owner).await.context("failed to list links")?;
    let collections =
        store.list_collections(&owner).await.context("failed to list collections")?;

    let entries = collections
        .into_iter()
        .map(|collection| {
            let members = links.iter().filter(|link| link.belongs_to(&collection.id)).count();
            CollectionEntry { collection, members }
        })
        .collect();
    output::print_output(format, &LsResult { collections: entries }, format_collections)?;
    Ok(())
}

fn format_collections(result: &LsResult) -> String {
    if result.collections.is_empty() {
        return "No collections yet.".into();
    }

    let mut lines = Vec::new();
    lines.push(format!("{} collection(s)", result.collections.len()));
    for entry in &result.collections {
        lines.push(format!(
            "  {} {} ({}) — {} link(s)",
            entry.collection.id,
            entry.collection.name,
            entry.collection.visibility,
            entry.members
        ));
    }
    lines.join("\n")
}

// ── new ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Collection name.
    #[arg(long)]
    name: String,
    /// Optional description.
    #[arg(long)]
    description: Option<String>,
    /// Visibility: public, restricted, or private.
    #[arg(long, default_value = "public")]
    visibility: String,
    /// Link ids to include as members (repeatable).
    #[arg(long = "link")]
    links: Vec<String>,
    /// Confirm link moves without asking.
    #[arg(long)]
    yes: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

async fn run_new(args: NewArgs) -> Result<()> {
    let format = OutputFormat::detect(args.json);
    let visibility = parse_visibility(&args.visibility)?;
    let confirm = prompt::select(args.yes);

    let (store, owner) = store_context()?;
    let store: Arc<dyn RemoteStore> = Arc::new(store);
    let (links, collections) = fetch_state(store.as_ref(), &owner).await?;

    let mut session =
        EditSession::create(Arc::clone(&store), confirm, owner, links, collections);
    apply_member_picks(&mut session, &args.links, &[], format).await?;

    let draft = CollectionDraft {
        name: args.name,
        description: args.description,
        visibility,
    };
    let outcome = session.save(draft).await.context("failed to save collection")?;
    report_outcome(format, &outcome, "Created")
}

// ── edit ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Id of the collection to edit.
    id: String,
    /// New name.
    #[arg(long)]
    name: Option<String>,
    /// New description.
    #[arg(long)]
    description: Option<String>,
    /// New visibility: public, restricted, or private.
    #[arg(long)]
    visibility: Option<String>,
    /// Link ids to add as members (repeatable).
    #[arg(long)]
    add: Vec<String>,
    /// Link ids to drop from the collection (repeatable).
    #[arg(long)]
    drop: Vec<String>,
    /// Confirm link moves without asking.
    #[arg(long)]
    yes: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

async fn run_edit(args: EditArgs) -> Result<()> {
    let format = OutputFormat::detect(args.json);
    let confirm = prompt::select(args.yes);

    let (store, owner) = store_context()?;
    let store: Arc<dyn RemoteStore> = Arc::new(store);
    let (links, collections) = fetch_state(store.as_ref(), &owner).await?;

    let target_id = CollectionId::new(args.id.clone());
    let editing = collections
        .iter()
        .find(|collection| collection.id == target_id)
        .cloned()
        .ok_or_else(|| anyhow!("collection `{}` not found", args.id))?;

    let draft = CollectionDraft {
        name: args.name.unwrap_or_else(|| editing.name.clone()),
        description: args.description.or_else(|| editing.description.clone()),
        visibility: match &args.visibility {
            Some(raw) => parse_visibility(raw)?,
            None => editing.visibility,
        },
    };

    let mut session =
        EditSession::edit(Arc::clone(&store), confirm, owner, editing, links, collections);
    apply_member_picks(&mut session, &args.add, &args.drop, format).await?;

    let outcome = session.save(draft).await.context("failed to save collection")?;
    report_outcome(format, &outcome, "Saved")
}

// ── rm ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RmArgs {
    /// Id of the collection to delete.
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
    let message =
        "Really delete this collection? Its links will keep existing, but without a collection.";
    if !confirm.confirm(message).await {
        output::print_warning(format, "CANCELLED", "collection deletion cancelled");
        return Ok(());
    }

    let (store, _owner) = store_context()?;
    let id = CollectionId::new(args.id.clone());
    store
        .delete_collection(&id)
        .await
        .with_context(|| format!("failed to delete collection `{id}`"))?;
    output::print_output(format, &RmResult { deleted: args.id }, |r| {
        format!("Deleted collection {}", r.deleted)
    })?;
    Ok(())
}

// ── shared helpers ──────────────────────────────────────────────────

async fn fetch_state(
    store: &dyn RemoteStore,
    owner: &linkdeck_common::types::UserId,
) -> Result<(Vec<Link>, Vec<Collection>)> {
    let links = store.list_links(owner).await.context("failed to list links")?;
    let collections = store.list_collections(owner).await.context("failed to list collections")?;
    Ok((links, collections))
}

/// Toggle the requested members. A declined confirmation is a choice,
/// not an error — the link is reported as left out and the flow
/// continues.
async fn apply_member_picks(
    session: &mut EditSession,
    add: &[String],
    drop: &[String],
    format: OutputFormat,
) -> Result<()> {
    for raw in add {
        let id = LinkId::new(raw.clone());
        let changed = session
            .toggle(&id, true)
            .await
            .with_context(|| format!("failed to select link `{raw}`"))?;
        if !changed && !session.is_selected(&id) {
            output::print_warning(format, "DECLINED", &format!("link {raw} was left out"));
        }
    }
    for raw in drop {
        let id = LinkId::new(raw.clone());
        session
            .toggle(&id, false)
            .await
            .with_context(|| format!("failed to deselect link `{raw}`"))?;
    }
    Ok(())
}

fn parse_visibility(raw: &str) -> Result<Visibility> {
    raw.parse::<Visibility>().map_err(|message| anyhow!(message))
}

#[derive(Debug, Serialize)]
struct SaveSummary {
    collection_id: String,
    name: String,
    members: usize,
    failed_links: Vec<String>,
}

fn report_outcome(format: OutputFormat, outcome: &SaveOutcome, verb: &str) -> Result<()> {
    let members = outcome
        .links
        .iter()
        .filter(|link| link.belongs_to(&outcome.collection.id))
        .count();
    let summary = SaveSummary {
        collection_id: outcome.collection.id.to_string(),
        name: outcome.collection.name.clone(),
        members,
        failed_links: outcome.failed_ops.iter().map(|f| f.op.link_id.to_string()).collect(),
    };

    if !outcome.fully_applied() {
        output::print_warning(
            format,
            "PARTIAL_SAVE",
            &format!(
                "{} membership update(s) failed: {}",
                summary.failed_links.len(),
                summary.failed_links.join(", ")
            ),
        );
    }

    output::print_output(format, &summary, |s| {
        format!("{verb} collection {} ({}) with {} member(s)", s.name, s.collection_id, s.members)
    })?;
    Ok(())
}
