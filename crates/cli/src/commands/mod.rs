// CLI subcommand dispatch.

use anyhow::{anyhow, Result};
use clap::Subcommand;

use linkdeck_common::types::UserId;

use crate::client::HttpStore;
use crate::config::GlobalConfig;

pub mod collections;
pub mod dashboard;
pub mod links;
pub mod setup;

#[derive(Subcommand)]
pub enum Command {
    /// Manage links
    #[command(subcommand)]
    Links(links::LinksCommand),
    /// Manage collections and their members
    #[command(subcommand)]
    Collections(collections::CollectionsCommand),
    /// Show overview metrics and recent records
    Dashboard(dashboard::DashboardArgs),
    /// Configure the store URL and owner id
    Setup(setup::SetupArgs),
}

pub async fn run(cmd: Command) -> Result<()> {
    match cmd {
        Command::Links(cmd) => links::run(cmd).await,
        Command::Collections(cmd) => collections::run(cmd).await,
        Command::Dashboard(args) => dashboard::run(args).await,
        Command::Setup(args) => setup::run(args),
    }
}

/// Resolve the configured store client and owner id, or fail with an
/// actionable message.
pub(crate) fn store_context() -> Result<(HttpStore, UserId)> {
    let config = GlobalConfig::load();
    let api_url = config
        .api_url
        .ok_or_else(|| anyhow!("store is not configured (missing api_url)"))?;
    let user_id = config
        .user_id
        .ok_or_else(|| anyhow!("store is not configured (missing user_id)"))?;
    let store = HttpStore::new(api_url)?;
    Ok((store, UserId::new(user_id)))
}
