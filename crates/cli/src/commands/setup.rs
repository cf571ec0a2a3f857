// `linkdeck setup` — write the store URL and owner id to the global
// config.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::config::GlobalConfig;
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Base URL of the record store API.
    #[arg(long)]
    api_url: Option<String>,
    /// Owner id issued by the auth layer.
    #[arg(long)]
    user: Option<String>,
    /// Show the current config without changing it.
    #[arg(long)]
    show: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SetupResult {
    api_url: Option<String>,
    user_id: Option<String>,
    path: Option<String>,
}

pub fn run(args: SetupArgs) -> Result<()> {
    let format = OutputFormat::detect(args.json);
    let mut config = GlobalConfig::load();

    let result = if args.show {
        SetupResult { api_url: config.api_url, user_id: config.user_id, path: None }
    } else {
        if let Some(api_url) = args.api_url {
            config.api_url = Some(api_url.trim_end_matches('/').to_owned());
        }
        if let Some(user) = args.user {
            config.user_id = Some(user);
        }
        let path = config.save().context("failed to write config")?;
        SetupResult {
            api_url: config.api_url,
            user_id: config.user_id,
            path: Some(path.display().to_string()),
        }
    };

    output::print_output(format, &result, format_setup)?;
    Ok(())
}

fn format_setup(result: &SetupResult) -> String {
    let api_url = result.api_url.as_deref().unwrap_or("<unset>");
    let user_id = result.user_id.as_deref().unwrap_or("<unset>");
    match &result.path {
        Some(path) => format!("Config written to {path}\n  api_url: {api_url}\n  user_id: {user_id}"),
        None => format!("api_url: {api_url}\nuser_id: {user_id}"),
    }
}
