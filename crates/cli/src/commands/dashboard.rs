// `linkdeck dashboard` — overview metrics and recent records.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use linkdeck_common::metrics::OverviewMetrics;
use linkdeck_common::types::{Collection, Link};
use linkdeck_engine::store::RemoteStore;

use crate::commands::store_context;
use crate::output::{self, OutputFormat};

const RECENT_COUNT: usize = 5;

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct DashboardView {
    metrics: OverviewMetrics,
    recent_links: Vec<Link>,
    recent_collections: Vec<Collection>,
}

pub async fn run(args: DashboardArgs) -> Result<()> {
    let format = OutputFormat::detect(args.json);
    let (store, owner) = store_context()?;
    let links = store.list_links(&owner).await.context("failed to list links")?;
    let collections =
        store.list_collections(&owner).await.context("failed to list collections")?;

    let view = build_view(links, collections);
    output::print_output(format, &view, format_dashboard)?;
    Ok(())
}

fn build_view(mut links: Vec<Link>, mut collections: Vec<Collection>) -> DashboardView {
    let metrics = OverviewMetrics::compute(&links, &collections);
    links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    links.truncate(RECENT_COUNT);
    collections.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    collections.truncate(RECENT_COUNT);
    DashboardView { metrics, recent_links: links, recent_collections: collections }
}

fn format_dashboard(view: &DashboardView) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} link(s), {} collection(s), {} view(s), {} share(s)",
        view.metrics.links_total,
        view.metrics.collections_total,
        view.metrics.total_views,
        view.metrics.total_shares
    ));
    if !view.recent_links.is_empty() {
        lines.push("Recent links:".into());
        for link in &view.recent_links {
            lines.push(format!("  {} — {}", link.title, link.url));
        }
    }
    if !view.recent_collections.is_empty() {
        lines.push("Recent collections:".into());
        for collection in &view.recent_collections {
            lines.push(format!("  {} ({})", collection.name, collection.visibility));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use linkdeck_common::types::{LinkId, UserId, Visibility};

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000 + seconds, 0)
            .expect("timestamp should be valid")
    }

    fn link(id: &str, views: u64, seconds: i64) -> Link {
        Link {
            id: LinkId::from(id),
            owner_id: UserId::from("u1"),
            title: format!("link {id}"),
            url: format!("https://example.com/{id}"),
            short_url: None,
            tags: vec![],
            collection_id: None,
            clicks: 0,
            views,
            shares: 0,
            is_favorite: false,
            created_at: at(seconds),
        }
    }

    fn collection(id: &str, seconds: i64) -> Collection {
        Collection {
            id: linkdeck_common::types::CollectionId::from(id),
            owner_id: UserId::from("u1"),
            name: format!("collection {id}"),
            description: None,
            visibility: Visibility::Public,
            created_at: at(seconds),
        }
    }

    #[test]
    fn view_keeps_five_most_recent_links() {
        let links = (0..7).map(|i| link(&format!("l{i}"), 0, i)).collect();
        let view = build_view(links, vec![]);
        assert_eq!(view.metrics.links_total, 7);
        assert_eq!(view.recent_links.len(), RECENT_COUNT);
        // Newest first.
        assert_eq!(view.recent_links[0].id, LinkId::from("l6"));
        assert_eq!(view.recent_links[4].id, LinkId::from("l2"));
    }

    #[test]
    fn view_aggregates_metrics_before_truncating() {
        let links = vec![link("l1", 10, 0), link("l2", 5, 1)];
        let view = build_view(links, vec![collection("c1", 0)]);
        assert_eq!(view.metrics.total_views, 15);
        assert_eq!(view.metrics.collections_total, 1);
    }

    #[test]
    fn human_format_shows_sections() {
        let view = build_view(vec![link("l1", 3, 0)], vec![collection("c1", 0)]);
        let text = format_dashboard(&view);
        assert!(text.contains("1 link(s), 1 collection(s), 3 view(s)"));
        assert!(text.contains("Recent links:"));
        assert!(text.contains("Recent collections:"));
    }

    #[test]
    fn human_format_omits_empty_sections() {
        let view = build_view(vec![], vec![]);
        let text = format_dashboard(&view);
        assert!(!text.contains("Recent links:"));
        assert!(!text.contains("Recent collections:"));
    }
}
