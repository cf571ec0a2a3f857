// Overview metrics derived from full-refresh reads.

use serde::{Deserialize, Serialize};

use crate::types::{Collection, Link};

/// Aggregate counters for the dashboard view.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverviewMetrics {
    pub links_total: usize,
    pub collections_total: usize,
    pub total_views: u64,
    pub total_shares: u64,
}

impl OverviewMetrics {
    pub fn compute(links: &[Link], collections: &[Collection]) -> Self {
        Self {
            links_total: links.len(),
            collections_total: collections.len(),
            total_views: links.iter().fold(0u64, |sum, link| sum.saturating_add(link.views)),
            total_shares: links.iter().fold(0u64, |sum, link| sum.saturating_add(link.shares)),
        }
    }
}
