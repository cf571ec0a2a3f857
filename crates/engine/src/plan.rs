// Reconciliation planner: diff desired membership against current
// membership and emit the minimal set of per-link writes.

use linkdeck_common::types::{CollectionId, Link, LinkId};

use crate::selection::WorkingSelection;

/// A single instruction to set or clear a link's collection reference.
///
/// Because membership is a nullable foreign key, assigning a link to
/// the target implicitly removes it from whatever collection held it —
/// one write, never an add/remove pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipOp {
    pub link_id: LinkId,
    pub new_collection: Option<CollectionId>,
}

/// Compute the operations that make actual membership match `desired`.
///
/// Links already in the right state produce no operation; links with an
/// empty id are skipped (not yet persisted, nothing to update). Emitted
/// order is insignificant — every operation touches a distinct link.
pub fn plan(links: &[Link], desired: &WorkingSelection, target: &CollectionId) -> Vec<MembershipOp> {
    let mut ops = Vec::new();
    for link in links {
        if link.id.is_empty() {
            continue;
        }
        let should_belong = desired.contains(&link.id);
        let currently_belongs = link.belongs_to(target);
        if should_belong == currently_belongs {
            continue;
        }
        let new_collection = should_belong.then(|| target.clone());
        ops.push(MembershipOp { link_id: link.id.clone(), new_collection });
    }
    ops
}
