// Working selection: the in-memory member set of the collection being
// edited. Ephemeral — initialized when an edit session opens, mutated
// by toggles, discarded on save or cancel. Never persisted directly;
// it only exists to feed the planner.

use std::collections::HashSet;

use linkdeck_common::types::{CollectionId, Link, LinkId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSelection {
    ids: HashSet<LinkId>,
}

impl WorkingSelection {
    /// Empty selection, for a brand-new collection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Seed the selection from current membership when editing an
    /// existing collection.
    pub fn from_members<'a>(
        links: impl IntoIterator<Item = &'a Link>,
        collection: &CollectionId,
    ) -> Self {
        let ids = links
            .into_iter()
            .filter(|link| !link.id.is_empty() && link.belongs_to(collection))
            .map(|link| link.id.clone())
            .collect();
        Self { ids }
    }

    /// Set or clear a link's desired membership. Idempotent: toggling
    /// to the current state is a no-op. Empty ids are ignored — a link
    /// that is not yet persisted cannot be tracked.
    ///
    /// Returns whether the selection changed.
    pub fn toggle(&mut self, id: &LinkId, desired: bool) -> bool {
        if id.is_empty() {
            return false;
        }
        if desired {
            self.ids.insert(id.clone())
        } else {
            self.ids.remove(id)
        }
    }

    pub fn contains(&self, id: &LinkId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &HashSet<LinkId> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
