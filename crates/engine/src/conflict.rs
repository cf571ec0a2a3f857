// Conflict detection for selection adds.
//
// Adding a link that already belongs to a different collection is a
// move, not a plain add — the user is asked before the selection
// accepts it. This component never mutates persisted state; it only
// gates the working selection.

use async_trait::async_trait;

use linkdeck_common::types::{Collection, CollectionId, Link};

/// Outcome of a gated add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Blocking yes/no interaction with the user.
///
/// Injected so the toggle flow can await a real prompt in the CLI and
/// a scripted answer in tests.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Label used when the holding collection cannot be resolved locally,
/// e.g. it was deleted out of band.
const UNKNOWN_COLLECTION_LABEL: &str = "another collection";

pub struct ConflictDetector<'a> {
    collections: &'a [Collection],
    /// Save target; `None` while the collection being edited has not
    /// been persisted yet (brand-new collection).
    target: Option<&'a CollectionId>,
    prompt: &'a dyn ConfirmPrompt,
}

impl<'a> ConflictDetector<'a> {
    pub fn new(
        collections: &'a [Collection],
        target: Option<&'a CollectionId>,
        prompt: &'a dyn ConfirmPrompt,
    ) -> Self {
        Self { collections, target, prompt }
    }

    /// Gate an addition to the working selection.
    ///
    /// Allow without asking when the link is unclaimed or already held
    /// by the target; otherwise ask, naming the source collection.
    pub async fn evaluate_add(&self, link: &Link) -> Decision {
        let Some(current) = &link.collection_id else {
            return Decision::Allow;
        };
        if self.target == Some(current) {
            return Decision::Allow;
        }

        let holder = self.resolve_name(current).unwrap_or(UNKNOWN_COLLECTION_LABEL);
        let message = match self.target {
            None => format!(
                "\"{}\" currently belongs to \"{holder}\" and will be moved to this new collection. Continue?",
                link.title
            ),
            Some(target) => {
                let destination = self.resolve_name(target).unwrap_or("this collection");
                format!(
                    "\"{}\" currently belongs to \"{holder}\". Move it to \"{destination}\"?",
                    link.title
                )
            }
        };

        if self.prompt.confirm(&message).await {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }

    fn resolve_name(&self, id: &CollectionId) -> Option<&str> {
        self.collections.iter().find(|collection| &collection.id == id).map(|c| c.name.as_str())
    }
}
