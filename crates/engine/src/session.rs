// Edit session: one collection create/edit flow from open to save.
//
// State machine: Editing → Saving → Closed. A failed upsert drops the
// session back to Editing with nothing persisted; once the membership
// batch has run the session always refreshes and closes, regardless of
// per-link failures. There is no transition from Saving back to a
// mutable selection.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use linkdeck_common::types::{Collection, CollectionDraft, CollectionId, Link, LinkId, UserId};
use linkdeck_common::validation::validate_collection;

use crate::conflict::{ConflictDetector, ConfirmPrompt, Decision};
use crate::error::{SaveError, SessionError};
use crate::executor::{execute, FailedOp};
use crate::plan::plan;
use crate::selection::WorkingSelection;
use crate::store::{RemoteStore, StoreError};

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    Saving,
    Closed,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Saving => "saving",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a completed save produced.
///
/// `failed_ops` carries membership updates the store refused — data for
/// diagnostic surfacing, not an error: the save still closed the
/// session and refreshed. Callers are not required to retry.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub collection: Collection,
    pub failed_ops: Vec<FailedOp>,
    /// Authoritative link state refreshed from the store after the
    /// batch (the pre-save snapshot if the refresh itself failed).
    pub links: Vec<Link>,
}

impl SaveOutcome {
    pub fn fully_applied(&self) -> bool {
        self.failed_ops.is_empty()
    }
}

/// One collection edit flow: working selection, conflict gating, and
/// the composite save (upsert, plan, execute, refresh).
pub struct EditSession {
    store: Arc<dyn RemoteStore>,
    prompt: Arc<dyn ConfirmPrompt>,
    owner: UserId,
    /// The collection being edited; `None` while creating a new one.
    editing: Option<Collection>,
    links: Vec<Link>,
    collections: Vec<Collection>,
    selection: WorkingSelection,
    state: SessionState,
}

impl EditSession {
    /// Open a session for a brand-new collection: empty selection.
    pub fn create(
        store: Arc<dyn RemoteStore>,
        prompt: Arc<dyn ConfirmPrompt>,
        owner: UserId,
        links: Vec<Link>,
        collections: Vec<Collection>,
    ) -> Self {
        Self {
            store,
            prompt,
            owner,
            editing: None,
            links,
            collections,
            selection: WorkingSelection::empty(),
            state: SessionState::Editing,
        }
    }

    /// Open a session for an existing collection: selection seeded from
    /// current membership.
    pub fn edit(
        store: Arc<dyn RemoteStore>,
        prompt: Arc<dyn ConfirmPrompt>,
        owner: UserId,
        collection: Collection,
        links: Vec<Link>,
        collections: Vec<Collection>,
    ) -> Self {
        let selection = WorkingSelection::from_members(&links, &collection.id);
        Self {
            store,
            prompt,
            owner,
            editing: Some(collection),
            links,
            collections,
            selection,
            state: SessionState::Editing,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn selection(&self) -> &WorkingSelection {
        &self.selection
    }

    pub fn is_selected(&self, id: &LinkId) -> bool {
        self.selection.contains(id)
    }

    /// Toggle a link's desired membership.
    ///
    /// Additions are gated by the conflict detector; a declined
    /// confirmation leaves the selection exactly as it was (a declined
    /// choice, not an error). Returns whether the selection changed.
    pub async fn toggle(&mut self, id: &LinkId, desired: bool) -> Result<bool, SessionError> {
        if self.state != SessionState::Editing {
            return Err(SessionError::NotEditing(self.state));
        }
        if id.is_empty() {
            return Ok(false);
        }
        if !desired {
            return Ok(self.selection.toggle(id, false));
        }
        if self.selection.contains(id) {
            return Ok(false);
        }

        let link = self
            .links
            .iter()
            .find(|link| &link.id == id)
            .ok_or_else(|| SessionError::UnknownLink(id.clone()))?;

        let target = self.editing.as_ref().map(|collection| &collection.id);
        let detector = ConflictDetector::new(&self.collections, target, self.prompt.as_ref());
        match detector.evaluate_add(link).await {
            Decision::Allow => Ok(self.selection.toggle(id, true)),
            Decision::Deny => Ok(false),
        }
    }

    /// Persist the collection, reconcile membership, refresh, close.
    ///
    /// Field validation and the collection upsert fail the save as a
    /// whole — the planner never runs without a durable collection id.
    /// Membership failures after that point are returned inside the
    /// outcome.
    pub async fn save(&mut self, draft: CollectionDraft) -> Result<SaveOutcome, SaveError> {
        if self.state != SessionState::Editing {
            return Err(SessionError::NotEditing(self.state).into());
        }
        validate_collection(&draft)?;
        self.state = SessionState::Saving;

        let collection = match self.upsert(&draft).await {
            Ok(collection) => collection,
            Err(error) => {
                // Nothing was reconciled; the session stays open.
                self.state = SessionState::Editing;
                return Err(SaveError::Upsert(error));
            }
        };

        let ops = plan(&self.links, &self.selection, &collection.id);
        let report = execute(Arc::clone(&self.store), ops).await;
        if !report.all_succeeded() {
            warn!(
                collection = %collection.id,
                failed = report.failed.len(),
                attempted = report.attempted,
                "membership reconciliation completed partially"
            );
        }

        // Refresh authoritative state regardless of outcome.
        let links = match self.store.list_links(&self.owner).await {
            Ok(links) => links,
            Err(error) => {
                warn!(%error, "post-save refresh failed; keeping pre-save snapshot");
                self.links.clone()
            }
        };

        info!(
            collection = %collection.id,
            members = self.selection.len(),
            ops = report.attempted,
            failed = report.failed.len(),
            "collection saved"
        );
        self.state = SessionState::Closed;
        Ok(SaveOutcome { collection, failed_ops: report.failed, links })
    }

    async fn upsert(&self, draft: &CollectionDraft) -> Result<Collection, StoreError> {
        match &self.editing {
            Some(existing) => self.store.update_collection(&existing.id, draft.clone()).await,
            None => self.store.create_collection(&self.owner, draft.clone()).await,
        }
    }

    /// Target collection id, once known (always known when editing).
    pub fn target(&self) -> Option<&CollectionId> {
        self.editing.as_ref().map(|collection| &collection.id)
    }
}
