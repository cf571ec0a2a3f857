// End-to-end save flow against a recording in-memory store.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use linkdeck_common::types::{
    Collection, CollectionDraft, CollectionId, Link, LinkDraft, LinkId, LinkPatch, UserId,
    Visibility,
};
use linkdeck_engine::conflict::ConfirmPrompt;
use linkdeck_engine::error::{SaveError, SessionError};
use linkdeck_engine::session::{EditSession, SessionState};
use linkdeck_engine::store::{RemoteStore, StoreError};

// ── Test doubles ────────────────────────────────────────────────────

/// In-memory record store that counts reads and records every link
/// update, with scripted failures per link id or for collection
/// upserts.
#[derive(Default)]
struct RecordingStore {
    links: Mutex<Vec<Link>>,
    collections: Mutex<Vec<Collection>>,
    fail_link_updates: HashSet<LinkId>,
    fail_collection_upserts: bool,
    list_links_calls: AtomicUsize,
    link_updates: Mutex<Vec<LinkId>>,
}

impl RecordingStore {
    fn with_links(links: Vec<Link>, collections: Vec<Collection>) -> Self {
        Self {
            links: Mutex::new(links),
            collections: Mutex::new(collections),
            ..Self::default()
        }
    }

    fn failing_links(mut self, ids: &[&str]) -> Self {
        self.fail_link_updates = ids.iter().map(|id| LinkId::from(*id)).collect();
        self
    }

    fn failing_upserts(mut self) -> Self {
        self.fail_collection_upserts = true;
        self
    }

    fn refreshes(&self) -> usize {
        self.list_links_calls.load(Ordering::SeqCst)
    }

    fn updated_ids(&self) -> Vec<LinkId> {
        self.link_updates.lock().unwrap().clone()
    }

    fn link(&self, id: &str) -> Link {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|link| link.id == LinkId::from(id))
            .cloned()
            .expect("link should exist in store")
    }
}

#[async_trait]
impl RemoteStore for RecordingStore {
    async fn list_links(&self, owner: &UserId) -> Result<Vec<Link>, StoreError> {
        self.list_links_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|link| &link.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn list_collections(&self, owner: &UserId) -> Result<Vec<Collection>, StoreError> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .iter()
            .filter(|collection| &collection.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn create_link(&self, owner: &UserId, draft: LinkDraft) -> Result<Link, StoreError> {
        let link = Link {
            id: LinkId::new(Uuid::new_v4().to_string()),
            owner_id: owner.clone(),
            title: draft.title,
            url: draft.url,
            short_url: draft.short_url,
            tags: draft.tags,
            collection_id: draft.collection_id,
            clicks: 0,
            views: 0,
            shares: 0,
            is_favorite: false,
            created_at: ts(),
        };
        self.links.lock().unwrap().push(link.clone());
        Ok(link)
    }

    async fn update_link(&self, id: &LinkId, patch: LinkPatch) -> Result<Link, StoreError> {
        self.link_updates.lock().unwrap().push(id.clone());
        if self.fail_link_updates.contains(id) {
            return Err(StoreError::rejected("CONSTRAINT", "link update refused"));
        }
        let mut links = self.links.lock().unwrap();
        let link = links.iter_mut().find(|link| &link.id == id).ok_or(StoreError::NotFound)?;
        if let Some(title) = patch.title {
            link.title = title;
        }
        if let Some(collection_id) = patch.collection_id {
            link.collection_id = collection_id;
        }
        if let Some(flag) = patch.is_favorite {
            link.is_favorite = flag;
        }
        Ok(link.clone())
    }

    async fn delete_link(&self, id: &LinkId) -> Result<(), StoreError> {
        let mut links = self.links.lock().unwrap();
        let before = links.len();
        links.retain(|link| &link.id != id);
        if links.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn create_collection(
        &self,
        owner: &UserId,
        draft: CollectionDraft,
    ) -> Result<Collection, StoreError> {
        if self.fail_collection_upserts {
            return Err(StoreError::rejected("UNAVAILABLE", "collection create refused"));
        }
        let collection = Collection {
            id: CollectionId::new(Uuid::new_v4().to_string()),
            owner_id: owner.clone(),
            name: draft.name,
            description: draft.description,
            visibility: draft.visibility,
            created_at: ts(),
        };
        self.collections.lock().unwrap().push(collection.clone());
        Ok(collection)
    }

    async fn update_collection(
        &self,
        id: &CollectionId,
        draft: CollectionDraft,
    ) -> Result<Collection, StoreError> {
        if self.fail_collection_upserts {
            return Err(StoreError::rejected("UNAVAILABLE", "collection update refused"));
        }
        let mut collections = self.collections.lock().unwrap();
        let collection =
            collections.iter_mut().find(|c| &c.id == id).ok_or(StoreError::NotFound)?;
        collection.name = draft.name;
        collection.description = draft.description;
        collection.visibility = draft.visibility;
        Ok(collection.clone())
    }

    async fn delete_collection(&self, id: &CollectionId) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().unwrap();
        let before = collections.len();
        collections.retain(|collection| &collection.id != id);
        if collections.len() == before {
            return Err(StoreError::NotFound);
        }
        // Server behavior: member links keep existing without a collection.
        for link in self.links.lock().unwrap().iter_mut() {
            if link.collection_id.as_ref() == Some(id) {
                link.collection_id = None;
            }
        }
        Ok(())
    }
}

/// Prompt stub answering uniformly, counting invocations.
struct ScriptedPrompt {
    answer: bool,
    calls: AtomicUsize,
}

impl ScriptedPrompt {
    fn new(answer: bool) -> Self {
        Self { answer, calls: AtomicUsize::new(0) }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfirmPrompt for ScriptedPrompt {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

fn ts() -> DateTime<Utc> {
    "2026-01-15T10:00:00Z".parse().expect("timestamp should parse")
}

fn owner() -> UserId {
    UserId::from("u1")
}

fn link(id: &str, collection: Option<&str>) -> Link {
    Link {
        id: LinkId::from(id),
        owner_id: owner(),
        title: format!("link {id}"),
        url: format!("https://example.com/{id}"),
        short_url: None,
        tags: vec![],
        collection_id: collection.map(CollectionId::from),
        clicks: 0,
        views: 0,
        shares: 0,
        is_favorite: false,
        created_at: ts(),
    }
}

fn collection(id: &str, name: &str) -> Collection {
    Collection {
        id: CollectionId::from(id),
        owner_id: owner(),
        name: name.into(),
        description: None,
        visibility: Visibility::Public,
        created_at: ts(),
    }
}

fn draft(name: &str) -> CollectionDraft {
    CollectionDraft { name: name.into(), description: None, visibility: Visibility::Public }
}

async fn open_create(store: &Arc<RecordingStore>, prompt: Arc<dyn ConfirmPrompt>) -> EditSession {
    let links = store.list_links(&owner()).await.expect("seed list should succeed");
    let collections = store.list_collections(&owner()).await.expect("seed list should succeed");
    // The seed read is setup, not the post-save refresh under test.
    store.list_links_calls.store(0, Ordering::SeqCst);
    EditSession::create(Arc::clone(store) as Arc<dyn RemoteStore>, prompt, owner(), links, collections)
}

async fn open_edit(
    store: &Arc<RecordingStore>,
    prompt: Arc<dyn ConfirmPrompt>,
    collection_id: &str,
) -> EditSession {
    let links = store.list_links(&owner()).await.expect("seed list should succeed");
    let collections = store.list_collections(&owner()).await.expect("seed list should succeed");
    store.list_links_calls.store(0, Ordering::SeqCst);
    let editing = collections
        .iter()
        .find(|c| c.id == CollectionId::from(collection_id))
        .cloned()
        .expect("collection under edit should exist");
    EditSession::edit(
        Arc::clone(store) as Arc<dyn RemoteStore>,
        prompt,
        owner(),
        editing,
        links,
        collections,
    )
}

// ── Save flow ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_collection_with_moved_and_fresh_members() {
    // l1 is unclaimed, l2 is held by c2; both should end up in the new collection.
    let store = Arc::new(RecordingStore::with_links(
        vec![link("l1", None), link("l2", Some("c2")), link("l3", None)],
        vec![collection("c2", "Work")],
    ));
    let prompt = Arc::new(ScriptedPrompt::new(true));
    let mut session = open_create(&store, prompt.clone()).await;

    assert!(session.toggle(&LinkId::from("l1"), true).await.unwrap());
    assert!(session.toggle(&LinkId::from("l2"), true).await.unwrap());
    // Only the claimed link needed a confirmation.
    assert_eq!(prompt.calls(), 1);

    let outcome = session.save(draft("Reading")).await.expect("save should succeed");
    assert!(outcome.fully_applied());
    let target = outcome.collection.id.clone();

    assert_eq!(store.link("l1").collection_id, Some(target.clone()));
    assert_eq!(store.link("l2").collection_id, Some(target));
    // l3 was never desired and never touched.
    assert_eq!(store.link("l3").collection_id, None);
    assert!(!store.updated_ids().contains(&LinkId::from("l3")));
    assert_eq!(store.refreshes(), 1);
    assert_eq!(session.state(), SessionState::Closed);
}

#[tokio::test]
async fn post_save_membership_matches_desired_set_exactly() {
    let store = Arc::new(RecordingStore::with_links(
        vec![link("l1", Some("c1")), link("l2", Some("c1")), link("l3", Some("c2")), link("l4", None)],
        vec![collection("c1", "Reading"), collection("c2", "Work")],
    ));
    let prompt = Arc::new(ScriptedPrompt::new(true));
    let mut session = open_edit(&store, prompt, "c1").await;

    // Desired: keep l1, drop l2, steal l3, add l4.
    session.toggle(&LinkId::from("l2"), false).await.unwrap();
    session.toggle(&LinkId::from("l3"), true).await.unwrap();
    session.toggle(&LinkId::from("l4"), true).await.unwrap();

    let outcome = session.save(draft("Reading")).await.expect("save should succeed");
    assert!(outcome.fully_applied());

    let c1 = CollectionId::from("c1");
    for refreshed in &outcome.links {
        let should_belong = ["l1", "l3", "l4"].contains(&refreshed.id.as_str());
        assert_eq!(refreshed.collection_id == Some(c1.clone()), should_belong, "link {}", refreshed.id);
    }
    // l1 was already correct: no write for it.
    assert!(!store.updated_ids().contains(&LinkId::from("l1")));
}

#[tokio::test]
async fn edit_without_changes_issues_no_membership_writes() {
    let store = Arc::new(RecordingStore::with_links(
        vec![link("l1", Some("c1")), link("l2", Some("c2"))],
        vec![collection("c1", "Reading"), collection("c2", "Work")],
    ));
    let prompt = Arc::new(ScriptedPrompt::new(true));
    let mut session = open_edit(&store, prompt, "c1").await;

    let outcome = session.save(draft("Reading, renamed")).await.expect("save should succeed");
    assert!(outcome.fully_applied());
    assert!(store.updated_ids().is_empty());
    // The refresh still happens even for an empty plan.
    assert_eq!(store.refreshes(), 1);
    // The rename itself was persisted.
    let stored = store.collections.lock().unwrap()[0].clone();
    assert_eq!(stored.name, "Reading, renamed");
}

#[tokio::test]
async fn desired_empty_set_clears_all_members() {
    let store = Arc::new(RecordingStore::with_links(
        vec![link("l1", Some("c1")), link("l2", Some("c1"))],
        vec![collection("c1", "Reading")],
    ));
    let prompt = Arc::new(ScriptedPrompt::new(true));
    let mut session = open_edit(&store, prompt, "c1").await;

    session.toggle(&LinkId::from("l1"), false).await.unwrap();
    session.toggle(&LinkId::from("l2"), false).await.unwrap();

    let outcome = session.save(draft("Reading")).await.expect("save should succeed");
    assert!(outcome.fully_applied());
    assert_eq!(store.link("l1").collection_id, None);
    assert_eq!(store.link("l2").collection_id, None);
}

// ── Conflict gating ─────────────────────────────────────────────────

#[tokio::test]
async fn declined_confirmation_reverts_the_toggle() {
    let store = Arc::new(RecordingStore::with_links(
        vec![link("l1", Some("c2"))],
        vec![collection("c1", "Reading"), collection("c2", "Work")],
    ));
    let prompt = Arc::new(ScriptedPrompt::new(false));
    let mut session = open_edit(&store, prompt.clone(), "c1").await;
    let before = session.selection().clone();

    let changed = session.toggle(&LinkId::from("l1"), true).await.unwrap();
    assert!(!changed);
    assert_eq!(prompt.calls(), 1);
    assert_eq!(session.selection(), &before);

    // Saving afterwards issues no write for the declined link.
    let outcome = session.save(draft("Reading")).await.expect("save should succeed");
    assert!(outcome.fully_applied());
    assert!(store.updated_ids().is_empty());
    assert_eq!(store.link("l1").collection_id, Some(CollectionId::from("c2")));
}

#[tokio::test]
async fn unknown_link_toggle_is_an_error() {
    let store = Arc::new(RecordingStore::with_links(vec![], vec![]));
    let prompt = Arc::new(ScriptedPrompt::new(true));
    let mut session = open_create(&store, prompt).await;

    let error = session.toggle(&LinkId::from("ghost"), true).await.unwrap_err();
    assert_eq!(error, SessionError::UnknownLink(LinkId::from("ghost")));
}

// ── Failure handling ────────────────────────────────────────────────

#[tokio::test]
async fn validation_failure_reaches_no_store_call() {
    let store = Arc::new(RecordingStore::with_links(vec![link("l1", None)], vec![]));
    let prompt = Arc::new(ScriptedPrompt::new(true));
    let mut session = open_create(&store, prompt).await;
    session.toggle(&LinkId::from("l1"), true).await.unwrap();

    let error = session.save(draft("   ")).await.unwrap_err();
    assert!(matches!(error, SaveError::Validation(_)));
    assert!(store.updated_ids().is_empty());
    assert!(store.collections.lock().unwrap().is_empty());
    assert_eq!(store.refreshes(), 0);
    assert_eq!(session.state(), SessionState::Editing);
}

#[tokio::test]
async fn upsert_failure_aborts_before_any_link_write() {
    let store = Arc::new(
        RecordingStore::with_links(vec![link("l1", None)], vec![]).failing_upserts(),
    );
    let prompt = Arc::new(ScriptedPrompt::new(true));
    let mut session = open_create(&store, prompt).await;
    session.toggle(&LinkId::from("l1"), true).await.unwrap();

    let error = session.save(draft("Reading")).await.unwrap_err();
    assert!(matches!(error, SaveError::Upsert(_)));
    assert!(store.updated_ids().is_empty());
    assert_eq!(store.refreshes(), 0);
    // The session drops back to editing; a later toggle still works.
    assert_eq!(session.state(), SessionState::Editing);
    assert!(session.toggle(&LinkId::from("l1"), false).await.unwrap());
}

#[tokio::test]
async fn partial_membership_failure_is_reported_and_still_refreshes() {
    let store = Arc::new(
        RecordingStore::with_links(
            vec![link("l1", None), link("l2", None), link("l3", None)],
            vec![],
        )
        .failing_links(&["l2"]),
    );
    let prompt = Arc::new(ScriptedPrompt::new(true));
    let mut session = open_create(&store, prompt).await;
    for id in ["l1", "l2", "l3"] {
        session.toggle(&LinkId::from(id), true).await.unwrap();
    }

    let outcome = session.save(draft("Reading")).await.expect("save should still succeed");
    assert!(!outcome.fully_applied());
    assert_eq!(outcome.failed_ops.len(), 1);
    assert_eq!(outcome.failed_ops[0].op.link_id, LinkId::from("l2"));

    // The siblings were applied, the batch refreshed, the session closed.
    let target = outcome.collection.id.clone();
    assert_eq!(store.link("l1").collection_id, Some(target.clone()));
    assert_eq!(store.link("l2").collection_id, None);
    assert_eq!(store.link("l3").collection_id, Some(target));
    assert_eq!(store.refreshes(), 1);
    assert_eq!(session.state(), SessionState::Closed);
}

// ── State machine guards ────────────────────────────────────────────

#[tokio::test]
async fn closed_session_rejects_toggle_and_save() {
    let store = Arc::new(RecordingStore::with_links(vec![link("l1", None)], vec![]));
    let prompt = Arc::new(ScriptedPrompt::new(true));
    let mut session = open_create(&store, prompt).await;
    session.save(draft("Reading")).await.expect("save should succeed");

    let toggle_error = session.toggle(&LinkId::from("l1"), true).await.unwrap_err();
    assert_eq!(toggle_error, SessionError::NotEditing(SessionState::Closed));

    let save_error = session.save(draft("Again")).await.unwrap_err();
    assert!(matches!(save_error, SaveError::Session(SessionError::NotEditing(_))));
}
