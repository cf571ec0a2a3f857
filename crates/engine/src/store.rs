// Remote record store interface.
//
// The storage engine behind the API is an external collaborator: a
// passive record store reachable by id. This trait is the seam the
// engine talks through — in production an HTTP client, in tests a
// recording in-memory stub.

use async_trait::async_trait;
use thiserror::Error;

use linkdeck_common::types::{
    Collection, CollectionDraft, CollectionId, Link, LinkDraft, LinkId, LinkPatch, UserId,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store rejected the request ({code}): {message}")]
    Rejected { code: String, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
}

impl StoreError {
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected { code: code.into(), message: message.into() }
    }
}

/// Full-refresh reads and single-record mutations, each independently
/// fallible. No pagination contract is assumed.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_links(&self, owner: &UserId) -> Result<Vec<Link>, StoreError>;

    async fn list_collections(&self, owner: &UserId) -> Result<Vec<Collection>, StoreError>;

    async fn create_link(&self, owner: &UserId, draft: LinkDraft) -> Result<Link, StoreError>;

    async fn update_link(&self, id: &LinkId, patch: LinkPatch) -> Result<Link, StoreError>;

    async fn delete_link(&self, id: &LinkId) -> Result<(), StoreError>;

    async fn create_collection(
        &self,
        owner: &UserId,
        draft: CollectionDraft,
    ) -> Result<Collection, StoreError>;

    async fn update_collection(
        &self,
        id: &CollectionId,
        draft: CollectionDraft,
    ) -> Result<Collection, StoreError>;

    async fn delete_collection(&self, id: &CollectionId) -> Result<(), StoreError>;
}
