// Error taxonomy for the save flow.
//
// Validation and upsert failures abort the save synchronously;
// per-link membership failures are aggregated into the save outcome
// instead, since the session always proceeds to refresh.

use thiserror::Error;

use linkdeck_common::types::LinkId;
use linkdeck_common::validation::ValidationError;

use crate::session::SessionState;
use crate::store::StoreError;

/// Misuse of the edit-session API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session is {0}; the selection can only change while editing")]
    NotEditing(SessionState),
    #[error("link `{0}` is not part of this edit session")]
    UnknownLink(LinkId),
}

/// A save that did not reach the reconciliation batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SaveError {
    /// Malformed collection fields — rejected before any remote call.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The collection create/update was rejected by the store. The
    /// whole save aborts; no membership change is attempted.
    #[error("failed to persist collection: {0}")]
    Upsert(#[source] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
