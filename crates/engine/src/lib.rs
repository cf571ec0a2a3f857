// linkdeck-engine: collection-membership reconciliation core.
//
// A link belongs to at most one collection (nullable foreign key), so
// membership is derived state and reconciliation is a foreign-key
// update problem: diff the desired member set against the current one
// and apply the minimal batch of per-link writes.

pub mod conflict;
pub mod error;
pub mod executor;
pub mod plan;
pub mod selection;
pub mod session;
pub mod store;
