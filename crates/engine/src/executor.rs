// Reconciliation executor: apply a plan as a batch of independent
// remote updates.
//
// Best-effort, non-atomic. Operations run concurrently (no two ops in
// one plan target the same link), every operation is awaited before the
// batch returns, and a failing operation neither aborts nor rolls back
// its siblings. No automatic retry.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use linkdeck_common::types::LinkPatch;

use crate::plan::MembershipOp;
use crate::store::{RemoteStore, StoreError};

/// An operation the store refused, kept for diagnostic surfacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedOp {
    pub op: MembershipOp,
    pub error: StoreError,
}

/// Terminal state of a batch: either all operations succeeded or some
/// failed, never partially in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub attempted: usize,
    pub failed: Vec<FailedOp>,
}

impl ExecutionReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.attempted - self.failed.len()
    }
}

/// Apply every operation against the store and await full completion.
///
/// An empty plan short-circuits: no remote call is made.
pub async fn execute(store: Arc<dyn RemoteStore>, ops: Vec<MembershipOp>) -> ExecutionReport {
    if ops.is_empty() {
        return ExecutionReport::default();
    }

    let attempted = ops.len();
    debug!(ops = attempted, "applying membership plan");

    let mut tasks = JoinSet::new();
    for op in ops {
        let store = Arc::clone(&store);
        tasks.spawn(async move {
            let patch = LinkPatch::assign_collection(op.new_collection.clone());
            match store.update_link(&op.link_id, patch).await {
                Ok(_) => None,
                Err(error) => Some(FailedOp { op, error }),
            }
        });
    }

    let mut failed = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(None) => {}
            Ok(Some(failure)) => {
                warn!(
                    link_id = %failure.op.link_id,
                    error = %failure.error,
                    "membership update failed; continuing with remaining operations"
                );
                failed.push(failure);
            }
            Err(join_error) => {
                warn!(%join_error, "membership update task aborted");
            }
        }
    }

    ExecutionReport { attempted, failed }
}
