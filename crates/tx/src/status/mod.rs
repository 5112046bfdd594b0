// Path: crates/tx/src/status/mod.rs

//! Ordering and classification of extrinsic status updates.
//!
//! The ledger reports updates as an append-only log, but polling can observe the same
//! entry twice and a lagging node can report an older one. [`StatusTracker`] filters
//! both out so consumers only see a monotonic progression that ends at the first
//! terminal status.

use crate::events;
use lease_types::app::{BlockHash, ChainEvent, ContractId, NodeId, StatusUpdate, TransactionStatus};
use lease_types::error::LeaseError;
use tracing::debug;

/// What to do with an observed update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observation {
    /// New progress. Forward it.
    Emit,
    /// Identical to the last forwarded update.
    Duplicate,
    /// Older than the last forwarded update, or after a terminal one.
    Regression,
}

/// Tracks the last forwarded status of one extrinsic.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last: Option<TransactionStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `update` and, if it is new progress, records it.
    ///
    /// Updates of equal rank but different content are progress: a second
    /// `InBlock` with another hash means the first block was retracted.
    pub fn observe(&mut self, update: &StatusUpdate) -> Observation {
        let next = &update.status;
        let observation = match &self.last {
            None => Observation::Emit,
            Some(last) if last.is_terminal() => Observation::Regression,
            Some(last) if next.rank() < last.rank() => Observation::Regression,
            Some(last) if last == next => Observation::Duplicate,
            Some(_) => Observation::Emit,
        };
        match observation {
            Observation::Emit => self.last = Some(next.clone()),
            Observation::Duplicate | Observation::Regression => {
                debug!(target: "status", status = %next, ?observation, "suppressed status update");
            }
        }
        observation
    }

    /// The last forwarded status.
    pub fn last(&self) -> Option<&TransactionStatus> {
        self.last.as_ref()
    }

    /// Returns true once a terminal status has been forwarded.
    pub fn is_finished(&self) -> bool {
        self.last.as_ref().is_some_and(TransactionStatus::is_terminal)
    }
}

/// A transaction the ledger finalized and executed successfully.
#[derive(Clone, Debug, PartialEq)]
pub struct FinalizedTx {
    /// The finalized block containing the transaction.
    pub block_hash: BlockHash,
    /// Events the transaction emitted.
    pub events: Vec<ChainEvent>,
}

impl FinalizedTx {
    /// The contract id and node id of a `ContractAdded` event, for create calls.
    pub fn contract_added(&self) -> Option<(ContractId, Option<NodeId>)> {
        events::contract_added(&self.events)
    }
}

/// Maps a terminal update to the transaction's outcome. Returns `None` for
/// non-terminal updates.
///
/// A finalized block containing a failed dispatch is a ledger rejection, as is a
/// pool-level `Invalid`. `Dropped` and `Usurped` mean the transaction will never
/// execute under this hash.
pub fn terminal_outcome(update: &StatusUpdate) -> Option<Result<FinalizedTx, LeaseError>> {
    match &update.status {
        TransactionStatus::Finalized(block_hash) => {
            Some(match events::dispatch_failure(&update.events) {
                Some(reason) => Err(LeaseError::LedgerRejection(reason)),
                None => Ok(FinalizedTx {
                    block_hash: *block_hash,
                    events: update.events.clone(),
                }),
            })
        }
        TransactionStatus::Invalid(reason) => Some(Err(LeaseError::LedgerRejection(reason.clone()))),
        TransactionStatus::Dropped => Some(Err(LeaseError::Dropped(
            "evicted from the transaction pool".into(),
        ))),
        TransactionStatus::Usurped(by) => Some(Err(LeaseError::Dropped(format!(
            "usurped by {}",
            by
        )))),
        TransactionStatus::Future
        | TransactionStatus::Ready
        | TransactionStatus::Broadcast(_)
        | TransactionStatus::InBlock(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lease_types::app::H256;
    use serde_json::json;

    fn update(status: TransactionStatus) -> StatusUpdate {
        StatusUpdate::bare(status)
    }

    #[test]
    fn test_tracker_forwards_monotonic_progress() {
        let mut tracker = StatusTracker::new();
        let seq = [
            TransactionStatus::Ready,
            TransactionStatus::Broadcast(vec!["peer-1".into()]),
            TransactionStatus::InBlock(H256([1; 32])),
            TransactionStatus::Finalized(H256([1; 32])),
        ];
        for status in seq {
            assert_eq!(tracker.observe(&update(status)), Observation::Emit);
        }
        assert!(tracker.is_finished());
    }

    #[test]
    fn test_tracker_suppresses_duplicates_and_regressions() {
        let mut tracker = StatusTracker::new();
        assert_eq!(tracker.observe(&update(TransactionStatus::Ready)), Observation::Emit);
        assert_eq!(
            tracker.observe(&update(TransactionStatus::Ready)),
            Observation::Duplicate
        );
        assert_eq!(
            tracker.observe(&update(TransactionStatus::InBlock(H256([2; 32])))),
            Observation::Emit
        );
        assert_eq!(
            tracker.observe(&update(TransactionStatus::Ready)),
            Observation::Regression
        );
        assert_eq!(tracker.last(), Some(&TransactionStatus::InBlock(H256([2; 32]))));
    }

    #[test]
    fn test_tracker_allows_reorg_to_new_block() {
        let mut tracker = StatusTracker::new();
        tracker.observe(&update(TransactionStatus::InBlock(H256([1; 32]))));
        assert_eq!(
            tracker.observe(&update(TransactionStatus::InBlock(H256([9; 32])))),
            Observation::Emit
        );
    }

    #[test]
    fn test_nothing_follows_a_terminal_status() {
        let mut tracker = StatusTracker::new();
        tracker.observe(&update(TransactionStatus::Invalid("stale nonce".into())));
        assert_eq!(
            tracker.observe(&update(TransactionStatus::Finalized(H256::default()))),
            Observation::Regression
        );
    }

    #[test]
    fn test_terminal_outcome_classification() {
        assert!(terminal_outcome(&update(TransactionStatus::InBlock(H256::default()))).is_none());

        let ok = terminal_outcome(&update(TransactionStatus::Finalized(H256([3; 32]))))
            .unwrap()
            .unwrap();
        assert_eq!(ok.block_hash, H256([3; 32]));

        let failed = StatusUpdate {
            status: TransactionStatus::Finalized(H256([3; 32])),
            events: vec![events::system_event(
                0,
                events::EXTRINSIC_FAILED,
                vec![json!("AlreadyAccepted")],
            )],
        };
        assert_eq!(
            terminal_outcome(&failed).unwrap().unwrap_err(),
            LeaseError::LedgerRejection("AlreadyAccepted".into())
        );

        assert!(matches!(
            terminal_outcome(&update(TransactionStatus::Usurped(H256([4; 32])))),
            Some(Err(LeaseError::Dropped(_)))
        ));
        assert!(matches!(
            terminal_outcome(&update(TransactionStatus::Invalid("bad".into()))),
            Some(Err(LeaseError::LedgerRejection(_)))
        ));
    }
}
