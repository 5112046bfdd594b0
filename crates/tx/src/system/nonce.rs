// Path: crates/tx/src/system/nonce.rs

//! Per-signer nonce allocation.
//!
//! The ledger only reports the next nonce for transactions it has already seen, so
//! two submissions from one signer racing each other would both read the same value.
//! [`NonceLedger`] serializes them: a [`NonceReservation`] holds the signer's lock from
//! nonce assignment until the submission is accepted or abandoned.

use lease_types::app::AccountId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, warn};

type Slot = Arc<AsyncMutex<Option<u64>>>;

/// Nonces handed out by this process, per signer.
#[derive(Debug, Default)]
pub struct NonceLedger {
    slots: Mutex<HashMap<AccountId, Slot>>,
}

impl NonceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, account: &AccountId) -> Slot {
        // A poisoned map still holds valid slots.
        let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        slots.entry(*account).or_default().clone()
    }

    /// Waits until no other reservation for `account` is live, then returns one.
    pub async fn reserve(&self, account: AccountId) -> NonceReservation {
        let guard = self.slot(&account).lock_owned().await;
        NonceReservation {
            account,
            guard,
            assigned: None,
        }
    }

    /// Rewinds the cached next nonce for `account` to `failed`, the nonce of a
    /// transaction that left the pool unexecuted. Nonces below `failed` may still be
    /// pending and stay reserved.
    pub async fn rollback(&self, account: &AccountId, failed: u64) {
        let slot = self.slot(account);
        let mut cached = slot.lock().await;
        if let Some(next) = cached.as_mut() {
            if failed < *next {
                debug!(target: "nonce", %account, from = *next, to = failed, "cached nonce rewound");
                *next = failed;
            }
        }
    }
}

/// Exclusive right to submit the next transaction for one signer.
#[derive(Debug)]
pub struct NonceReservation {
    account: AccountId,
    guard: OwnedMutexGuard<Option<u64>>,
    assigned: Option<u64>,
}

impl NonceReservation {
    /// Picks the nonce to sign with, given the ledger's next index for the signer.
    ///
    /// The ledger's value lags transactions still in the pool, so the larger of it
    /// and the locally cached value wins.
    pub fn assign(&mut self, chain_next: u64) -> u64 {
        let nonce = match *self.guard {
            Some(cached) if cached > chain_next => {
                debug!(target: "nonce", account = %self.account, cached, chain_next, "ledger lags local nonce");
                cached
            }
            _ => chain_next,
        };
        self.assigned = Some(nonce);
        nonce
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// Records that the ledger accepted a transaction at the assigned nonce.
    pub fn commit(mut self) {
        match self.assigned {
            Some(n) => *self.guard = Some(n.saturating_add(1)),
            None => warn!(target: "nonce", account = %self.account, "commit without an assigned nonce"),
        }
    }

    /// Records that submission failed. The assigned nonce was not consumed, so the
    /// cache keeps its previous value.
    pub fn abandon(self) {
        debug!(target: "nonce", account = %self.account, assigned = ?self.assigned, "reservation abandoned");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const ALICE: AccountId = AccountId([1; 32]);
    const BOB: AccountId = AccountId([2; 32]);

    #[tokio::test]
    async fn test_commit_advances_past_lagging_chain() {
        let ledger = NonceLedger::new();
        let mut r = ledger.reserve(ALICE).await;
        assert_eq!(r.assign(0), 0);
        r.commit();

        let mut r = ledger.reserve(ALICE).await;
        // The ledger has not seen the first transaction yet.
        assert_eq!(r.assign(0), 1);
        r.commit();

        let mut r = ledger.reserve(ALICE).await;
        assert_eq!(r.assign(7), 7);
    }

    #[tokio::test]
    async fn test_abandon_keeps_pending_nonces_reserved() {
        let ledger = NonceLedger::new();
        let mut r = ledger.reserve(ALICE).await;
        r.assign(4);
        r.commit();
        let mut r = ledger.reserve(ALICE).await;
        assert_eq!(r.assign(0), 5);
        r.abandon();
        // Nonce 4 is still pending; 5 was never used.
        let mut r = ledger.reserve(ALICE).await;
        assert_eq!(r.assign(2), 5);
    }

    #[tokio::test]
    async fn test_same_signer_is_serialized() {
        let ledger = Arc::new(NonceLedger::new());
        let held = ledger.reserve(ALICE).await;

        let l2 = ledger.clone();
        let waiter = tokio::spawn(async move {
            let mut r = l2.reserve(ALICE).await;
            r.assign(0)
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        // Other signers are not blocked.
        let mut other = ledger.reserve(BOB).await;
        assert_eq!(other.assign(3), 3);

        let mut held = held;
        held.assign(0);
        held.commit();
        assert_eq!(waiter.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_rollback_rewinds_to_failed_nonce_only() {
        let ledger = NonceLedger::new();
        for expected in 0..3 {
            let mut r = ledger.reserve(ALICE).await;
            assert_eq!(r.assign(0), expected);
            r.commit();
        }

        // Nonce 1 failed; 0 is still pending.
        ledger.rollback(&ALICE, 1).await;
        let mut r = ledger.reserve(ALICE).await;
        assert_eq!(r.assign(0), 1);
        r.commit();

        // A rollback above the cache changes nothing.
        ledger.rollback(&ALICE, 7).await;
        let mut r = ledger.reserve(ALICE).await;
        assert_eq!(r.assign(0), 2);
    }

    #[tokio::test]
    async fn test_rollback_without_cache_is_noop() {
        let ledger = NonceLedger::new();
        ledger.rollback(&BOB, 3).await;
        let mut r = ledger.reserve(BOB).await;
        assert_eq!(r.assign(0), 0);
    }
}
