// Path: crates/test_utils/src/ledger/mod.rs

//! An in-memory ledger node running the volume contract module.
//!
//! Storage is kept as raw SCALE bytes under the same keys a real node uses, so the
//! client reads it through its normal decode path. Every included extrinsic gets a
//! block of its own.

mod dispatch;

pub use dispatch::escrow_account;

use async_trait::async_trait;
use lease_client::LedgerTransport;
use lease_tx::system::validation::verify_extrinsic;
use lease_tx::UncheckedExtrinsic;
use lease_types::app::{
    AccountId, AccountInfo, Balance, BlockHash, ChainEvent, Contract, ContractId, Pricing,
    ResourcePrice, StatusUpdate, TransactionStatus, TxHash, WorkloadState, H256,
};
use lease_types::codec;
use lease_types::error::LeaseError;
use lease_types::keys;
use lease_types::schema::{RemoteSchema, SchemaVariant};
use parity_scale_codec::{Decode, Encode};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// Blocks a new contract stays valid for.
pub const CONTRACT_DURATION: u64 = 100_800;

/// Peer id reported in `Broadcast` updates.
pub const MOCK_PEER: &str = "12D3KooWMockLedgerPeer";

/// When the ledger seals and finalizes blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SealMode {
    /// Include and finalize on submission.
    Instant,
    /// Include on submission; finalize only on [`InMemoryLedger::finalize`].
    HoldFinality,
    /// Leave extrinsics in the pool until [`InMemoryLedger::seal`].
    Manual,
}

struct TxEntry {
    xt: UncheckedExtrinsic,
    log: Vec<StatusUpdate>,
    announced: bool,
}

struct LedgerState {
    storage: BTreeMap<Vec<u8>, Vec<u8>>,
    block_number: u64,
    mode: SealMode,
    schema: RemoteSchema,
    pricing: Pricing,
    pool: Vec<TxHash>,
    txs: HashMap<TxHash, TxEntry>,
    unfinalized: Vec<(TxHash, BlockHash, Vec<ChainEvent>)>,
    submitted: Vec<UncheckedExtrinsic>,
    failing_polls: usize,
    failing_submits: usize,
}

impl LedgerState {
    fn get<T: Decode>(&self, key: &[u8]) -> Option<T> {
        self.storage
            .get(key)
            .and_then(|b| codec::from_bytes_canonical(b).ok())
    }

    fn put<T: Encode>(&mut self, key: Vec<u8>, value: &T) {
        self.storage.insert(key, value.encode());
    }

    fn account(&self, who: &AccountId) -> AccountInfo {
        self.get(&keys::account_key(who)).unwrap_or_default()
    }

    fn log_mut(&mut self, hash: &TxHash) -> Option<&mut Vec<StatusUpdate>> {
        self.txs.get_mut(hash).map(|e| &mut e.log)
    }

    fn push(&mut self, hash: &TxHash, update: StatusUpdate) {
        if let Some(log) = self.log_mut(hash) {
            log.push(update);
        }
    }

    /// The nonce a newly imported extrinsic from `who` must carry to be ready.
    fn pool_next(&self, who: &AccountId) -> u64 {
        let mut next = self.account(who).nonce;
        while self.pool.iter().any(|h| {
            self.txs
                .get(h)
                .is_some_and(|e| e.xt.signer == *who && e.xt.nonce == next)
        }) {
            next += 1;
        }
        next
    }

    fn announce(&mut self, hash: &TxHash) {
        let fresh = match self.txs.get_mut(hash) {
            Some(entry) if !entry.announced => {
                entry.announced = true;
                true
            }
            _ => false,
        };
        if fresh {
            self.push(hash, StatusUpdate::bare(TransactionStatus::Ready));
            self.push(
                hash,
                StatusUpdate::bare(TransactionStatus::Broadcast(vec![MOCK_PEER.to_string()])),
            );
        }
    }

    /// Includes every pool extrinsic whose nonce is due, one block each.
    fn produce(&mut self) {
        loop {
            let due = self.pool.iter().copied().find(|h| {
                self.txs
                    .get(h)
                    .is_some_and(|e| e.xt.nonce == self.account(&e.xt.signer).nonce)
            });
            let Some(hash) = due else { break };
            self.pool.retain(|h| *h != hash);
            self.announce(&hash);
            self.include(hash);
        }
    }

    fn include(&mut self, hash: TxHash) {
        let Some(xt) = self.txs.get(&hash).map(|e| e.xt.clone()) else {
            return;
        };
        self.block_number += 1;
        let block_hash = block_hash(self.block_number, &hash);

        let mut info = self.account(&xt.signer);
        info.nonce += 1;
        self.put(keys::account_key(&xt.signer), &info);

        let events = dispatch::apply(self, &xt);
        log::debug!(
            "block #{} includes {} ({})",
            self.block_number,
            hash,
            xt.call.name()
        );
        self.push(
            &hash,
            StatusUpdate {
                status: TransactionStatus::InBlock(block_hash),
                events: events.clone(),
            },
        );
        self.unfinalized.push((hash, block_hash, events));
        if self.mode == SealMode::Instant {
            self.finalize();
        }
    }

    fn finalize(&mut self) {
        for (hash, block_hash, events) in std::mem::take(&mut self.unfinalized) {
            self.push(
                &hash,
                StatusUpdate {
                    status: TransactionStatus::Finalized(block_hash),
                    events,
                },
            );
        }
    }
}

fn block_hash(number: u64, tx: &TxHash) -> BlockHash {
    let mut hasher = Sha256::new();
    hasher.update(number.to_le_bytes());
    hasher.update(tx.0);
    H256(hasher.finalize().into())
}

/// The pricing every new contract gets.
pub fn default_pricing() -> Pricing {
    Pricing::PerResource(ResourcePrice {
        currency: 1,
        storage: 20,
        host: 10,
        compute: 30,
        network: 5,
        memory: 15,
    })
}

/// An in-memory ledger node. Share it behind an `Arc`.
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(SealMode::Instant)
    }
}

impl InMemoryLedger {
    pub fn new(mode: SealMode) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                storage: BTreeMap::new(),
                block_number: 1,
                mode,
                schema: RemoteSchema::for_variant(SchemaVariant::CANONICAL),
                pricing: default_pricing(),
                pool: Vec::new(),
                txs: HashMap::new(),
                unfinalized: Vec::new(),
                submitted: Vec::new(),
                failing_polls: 0,
                failing_submits: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn set_mode(&self, mode: SealMode) {
        self.lock().mode = mode;
    }

    /// Advertises `schema` in the handshake instead of the canonical one.
    pub fn set_schema(&self, schema: RemoteSchema) {
        self.lock().schema = schema;
    }

    pub fn set_pricing(&self, pricing: Pricing) {
        self.lock().pricing = pricing;
    }

    /// Credits `amount` to `who`'s free balance.
    pub fn endow(&self, who: &AccountId, amount: Balance) {
        let mut state = self.lock();
        let mut info = state.account(who);
        info.data.free = info.data.free.saturating_add(amount);
        state.put(keys::account_key(who), &info);
    }

    /// Advances the block number without including anything.
    pub fn advance_blocks(&self, n: u64) {
        self.lock().block_number += n;
    }

    pub fn block_number(&self) -> u64 {
        self.lock().block_number
    }

    /// Includes every due pool extrinsic, finalizing only in [`SealMode::Instant`].
    pub fn seal(&self) {
        self.lock().produce();
    }

    /// Finalizes every included extrinsic.
    pub fn finalize(&self) {
        self.lock().finalize();
    }

    /// Evicts every pool extrinsic with a `Dropped` status.
    pub fn drop_pool(&self) {
        let mut state = self.lock();
        for hash in std::mem::take(&mut state.pool) {
            state.push(&hash, StatusUpdate::bare(TransactionStatus::Dropped));
        }
    }

    /// Appends `update` to an extrinsic's status log as is.
    pub fn push_update(&self, hash: &TxHash, update: StatusUpdate) {
        self.lock().push(hash, update);
    }

    /// Fails the next `n` status polls with a connection error.
    pub fn fail_next_polls(&self, n: usize) {
        self.lock().failing_polls = n;
    }

    /// Fails the next `n` submissions before import.
    pub fn fail_next_submits(&self, n: usize) {
        self.lock().failing_submits = n;
    }

    /// Overwrites a storage value with raw bytes.
    pub fn put_raw(&self, key: Vec<u8>, value: Vec<u8>) {
        self.lock().storage.insert(key, value);
    }

    pub fn remove_raw(&self, key: &[u8]) {
        self.lock().storage.remove(key);
    }

    /// Every extrinsic imported so far, in submission order.
    pub fn submitted(&self) -> Vec<UncheckedExtrinsic> {
        self.lock().submitted.clone()
    }

    pub fn contract(&self, id: ContractId) -> Option<Contract> {
        self.lock().get(&keys::contract_key(id))
    }

    pub fn workload_state(&self, id: ContractId) -> Option<WorkloadState> {
        self.lock().get(&keys::workload_state_key(id))
    }

    pub fn free_balance(&self, who: &AccountId) -> Balance {
        self.lock().account(who).data.free
    }

    pub fn status_log(&self, hash: &TxHash) -> Vec<StatusUpdate> {
        self.lock()
            .txs
            .get(hash)
            .map(|e| e.log.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LedgerTransport for InMemoryLedger {
    async fn schema(&self) -> Result<RemoteSchema, LeaseError> {
        Ok(self.lock().schema.clone())
    }

    async fn storage(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LeaseError> {
        Ok(self.lock().storage.get(key).cloned())
    }

    async fn account_next_index(&self, account: &AccountId) -> Result<u64, LeaseError> {
        // Only the latest block's state: pool extrinsics are not counted.
        Ok(self.lock().account(account).nonce)
    }

    async fn submit_extrinsic(&self, extrinsic: &[u8]) -> Result<TxHash, LeaseError> {
        let mut state = self.lock();
        if state.failing_submits > 0 {
            state.failing_submits -= 1;
            return Err(LeaseError::Submission("connection reset by peer".into()));
        }
        let xt = UncheckedExtrinsic::from_bytes(extrinsic)
            .map_err(|e| LeaseError::Submission(format!("undecodable extrinsic: {}", e)))?;
        verify_extrinsic(&xt).map_err(|e| LeaseError::Submission(e.to_string()))?;
        let hash = xt.hash();
        if state.txs.contains_key(&hash) {
            return Err(LeaseError::Submission("transaction already imported".into()));
        }

        let next = state.pool_next(&xt.signer);
        let on_chain = state.account(&xt.signer).nonce;
        state.submitted.push(xt.clone());
        state.txs.insert(
            hash,
            TxEntry {
                xt: xt.clone(),
                log: Vec::new(),
                announced: false,
            },
        );

        if xt.nonce < on_chain {
            state.push(
                &hash,
                StatusUpdate::bare(TransactionStatus::Invalid(format!(
                    "stale nonce {} (account is at {})",
                    xt.nonce, on_chain
                ))),
            );
            return Ok(hash);
        }
        state.pool.push(hash);
        if xt.nonce == next {
            state.announce(&hash);
        } else {
            state.push(&hash, StatusUpdate::bare(TransactionStatus::Future));
        }
        if state.mode != SealMode::Manual {
            state.produce();
        }
        Ok(hash)
    }

    async fn extrinsic_updates(
        &self,
        hash: &TxHash,
        cursor: usize,
    ) -> Result<Vec<StatusUpdate>, LeaseError> {
        let mut state = self.lock();
        if state.failing_polls > 0 {
            state.failing_polls -= 1;
            return Err(LeaseError::Connection("node unavailable".into()));
        }
        state
            .txs
            .get(hash)
            .map(|e| e.log.iter().skip(cursor).cloned().collect())
            .ok_or_else(|| LeaseError::Connection(format!("unknown extrinsic {}", hash)))
    }
}
