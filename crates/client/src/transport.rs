// Path: crates/client/src/transport.rs

//! The seam between the client and a ledger node.

use async_trait::async_trait;
use lease_types::app::{AccountId, StatusUpdate, TxHash};
use lease_types::error::LeaseError;
use lease_types::schema::RemoteSchema;

/// The remote procedures the client needs from a ledger node.
///
/// Implementations classify their own failures: an unreachable node is a
/// [`LeaseError::Connection`], a node refusing to import an extrinsic is a
/// [`LeaseError::Submission`].
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    /// The schema variant and custom type names the node defines.
    async fn schema(&self) -> Result<RemoteSchema, LeaseError>;

    /// The raw value stored under `key`, or `None` if the key is empty.
    async fn storage(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LeaseError>;

    /// The next nonce the node expects from `account`.
    async fn account_next_index(&self, account: &AccountId) -> Result<u64, LeaseError>;

    /// Imports a SCALE-encoded signed extrinsic into the node's pool.
    async fn submit_extrinsic(&self, extrinsic: &[u8]) -> Result<TxHash, LeaseError>;

    /// The status log of an extrinsic from position `cursor` on. The log is
    /// append-only, so a caller that advances `cursor` by the number of entries
    /// returned never misses or repeats an entry.
    async fn extrinsic_updates(
        &self,
        hash: &TxHash,
        cursor: usize,
    ) -> Result<Vec<StatusUpdate>, LeaseError>;
}
