// Path: crates/types/src/keys/mod.rs
//! Defines the storage key layout for the records the client reads.
//!
//! These constants provide a single source of truth for the keys the ledger stores
//! contract, volume, workload-state and account records under. Map keys are appended
//! to the prefix in their canonical encoding (little-endian for ids, raw bytes for
//! account ids).

use crate::app::{AccountId, ContractId};

/// The storage key prefix for contract records, keyed by contract id.
pub const CONTRACTS_PREFIX: &[u8] = b"volumeContracts::contracts::";
/// The storage key prefix for volume definitions, keyed by contract id.
pub const VOLUMES_PREFIX: &[u8] = b"volumeContracts::volumes::";
/// The storage key prefix for workload states, keyed by contract id.
pub const WORKLOAD_STATE_PREFIX: &[u8] = b"volumeContracts::state::";
/// The storage key prefix for the list of contract ids created by an account.
pub const CONTRACTS_FOR_ACCOUNT_PREFIX: &[u8] = b"volumeContracts::contractsForAccount::";
/// The storage key for the next contract id the ledger will assign.
pub const NEXT_CONTRACT_ID_KEY: &[u8] = b"volumeContracts::nextContractId";
/// The storage key prefix for account info (nonce and balances).
pub const SYSTEM_ACCOUNT_PREFIX: &[u8] = b"system::account::";

/// Storage key of the contract record for `id`.
pub fn contract_key(id: ContractId) -> Vec<u8> {
    [CONTRACTS_PREFIX, &id.0.to_le_bytes()].concat()
}

/// Storage key of the volume definition for `id`.
pub fn volume_key(id: ContractId) -> Vec<u8> {
    [VOLUMES_PREFIX, &id.0.to_le_bytes()].concat()
}

/// Storage key of the workload state for `id`.
pub fn workload_state_key(id: ContractId) -> Vec<u8> {
    [WORKLOAD_STATE_PREFIX, &id.0.to_le_bytes()].concat()
}

/// Storage key of the contract id list owned by `account`.
pub fn contracts_for_account_key(account: &AccountId) -> Vec<u8> {
    [CONTRACTS_FOR_ACCOUNT_PREFIX, account.as_ref()].concat()
}

/// Storage key of the account info for `account`.
pub fn account_key(account: &AccountId) -> Vec<u8> {
    [SYSTEM_ACCOUNT_PREFIX, account.as_ref()].concat()
}
