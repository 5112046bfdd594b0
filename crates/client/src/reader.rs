// Path: crates/client/src/reader.rs

//! Reconstructs a contract view from the separately stored ledger records.

use crate::handle::ChainHandle;
use lease_types::app::{
    format_amount, AccountId, AccountInfo, Balance, Contract, ContractId, LifecycleStage, NodeId,
    Pricing, VolumeType, WorkloadState,
};
use lease_types::error::LeaseError;
use lease_types::keys;
use lease_types::schema::type_names;
use serde::Serialize;

/// A contract merged from its record, volume, workload state and the requester's
/// balance.
///
/// The four reads are not atomic: under concurrent activity the balance may be from
/// a later block than the record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContractView {
    pub id: ContractId,
    pub node_id: NodeId,
    pub requester: AccountId,
    pub escrow_account: AccountId,
    pub provider: Option<AccountId>,
    pub accepted: bool,
    pub state: WorkloadState,
    pub stage: LifecycleStage,
    pub pricing: Pricing,
    pub volume: VolumeType,
    pub expires_at: u64,
    pub last_claimed: u64,
    pub requester_balance: BalanceView,
}

/// A free balance in base units and in tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BalanceView {
    pub free: Balance,
    pub display: String,
}

impl From<Balance> for BalanceView {
    fn from(free: Balance) -> Self {
        Self {
            free,
            display: format_amount(free),
        }
    }
}

/// Read-side queries over contract storage.
#[derive(Clone, Debug)]
pub struct ContractReader {
    handle: ChainHandle,
}

impl ContractReader {
    pub fn new(handle: ChainHandle) -> Self {
        Self { handle }
    }

    /// Reads and merges contract `id`. Fails with [`LeaseError::NotFound`] if no
    /// record exists.
    pub async fn get_contract(&self, id: ContractId) -> Result<ContractView, LeaseError> {
        let registry = self.handle.registry();
        registry.ensure(type_names::RESOURCE_PRICE)?;
        let contract: Contract = self
            .handle
            .fetch(type_names::CONTRACT, &keys::contract_key(id))
            .await?
            .ok_or_else(|| LeaseError::NotFound(format!("contract {}", id)))?;
        contract.check_acceptance()?;

        let volume_key = keys::volume_key(id);
        let state_key = keys::workload_state_key(id);
        let account_key = keys::account_key(&contract.user_account);
        let (volume, state, account) = tokio::try_join!(
            self.handle
                .fetch::<VolumeType>(type_names::VOLUME_TYPE, &volume_key),
            self.handle
                .fetch::<WorkloadState>(type_names::WORKLOAD_STATE, &state_key),
            self.handle
                .fetch::<AccountInfo>(type_names::ACCOUNT_INFO, &account_key),
        )?;
        let volume = volume.ok_or_else(|| {
            LeaseError::Decode(format!("contract {} has no volume record", id))
        })?;
        let state = state.unwrap_or_default();
        let free = account.map(|a| a.data.free).unwrap_or_default();
        let node_id = NodeId::decode(&contract.node_id)?;

        log::debug!("read contract {} (state {:?}, accepted {})", id, state, contract.accepted);
        Ok(ContractView {
            id,
            node_id,
            requester: contract.user_account,
            escrow_account: contract.account_id,
            provider: contract.farmer_account,
            accepted: contract.accepted,
            state,
            stage: LifecycleStage::derive(contract.accepted, state),
            pricing: contract.pricing,
            volume,
            expires_at: contract.expires_at,
            last_claimed: contract.last_claimed,
            requester_balance: free.into(),
        })
    }

    /// The ids of the contracts `account` created, oldest first.
    pub async fn contracts_for_account(
        &self,
        account: &AccountId,
    ) -> Result<Vec<ContractId>, LeaseError> {
        Ok(self
            .handle
            .fetch::<Vec<ContractId>>(
                type_names::CONTRACT_IDS,
                &keys::contracts_for_account_key(account),
            )
            .await?
            .unwrap_or_default())
    }

    /// The balances held by `account`. An account the ledger has never seen holds
    /// nothing.
    pub async fn account(&self, account: &AccountId) -> Result<AccountInfo, LeaseError> {
        Ok(self
            .handle
            .fetch::<AccountInfo>(type_names::ACCOUNT_INFO, &keys::account_key(account))
            .await?
            .unwrap_or_default())
    }
}
