// Path: crates/test_utils/src/ledger/dispatch.rs

//! Execution of contract calls against ledger state.

use super::{LedgerState, CONTRACT_DURATION};
use lease_tx::events;
use lease_tx::{ContractCall, UncheckedExtrinsic};
use lease_types::app::{
    AccountId, Balance, ChainEvent, Contract, ContractId, NodeId, VolumeType, WorkloadState,
};
use lease_types::keys;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

type DispatchResult = Result<Vec<ChainEvent>, &'static str>;

/// Index of the extrinsic within its block. Index 0 holds the timestamp inherent.
const EXTRINSIC_INDEX: u32 = 1;

/// Applies `xt` and returns the events it emitted. A failed dispatch leaves state
/// untouched apart from the already bumped nonce.
pub(super) fn apply(state: &mut LedgerState, xt: &UncheckedExtrinsic) -> Vec<ChainEvent> {
    let result = match &xt.call {
        ContractCall::CreateContract { node_id, volume } => {
            create_contract(state, &xt.signer, node_id, volume)
        }
        ContractCall::AcceptContract { contract_id } => accept(state, &xt.signer, *contract_id),
        ContractCall::Pay {
            contract_id,
            amount,
        } => pay(state, &xt.signer, *contract_id, *amount),
        ContractCall::ClaimFunds { contract_id } => claim(state, &xt.signer, *contract_id),
        ContractCall::CancelContract { contract_id } => cancel(state, &xt.signer, *contract_id),
    };
    match result {
        Ok(mut emitted) => {
            emitted.push(events::system_event(
                EXTRINSIC_INDEX,
                events::EXTRINSIC_SUCCESS,
                vec![],
            ));
            emitted
        }
        Err(reason) => {
            log::debug!("{} failed: {}", xt.call, reason);
            vec![events::system_event(
                EXTRINSIC_INDEX,
                events::EXTRINSIC_FAILED,
                vec![json!(reason)],
            )]
        }
    }
}

fn event(method: &str, data: Vec<Value>) -> ChainEvent {
    events::contract_event(EXTRINSIC_INDEX, method, data)
}

/// The escrow account of contract `id`.
pub fn escrow_account(id: ContractId) -> AccountId {
    let mut hasher = Sha256::new();
    hasher.update(b"modl/vlease");
    hasher.update(id.0.to_le_bytes());
    AccountId(hasher.finalize().into())
}

fn load(state: &LedgerState, id: ContractId) -> Result<(Contract, WorkloadState), &'static str> {
    let contract: Contract = state
        .get(&keys::contract_key(id))
        .ok_or("ContractNotExists")?;
    let workload: WorkloadState = state
        .get(&keys::workload_state_key(id))
        .unwrap_or_default();
    Ok((contract, workload))
}

fn set_state(
    state: &mut LedgerState,
    id: ContractId,
    from: WorkloadState,
    to: WorkloadState,
) -> Result<(), &'static str> {
    if !from.can_transition_to(to) {
        return Err("InvalidStateTransition");
    }
    state.put(keys::workload_state_key(id), &to);
    Ok(())
}

fn transfer(
    state: &mut LedgerState,
    from: &AccountId,
    to: &AccountId,
    amount: Balance,
) -> Result<(), &'static str> {
    let mut source = state.account(from);
    source.data.free = source
        .data
        .free
        .checked_sub(amount)
        .ok_or("InsufficientBalance")?;
    state.put(keys::account_key(from), &source);
    let mut dest = state.account(to);
    dest.data.free = dest.data.free.saturating_add(amount);
    state.put(keys::account_key(to), &dest);
    Ok(())
}

fn create_contract(
    state: &mut LedgerState,
    who: &AccountId,
    raw_node_id: &[u8],
    volume: &VolumeType,
) -> DispatchResult {
    let node_id = NodeId::decode(raw_node_id).map_err(|_| "InvalidNodeId")?;
    let id = ContractId(state.get(keys::NEXT_CONTRACT_ID_KEY).unwrap_or(0u64));
    if state.storage.contains_key(&keys::contract_key(id)) {
        return Err("ContractExists");
    }

    let contract = Contract {
        pricing: state.pricing.clone(),
        account_id: escrow_account(id),
        user_account: *who,
        node_id: node_id.to_padded_bytes(),
        farmer_account: None,
        accepted: false,
        expires_at: state.block_number + CONTRACT_DURATION,
        last_claimed: state.block_number,
    };
    state.put(keys::contract_key(id), &contract);
    state.put(keys::volume_key(id), volume);
    state.put(keys::workload_state_key(id), &WorkloadState::Created);
    state.put(keys::NEXT_CONTRACT_ID_KEY.to_vec(), &(id.0 + 1));
    let list_key = keys::contracts_for_account_key(who);
    let mut ids: Vec<ContractId> = state.get(&list_key).unwrap_or_default();
    ids.push(id);
    state.put(list_key, &ids);

    Ok(vec![event(
        events::CONTRACT_ADDED,
        vec![
            json!(who.to_string()),
            json!(format!("0x{}", hex::encode(raw_node_id))),
            json!(id.0),
        ],
    )])
}

fn accept(state: &mut LedgerState, who: &AccountId, id: ContractId) -> DispatchResult {
    let (mut contract, workload) = load(state, id)?;
    if workload == WorkloadState::Cancelled {
        return Err("ContractCancelled");
    }
    if contract.accepted {
        return Err("ContractAlreadyAccepted");
    }
    contract.accepted = true;
    contract.farmer_account = Some(*who);
    state.put(keys::contract_key(id), &contract);
    Ok(vec![event(
        events::CONTRACT_ACCEPTED,
        vec![json!(who.to_string()), json!(id.0)],
    )])
}

fn pay(state: &mut LedgerState, who: &AccountId, id: ContractId, amount: Balance) -> DispatchResult {
    let (contract, workload) = load(state, id)?;
    if workload == WorkloadState::Cancelled {
        return Err("ContractCancelled");
    }
    if amount == 0 {
        return Err("ZeroAmount");
    }
    transfer(state, who, &contract.account_id, amount)?;

    let mut emitted = vec![event(
        events::CONTRACT_PAID,
        vec![
            json!(contract.account_id.to_string()),
            json!(id.0),
            json!(amount.to_string()),
        ],
    )];
    if contract.accepted && workload == WorkloadState::Created {
        set_state(state, id, workload, WorkloadState::Deployed)?;
        emitted.push(event(events::CONTRACT_DEPLOYED, vec![json!(id.0)]));
    }
    Ok(emitted)
}

fn claim(state: &mut LedgerState, who: &AccountId, id: ContractId) -> DispatchResult {
    let (mut contract, workload) = load(state, id)?;
    if !contract.accepted {
        return Err("ContractNotAccepted");
    }
    if contract.farmer_account != Some(*who) {
        return Err("NotContractProvider");
    }
    if workload == WorkloadState::Cancelled {
        return Err("ContractCancelled");
    }
    let volume: VolumeType = state.get(&keys::volume_key(id)).ok_or("VolumeNotExists")?;

    let now = state.block_number.min(contract.expires_at);
    let elapsed = now.saturating_sub(contract.last_claimed);
    let rate = Balance::from(contract.pricing.volume_rate(volume.disk_type));
    let due = rate
        .saturating_mul(Balance::from(volume.size))
        .saturating_mul(Balance::from(elapsed));
    let amount = due.min(state.account(&contract.account_id).data.free);
    if amount > 0 {
        transfer(state, &contract.account_id, who, amount)?;
    }
    contract.last_claimed = now;
    state.put(keys::contract_key(id), &contract);
    Ok(vec![event(
        events::FUNDS_CLAIMED,
        vec![json!(who.to_string()), json!(id.0), json!(amount.to_string())],
    )])
}

fn cancel(state: &mut LedgerState, who: &AccountId, id: ContractId) -> DispatchResult {
    let (contract, workload) = load(state, id)?;
    if contract.user_account != *who && contract.farmer_account != Some(*who) {
        return Err("NotContractParty");
    }
    if workload == WorkloadState::Cancelled {
        return Err("ContractCancelled");
    }
    set_state(state, id, workload, WorkloadState::Cancelled)?;
    let remainder = state.account(&contract.account_id).data.free;
    if remainder > 0 {
        transfer(state, &contract.account_id, &contract.user_account, remainder)?;
    }
    Ok(vec![event(
        events::CONTRACT_CANCELLED,
        vec![json!(who.to_string()), json!(id.0)],
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escrow_accounts_are_distinct() {
        assert_ne!(escrow_account(ContractId(0)), escrow_account(ContractId(1)));
        assert_ne!(escrow_account(ContractId(0)), AccountId::default());
    }
}
