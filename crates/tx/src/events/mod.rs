// Path: crates/tx/src/events/mod.rs

//! Names and argument layouts of the events the ledger emits for contract calls.

use crate::call::CONTRACT_MODULE;
use lease_types::app::{ChainEvent, ContractId, EventPhase, NodeId};
use serde_json::Value;

/// The system module section.
pub const SYSTEM_MODULE: &str = "system";
/// Emitted by the system module when an extrinsic's dispatch succeeded.
pub const EXTRINSIC_SUCCESS: &str = "ExtrinsicSuccess";
/// Emitted by the system module when an extrinsic's dispatch failed. The first
/// argument is the dispatch error name.
pub const EXTRINSIC_FAILED: &str = "ExtrinsicFailed";

/// `ContractAdded(requester, node_id, contract_id)`
pub const CONTRACT_ADDED: &str = "ContractAdded";
/// `ContractAccepted(provider, contract_id)`
pub const CONTRACT_ACCEPTED: &str = "ContractAccepted";
/// `ContractPaid(escrow_account, contract_id, amount)`
pub const CONTRACT_PAID: &str = "ContractPaid";
/// `ContractDeployed(contract_id)`
pub const CONTRACT_DEPLOYED: &str = "ContractDeployed";
/// `FundsClaimed(provider, contract_id, amount)`
pub const FUNDS_CLAIMED: &str = "FundsClaimed";
/// `ContractCancelled(who, contract_id)`
pub const CONTRACT_CANCELLED: &str = "ContractCancelled";

/// Builds a contract-module event emitted while applying extrinsic `index`.
pub fn contract_event(index: u32, method: &str, data: Vec<Value>) -> ChainEvent {
    ChainEvent {
        phase: EventPhase::ApplyExtrinsic(index),
        section: CONTRACT_MODULE.to_string(),
        method: method.to_string(),
        data,
    }
}

/// Builds a system-module event emitted while applying extrinsic `index`.
pub fn system_event(index: u32, method: &str, data: Vec<Value>) -> ChainEvent {
    ChainEvent {
        phase: EventPhase::ApplyExtrinsic(index),
        section: SYSTEM_MODULE.to_string(),
        method: method.to_string(),
        data,
    }
}

/// The dispatch error carried by an `ExtrinsicFailed` event among `events`.
pub fn dispatch_failure(events: &[ChainEvent]) -> Option<String> {
    events
        .iter()
        .find(|e| e.is(SYSTEM_MODULE, EXTRINSIC_FAILED))
        .map(|e| match e.data.first() {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "dispatch failed".to_string(),
        })
}

/// The contract created, read from a `ContractAdded` event among `events`.
pub fn contract_added(events: &[ChainEvent]) -> Option<(ContractId, Option<NodeId>)> {
    let event = events
        .iter()
        .find(|e| e.is(CONTRACT_MODULE, CONTRACT_ADDED))?;
    let id = event.data.get(2).and_then(Value::as_u64).map(ContractId)?;
    let node = event
        .data
        .get(1)
        .and_then(Value::as_str)
        .and_then(|raw| NodeId::from_hex(raw).ok());
    Some((id, node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contract_added_extraction() {
        let events = vec![
            contract_event(
                0,
                CONTRACT_ADDED,
                vec![json!("0x01"), json!("0x6e6f64652d31"), json!(7)],
            ),
            system_event(0, EXTRINSIC_SUCCESS, vec![]),
        ];
        let (id, node) = contract_added(&events).unwrap();
        assert_eq!(id, ContractId(7));
        assert_eq!(node.unwrap().as_str(), "node-1");
        assert_eq!(dispatch_failure(&events), None);
    }

    #[test]
    fn test_dispatch_failure_extraction() {
        let events = vec![system_event(1, EXTRINSIC_FAILED, vec![json!("ContractCancelled")])];
        assert_eq!(dispatch_failure(&events).as_deref(), Some("ContractCancelled"));
        assert!(contract_added(&events).is_none());
    }
}
