// Path: crates/tx/src/call/mod.rs

//! The calls exposed by the ledger's contract module.

use lease_types::app::{Balance, ContractId, VolumeType};
use parity_scale_codec::{Decode, Encode};
use serde_json::{json, Value};

/// The module (section) name the contract calls and events live under.
pub const CONTRACT_MODULE: &str = "volumeContracts";

/// A call into the contract module, with its positional arguments.
///
/// The codec indices are the ledger's call indices and must not be reordered.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum ContractCall {
    /// `createContract(nodeId, volume)`
    #[codec(index = 0)]
    CreateContract { node_id: Vec<u8>, volume: VolumeType },
    /// `pay(id, amount)`, amount in base units.
    #[codec(index = 1)]
    Pay {
        contract_id: ContractId,
        #[codec(compact)]
        amount: Balance,
    },
    /// `acceptContract(id)`
    #[codec(index = 2)]
    AcceptContract { contract_id: ContractId },
    /// `claimFunds(id)`
    #[codec(index = 3)]
    ClaimFunds { contract_id: ContractId },
    /// `cancelContract(id)`
    #[codec(index = 4)]
    CancelContract { contract_id: ContractId },
}

impl ContractCall {
    /// The ledger's name for this call.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateContract { .. } => "createContract",
            Self::Pay { .. } => "pay",
            Self::AcceptContract { .. } => "acceptContract",
            Self::ClaimFunds { .. } => "claimFunds",
            Self::CancelContract { .. } => "cancelContract",
        }
    }

    /// The contract this call targets, if it targets an existing one.
    pub fn contract_id(&self) -> Option<ContractId> {
        match self {
            Self::CreateContract { .. } => None,
            Self::Pay { contract_id, .. }
            | Self::AcceptContract { contract_id }
            | Self::ClaimFunds { contract_id }
            | Self::CancelContract { contract_id } => Some(*contract_id),
        }
    }

    /// Positional arguments rendered as JSON, for logs.
    pub fn args(&self) -> Vec<Value> {
        match self {
            Self::CreateContract { node_id, volume } => vec![
                json!(String::from_utf8_lossy(node_id)),
                json!({ "disk_type": volume.disk_type, "size": volume.size }),
            ],
            Self::Pay {
                contract_id,
                amount,
            } => vec![json!(contract_id.0), json!(amount.to_string())],
            Self::AcceptContract { contract_id }
            | Self::ClaimFunds { contract_id }
            | Self::CancelContract { contract_id } => vec![json!(contract_id.0)],
        }
    }
}

impl std::fmt::Display for ContractCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let args: Vec<String> = self.args().iter().map(Value::to_string).collect();
        write!(f, "{}.{}({})", CONTRACT_MODULE, self.name(), args.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lease_types::codec;

    #[test]
    fn test_call_names_match_ledger() {
        let id = ContractId(3);
        assert_eq!(ContractCall::AcceptContract { contract_id: id }.name(), "acceptContract");
        assert_eq!(ContractCall::ClaimFunds { contract_id: id }.name(), "claimFunds");
        assert_eq!(ContractCall::CancelContract { contract_id: id }.name(), "cancelContract");
    }

    #[test]
    fn test_call_index_is_first_byte() {
        let call = ContractCall::Pay {
            contract_id: ContractId(1),
            amount: 5,
        };
        let bytes = codec::to_bytes_canonical(&call).unwrap();
        assert_eq!(bytes.first(), Some(&1u8));
        // index + u64 id + compact(5) in one byte
        assert_eq!(bytes.len(), 1 + 8 + 1);
        let back: ContractCall = codec::from_bytes_canonical(&bytes).unwrap();
        assert_eq!(back, call);
    }

    #[test]
    fn test_display() {
        let call = ContractCall::CreateContract {
            node_id: b"node-1".to_vec(),
            volume: VolumeType {
                disk_type: 2,
                size: 100,
            },
        };
        assert_eq!(
            call.to_string(),
            r#"volumeContracts.createContract("node-1", {"disk_type":2,"size":100})"#
        );
    }
}
