// Path: crates/tx/src/system/validation.rs

//! Stateless checks a ledger applies to an incoming extrinsic before looking at state.

use crate::call::ContractCall;
use crate::extrinsic::{signing_payload, UncheckedExtrinsic};
use lease_crypto::verify_signature;
use lease_types::app::{DiskType, NodeId, NODE_ID_WIDTH};
use lease_types::error::LeaseError;

/// Verifies the signature and the shape of the call's arguments.
pub fn verify_extrinsic(xt: &UncheckedExtrinsic) -> Result<(), LeaseError> {
    let payload = signing_payload(&xt.signer, xt.nonce, &xt.call);
    verify_signature(&xt.signer, &payload, &xt.signature)?;
    verify_call(&xt.call)
}

/// Argument checks that need no state.
pub fn verify_call(call: &ContractCall) -> Result<(), LeaseError> {
    match call {
        ContractCall::CreateContract { node_id, volume } => {
            if node_id.len() > NODE_ID_WIDTH {
                return Err(LeaseError::Validation(format!(
                    "node id is {} bytes, at most {} allowed",
                    node_id.len(),
                    NODE_ID_WIDTH
                )));
            }
            NodeId::decode(node_id)?;
            DiskType::try_from(volume.disk_type)?;
            Ok(())
        }
        ContractCall::Pay { amount, .. } if *amount == 0 => Err(LeaseError::Validation(
            "payment amount must be greater than zero".into(),
        )),
        ContractCall::Pay { .. }
        | ContractCall::AcceptContract { .. }
        | ContractCall::ClaimFunds { .. }
        | ContractCall::CancelContract { .. } => Ok(()),
    }
}
