// Path: crates/tx/src/extrinsic/mod.rs

//! Signed extrinsics: the envelope a contract call travels to the ledger in.

use crate::call::ContractCall;
use lease_crypto::SigningIdentity;
use lease_types::app::{AccountId, TxHash, H256};
use lease_types::codec;
use lease_types::error::LeaseError;
use parity_scale_codec::{Decode, Encode};
use sha2::{Digest, Sha256};

/// Domain separator mixed into every signing payload.
const SIGNING_DOMAIN: &[u8] = b"volume-lease/extrinsic/v1";

/// A signed call as submitted to the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct UncheckedExtrinsic {
    pub signer: AccountId,
    pub nonce: u64,
    pub call: ContractCall,
    pub signature: [u8; 64],
}

/// The bytes a signer commits to: domain, signer, nonce and call.
pub fn signing_payload(signer: &AccountId, nonce: u64, call: &ContractCall) -> Vec<u8> {
    (SIGNING_DOMAIN, signer, nonce, call).encode()
}

impl UncheckedExtrinsic {
    /// Signs `call` at `nonce` with `identity`.
    pub fn signed(call: ContractCall, nonce: u64, identity: &SigningIdentity) -> Self {
        let signer = identity.account_id();
        let signature = identity.sign(&signing_payload(&signer, nonce, &call));
        Self {
            signer,
            nonce,
            call,
            signature,
        }
    }

    /// The SCALE bytes submitted over the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LeaseError> {
        codec::to_bytes_canonical(self).map_err(LeaseError::Submission)
    }

    /// Decodes submitted bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LeaseError> {
        codec::from_bytes_canonical(bytes).map_err(LeaseError::Decode)
    }

    /// The hash the ledger tracks this extrinsic under.
    pub fn hash(&self) -> TxHash {
        H256(Sha256::digest(self.encode()).into())
    }
}
