// Path: crates/tx/src/system/mod.rs

//! Signer-side bookkeeping shared by every contract call: nonce allocation and
//! extrinsic validation.

pub mod nonce;
pub mod validation;
