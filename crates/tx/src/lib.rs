// Path: crates/tx/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Volume Lease Transactions
//!
//! The network-free half of transaction handling: the contract call model, signed
//! extrinsic construction, per-signer nonce allocation, and the rules that order and
//! classify the status updates the ledger reports.

pub mod call;
pub mod events;
pub mod extrinsic;
pub mod status;
pub mod system;

pub use call::ContractCall;
pub use extrinsic::UncheckedExtrinsic;
pub use status::{terminal_outcome, FinalizedTx, Observation, StatusTracker};
pub use system::nonce::{NonceLedger, NonceReservation};
