// Path: crates/client/src/lib.rs
//! # Volume Lease Client Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code to promote
//! robust error handling.
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

//! # Volume Lease Client
//!
//! Talks to a ledger node on behalf of contract parties: submits signed contract
//! calls and follows them to finalization, and reads contract records back as one
//! merged view.

pub mod handle;
pub mod orchestrator;
pub mod reader;
pub mod rpc;
pub mod submitter;
pub mod transport;

pub use handle::ChainHandle;
pub use orchestrator::{ContractAction, ContractRequest, CreateRequest, LeaseOrchestrator, PayRequest};
pub use reader::{BalanceView, ContractReader, ContractView};
pub use rpc::JsonRpcTransport;
pub use submitter::{StatusStream, TransactionSubmitter, WatchPolicy};
pub use transport::LedgerTransport;
