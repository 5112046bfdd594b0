// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Volume Lease Test Utilities
//!
//! An in-memory ledger running the contract module, a JSON-RPC node serving it, and
//! fixtures for driving the client against both.

pub mod assertions;
pub mod fixtures;
pub mod ledger;
pub mod server;

pub use ledger::{InMemoryLedger, SealMode};
pub use server::MockNode;
