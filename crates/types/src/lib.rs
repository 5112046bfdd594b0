// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
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

//! # Volume Lease Types
//!
//! This crate is the foundational library for the volume lease client, containing the
//! on-ledger data model, the canonical binary codec, the error taxonomy and the
//! client configuration.
//!
//! ## Architectural Role
//!
//! As the base crate, `lease-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. It never talks to the network;
//! it only describes what the ledger stores and how the client names things.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::LeaseError> = std::result::Result<T, E>;

/// Ledger records (`Contract`, `VolumeType`, `WorkloadState`, ...), amounts and node ids.
pub mod app;
/// The canonical, deterministic binary codec for ledger records and extrinsics.
pub mod codec;
/// Client configuration (`ClientConfig`) and its TOML loader.
pub mod config;
/// The unified error taxonomy used across the workspace.
pub mod error;
/// Storage key layout for the records the client reads.
pub mod keys;
/// The versioned type registry shared with the ledger node.
pub mod schema;
