// Path: crates/crypto/src/lib.rs
//! # Volume Lease Crypto Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # Volume Lease Cryptography
//!
//! Signing identities for ledger transactions and the resolver that derives them
//! from a credential (a BIP-39 mnemonic, or an explicitly named development account).

pub mod resolver;
pub mod sign;

pub use resolver::{generate_mnemonic, resolve_signer, Credential, DevAccount};
pub use sign::{verify_signature, SigningIdentity};
