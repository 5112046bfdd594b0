// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for ledger records and extrinsics.
//!
//! This module provides simple wrappers around `parity-scale-codec` (SCALE), the format
//! the ledger node stores its records in. Centralizing the codec here ensures every
//! component decodes storage values and encodes extrinsics identically.

use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into its canonical SCALE byte representation.
///
/// This is used for extrinsic payloads (which are signed) and for any value the
/// client writes into a storage key.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Result<Vec<u8>, String> {
    Ok(v.encode())
}

/// Decodes a value from its canonical SCALE byte representation.
///
/// Fails fast if the input is malformed or has trailing bytes. A trailing-bytes
/// failure almost always means the client and ledger disagree on a record's shape.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}
