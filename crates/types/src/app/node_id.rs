// Path: crates/types/src/app/node_id.rs

use crate::error::LeaseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width in bytes of the ledger's node id field.
pub const NODE_ID_WIDTH: usize = 64;

/// A node identifier: ASCII without NULs, at most [`NODE_ID_WIDTH`] bytes.
///
/// The ledger keeps node ids as raw bytes padded with NULs to the field width. The
/// client sends the unpadded bytes and strips the padding on read.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    /// Validates and wraps a node id.
    pub fn new(id: impl Into<String>) -> Result<Self, LeaseError> {
        let id = id.into();
        if id.is_empty() {
            return Err(LeaseError::Validation("node id must not be empty".into()));
        }
        if id.len() > NODE_ID_WIDTH {
            return Err(LeaseError::Validation(format!(
                "node id is {} bytes, the ledger field holds {}",
                id.len(),
                NODE_ID_WIDTH
            )));
        }
        if !id.is_ascii() {
            return Err(LeaseError::Validation("node id must be ASCII".into()));
        }
        if id.contains('\0') {
            return Err(LeaseError::Validation("node id must not contain NUL".into()));
        }
        Ok(Self(id))
    }

    /// The node id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The unpadded bytes sent in a `createContract` call.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }

    /// The bytes as the ledger stores them, NUL-padded to [`NODE_ID_WIDTH`].
    pub fn to_padded_bytes(&self) -> Vec<u8> {
        let mut out = self.to_bytes();
        out.resize(NODE_ID_WIDTH, 0);
        out
    }

    /// Decodes a stored node id. Only the trailing NUL padding is removed.
    pub fn decode(raw: &[u8]) -> Result<Self, LeaseError> {
        let end = raw.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        let unpadded = raw.get(..end).unwrap_or_default();
        let text = std::str::from_utf8(unpadded).map_err(|_| {
            LeaseError::Decode(format!("node id is not ASCII: 0x{}", hex::encode(raw)))
        })?;
        Self::new(text).map_err(|e| LeaseError::Decode(e.to_string()))
    }

    /// Decodes a node id from its hex rendering (with or without `0x`).
    pub fn from_hex(s: &str) -> Result<Self, LeaseError> {
        let raw = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
        Self::decode(&raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeId {
    type Err = LeaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NodeId {
    type Error = LeaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeId> for String {
    fn from(value: NodeId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_strips_padding() {
        let mut raw = b"node-1".to_vec();
        raw.extend_from_slice(&[0u8; 10]);
        assert_eq!(NodeId::decode(&raw).unwrap().as_str(), "node-1");
    }

    #[test]
    fn test_from_hex() {
        let id = NodeId::from_hex("0x6e6f64652d310000").unwrap();
        assert_eq!(id.as_str(), "node-1");
    }

    #[test]
    fn test_rejects_oversized_and_non_ascii() {
        assert!(NodeId::new("x".repeat(NODE_ID_WIDTH + 1)).is_err());
        assert!(NodeId::new("").is_err());
        assert!(NodeId::new("nöde").is_err());
        assert!(matches!(
            NodeId::decode(&[0xff, 0x00]),
            Err(LeaseError::Decode(_))
        ));
        assert!(matches!(NodeId::decode(&[0u8; 4]), Err(LeaseError::Decode(_))));
        assert!(NodeId::new("node\01").is_err());
    }

    #[test]
    fn test_spaces_and_controls_survive_storage() {
        let id = NodeId::new("node 1").unwrap();
        assert_eq!(NodeId::decode(&id.to_padded_bytes()).unwrap(), id);

        let mut raw = b" rack\t7 ".to_vec();
        raw.resize(NODE_ID_WIDTH, 0);
        assert_eq!(NodeId::decode(&raw).unwrap().as_str(), " rack\t7 ");
    }

    proptest! {
        #[test]
        fn prop_padded_roundtrip(s in "[ -~]{1,64}") {
            let id = NodeId::new(s.clone()).unwrap();
            let padded = id.to_padded_bytes();
            prop_assert_eq!(padded.len(), NODE_ID_WIDTH);
            let back = NodeId::decode(&padded).unwrap();
            prop_assert_eq!(back.as_str(), s.as_str());
        }
    }
}
