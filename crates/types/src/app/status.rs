// Path: crates/types/src/app/status.rs

use super::H256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle of a submitted extrinsic as reported by the ledger.
///
/// Non-terminal updates arrive in the order `Future -> Ready -> Broadcast -> InBlock`.
/// `InBlock` is not success: the block can still be retracted. Only `Finalized` is a
/// terminal success; `Invalid`, `Dropped` and `Usurped` are terminal failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum TransactionStatus {
    /// In the pool, waiting for an earlier nonce of the same signer.
    Future,
    /// In the pool and ready for inclusion.
    Ready,
    /// Gossiped to the listed peers.
    Broadcast(Vec<String>),
    /// Included in the given block, not yet final.
    InBlock(H256),
    /// Included in the given finalized block.
    Finalized(H256),
    /// Rejected by the ledger with a reason.
    Invalid(String),
    /// Evicted from the pool.
    Dropped,
    /// Replaced by another extrinsic with the same nonce (the given hash).
    Usurped(H256),
}

impl TransactionStatus {
    /// The status name as printed to users.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Future => "Future",
            Self::Ready => "Ready",
            Self::Broadcast(_) => "Broadcast",
            Self::InBlock(_) => "InBlock",
            Self::Finalized(_) => "Finalized",
            Self::Invalid(_) => "Invalid",
            Self::Dropped => "Dropped",
            Self::Usurped(_) => "Usurped",
        }
    }

    /// Position in the progression. All terminal states share the highest rank.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Future => 0,
            Self::Ready => 1,
            Self::Broadcast(_) => 2,
            Self::InBlock(_) => 3,
            Self::Finalized(_) | Self::Invalid(_) | Self::Dropped | Self::Usurped(_) => 4,
        }
    }

    /// Returns true if no further updates follow this one.
    pub fn is_terminal(&self) -> bool {
        self.rank() == 4
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The point of block execution an event was emitted at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventPhase {
    /// While applying the extrinsic at the given index.
    ApplyExtrinsic(u32),
    /// During block finalization.
    Finalization,
    /// During block initialization.
    Initialization,
}

impl fmt::Display for EventPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplyExtrinsic(i) => write!(f, "ApplyExtrinsic({})", i),
            Self::Finalization => f.write_str("Finalization"),
            Self::Initialization => f.write_str("Initialization"),
        }
    }
}

/// An event emitted by the ledger while executing a block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainEvent {
    /// When in the block the event was emitted.
    pub phase: EventPhase,
    /// The emitting module, e.g. `volumeContracts`.
    pub section: String,
    /// The event name, e.g. `ContractAdded`.
    pub method: String,
    /// Decoded event arguments.
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

impl ChainEvent {
    /// Returns true if this event is `section.method`.
    pub fn is(&self, section: &str, method: &str) -> bool {
        self.section == section && self.method == method
    }
}

impl fmt::Display for ChainEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.data.iter().map(|v| v.to_string()).collect();
        write!(
            f,
            "{}: {}.{}:: [{}]",
            self.phase,
            self.section,
            self.method,
            args.join(",")
        )
    }
}

/// One status update of a watched extrinsic, with the events the ledger attached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// The new status.
    pub status: TransactionStatus,
    /// Events emitted by the extrinsic, present once it is in a block.
    #[serde(default)]
    pub events: Vec<ChainEvent>,
}

impl StatusUpdate {
    /// An update without events.
    pub fn bare(status: TransactionStatus) -> Self {
        Self {
            status,
            events: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_json_shape() {
        let json = serde_json::to_value(TransactionStatus::InBlock(H256([1u8; 32]))).unwrap();
        assert_eq!(json["type"], "inBlock");
        assert!(json["value"].as_str().unwrap().starts_with("0x0101"));

        let back: TransactionStatus =
            serde_json::from_value(serde_json::json!({"type": "ready"})).unwrap();
        assert_eq!(back, TransactionStatus::Ready);
    }

    #[test]
    fn test_only_failures_and_finalized_are_terminal() {
        assert!(!TransactionStatus::InBlock(H256::default()).is_terminal());
        assert!(TransactionStatus::Finalized(H256::default()).is_terminal());
        assert!(TransactionStatus::Invalid("bad".into()).is_terminal());
        assert!(TransactionStatus::Dropped.is_terminal());
    }

    #[test]
    fn test_event_display() {
        let ev = ChainEvent {
            phase: EventPhase::ApplyExtrinsic(1),
            section: "volumeContracts".into(),
            method: "ContractAdded".into(),
            data: vec![serde_json::json!(3)],
        };
        assert_eq!(
            ev.to_string(),
            "ApplyExtrinsic(1): volumeContracts.ContractAdded:: [3]"
        );
    }
}
