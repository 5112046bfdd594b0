// Path: crates/types/src/error/mod.rs
//! Error taxonomy for the volume lease client.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Every failure the client can surface to a caller.
///
/// Transaction failures decided by the ledger (`LedgerRejection`, `Dropped`) are
/// distinct from failures where the outcome is unknown (`Connection`, `Timeout`):
/// a caller must not resubmit blindly after the latter, the transaction may still
/// finalize.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaseError {
    /// The ledger node could not be reached, the handshake failed, or a status
    /// subscription was interrupted before a terminal state.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The supplied mnemonic phrase is malformed.
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    /// Missing or malformed input, reported before any network call.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The transaction could not be built, signed or broadcast.
    #[error("Submission failed: {0}")]
    Submission(String),
    /// The ledger refused the transaction on a business rule.
    #[error("Rejected by ledger: {0}")]
    LedgerRejection(String),
    /// The queried record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// A response could not be decoded with the registered schema.
    #[error("Decode error: {0}")]
    Decode(String),
    /// No terminal status arrived within the configured window. The transaction
    /// may still finalize later.
    #[error("Timed out after {waited_secs}s waiting for transaction {tx_hash}")]
    Timeout {
        /// Hash of the transaction being watched.
        tx_hash: String,
        /// How long the watcher waited before giving up.
        waited_secs: u64,
    },
    /// The transaction left the pool without being finalized (dropped or usurped).
    #[error("Transaction dropped: {0}")]
    Dropped(String),
}

impl ErrorCode for LeaseError {
    fn code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "LEASE_CONNECTION_ERROR",
            Self::InvalidMnemonic(_) => "LEASE_INVALID_MNEMONIC",
            Self::Validation(_) => "LEASE_VALIDATION_ERROR",
            Self::Submission(_) => "LEASE_SUBMISSION_ERROR",
            Self::LedgerRejection(_) => "LEASE_LEDGER_REJECTION",
            Self::NotFound(_) => "LEASE_NOT_FOUND",
            Self::Decode(_) => "LEASE_DECODE_ERROR",
            Self::Timeout { .. } => "LEASE_TIMEOUT",
            Self::Dropped(_) => "LEASE_TX_DROPPED",
        }
    }
}

impl LeaseError {
    /// Returns true if resubmitting the same request may succeed without the
    /// caller changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Submission(_) | Self::Dropped(_))
    }

    /// Returns true if the on-chain outcome of the transaction is unknown.
    pub fn is_outcome_unknown(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout { .. })
    }
}

impl From<toml::de::Error> for LeaseError {
    fn from(e: toml::de::Error) -> Self {
        LeaseError::Validation(format!("Invalid configuration: {}", e))
    }
}

impl From<hex::FromHexError> for LeaseError {
    fn from(e: hex::FromHexError) -> Self {
        LeaseError::Decode(format!("Invalid hex: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            LeaseError::NotFound("contract 1".into()).code(),
            "LEASE_NOT_FOUND"
        );
        assert_eq!(
            LeaseError::Timeout {
                tx_hash: "0x00".into(),
                waited_secs: 3
            }
            .code(),
            "LEASE_TIMEOUT"
        );
    }

    #[test]
    fn test_unknown_outcome_is_not_retryable() {
        let timeout = LeaseError::Timeout {
            tx_hash: "0xab".into(),
            waited_secs: 10,
        };
        assert!(timeout.is_outcome_unknown());
        assert!(!timeout.is_retryable());
        assert!(!LeaseError::LedgerRejection("ContractCancelled".into()).is_retryable());
        assert!(LeaseError::Submission("connection reset".into()).is_retryable());
    }
}
