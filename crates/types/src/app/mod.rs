// Path: crates/types/src/app/mod.rs
//! The ledger data model: contracts, volumes, workload states and accounts.
//!
//! These mirror the records the ledger stores byte-for-byte (SCALE), so field order
//! and integer widths here are part of the wire contract.

use crate::error::LeaseError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Decimal amount parsing and formatting in ledger base units.
pub mod amount;
/// Null-padded ASCII node identifiers.
pub mod node_id;
/// Transaction status updates and chain events.
pub mod status;

pub use amount::{format_amount, parse_amount, BASE_UNITS_PER_TOKEN, TOKEN_DECIMALS};
pub use node_id::{NodeId, NODE_ID_WIDTH};
pub use status::{ChainEvent, EventPhase, StatusUpdate, TransactionStatus};

/// A balance in the ledger's base unit (10^-12 of the human-facing token).
pub type Balance = u128;

fn parse_hex32(s: &str) -> Result<[u8; 32], LeaseError> {
    let raw = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(raw)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| LeaseError::Decode(format!("expected 32 bytes, got {}", bytes.len())))
}

macro_rules! hex32_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Encode, Decode)]
        pub struct $name(pub [u8; 32]);

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(0x{})", stringify!($name), hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = LeaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_hex32(s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

hex32_newtype!(
    /// A 32-byte account identifier (the signer's ed25519 public key).
    AccountId
);

hex32_newtype!(
    /// A 32-byte hash, used for both extrinsic and block hashes.
    H256
);

/// Hash identifying a submitted extrinsic.
pub type TxHash = H256;
/// Hash identifying a block.
pub type BlockHash = H256;

/// The ledger-assigned identifier of a contract.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContractId(pub u64);

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContractId {
    type Err = LeaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ContractId)
            .map_err(|_| LeaseError::Validation(format!("invalid contract id '{}'", s)))
    }
}

/// The volume disk types the ledger recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiskType {
    /// Spinning disk.
    Hdd = 1,
    /// Solid state disk.
    Ssd = 2,
}

impl TryFrom<u8> for DiskType {
    type Error = LeaseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DiskType::Hdd),
            2 => Ok(DiskType::Ssd),
            other => Err(LeaseError::Validation(format!(
                "unknown disk type {} (expected 1 for HDD or 2 for SSD)",
                other
            ))),
        }
    }
}

/// The volume definition linked to a contract. Immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq, Default, Encode, Decode, Serialize, Deserialize)]
pub struct VolumeType {
    /// Disk type, see [`DiskType`].
    pub disk_type: u8,
    /// Size in GB.
    pub size: u64,
}

/// The workload state of a contract. Moves only forward:
/// `Created -> Deployed -> Cancelled`, or `Created -> Cancelled`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Encode, Decode, Serialize, Deserialize,
)]
pub enum WorkloadState {
    /// Contract exists, workload not yet running.
    #[default]
    Created,
    /// Workload is running on the provider's node.
    Deployed,
    /// Contract is cancelled. Terminal.
    Cancelled,
}

impl WorkloadState {
    /// Returns true if moving from `self` to `next` keeps the state monotonic.
    pub fn can_transition_to(self, next: WorkloadState) -> bool {
        next > self
    }
}

/// Per-resource-unit pricing published by the provider's farm.
#[derive(Clone, Debug, PartialEq, Eq, Default, Encode, Decode, Serialize, Deserialize)]
pub struct ResourcePrice {
    /// Currency code of the rates below.
    pub currency: u64,
    /// Storage (SSD) unit rate.
    pub storage: u64,
    /// Host (HDD) unit rate.
    pub host: u64,
    /// Compute unit rate.
    pub compute: u64,
    /// Network unit rate.
    pub network: u64,
    /// Memory unit rate.
    pub memory: u64,
}

/// Contract pricing. Older ledgers only set the flat pair; current ledgers set the
/// per-resource vector.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pricing {
    /// A flat compute/storage unit price pair.
    Flat {
        /// Compute unit price.
        cu_price: u64,
        /// Storage unit price.
        su_price: u64,
    },
    /// A per-resource-type price vector.
    PerResource(ResourcePrice),
}

impl Default for Pricing {
    fn default() -> Self {
        Pricing::PerResource(ResourcePrice::default())
    }
}

impl Pricing {
    /// Base units accrued per GB per block for a volume of the given disk type.
    pub fn volume_rate(&self, disk_type: u8) -> u64 {
        match (self, DiskType::try_from(disk_type)) {
            (Pricing::Flat { su_price, .. }, _) => *su_price,
            (Pricing::PerResource(p), Ok(DiskType::Ssd)) => p.storage,
            (Pricing::PerResource(p), _) => p.host,
        }
    }
}

/// A contract record as the ledger stores it.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct Contract {
    /// Unit pricing applied when the provider claims.
    pub pricing: Pricing,
    /// Escrow account payments are transferred into.
    pub account_id: AccountId,
    /// The requester who created the contract.
    pub user_account: AccountId,
    /// Target node id, ASCII, null-padded to [`NODE_ID_WIDTH`].
    pub node_id: Vec<u8>,
    /// The provider, bound by a successful accept.
    pub farmer_account: Option<AccountId>,
    /// Whether a provider has accepted the contract.
    pub accepted: bool,
    /// Block number after which the contract expires.
    pub expires_at: u64,
    /// Block number of the last successful claim.
    pub last_claimed: u64,
}

impl Contract {
    /// Checks that the provider binding and the acceptance flag agree.
    pub fn check_acceptance(&self) -> Result<(), LeaseError> {
        if self.accepted != self.farmer_account.is_some() {
            return Err(LeaseError::Decode(format!(
                "contract record is inconsistent: accepted={} but provider {}",
                self.accepted,
                if self.farmer_account.is_some() {
                    "is set"
                } else {
                    "is unset"
                }
            )));
        }
        Ok(())
    }
}

/// Where a contract is in its lifecycle, derived from acceptance and workload state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleStage {
    /// Created, awaiting a provider.
    Created,
    /// Accepted by a provider, not yet deployed.
    Accepted,
    /// Workload running.
    Deployed,
    /// Cancelled by either party.
    Cancelled,
}

impl LifecycleStage {
    /// Derives the stage from the acceptance flag and the workload state.
    pub fn derive(accepted: bool, state: WorkloadState) -> Self {
        match (state, accepted) {
            (WorkloadState::Cancelled, _) => LifecycleStage::Cancelled,
            (WorkloadState::Deployed, _) => LifecycleStage::Deployed,
            (WorkloadState::Created, true) => LifecycleStage::Accepted,
            (WorkloadState::Created, false) => LifecycleStage::Created,
        }
    }
}

/// Balances held by an account.
#[derive(Clone, Debug, PartialEq, Eq, Default, Encode, Decode, Serialize, Deserialize)]
pub struct AccountData {
    /// Spendable balance.
    pub free: Balance,
    /// Reserved balance.
    pub reserved: Balance,
}

/// Account info stored by the system module.
#[derive(Clone, Debug, PartialEq, Eq, Default, Encode, Decode, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Number of extrinsics the account has had included.
    pub nonce: u64,
    /// Account balances.
    pub data: AccountData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_hex_roundtrip() {
        let id = AccountId([0xab; 32]);
        let shown = id.to_string();
        assert!(shown.starts_with("0xabab"));
        assert_eq!(shown.parse::<AccountId>().unwrap(), id);
        assert!("0x1234".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_contract_id_rejects_non_numeric() {
        assert_eq!("17".parse::<ContractId>().unwrap(), ContractId(17));
        assert!(matches!(
            "abc".parse::<ContractId>(),
            Err(LeaseError::Validation(_))
        ));
        assert!("-1".parse::<ContractId>().is_err());
    }

    #[test]
    fn test_workload_state_only_moves_forward() {
        use WorkloadState::*;
        assert!(Created.can_transition_to(Deployed));
        assert!(Created.can_transition_to(Cancelled));
        assert!(Deployed.can_transition_to(Cancelled));
        assert!(!Deployed.can_transition_to(Created));
        assert!(!Cancelled.can_transition_to(Deployed));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn test_lifecycle_stage_derivation() {
        assert_eq!(
            LifecycleStage::derive(false, WorkloadState::Created),
            LifecycleStage::Created
        );
        assert_eq!(
            LifecycleStage::derive(true, WorkloadState::Created),
            LifecycleStage::Accepted
        );
        assert_eq!(
            LifecycleStage::derive(true, WorkloadState::Cancelled),
            LifecycleStage::Cancelled
        );
    }

    #[test]
    fn test_disk_type_range() {
        assert_eq!(DiskType::try_from(2).unwrap(), DiskType::Ssd);
        assert!(DiskType::try_from(0).is_err());
        assert!(DiskType::try_from(3).is_err());
    }
}
