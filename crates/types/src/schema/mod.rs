// Path: crates/types/src/schema/mod.rs
//! The versioned type registry shared with the ledger node.
//!
//! The ledger advertises which schema variant it runs and which custom types it
//! defines. The client holds one [`TypeRegistry`] for the variant it understands and
//! refuses to decode any storage value whose type is not registered in it.

use crate::codec;
use crate::error::LeaseError;
use parity_scale_codec::Decode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Names of the custom types the ledger defines.
pub mod type_names {
    /// The contract record.
    pub const CONTRACT: &str = "Contract";
    /// The volume definition.
    pub const VOLUME_TYPE: &str = "VolumeType";
    /// The workload state enum.
    pub const WORKLOAD_STATE: &str = "WorkloadState";
    /// The per-resource price vector.
    pub const RESOURCE_PRICE: &str = "ResourcePrice";
    /// System account info (nonce and balances).
    pub const ACCOUNT_INFO: &str = "AccountInfo";
    /// List of contract ids owned by an account.
    pub const CONTRACT_IDS: &str = "Vec<ContractId>";
    /// Address alias of the account id.
    pub const ADDRESS: &str = "Address";
    /// Lookup source alias of the account id.
    pub const LOOKUP_SOURCE: &str = "LookupSource";
    /// Balance alias.
    pub const BALANCE_OF: &str = "BalanceOf";
}

/// The schema generations the ledger has shipped.
///
/// Only [`SchemaVariant::ResourcePriceV3`] has decoders in this crate; the older
/// variants are kept so a handshake against an old node fails with a clear message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SchemaVariant {
    /// Reservation-only records with flat pricing and no acceptance.
    ReservationV1,
    /// Contracts with provider acceptance and flat compute/storage prices.
    FlatPriceV2,
    /// Contracts with per-resource pricing, expiry and claim tracking.
    ResourcePriceV3,
}

impl SchemaVariant {
    /// The variant every current ledger runs.
    pub const CANONICAL: SchemaVariant = SchemaVariant::ResourcePriceV3;

    /// The tag exchanged during the handshake.
    pub fn tag(self) -> &'static str {
        match self {
            Self::ReservationV1 => "reservation-v1",
            Self::FlatPriceV2 => "flat-price-v2",
            Self::ResourcePriceV3 => "resource-price-v3",
        }
    }

    /// The custom types this variant defines.
    pub fn type_names(self) -> &'static [&'static str] {
        use type_names::*;
        match self {
            Self::ReservationV1 => &[
                CONTRACT,
                VOLUME_TYPE,
                WORKLOAD_STATE,
                ADDRESS,
                LOOKUP_SOURCE,
                BALANCE_OF,
            ],
            Self::FlatPriceV2 => &[
                CONTRACT,
                VOLUME_TYPE,
                WORKLOAD_STATE,
                ACCOUNT_INFO,
                ADDRESS,
                LOOKUP_SOURCE,
                BALANCE_OF,
            ],
            Self::ResourcePriceV3 => &[
                CONTRACT,
                VOLUME_TYPE,
                WORKLOAD_STATE,
                RESOURCE_PRICE,
                ACCOUNT_INFO,
                CONTRACT_IDS,
                ADDRESS,
                LOOKUP_SOURCE,
                BALANCE_OF,
            ],
        }
    }
}

impl Default for SchemaVariant {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SchemaVariant {
    type Err = LeaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::ReservationV1, Self::FlatPriceV2, Self::ResourcePriceV3]
            .into_iter()
            .find(|v| v.tag() == s)
            .ok_or_else(|| LeaseError::Validation(format!("unknown schema variant '{}'", s)))
    }
}

impl TryFrom<String> for SchemaVariant {
    type Error = LeaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaVariant> for String {
    fn from(value: SchemaVariant) -> Self {
        value.tag().to_string()
    }
}

/// The schema a ledger node advertises during the handshake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSchema {
    /// The variant tag, e.g. `resource-price-v3`.
    pub variant: String,
    /// The custom type names the node defines.
    pub types: Vec<String>,
}

impl RemoteSchema {
    /// The schema a node running `variant` advertises.
    pub fn for_variant(variant: SchemaVariant) -> Self {
        Self {
            variant: variant.tag().to_string(),
            types: variant.type_names().iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The set of custom types the client can decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRegistry {
    variant: SchemaVariant,
    types: BTreeSet<String>,
}

impl TypeRegistry {
    /// A registry holding every type of `variant`.
    pub fn for_variant(variant: SchemaVariant) -> Self {
        Self {
            variant,
            types: variant.type_names().iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The registry for [`SchemaVariant::CANONICAL`].
    pub fn canonical() -> Self {
        Self::for_variant(SchemaVariant::CANONICAL)
    }

    /// The variant this registry describes.
    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    /// Returns a copy of this registry with `name` unregistered.
    pub fn without(mut self, name: &str) -> Self {
        self.types.remove(name);
        self
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    /// Fails with a decode error unless `name` is registered.
    pub fn ensure(&self, name: &str) -> Result<(), LeaseError> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(LeaseError::Decode(format!(
                "type '{}' is not registered in schema {}",
                name, self.variant
            )))
        }
    }

    /// Decodes `bytes` as the registered type `name`.
    pub fn decode<T: Decode>(&self, name: &str, bytes: &[u8]) -> Result<T, LeaseError> {
        self.ensure(name)?;
        codec::from_bytes_canonical(bytes)
            .map_err(|e| LeaseError::Decode(format!("{}: {}", name, e)))
    }

    /// Checks a node's advertised schema against this registry.
    ///
    /// The variant must match and the node must define every registered type.
    pub fn verify_remote(&self, remote: &RemoteSchema) -> Result<(), LeaseError> {
        if remote.variant != self.variant.tag() {
            return Err(LeaseError::Connection(format!(
                "schema mismatch: node runs '{}', client expects '{}'",
                remote.variant, self.variant
            )));
        }
        let missing: Vec<&str> = self
            .types
            .iter()
            .filter(|t| !remote.types.iter().any(|r| r == *t))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(LeaseError::Connection(format!(
                "node does not define types: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::VolumeType;
    use crate::codec::to_bytes_canonical;

    #[test]
    fn test_canonical_registry_decodes_registered_types() {
        let registry = TypeRegistry::canonical();
        let bytes = to_bytes_canonical(&VolumeType {
            disk_type: 2,
            size: 100,
        })
        .unwrap();
        let v: VolumeType = registry.decode(type_names::VOLUME_TYPE, &bytes).unwrap();
        assert_eq!(v.size, 100);
    }

    #[test]
    fn test_unregistered_type_fails_to_decode() {
        let registry = TypeRegistry::canonical().without(type_names::VOLUME_TYPE);
        let bytes = to_bytes_canonical(&VolumeType::default()).unwrap();
        let err = registry
            .decode::<VolumeType>(type_names::VOLUME_TYPE, &bytes)
            .unwrap_err();
        assert!(matches!(err, LeaseError::Decode(_)));
    }

    #[test]
    fn test_verify_remote_rejects_old_variant() {
        let registry = TypeRegistry::canonical();
        let old = RemoteSchema::for_variant(SchemaVariant::FlatPriceV2);
        assert!(matches!(
            registry.verify_remote(&old),
            Err(LeaseError::Connection(_))
        ));
        assert!(registry
            .verify_remote(&RemoteSchema::for_variant(SchemaVariant::CANONICAL))
            .is_ok());
    }

    #[test]
    fn test_verify_remote_rejects_missing_type() {
        let registry = TypeRegistry::canonical();
        let mut remote = RemoteSchema::for_variant(SchemaVariant::CANONICAL);
        remote.types.retain(|t| t != type_names::RESOURCE_PRICE);
        let err = registry.verify_remote(&remote).unwrap_err();
        assert!(err.to_string().contains("ResourcePrice"));
    }

    #[test]
    fn test_variant_tags_roundtrip() {
        for v in [
            SchemaVariant::ReservationV1,
            SchemaVariant::FlatPriceV2,
            SchemaVariant::ResourcePriceV3,
        ] {
            assert_eq!(v.tag().parse::<SchemaVariant>().unwrap(), v);
        }
    }
}
