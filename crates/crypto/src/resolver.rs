// Path: crates/crypto/src/resolver.rs
//! Derives signing identities from user credentials.
//!
//! A mnemonic maps to an identity deterministically: the BIP-39 entropy is hashed
//! with SHA-256 into the ed25519 seed. Development accounts use the well-known
//! seed `SHA-256("//<Name>")` and exist for local devnets and tests only; callers
//! must name one explicitly, there is no implicit fallback.

use crate::sign::SigningIdentity;
use bip39::{Language, Mnemonic};
use lease_types::error::LeaseError;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Well-known development accounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DevAccount {
    Alice,
    Bob,
    Charlie,
    Dave,
}

impl DevAccount {
    fn derivation_path(self) -> &'static str {
        match self {
            DevAccount::Alice => "//Alice",
            DevAccount::Bob => "//Bob",
            DevAccount::Charlie => "//Charlie",
            DevAccount::Dave => "//Dave",
        }
    }
}

impl FromStr for DevAccount {
    type Err = LeaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alice" => Ok(DevAccount::Alice),
            "bob" => Ok(DevAccount::Bob),
            "charlie" => Ok(DevAccount::Charlie),
            "dave" => Ok(DevAccount::Dave),
            other => Err(LeaseError::Validation(format!(
                "unknown dev account '{}' (expected alice, bob, charlie or dave)",
                other
            ))),
        }
    }
}

/// Where a signing identity comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// A BIP-39 English mnemonic phrase.
    Mnemonic(String),
    /// A named development account.
    Dev(DevAccount),
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Mnemonic(_) => f.write_str("Credential::Mnemonic(<redacted>)"),
            Credential::Dev(d) => write!(f, "Credential::Dev({:?})", d),
        }
    }
}

/// Resolves a credential into a signing identity.
pub fn resolve_signer(credential: &Credential) -> Result<SigningIdentity, LeaseError> {
    let seed = match credential {
        Credential::Mnemonic(phrase) => seed_from_mnemonic(phrase)?,
        Credential::Dev(account) => {
            log::debug!("resolving development identity {:?}", account);
            sha256_seed(account.derivation_path().as_bytes())
        }
    };
    Ok(SigningIdentity::from_seed(&seed))
}

/// Generates a fresh 12-word English mnemonic.
pub fn generate_mnemonic() -> Result<String, LeaseError> {
    Mnemonic::generate_in(Language::English, 12)
        .map(|m| m.to_string())
        .map_err(|e| LeaseError::InvalidMnemonic(e.to_string()))
}

fn seed_from_mnemonic(phrase: &str) -> Result<Zeroizing<[u8; 32]>, LeaseError> {
    let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, &normalized)
        .map_err(|e| LeaseError::InvalidMnemonic(e.to_string()))?;
    let entropy = Zeroizing::new(mnemonic.to_entropy());
    Ok(sha256_seed(&entropy))
}

fn sha256_seed(material: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut seed = Zeroizing::new([0u8; 32]);
    seed.copy_from_slice(&Sha256::digest(material));
    seed
}
