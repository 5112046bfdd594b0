// Path: crates/crypto/src/sign/mod.rs
//! Ed25519 signing identities.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use lease_types::app::AccountId;
use lease_types::error::LeaseError;
use std::fmt;
use zeroize::Zeroizing;

/// A key pair able to authorize ledger transactions.
///
/// The account id is the raw ed25519 public key, so the ledger can verify a
/// signature from the extrinsic's signer field alone.
#[derive(Clone)]
pub struct SigningIdentity {
    signing_key: SigningKey,
    account_id: AccountId,
}

impl SigningIdentity {
    /// Builds an identity from a 32-byte ed25519 seed.
    pub fn from_seed(seed: &Zeroizing<[u8; 32]>) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let account_id = AccountId(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            account_id,
        }
    }

    /// The account this identity signs for.
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Signs `message`, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

// Never print key material.
impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

/// Verifies a signature produced by [`SigningIdentity::sign`] for `account`.
pub fn verify_signature(
    account: &AccountId,
    message: &[u8],
    signature: &[u8; 64],
) -> Result<(), LeaseError> {
    let key = VerifyingKey::from_bytes(&account.0)
        .map_err(|e| LeaseError::Validation(format!("invalid signer key: {}", e)))?;
    key.verify(message, &Signature::from_bytes(signature))
        .map_err(|_| LeaseError::Validation("bad signature".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let id = SigningIdentity::from_seed(&Zeroizing::new([9u8; 32]));
        let sig = id.sign(b"payload");
        assert!(verify_signature(&id.account_id(), b"payload", &sig).is_ok());
        assert!(verify_signature(&id.account_id(), b"other", &sig).is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let id = SigningIdentity::from_seed(&Zeroizing::new([1u8; 32]));
        let shown = format!("{:?}", id);
        assert!(shown.contains("account_id"));
        assert!(!shown.contains("signing_key"));
    }
}
