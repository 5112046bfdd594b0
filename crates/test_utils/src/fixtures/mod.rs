// Path: crates/test_utils/src/fixtures/mod.rs

//! Shared identities, configurations and a ready-made test network.

use crate::ledger::{InMemoryLedger, SealMode};
use lease_client::{ChainHandle, LeaseOrchestrator};
use lease_crypto::{resolve_signer, Credential, DevAccount};
use lease_types::app::{AccountId, Balance, BASE_UNITS_PER_TOKEN};
use lease_types::config::ClientConfig;
use lease_types::error::LeaseError;
use lease_types::schema::TypeRegistry;
use std::sync::Arc;

// BIP-39 test vector phrases, used as party mnemonics.

/// Creates contracts and pays into them.
pub const REQUESTER_MNEMONIC: &str =
    "legal winner thank year wave sausage worth useful legal winner thank yellow";
/// Accepts contracts and claims funds.
pub const PROVIDER_MNEMONIC: &str =
    "letter advice cage absurd amount doctor acoustic avoid letter advice cage above";
/// A second provider, for contention on acceptance.
pub const OTHER_PROVIDER_MNEMONIC: &str =
    "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong";

/// Every fixture account starts with this many tokens.
pub const INITIAL_TOKENS: Balance = 1_000;

pub fn mnemonic(phrase: &str) -> Credential {
    Credential::Mnemonic(phrase.to_string())
}

pub fn dev(account: DevAccount) -> Credential {
    Credential::Dev(account)
}

/// The account a credential signs for.
pub fn account_of(credential: &Credential) -> Result<AccountId, LeaseError> {
    Ok(resolve_signer(credential)?.account_id())
}

/// A configuration with fast polling and a short status deadline.
pub fn test_config(endpoint: &str) -> ClientConfig {
    ClientConfig {
        endpoint: endpoint.to_string(),
        status_timeout_secs: 10,
        poll_interval_ms: 10,
        request_timeout_secs: 5,
        ..ClientConfig::default()
    }
}

/// An in-memory ledger with funded fixture accounts, and a client connected to it
/// without going through HTTP.
pub struct TestNet {
    pub ledger: Arc<InMemoryLedger>,
    pub handle: ChainHandle,
    pub orchestrator: LeaseOrchestrator,
}

impl TestNet {
    pub async fn start(mode: SealMode) -> Result<Self, LeaseError> {
        Self::start_with(mode, TypeRegistry::canonical(), test_config("memory://ledger")).await
    }

    pub async fn start_with(
        mode: SealMode,
        registry: TypeRegistry,
        config: ClientConfig,
    ) -> Result<Self, LeaseError> {
        let ledger = Arc::new(InMemoryLedger::new(mode));
        fund(&ledger)?;
        let handle = ChainHandle::with_transport(ledger.clone(), registry, config).await?;
        let orchestrator = LeaseOrchestrator::new(handle.clone());
        Ok(Self {
            ledger,
            handle,
            orchestrator,
        })
    }
}

/// Credits every fixture account with [`INITIAL_TOKENS`].
pub fn fund(ledger: &InMemoryLedger) -> Result<(), LeaseError> {
    let credentials = [
        mnemonic(REQUESTER_MNEMONIC),
        mnemonic(PROVIDER_MNEMONIC),
        mnemonic(OTHER_PROVIDER_MNEMONIC),
        dev(DevAccount::Alice),
        dev(DevAccount::Bob),
        dev(DevAccount::Charlie),
        dev(DevAccount::Dave),
    ];
    for credential in &credentials {
        ledger.endow(
            &account_of(credential)?,
            INITIAL_TOKENS * BASE_UNITS_PER_TOKEN,
        );
    }
    Ok(())
}
