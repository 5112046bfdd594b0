// Path: crates/cli/src/commands/mod.rs

pub mod contract;
pub mod keys;

use clap::Args;
use lease_crypto::{Credential, DevAccount};
use lease_types::config::ClientConfig;
use lease_types::error::LeaseError;
use std::path::PathBuf;

/// Connection flags accepted by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// TOML file with client settings.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint of the ledger node.
    #[clap(long, global = true, env = "LEASE_RPC_URL")]
    pub endpoint: Option<String>,

    /// Seconds to wait for a terminal transaction status (0 waits indefinitely).
    #[clap(long, global = true)]
    pub timeout: Option<u64>,

    /// Log as JSON lines instead of text.
    #[clap(long, global = true)]
    pub json_logs: bool,
}

impl GlobalArgs {
    /// Built-in defaults, then the config file, then flags and environment.
    pub fn client_config(&self) -> Result<ClientConfig, LeaseError> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.status_timeout_secs = timeout;
        }
        Ok(config)
    }
}

/// Who signs a transaction.
#[derive(Args, Debug, Clone, Default)]
pub struct SignerArgs {
    /// BIP-39 mnemonic of the signing account.
    #[clap(long, env = "LEASE_MNEMONIC", hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// Sign as a development account (alice, bob, charlie or dave).
    #[clap(long)]
    pub dev_account: Option<String>,
}

impl SignerArgs {
    pub fn credential(&self) -> Result<Credential, LeaseError> {
        match (&self.mnemonic, &self.dev_account) {
            (Some(_), Some(_)) => Err(LeaseError::Validation(
                "pass only one of --mnemonic or --dev-account".into(),
            )),
            (Some(phrase), None) => Ok(Credential::Mnemonic(phrase.clone())),
            (None, Some(name)) => Ok(Credential::Dev(name.parse::<DevAccount>()?)),
            (None, None) => Err(LeaseError::Validation(
                "missing required signer: pass --mnemonic or --dev-account".into(),
            )),
        }
    }

    pub fn is_set(&self) -> bool {
        self.mnemonic.is_some() || self.dev_account.is_some()
    }
}
