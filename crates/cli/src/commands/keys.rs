// Path: crates/cli/src/commands/keys.rs

use super::SignerArgs;
use anyhow::Result;
use clap::{Parser, Subcommand};
use lease_crypto::{generate_mnemonic, resolve_signer, Credential};

#[derive(Parser, Debug)]
pub struct KeysArgs {
    #[clap(subcommand)]
    pub command: KeysCommands,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommands {
    /// Generate a new 12-word mnemonic.
    Generate,
    /// Print the account a mnemonic or development account signs for.
    Inspect {
        #[clap(flatten)]
        signer: SignerArgs,
    },
}

pub fn run(args: KeysArgs) -> Result<()> {
    match args.command {
        KeysCommands::Generate => {
            let phrase = generate_mnemonic()?;
            let identity = resolve_signer(&Credential::Mnemonic(phrase.clone()))?;
            println!("--- New Identity ---");
            println!("Mnemonic:   {}", phrase);
            println!("Account ID: {}", identity.account_id());
        }
        KeysCommands::Inspect { signer } => {
            let identity = resolve_signer(&signer.credential()?)?;
            println!("Account ID: {}", identity.account_id());
        }
    }
    Ok(())
}
