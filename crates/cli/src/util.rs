// Path: crates/cli/src/util.rs

use crate::commands::{GlobalArgs, SignerArgs};
use lease_client::{ChainHandle, LeaseOrchestrator, StatusStream};
use lease_crypto::{resolve_signer, Credential};
use lease_tx::FinalizedTx;
use lease_types::app::{StatusUpdate, TransactionStatus};
use lease_types::error::LeaseError;

/// Resolves the signer before any network call so a bad credential fails fast.
pub fn signer(args: &SignerArgs) -> Result<Credential, LeaseError> {
    let credential = args.credential()?;
    let identity = resolve_signer(&credential)?;
    log::debug!("signing as {}", identity.account_id());
    Ok(credential)
}

pub async fn connect(global: &GlobalArgs) -> Result<LeaseOrchestrator, LeaseError> {
    let handle = ChainHandle::connect(global.client_config()?).await?;
    Ok(LeaseOrchestrator::new(handle))
}

pub fn print_update(update: &StatusUpdate) {
    println!("Current status is {}", update.status);
    match &update.status {
        TransactionStatus::InBlock(hash) => {
            println!("Transaction included at blockHash {}", hash);
        }
        TransactionStatus::Finalized(hash) => {
            println!("Transaction finalized at blockHash {}", hash);
            for event in &update.events {
                println!("\t{}", event);
            }
        }
        TransactionStatus::Invalid(reason) => println!("Transaction invalid: {}", reason),
        _ => {}
    }
}

/// Prints every status of `stream` and returns the finalized transaction.
pub async fn follow(stream: StatusStream) -> Result<FinalizedTx, LeaseError> {
    println!("Submitted transaction {}", stream.tx_hash());
    stream.follow(print_update).await
}
