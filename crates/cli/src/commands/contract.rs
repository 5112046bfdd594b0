// Path: crates/cli/src/commands/contract.rs

use super::{GlobalArgs, SignerArgs};
use crate::util;
use anyhow::{Context, Result};
use clap::Parser;
use lease_client::{ContractAction, ContractRequest, CreateRequest, PayRequest};
use lease_crypto::resolve_signer;
use lease_types::app::AccountId;

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Node that hosts the volume.
    #[clap(long = "node")]
    pub node_id: Option<String>,

    /// Disk type: 1 for HDD, 2 for SSD.
    #[clap(long)]
    pub disk_type: Option<String>,

    /// Volume size in GB.
    #[clap(long)]
    pub size: Option<String>,

    #[clap(flatten)]
    pub signer: SignerArgs,
}

#[derive(Parser, Debug)]
pub struct PayArgs {
    /// Contract id.
    #[clap(long)]
    pub id: Option<String>,

    /// Amount in tokens, e.g. `1.5`.
    #[clap(long)]
    pub amount: Option<String>,

    #[clap(flatten)]
    pub signer: SignerArgs,
}

#[derive(Parser, Debug)]
pub struct IdSignerArgs {
    /// Contract id.
    #[clap(long)]
    pub id: Option<String>,

    #[clap(flatten)]
    pub signer: SignerArgs,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Contract id.
    #[clap(long)]
    pub id: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Account to list, as 0x-prefixed hex. Defaults to the signer's account.
    #[clap(long)]
    pub account: Option<String>,

    #[clap(flatten)]
    pub signer: SignerArgs,
}

pub async fn create(global: &GlobalArgs, args: CreateArgs) -> Result<()> {
    let request = CreateRequest {
        node_id: args.node_id,
        disk_type: args.disk_type,
        size: args.size,
    };
    request.validate()?;
    let credential = util::signer(&args.signer)?;

    let orchestrator = util::connect(global).await?;
    let outcome = util::follow(orchestrator.create(&request, &credential).await?).await?;
    match outcome.contract_added() {
        Some((id, Some(node))) => println!("Contract {} created on node {}", id, node),
        Some((id, None)) => println!("Contract {} created", id),
        None => log::warn!("finalized without a ContractAdded event"),
    }
    Ok(())
}

pub async fn pay(global: &GlobalArgs, args: PayArgs) -> Result<()> {
    let request = PayRequest {
        contract_id: args.id,
        amount: args.amount,
    };
    request.validate()?;
    let credential = util::signer(&args.signer)?;

    let orchestrator = util::connect(global).await?;
    util::follow(orchestrator.pay(&request, &credential).await?).await?;
    Ok(())
}

async fn by_id(global: &GlobalArgs, args: IdSignerArgs, action: ContractAction) -> Result<()> {
    let request = ContractRequest {
        contract_id: args.id,
    };
    request.validate(action)?;
    let credential = util::signer(&args.signer)?;

    let orchestrator = util::connect(global).await?;
    let stream = match action {
        ContractAction::Accept => orchestrator.accept(&request, &credential).await?,
        ContractAction::Claim => orchestrator.claim(&request, &credential).await?,
        ContractAction::Cancel => orchestrator.cancel(&request, &credential).await?,
    };
    util::follow(stream).await?;
    Ok(())
}

pub async fn accept(global: &GlobalArgs, args: IdSignerArgs) -> Result<()> {
    by_id(global, args, ContractAction::Accept).await
}

pub async fn claim(global: &GlobalArgs, args: IdSignerArgs) -> Result<()> {
    by_id(global, args, ContractAction::Claim).await
}

pub async fn cancel(global: &GlobalArgs, args: IdSignerArgs) -> Result<()> {
    by_id(global, args, ContractAction::Cancel).await
}

pub async fn get(global: &GlobalArgs, args: GetArgs) -> Result<()> {
    let request = ContractRequest {
        contract_id: args.id,
    };
    request.contract_id()?;

    let orchestrator = util::connect(global).await?;
    let view = orchestrator.get(&request).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&view).context("Failed to render contract")?
    );
    Ok(())
}

pub async fn list(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let account: AccountId = match (&args.account, args.signer.is_set()) {
        (Some(raw), _) => raw.parse()?,
        (None, true) => resolve_signer(&args.signer.credential()?)?.account_id(),
        (None, false) => {
            return Err(lease_types::error::LeaseError::Validation(
                "missing required account: pass --account, --mnemonic or --dev-account".into(),
            )
            .into())
        }
    };

    let orchestrator = util::connect(global).await?;
    let ids = orchestrator.reader().contracts_for_account(&account).await?;
    if ids.is_empty() {
        println!("No contracts for {}", account);
    }
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}
