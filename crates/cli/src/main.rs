// Path: crates/cli/src/main.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Volume Lease CLI
//!
//! Creates, accepts, pays for, claims and cancels volume lease contracts on a ledger
//! node, and reads them back.

use anyhow::Result;
use clap::{Parser, Subcommand};
use lease_types::error::{ErrorCode, LeaseError};

mod commands;
mod util;

use commands::*;

#[derive(Parser, Debug)]
#[clap(
    name = "lease",
    version,
    about = "Manage volume lease contracts on a ledger node.",
    long_about = "Submits signed contract calls (create, accept, pay, claim, cancel), follows them to finalization, and prints merged contract records."
)]
struct Cli {
    #[clap(flatten)]
    global: GlobalArgs,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // --- Lifecycle ---
    /// Create a contract for a volume on a node.
    Create(contract::CreateArgs),

    /// Accept a contract as its provider.
    Accept(contract::IdSignerArgs),

    /// Pay into a contract's escrow.
    Pay(contract::PayArgs),

    /// Claim the funds a contract has accrued, as its provider.
    Claim(contract::IdSignerArgs),

    /// Cancel a contract, as requester or provider.
    Cancel(contract::IdSignerArgs),

    // --- Queries ---
    /// Print a contract merged with its volume, state and requester balance.
    Get(contract::GetArgs),

    /// List the contracts an account created.
    List(contract::ListArgs),

    // --- Tools ---
    /// Inspect or generate signing keys.
    Keys(keys::KeysArgs),
}

fn init_logging(json: bool) -> Result<()> {
    if json {
        lease_telemetry::init_tracing(lease_telemetry::LogFormat::Json, "info")?;
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Usage errors exit 1 like every other failure; help and version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            e.print()?;
            return Ok(());
        }
        Err(e) => {
            e.print()?;
            std::process::exit(1);
        }
    };
    init_logging(cli.global.json_logs)?;

    let result = match cli.command {
        Commands::Create(args) => contract::create(&cli.global, args).await,
        Commands::Accept(args) => contract::accept(&cli.global, args).await,
        Commands::Pay(args) => contract::pay(&cli.global, args).await,
        Commands::Claim(args) => contract::claim(&cli.global, args).await,
        Commands::Cancel(args) => contract::cancel(&cli.global, args).await,
        Commands::Get(args) => contract::get(&cli.global, args).await,
        Commands::List(args) => contract::list(&cli.global, args).await,
        Commands::Keys(args) => keys::run(args),
    };

    if let Err(e) = &result {
        if let Some(lease_err) = e.downcast_ref::<LeaseError>() {
            log::error!("{}: {}", lease_err.code(), lease_err);
        }
    }
    result
}
