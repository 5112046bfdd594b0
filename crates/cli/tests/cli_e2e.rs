// Path: crates/cli/tests/cli_e2e.rs

use anyhow::Result;
use lease_crypto::DevAccount;
use lease_test_utils::fixtures::{account_of, dev, fund};
use lease_test_utils::{InMemoryLedger, MockNode};
use std::process::Output;
use std::sync::Arc;
use tokio::process::Command;

/// An endpoint nothing listens on.
const DEAD_ENDPOINT: &str = "http://127.0.0.1:9";

async fn lease(endpoint: &str, args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_lease"))
        .args(args)
        .env("LEASE_RPC_URL", endpoint)
        .env_remove("LEASE_MNEMONIC")
        .env("RUST_LOG", "warn")
        .output()
        .await?)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

async fn funded_node() -> Result<MockNode> {
    let ledger = Arc::new(InMemoryLedger::default());
    fund(&ledger)?;
    MockNode::spawn(ledger).await
}

#[tokio::test]
async fn test_help_and_version_exit_zero() -> Result<()> {
    for flag in ["--help", "--version"] {
        let out = lease(DEAD_ENDPOINT, &[flag]).await?;
        assert_eq!(out.status.code(), Some(0), "{}", flag);
    }
    let out = lease(DEAD_ENDPOINT, &["frobnicate"]).await?;
    assert_eq!(out.status.code(), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_missing_parameters_fail_before_connecting() -> Result<()> {
    // The endpoint is dead: a connection error here would mean validation ran late.
    let cases: [&[&str]; 5] = [
        &["create", "--node", "node-1", "--disk-type", "2", "--dev-account", "alice"],
        &["create", "--node", "node-1", "--size", "10", "--disk-type", "ssd", "--dev-account", "alice"],
        &["pay", "--id", "0", "--amount", "0", "--dev-account", "alice"],
        &["accept", "--id", "0"],
        &["get"],
    ];
    for args in cases {
        let out = lease(DEAD_ENDPOINT, args).await?;
        assert_eq!(out.status.code(), Some(1), "{:?}", args);
        assert!(stderr(&out).contains("Validation failed"), "{:?}: {}", args, stderr(&out));
    }

    let out = lease(
        DEAD_ENDPOINT,
        &["cancel", "--id", "0", "--mnemonic", "not a mnemonic"],
    )
    .await?;
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Invalid mnemonic"), "{}", stderr(&out));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_node_exits_one() -> Result<()> {
    let out = lease(DEAD_ENDPOINT, &["get", "--id", "0"]).await?;
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Connection error"), "{}", stderr(&out));
    Ok(())
}

#[tokio::test]
async fn test_contract_lifecycle_through_the_binary() -> Result<()> {
    let node = funded_node().await?;
    let url = node.url();

    // 1. Create prints every status and the new contract id.
    let out = lease(
        &url,
        &["create", "--node", "node-1", "--disk-type", "2", "--size", "100", "--dev-account", "alice"],
    )
    .await?;
    let text = stdout(&out);
    assert_eq!(out.status.code(), Some(0), "{}{}", text, stderr(&out));
    for status in ["Ready", "Broadcast", "InBlock", "Finalized"] {
        assert!(text.contains(&format!("Current status is {}", status)), "{}", text);
    }
    assert!(text.contains("volumeContracts.ContractAdded"), "{}", text);
    assert!(text.contains("Contract 0 created on node node-1"), "{}", text);

    // 2. Get prints the merged view as JSON.
    let out = lease(&url, &["get", "--id", "0"]).await?;
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let view: serde_json::Value = serde_json::from_slice(&out.stdout)?;
    assert_eq!(view["node_id"], "node-1");
    assert_eq!(view["accepted"], false);
    assert_eq!(view["volume"]["size"], 100);
    assert_eq!(
        view["requester"],
        account_of(&dev(DevAccount::Alice))?.to_string()
    );

    // 3. A second accept is rejected by the ledger.
    let accept = ["accept", "--id", "0", "--dev-account", "bob"];
    assert_eq!(lease(&url, &accept).await?.status.code(), Some(0));
    let out = lease(&url, &["accept", "--id", "0", "--dev-account", "charlie"]).await?;
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("ContractAlreadyAccepted"), "{}", stderr(&out));

    // 4. Pay, then list.
    let out = lease(&url, &["pay", "--id", "0", "--amount", "2.5", "--dev-account", "alice"]).await?;
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert!(stdout(&out).contains("ContractDeployed"), "{}", stdout(&out));

    let out = lease(&url, &["list", "--dev-account", "alice"]).await?;
    assert_eq!(stdout(&out).trim(), "0");
    Ok(())
}

#[tokio::test]
async fn test_unknown_contract_exits_one() -> Result<()> {
    let node = funded_node().await?;
    let out = lease(&node.url(), &["get", "--id", "7"]).await?;
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Not found"), "{}", stderr(&out));
    Ok(())
}

#[tokio::test]
async fn test_config_file_supplies_endpoint() -> Result<()> {
    let node = funded_node().await?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("lease.toml");
    std::fs::write(&path, format!("endpoint = \"{}\"\n", node.url()))?;

    let out = Command::new(env!("CARGO_BIN_EXE_lease"))
        .args(["--config", &path.to_string_lossy(), "list", "--dev-account", "dave"])
        .env_remove("LEASE_RPC_URL")
        .env_remove("LEASE_MNEMONIC")
        .output()
        .await?;
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert!(stdout(&out).starts_with("No contracts for 0x"));
    Ok(())
}

#[tokio::test]
async fn test_keys_work_offline() -> Result<()> {
    let out = lease(DEAD_ENDPOINT, &["keys", "inspect", "--dev-account", "alice"]).await?;
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        stdout(&out).trim(),
        format!("Account ID: {}", account_of(&dev(DevAccount::Alice))?)
    );

    let out = lease(DEAD_ENDPOINT, &["keys", "generate"]).await?;
    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);
    let phrase = text
        .lines()
        .find_map(|l| l.strip_prefix("Mnemonic:"))
        .expect("mnemonic line")
        .trim();
    assert_eq!(phrase.split_whitespace().count(), 12);

    let out = lease(DEAD_ENDPOINT, &["keys", "inspect", "--mnemonic", phrase]).await?;
    assert_eq!(out.status.code(), Some(0));
    assert!(text.contains(stdout(&out).trim()));
    Ok(())
}
