// Path: crates/client/tests/rpc_e2e.rs

use anyhow::Result;
use lease_client::{ChainHandle, ContractRequest, CreateRequest, LeaseOrchestrator};
use lease_crypto::DevAccount;
use lease_test_utils::fixtures::{dev, fund, test_config};
use lease_test_utils::{assert_lease_err, InMemoryLedger, MockNode};
use lease_types::app::{TransactionStatus, H256};
use std::sync::Arc;

#[tokio::test]
async fn test_lifecycle_over_json_rpc() -> Result<()> {
    let ledger = Arc::new(InMemoryLedger::default());
    fund(&ledger)?;
    let node = MockNode::spawn(ledger.clone()).await?;

    let handle = ChainHandle::connect(test_config(&node.url())).await?;
    let orchestrator = LeaseOrchestrator::new(handle);
    let alice = dev(DevAccount::Alice);

    let request = CreateRequest {
        node_id: Some("rpc-node".into()),
        disk_type: Some("1".into()),
        size: Some("5".into()),
    };
    let mut statuses = Vec::new();
    let outcome = orchestrator
        .create(&request, &alice)
        .await?
        .follow(|u| statuses.push(u.status.name()))
        .await?;
    assert_eq!(statuses, ["Ready", "Broadcast", "InBlock", "Finalized"]);
    let (id, _) = outcome.contract_added().expect("ContractAdded event");

    let view = orchestrator
        .get(&ContractRequest::new(id.to_string()))
        .await?;
    assert_eq!(view.node_id.as_str(), "rpc-node");
    assert_eq!(view.volume.size, 5);
    assert_eq!(view.requester, lease_test_utils::fixtures::account_of(&alice)?);

    // Rejections travel as terminal statuses, not RPC errors.
    let bob = dev(DevAccount::Bob);
    let cancel = orchestrator
        .cancel(&ContractRequest::new(id.to_string()), &bob)
        .await?
        .into_outcome()
        .await;
    let err = assert_lease_err!(cancel, LedgerRejection);
    assert!(err.to_string().contains("NotContractParty"), "{}", err);
    Ok(())
}

#[tokio::test]
async fn test_rpc_errors_map_to_lease_errors() -> Result<()> {
    let ledger = Arc::new(InMemoryLedger::default());
    let node = MockNode::spawn(ledger.clone()).await?;
    let handle = ChainHandle::connect(test_config(&node.url())).await?;
    let transport = handle.transport();

    // Garbage is refused at import.
    assert_lease_err!(transport.submit_extrinsic(&[0xde, 0xad]).await, Submission);
    // Polling an unknown extrinsic is a query failure.
    assert_lease_err!(
        transport.extrinsic_updates(&H256([9; 32]), 0).await,
        Connection
    );
    assert_eq!(transport.storage(b"missing").await?, None);
    assert!(node.ledger().submitted().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_cursor_skips_seen_updates() -> Result<()> {
    let ledger = Arc::new(InMemoryLedger::default());
    fund(&ledger)?;
    let node = MockNode::spawn(ledger.clone()).await?;
    let handle = ChainHandle::connect(test_config(&node.url())).await?;
    let stream = LeaseOrchestrator::new(handle.clone())
        .accept(&ContractRequest::new("0"), &dev(DevAccount::Charlie))
        .await?;
    let hash = stream.tx_hash();
    drop(stream);

    let all = handle.transport().extrinsic_updates(&hash, 0).await?;
    let tail = handle.transport().extrinsic_updates(&hash, 2).await?;
    assert_eq!(all.len(), 4);
    assert_eq!(tail, all[2..].to_vec());
    assert!(matches!(tail[1].status, TransactionStatus::Finalized(_)));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_node_is_a_connection_error() {
    let config = test_config("127.0.0.1:9");
    assert_lease_err!(ChainHandle::connect(config).await, Connection);
}
