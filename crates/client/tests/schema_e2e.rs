// Path: crates/client/tests/schema_e2e.rs

use anyhow::Result;
use lease_client::{ChainHandle, ContractRequest, CreateRequest};
use lease_test_utils::fixtures::{mnemonic, test_config, TestNet, REQUESTER_MNEMONIC};
use lease_test_utils::{assert_lease_err, InMemoryLedger, SealMode};
use lease_types::keys;
use lease_types::schema::{type_names, RemoteSchema, SchemaVariant, TypeRegistry};
use std::sync::Arc;

async fn create_one(net: &TestNet) -> Result<()> {
    let request = CreateRequest {
        node_id: Some("node-1".into()),
        disk_type: Some("2".into()),
        size: Some("100".into()),
    };
    net.orchestrator
        .create(&request, &mnemonic(REQUESTER_MNEMONIC))
        .await?
        .into_outcome()
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_unregistered_volume_type_fails_to_decode() -> Result<()> {
    let registry = TypeRegistry::canonical().without(type_names::VOLUME_TYPE);
    let net = TestNet::start_with(
        SealMode::Instant,
        registry,
        test_config("memory://ledger"),
    )
    .await?;
    create_one(&net).await?;

    let err = assert_lease_err!(
        net.orchestrator.get(&ContractRequest::new("0")).await,
        Decode
    );
    assert!(err.to_string().contains(type_names::VOLUME_TYPE), "{}", err);
    Ok(())
}

#[tokio::test]
async fn test_unregistered_price_type_fails_before_reading() -> Result<()> {
    let registry = TypeRegistry::canonical().without(type_names::RESOURCE_PRICE);
    let net = TestNet::start_with(
        SealMode::Instant,
        registry,
        test_config("memory://ledger"),
    )
    .await?;
    assert_lease_err!(
        net.orchestrator.get(&ContractRequest::new("0")).await,
        Decode
    );
    Ok(())
}

#[tokio::test]
async fn test_corrupt_record_is_a_decode_error() -> Result<()> {
    let net = TestNet::start(SealMode::Instant).await?;
    create_one(&net).await?;
    net.ledger
        .put_raw(keys::contract_key(lease_types::app::ContractId(0)), vec![1, 2, 3]);
    assert_lease_err!(
        net.orchestrator.get(&ContractRequest::new("0")).await,
        Decode
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_volume_record_is_a_decode_error() -> Result<()> {
    let net = TestNet::start(SealMode::Instant).await?;
    create_one(&net).await?;
    net.ledger
        .remove_raw(&keys::volume_key(lease_types::app::ContractId(0)));
    assert_lease_err!(
        net.orchestrator.get(&ContractRequest::new("0")).await,
        Decode
    );
    Ok(())
}

#[tokio::test]
async fn test_handshake_rejects_a_different_schema() -> Result<()> {
    let ledger = Arc::new(InMemoryLedger::default());
    ledger.set_schema(RemoteSchema::for_variant(SchemaVariant::FlatPriceV2));
    let result = ChainHandle::with_transport(
        ledger.clone(),
        TypeRegistry::canonical(),
        test_config("memory://ledger"),
    )
    .await;
    assert_lease_err!(result, Connection);

    // A node that lacks one of the registered types is rejected too.
    let mut schema = RemoteSchema::for_variant(SchemaVariant::CANONICAL);
    schema.types.retain(|t| t != type_names::CONTRACT_IDS);
    ledger.set_schema(schema);
    let err = assert_lease_err!(
        ChainHandle::with_transport(
            ledger.clone(),
            TypeRegistry::canonical(),
            test_config("memory://ledger"),
        )
        .await,
        Connection
    );
    assert!(err.to_string().contains(type_names::CONTRACT_IDS), "{}", err);
    Ok(())
}

#[tokio::test]
async fn test_historical_registry_is_refused() -> Result<()> {
    let ledger = Arc::new(InMemoryLedger::default());
    ledger.set_schema(RemoteSchema::for_variant(SchemaVariant::ReservationV1));
    assert_lease_err!(
        ChainHandle::with_transport(
            ledger,
            TypeRegistry::for_variant(SchemaVariant::ReservationV1),
            test_config("memory://ledger"),
        )
        .await,
        Connection
    );
    Ok(())
}
