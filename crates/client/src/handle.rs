// Path: crates/client/src/handle.rs

//! The connection to a ledger node and the types the client decodes its records with.

use crate::rpc::JsonRpcTransport;
use crate::transport::LedgerTransport;
use lease_types::config::ClientConfig;
use lease_types::error::LeaseError;
use lease_types::schema::{SchemaVariant, TypeRegistry};
use parity_scale_codec::Decode;
use std::fmt;
use std::sync::Arc;

/// A verified connection to a ledger node.
///
/// Cloning is cheap; all clones share the transport. The handle is immutable after
/// [`ChainHandle::connect`] returns.
#[derive(Clone)]
pub struct ChainHandle {
    transport: Arc<dyn LedgerTransport>,
    registry: Arc<TypeRegistry>,
    config: Arc<ClientConfig>,
}

impl fmt::Debug for ChainHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainHandle")
            .field("endpoint", &self.config.endpoint)
            .field("schema", &self.registry.variant())
            .finish_non_exhaustive()
    }
}

impl ChainHandle {
    /// Connects to the node at `config.endpoint` over JSON-RPC and verifies its schema.
    pub async fn connect(config: ClientConfig) -> Result<Self, LeaseError> {
        let transport = JsonRpcTransport::new(&config.endpoint, config.request_timeout())?;
        let registry = TypeRegistry::for_variant(config.schema);
        Self::with_transport(Arc::new(transport), registry, config).await
    }

    /// Performs the schema handshake over an existing transport.
    ///
    /// Fails with [`LeaseError::Connection`] if the node is unreachable, advertises a
    /// different schema variant, or lacks one of the registered types.
    pub async fn with_transport(
        transport: Arc<dyn LedgerTransport>,
        registry: TypeRegistry,
        config: ClientConfig,
    ) -> Result<Self, LeaseError> {
        if registry.variant() != SchemaVariant::CANONICAL {
            return Err(LeaseError::Connection(format!(
                "schema {} is historical, this client decodes {}",
                registry.variant(),
                SchemaVariant::CANONICAL
            )));
        }
        let remote = transport.schema().await?;
        registry.verify_remote(&remote)?;
        log::info!(
            "connected to ledger at {} (schema {}, {} types)",
            config.endpoint,
            remote.variant,
            remote.types.len()
        );
        Ok(Self {
            transport,
            registry: Arc::new(registry),
            config: Arc::new(config),
        })
    }

    pub fn transport(&self) -> &Arc<dyn LedgerTransport> {
        &self.transport
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Reads `key` and decodes it as the registered type `type_name`.
    pub async fn fetch<T: Decode>(
        &self,
        type_name: &str,
        key: &[u8],
    ) -> Result<Option<T>, LeaseError> {
        // Unregistered types fail whether or not a value is stored.
        self.registry.ensure(type_name)?;
        match self.transport.storage(key).await? {
            Some(bytes) => self.registry.decode(type_name, &bytes).map(Some),
            None => Ok(None),
        }
    }
}
