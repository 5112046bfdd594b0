// Path: crates/client/src/rpc.rs

//! JSON-RPC 2.0 over HTTP, the transport ledger nodes expose.

use crate::transport::LedgerTransport;
use async_trait::async_trait;
use lease_types::app::{AccountId, StatusUpdate, TxHash};
use lease_types::error::LeaseError;
use lease_types::schema::RemoteSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Method names served by a ledger node.
pub mod methods {
    /// `lease_schema() -> RemoteSchema`
    pub const SCHEMA: &str = "lease_schema";
    /// `state_getStorage(key_hex) -> value_hex | null`
    pub const GET_STORAGE: &str = "state_getStorage";
    /// `system_accountNextIndex(account) -> u64`
    pub const ACCOUNT_NEXT_INDEX: &str = "system_accountNextIndex";
    /// `author_submitExtrinsic(extrinsic_hex) -> hash`
    pub const SUBMIT_EXTRINSIC: &str = "author_submitExtrinsic";
    /// `author_extrinsicUpdates(hash, cursor) -> [StatusUpdate]`
    pub const EXTRINSIC_UPDATES: &str = "author_extrinsicUpdates";
}

/// JSON-RPC error codes used by ledger nodes.
pub mod codes {
    /// The node refused to import an extrinsic.
    pub const POOL_REJECTED: i64 = 1010;
    /// Unknown method.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Malformed parameters.
    pub const INVALID_PARAMS: i64 = -32602;
    /// Any other server-side failure.
    pub const INTERNAL: i64 = -32000;
}

/// A JSON-RPC request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

/// A JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// A JSON-RPC response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: u64, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(RpcErrorObject {
                code,
                message: message.into(),
            }),
        }
    }
}

enum RpcFailure {
    Transport(String),
    Remote(RpcErrorObject),
    Malformed(String),
}

impl RpcFailure {
    fn into_query_error(self, method: &str) -> LeaseError {
        match self {
            Self::Transport(e) => LeaseError::Connection(format!("{}: {}", method, e)),
            Self::Remote(e) => LeaseError::Connection(format!(
                "{} failed on node ({}): {}",
                method, e.code, e.message
            )),
            Self::Malformed(e) => LeaseError::Decode(format!("{}: {}", method, e)),
        }
    }

    fn into_submit_error(self) -> LeaseError {
        match self {
            Self::Transport(e) | Self::Malformed(e) => LeaseError::Submission(e),
            Self::Remote(e) => LeaseError::Submission(format!("node refused extrinsic ({}): {}", e.code, e.message)),
        }
    }
}

/// A [`LedgerTransport`] speaking JSON-RPC to a node's HTTP endpoint.
#[derive(Debug)]
pub struct JsonRpcTransport {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl JsonRpcTransport {
    /// Creates a transport for `endpoint`. No request is made until first use.
    pub fn new(endpoint: &str, request_timeout: Duration) -> Result<Self, LeaseError> {
        let endpoint = if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            format!("http://{}", endpoint)
        };
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| LeaseError::Connection(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<R, RpcFailure> {
        let request = RpcRequest {
            jsonrpc: "2.0".into(),
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: method.to_string(),
            params,
        };
        log::trace!("rpc -> {} (id {})", method, request.id);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcFailure::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(RpcFailure::Transport(format!(
                "HTTP {} from {}",
                response.status(),
                self.endpoint
            )));
        }
        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| RpcFailure::Malformed(e.to_string()))?;
        if let Some(error) = body.error {
            return Err(RpcFailure::Remote(error));
        }
        serde_json::from_value(body.result.unwrap_or(Value::Null))
            .map_err(|e| RpcFailure::Malformed(e.to_string()))
    }
}

fn hex_param(bytes: &[u8]) -> Value {
    json!(format!("0x{}", hex::encode(bytes)))
}

#[async_trait]
impl LedgerTransport for JsonRpcTransport {
    async fn schema(&self) -> Result<RemoteSchema, LeaseError> {
        self.call(methods::SCHEMA, vec![])
            .await
            .map_err(|e| e.into_query_error(methods::SCHEMA))
    }

    async fn storage(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LeaseError> {
        let value: Option<String> = self
            .call(methods::GET_STORAGE, vec![hex_param(key)])
            .await
            .map_err(|e| e.into_query_error(methods::GET_STORAGE))?;
        value
            .map(|v| hex::decode(v.strip_prefix("0x").unwrap_or(&v)).map_err(LeaseError::from))
            .transpose()
    }

    async fn account_next_index(&self, account: &AccountId) -> Result<u64, LeaseError> {
        self.call(methods::ACCOUNT_NEXT_INDEX, vec![json!(account.to_string())])
            .await
            .map_err(|e| e.into_query_error(methods::ACCOUNT_NEXT_INDEX))
    }

    async fn submit_extrinsic(&self, extrinsic: &[u8]) -> Result<TxHash, LeaseError> {
        self.call(methods::SUBMIT_EXTRINSIC, vec![hex_param(extrinsic)])
            .await
            .map_err(RpcFailure::into_submit_error)
    }

    async fn extrinsic_updates(
        &self,
        hash: &TxHash,
        cursor: usize,
    ) -> Result<Vec<StatusUpdate>, LeaseError> {
        self.call(
            methods::EXTRINSIC_UPDATES,
            vec![json!(hash.to_string()), json!(cursor)],
        )
        .await
        .map_err(|e| e.into_query_error(methods::EXTRINSIC_UPDATES))
    }
}
