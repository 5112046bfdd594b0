// Path: crates/test_utils/src/server.rs

//! Serves an [`InMemoryLedger`] over JSON-RPC, the way a ledger node does.

use crate::ledger::InMemoryLedger;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use lease_client::rpc::{codes, methods, RpcRequest, RpcResponse};
use lease_client::LedgerTransport;
use lease_types::app::{AccountId, TxHash};
use lease_types::error::LeaseError;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A JSON-RPC node on a loopback port. Stops serving when dropped.
pub struct MockNode {
    addr: SocketAddr,
    ledger: Arc<InMemoryLedger>,
    task: JoinHandle<()>,
}

impl MockNode {
    /// Binds an ephemeral port and starts serving `ledger`.
    pub async fn spawn(ledger: Arc<InMemoryLedger>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = Router::new()
            .route("/", post(handle_rpc))
            .with_state(ledger.clone());
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log::error!("mock node stopped: {}", e);
            }
        });
        log::debug!("mock node listening on {}", addr);
        Ok(Self { addr, ledger, task })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }
}

impl Drop for MockNode {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle_rpc(
    State(ledger): State<Arc<InMemoryLedger>>,
    Json(request): Json<RpcRequest>,
) -> Json<RpcResponse> {
    let id = request.id;
    let response = match dispatch(&ledger, &request).await {
        Ok(result) => RpcResponse::success(id, result),
        Err(RpcError(code, message)) => RpcResponse::failure(id, code, message),
    };
    Json(response)
}

struct RpcError(i64, String);

impl From<LeaseError> for RpcError {
    fn from(e: LeaseError) -> Self {
        let code = match e {
            LeaseError::Submission(_) => codes::POOL_REJECTED,
            LeaseError::Validation(_) => codes::INVALID_PARAMS,
            _ => codes::INTERNAL,
        };
        RpcError(code, e.to_string())
    }
}

fn param<'a>(request: &'a RpcRequest, index: usize) -> Result<&'a Value, RpcError> {
    request.params.get(index).ok_or_else(|| {
        RpcError(
            codes::INVALID_PARAMS,
            format!("{}: missing parameter {}", request.method, index),
        )
    })
}

fn str_param<'a>(request: &'a RpcRequest, index: usize) -> Result<&'a str, RpcError> {
    param(request, index)?.as_str().ok_or_else(|| {
        RpcError(
            codes::INVALID_PARAMS,
            format!("{}: parameter {} must be a string", request.method, index),
        )
    })
}

fn hex_param(request: &RpcRequest, index: usize) -> Result<Vec<u8>, RpcError> {
    let raw = str_param(request, index)?;
    hex::decode(raw.strip_prefix("0x").unwrap_or(raw))
        .map_err(|e| RpcError(codes::INVALID_PARAMS, e.to_string()))
}

fn parsed<T>(request: &RpcRequest, index: usize) -> Result<T, RpcError>
where
    T: std::str::FromStr<Err = LeaseError>,
{
    str_param(request, index)?
        .parse()
        .map_err(|e: LeaseError| RpcError(codes::INVALID_PARAMS, e.to_string()))
}

async fn dispatch(ledger: &InMemoryLedger, request: &RpcRequest) -> Result<Value, RpcError> {
    match request.method.as_str() {
        methods::SCHEMA => Ok(json!(ledger.schema().await?)),
        methods::GET_STORAGE => {
            let key = hex_param(request, 0)?;
            let value = ledger.storage(&key).await?;
            Ok(json!(value.map(|v| format!("0x{}", hex::encode(v)))))
        }
        methods::ACCOUNT_NEXT_INDEX => {
            let account: AccountId = parsed(request, 0)?;
            Ok(json!(ledger.account_next_index(&account).await?))
        }
        methods::SUBMIT_EXTRINSIC => {
            let bytes = hex_param(request, 0)?;
            Ok(json!(ledger.submit_extrinsic(&bytes).await?))
        }
        methods::EXTRINSIC_UPDATES => {
            let hash: TxHash = parsed(request, 0)?;
            let cursor = param(request, 1)?.as_u64().ok_or_else(|| {
                RpcError(codes::INVALID_PARAMS, "cursor must be an integer".into())
            })?;
            let updates = ledger
                .extrinsic_updates(&hash, usize::try_from(cursor).unwrap_or(usize::MAX))
                .await?;
            Ok(json!(updates))
        }
        other => Err(RpcError(
            codes::METHOD_NOT_FOUND,
            format!("method {} not found", other),
        )),
    }
}
