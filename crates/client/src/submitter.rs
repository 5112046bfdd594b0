// Path: crates/client/src/submitter.rs

//! Signing, submitting and watching contract calls.

use crate::handle::ChainHandle;
use crate::transport::LedgerTransport;
use futures::{Stream, StreamExt};
use lease_crypto::SigningIdentity;
use lease_telemetry::Timer;
use lease_tx::{
    terminal_outcome, ContractCall, FinalizedTx, NonceLedger, Observation, StatusTracker,
    UncheckedExtrinsic,
};
use lease_types::app::{AccountId, StatusUpdate, TransactionStatus, TxHash};
use lease_types::error::LeaseError;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tokio_stream::wrappers::ReceiverStream;

/// Consecutive failed status polls after which a watch gives up.
pub const RPC_RETRY_MAX: usize = 5;

const STREAM_BUFFER: usize = 16;

/// How a status stream polls the ledger.
#[derive(Clone, Copy, Debug)]
pub struct WatchPolicy {
    pub poll_interval: Duration,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Signs and submits contract calls, serializing nonce allocation per signer.
#[derive(Clone, Debug)]
pub struct TransactionSubmitter {
    handle: ChainHandle,
    nonces: Arc<NonceLedger>,
    policy: WatchPolicy,
}

impl TransactionSubmitter {
    pub fn new(handle: ChainHandle) -> Self {
        let policy = WatchPolicy {
            poll_interval: handle.config().poll_interval(),
            timeout: handle.config().status_timeout(),
        };
        Self {
            handle,
            nonces: Arc::new(NonceLedger::new()),
            policy,
        }
    }

    /// Overrides the watch policy taken from the handle's configuration.
    pub fn with_policy(mut self, policy: WatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Signs `call` with `signer`, submits it, and returns the stream of its status
    /// updates.
    ///
    /// An `Err` here means the extrinsic was never accepted by the node and consumed
    /// no nonce; the request can be retried as is. Everything after acceptance is
    /// reported through the stream.
    pub async fn submit(
        &self,
        call: ContractCall,
        signer: &SigningIdentity,
    ) -> Result<StatusStream, LeaseError> {
        let transport = self.handle.transport();
        let account = signer.account_id();

        let mut reservation = self.nonces.reserve(account).await;
        let chain_next = match transport.account_next_index(&account).await {
            Ok(n) => n,
            Err(e) => {
                reservation.abandon();
                return Err(LeaseError::Submission(format!(
                    "could not read nonce for {}: {}",
                    account, e
                )));
            }
        };
        let nonce = reservation.assign(chain_next);
        let extrinsic = UncheckedExtrinsic::signed(call, nonce, signer);
        let bytes = match extrinsic.to_bytes() {
            Ok(b) => b,
            Err(e) => {
                reservation.abandon();
                return Err(e);
            }
        };

        let tx_hash = match transport.submit_extrinsic(&bytes).await {
            Ok(hash) => {
                reservation.commit();
                hash
            }
            Err(e) => {
                reservation.abandon();
                return Err(match e {
                    LeaseError::Submission(_) => e,
                    other => LeaseError::Submission(other.to_string()),
                });
            }
        };
        if tx_hash != extrinsic.hash() {
            log::warn!(
                "node reported hash {} for extrinsic {}",
                tx_hash,
                extrinsic.hash()
            );
        }
        log::info!(
            "submitted {} from {} with nonce {} -> {}",
            extrinsic.call,
            account,
            nonce,
            tx_hash
        );

        Ok(StatusStream::spawn(
            transport.clone(),
            tx_hash,
            account,
            nonce,
            self.nonces.clone(),
            self.policy,
        ))
    }
}

/// The status updates of one submitted extrinsic, in ledger order.
///
/// Every status the ledger reports arrives as `Ok`, including terminal failures
/// (`Invalid`, `Dropped`, `Usurped`); the stream ends after the first terminal
/// status. An `Err` item means the watch itself failed and the on-chain outcome is
/// unknown: [`LeaseError::Connection`] after repeated poll failures, or
/// [`LeaseError::Timeout`] when the configured deadline passes. Dropping the stream
/// stops polling.
#[derive(Debug)]
pub struct StatusStream {
    tx_hash: TxHash,
    updates: ReceiverStream<Result<StatusUpdate, LeaseError>>,
    watcher: JoinHandle<()>,
}

impl StatusStream {
    fn spawn(
        transport: Arc<dyn LedgerTransport>,
        tx_hash: TxHash,
        account: AccountId,
        nonce: u64,
        nonces: Arc<NonceLedger>,
        policy: WatchPolicy,
    ) -> Self {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let watcher = tokio::spawn(watch(transport, tx_hash, account, nonce, nonces, policy, tx));
        Self {
            tx_hash,
            updates: ReceiverStream::new(rx),
            watcher,
        }
    }

    /// Hash of the watched extrinsic.
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Drives the stream to its end, passing each update to `on_update`, and returns
    /// the transaction's outcome.
    pub async fn follow<F>(mut self, mut on_update: F) -> Result<FinalizedTx, LeaseError>
    where
        F: FnMut(&StatusUpdate),
    {
        while let Some(item) = self.next().await {
            let update = item?;
            on_update(&update);
            if let Some(outcome) = terminal_outcome(&update) {
                return outcome;
            }
        }
        Err(LeaseError::Connection(format!(
            "status stream for {} ended before a terminal status",
            self.tx_hash
        )))
    }

    /// Waits for the transaction's outcome, discarding intermediate updates.
    pub async fn into_outcome(self) -> Result<FinalizedTx, LeaseError> {
        self.follow(|_| {}).await
    }
}

impl Stream for StatusStream {
    type Item = Result<StatusUpdate, LeaseError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.updates).poll_next(cx)
    }
}

impl Drop for StatusStream {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

async fn watch(
    transport: Arc<dyn LedgerTransport>,
    tx_hash: TxHash,
    account: AccountId,
    nonce: u64,
    nonces: Arc<NonceLedger>,
    policy: WatchPolicy,
    out: mpsc::Sender<Result<StatusUpdate, LeaseError>>,
) {
    let _timer = Timer::new("extrinsic.watch");
    let started = Instant::now();
    let deadline = policy.timeout.map(|t| started + t);
    let mut tracker = StatusTracker::new();
    let mut cursor = 0usize;
    let mut failures = 0usize;

    loop {
        match transport.extrinsic_updates(&tx_hash, cursor).await {
            Ok(updates) => {
                failures = 0;
                cursor += updates.len();
                for update in updates {
                    if tracker.observe(&update) != Observation::Emit {
                        continue;
                    }
                    log::info!("{}: status {}", tx_hash, update.status);
                    let terminal = update.status.is_terminal();
                    if matches!(
                        update.status,
                        TransactionStatus::Invalid(_)
                            | TransactionStatus::Dropped
                            | TransactionStatus::Usurped(_)
                    ) {
                        // The nonce was not consumed on chain.
                        nonces.rollback(&account, nonce).await;
                    }
                    if out.send(Ok(update)).await.is_err() || terminal {
                        return;
                    }
                }
            }
            Err(e) => {
                failures += 1;
                log::warn!(
                    "status poll {}/{} for {} failed: {}",
                    failures,
                    RPC_RETRY_MAX,
                    tx_hash,
                    e
                );
                if failures >= RPC_RETRY_MAX {
                    let _ = out
                        .send(Err(LeaseError::Connection(format!(
                            "lost status of {} after {} failed polls, outcome unknown: {}",
                            tx_hash, failures, e
                        ))))
                        .await;
                    return;
                }
            }
        }

        let mut nap = policy.poll_interval;
        if let Some(deadline) = deadline {
            let now = Instant::now();
            if now >= deadline {
                log::warn!("{}: no terminal status after {:?}", tx_hash, now - started);
                let _ = out
                    .send(Err(LeaseError::Timeout {
                        tx_hash: tx_hash.to_string(),
                        waited_secs: (now - started).as_secs(),
                    }))
                    .await;
                return;
            }
            nap = nap.min(deadline - now);
        }
        sleep(nap).await;
    }
}
