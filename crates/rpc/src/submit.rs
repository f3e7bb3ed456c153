//! The transaction submission state machine.
//!
//! One submission runs as a single spawned task that drives
//! send → hash → receipt → confirmations, reporting progress on the event
//! bus of the returned [`PromiEvent`] and resolving it exactly once. The
//! per-operation timers live inside the task, so every terminal transition
//! tears them down with it.
//!
//! Scheduling is cooperative: attach listeners before the first `.await` on
//! the returned value so no early event slips past them.

use crate::{
    client::{EthRequests, RequestManager},
    config::{SendOptions, TransactionConfig},
    error::TransactionError,
    fill::fill_transaction,
    signer::EthSigner,
};
use ethflow_primitives::{
    BlockHash, BlockNumberOrTag, Bytes, TransactionReceipt, TransactionRequest,
    TransactionSigned, TxHash,
};
use ethflow_tasks::{promi_event, shutdown, Completer, EventBus, PromiEvent};
use serde_json::Value;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, trace};

/// The lifecycle events of one submission, in emission order.
#[derive(Clone, Debug)]
pub enum TransactionEvent {
    /// The normalized payload is about to be handed to the node.
    Sending(Value),
    /// The node accepted the payload.
    Sent(Value),
    /// The transaction hash is known; the transaction may not be mined yet.
    TransactionHash(TxHash),
    /// The transaction was mined and its receipt observed.
    Receipt(TransactionReceipt),
    /// A block was mined on top of the transaction's block.
    Confirmation(Confirmation),
    /// The submission failed. The awaitable rejects with the same error;
    /// delivery on both paths is contractual.
    Error(TransactionError),
}

impl TransactionEvent {
    /// The kind tag for this event.
    pub fn kind(&self) -> TransactionEventKind {
        match self {
            TransactionEvent::Sending(_) => TransactionEventKind::Sending,
            TransactionEvent::Sent(_) => TransactionEventKind::Sent,
            TransactionEvent::TransactionHash(_) => TransactionEventKind::TransactionHash,
            TransactionEvent::Receipt(_) => TransactionEventKind::Receipt,
            TransactionEvent::Confirmation(_) => TransactionEventKind::Confirmation,
            TransactionEvent::Error(_) => TransactionEventKind::Error,
        }
    }
}

/// Names of the submission lifecycle events, used as subscription keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionEventKind {
    /// See [`TransactionEvent::Sending`].
    Sending,
    /// See [`TransactionEvent::Sent`].
    Sent,
    /// See [`TransactionEvent::TransactionHash`].
    TransactionHash,
    /// See [`TransactionEvent::Receipt`].
    Receipt,
    /// See [`TransactionEvent::Confirmation`].
    Confirmation,
    /// See [`TransactionEvent::Error`].
    Error,
}

/// Payload of a confirmation event.
#[derive(Clone, Debug)]
pub struct Confirmation {
    /// Number of blocks mined on top of the transaction's block, counting
    /// from 1.
    pub confirmations: u64,
    /// The receipt being confirmed.
    pub receipt: TransactionReceipt,
    /// Hash of the newest block counted.
    pub latest_block_hash: BlockHash,
}

/// The in-flight handle for one submission: awaits to the receipt, streams
/// lifecycle events until then and confirmation events after.
pub type PendingTransaction =
    PromiEvent<Result<TransactionReceipt, TransactionError>, TransactionEventKind, TransactionEvent>;

type TransactionBus = EventBus<TransactionEventKind, TransactionEvent>;

/// Internal submission states, for tracing only. `Failed` is reachable from
/// every non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SubmissionState {
    Created,
    Priced,
    Sending,
    Sent,
    Mined,
    Confirming,
    Done,
    Failed,
}

/// The transaction-submission API over one node connection.
#[derive(Debug)]
pub struct Eth<T: ?Sized> {
    client: Arc<T>,
    config: TransactionConfig,
}

impl<T: ?Sized> Clone for Eth<T> {
    fn clone(&self) -> Self {
        Eth { client: Arc::clone(&self.client), config: self.config.clone() }
    }
}

impl<T: RequestManager + ?Sized> Eth<T> {
    /// Creates the API over a shared request manager.
    pub fn new(client: Arc<T>, config: TransactionConfig) -> Self {
        Eth { client, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &TransactionConfig {
        &self.config
    }

    /// Submits a transaction intent for node-side signing via
    /// `eth_sendTransaction` and tracks it to its receipt.
    ///
    /// Must be called within a tokio runtime.
    pub fn send_transaction(
        &self,
        request: TransactionRequest,
        options: SendOptions,
    ) -> PendingTransaction {
        self.submit(Payload::Intent { request, options })
    }

    /// Submits pre-signed raw bytes via `eth_sendRawTransaction` and tracks
    /// them to their receipt.
    pub fn send_raw_transaction(&self, raw: Bytes) -> PendingTransaction {
        self.submit(Payload::Raw(raw))
    }

    /// Submits a locally signed transaction.
    pub fn send_signed_transaction(&self, signed: &TransactionSigned) -> PendingTransaction {
        self.send_raw_transaction(signed.envelope_encoded())
    }

    /// Normalizes and signs a transaction intent with the given signer,
    /// without submitting it. The request must name its sender.
    pub async fn sign_transaction<S: EthSigner>(
        &self,
        request: TransactionRequest,
        signer: &S,
    ) -> Result<TransactionSigned, TransactionError> {
        let from = request.from.ok_or(TransactionError::MissingField("from"))?;
        let (normalized, tx_type) =
            fill_transaction(request, &*self.client, &self.config, false).await?;
        let transaction = crate::fill::into_typed(&normalized, tx_type)?;
        Ok(signer.sign_transaction(transaction, &from)?)
    }

    fn submit(&self, payload: Payload) -> PendingTransaction {
        let (completer, bus, promi) = promi_event();
        let (signal, stop) = shutdown::signal();
        bus.on_remove_all(signal);

        let driver = Driver {
            client: Arc::clone(&self.client),
            config: self.config.clone(),
            bus,
            stop,
        };
        tokio::spawn(driver.run(payload, completer));
        promi
    }
}

enum Payload {
    /// An intent for the node to sign, normalized before dispatch.
    Intent { request: TransactionRequest, options: SendOptions },
    /// Pre-signed raw bytes.
    Raw(Bytes),
}

struct Driver<T: ?Sized> {
    client: Arc<T>,
    config: TransactionConfig,
    bus: TransactionBus,
    stop: shutdown::Shutdown,
}

impl<T: RequestManager + ?Sized> Driver<T> {
    async fn run(
        self,
        payload: Payload,
        completer: Completer<Result<TransactionReceipt, TransactionError>>,
    ) {
        let mut state = SubmissionState::Created;
        match self.drive_to_receipt(&mut state, payload).await {
            Ok(receipt) => {
                // fulfill first: resolution must not wait on listeners
                completer.complete(Ok(receipt.clone()));
                self.bus
                    .emit(TransactionEventKind::Receipt, TransactionEvent::Receipt(receipt.clone()));
                self.watch_confirmations(&mut state, receipt).await;
            }
            Err(error) => {
                self.transition(&mut state, SubmissionState::Failed);
                completer.complete(Err(error.clone()));
                self.bus.emit(TransactionEventKind::Error, TransactionEvent::Error(error));
            }
        }
    }

    fn transition(&self, state: &mut SubmissionState, next: SubmissionState) {
        debug!(from = ?*state, to = ?next, "submission state change");
        *state = next;
    }

    async fn drive_to_receipt(
        &self,
        state: &mut SubmissionState,
        payload: Payload,
    ) -> Result<TransactionReceipt, TransactionError> {
        let (method, payload) = match payload {
            Payload::Intent { request, options } => {
                let (mut normalized, _) = fill_transaction(
                    request,
                    &*self.client,
                    &self.config,
                    options.ignore_gas_pricing,
                )
                .await?;
                // chain-context fields configure normalization and never
                // travel to the node
                normalized.common = None;
                normalized.hardfork = None;
                self.transition(state, SubmissionState::Priced);
                let payload =
                    serde_json::to_value(&normalized).map_err(crate::error::RpcError::from)?;
                ("eth_sendTransaction", payload)
            }
            Payload::Raw(raw) => {
                self.transition(state, SubmissionState::Priced);
                let payload =
                    serde_json::to_value(&raw).map_err(crate::error::RpcError::from)?;
                ("eth_sendRawTransaction", payload)
            }
        };

        // skip building the event if nothing is listening
        if self.bus.has_listeners(TransactionEventKind::Sending) {
            self.bus
                .emit(TransactionEventKind::Sending, TransactionEvent::Sending(payload.clone()));
        }
        self.transition(state, SubmissionState::Sending);

        let result = self
            .client
            .request(method, vec![payload.clone()])
            .await
            .map_err(TransactionError::Rpc)?;
        let hash: TxHash =
            serde_json::from_value(result).map_err(crate::error::RpcError::from)?;

        self.transition(state, SubmissionState::Sent);
        self.bus.emit(TransactionEventKind::Sent, TransactionEvent::Sent(payload));
        self.bus
            .emit(TransactionEventKind::TransactionHash, TransactionEvent::TransactionHash(hash));

        let receipt = self.wait_for_receipt(hash).await?;
        if receipt.block_hash.is_none() {
            return Err(TransactionError::MissingBlockHash(hash));
        }
        self.transition(state, SubmissionState::Mined);
        Ok(receipt)
    }

    /// Polls `eth_getTransactionReceipt` until it returns non-null or the
    /// time budget runs out. Collaborator errors abort immediately; the
    /// only loop here is the bounded wait, not a retry.
    async fn wait_for_receipt(
        &self,
        hash: TxHash,
    ) -> Result<TransactionReceipt, TransactionError> {
        let interval = self.config.receipt_polling_interval();
        let started = Instant::now();
        loop {
            if let Some(receipt) = self.client.transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            let elapsed = started.elapsed();
            if elapsed >= self.config.transaction_polling_timeout {
                return Err(TransactionError::PollingTimeout {
                    hash,
                    elapsed_secs: elapsed.as_secs(),
                });
            }
            trace!(%hash, "receipt not yet available");
            tokio::time::sleep(interval).await;
        }
    }

    /// The trailing confirmation stream. Runs only while someone listens;
    /// errors here are reported on the bus without disturbing the already
    /// resolved awaitable.
    async fn watch_confirmations(
        &self,
        state: &mut SubmissionState,
        receipt: TransactionReceipt,
    ) {
        let target = self.config.transaction_confirmation_blocks;
        if target == 0 || !self.bus.has_listeners(TransactionEventKind::Confirmation) {
            self.transition(state, SubmissionState::Done);
            return;
        }

        let Some(mined_at) = receipt.block_number else {
            self.bus.emit(
                TransactionEventKind::Error,
                TransactionEvent::Error(TransactionError::ReceiptMissingBlockNumber(
                    receipt.transaction_hash,
                )),
            );
            self.transition(state, SubmissionState::Done);
            return;
        };
        let mined_at = mined_at.to::<u64>();

        self.transition(state, SubmissionState::Confirming);
        let interval = self.config.receipt_polling_interval();
        let mut confirmations = 0u64;

        while confirmations < target {
            if !self.bus.has_listeners(TransactionEventKind::Confirmation) {
                debug!("confirmation listeners gone, stopping watch");
                break;
            }

            let next = BlockNumberOrTag::Number(mined_at + confirmations + 1);
            match self.client.block_by_number(next, false).await {
                Ok(Some(block)) => {
                    if let Some(latest_block_hash) = block.hash {
                        confirmations += 1;
                        self.bus.emit(
                            TransactionEventKind::Confirmation,
                            TransactionEvent::Confirmation(Confirmation {
                                confirmations,
                                receipt: receipt.clone(),
                                latest_block_hash,
                            }),
                        );
                        continue;
                    }
                }
                Ok(None) => {}
                Err(error) => {
                    self.bus.emit(
                        TransactionEventKind::Error,
                        TransactionEvent::Error(TransactionError::Rpc(error)),
                    );
                    break;
                }
            }

            tokio::select! {
                _ = self.stop.clone() => {
                    debug!("submission shut down, stopping confirmation watch");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }

        self.transition(state, SubmissionState::Done);
    }
}
