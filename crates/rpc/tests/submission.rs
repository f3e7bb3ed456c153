//! End-to-end submission tests against a scripted collaborator.

use async_trait::async_trait;
use ethflow_primitives::{secret_key_to_address, TransactionRequest, TxHash, B256};
use ethflow_rpc::{
    Eth, EthSigner, PrivateKeySigner, RequestManager, RpcError, SendOptions, TransactionConfig,
    TransactionError, TransactionEvent, TransactionEventKind,
};
use futures::StreamExt;
use serde_json::{json, Value};
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

const TX_HASH: &str = "0x4a22e1a60e3d8f634b11dba45c484dd0f1b7ac10f0b8cb1f21a1a4a700b52872";

fn receipt_json(block_number: Option<u64>, block_hash: Option<B256>) -> Value {
    json!({
        "transactionHash": TX_HASH,
        "transactionIndex": "0x1",
        "blockHash": block_hash,
        "blockNumber": block_number.map(|n| format!("{n:#x}")),
        "from": "0x00000000000000000000000000000000000000aa",
        "to": "0x00000000000000000000000000000000000000bb",
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "contractAddress": null,
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "status": "0x1",
        "type": "0x0"
    })
}

fn block_json(number: u64) -> Value {
    json!({
        "hash": B256::with_last_byte(number as u8),
        "parentHash": B256::ZERO,
        "number": format!("{number:#x}"),
        "timestamp": "0x64",
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x5208"
    })
}

/// A collaborator whose responses are scripted per method.
#[derive(Default)]
struct MockRpc {
    gas_price: Option<Value>,
    send_result: Option<Result<Value, RpcError>>,
    /// Successive receipt-poll responses; the last one repeats.
    receipts: Mutex<VecDeque<Value>>,
    /// Blocks by height; unknown heights answer null.
    blocks: HashMap<u64, Value>,
    calls: Mutex<Vec<String>>,
}

impl MockRpc {
    fn call_count(&self, method: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|m| *m == method).count()
    }
}

#[async_trait]
impl RequestManager for MockRpc {
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        self.calls.lock().unwrap().push(method.to_owned());
        match method {
            "eth_gasPrice" => {
                Ok(self.gas_price.clone().unwrap_or_else(|| json!("0x3b9aca00")))
            }
            "eth_sendTransaction" | "eth_sendRawTransaction" => self
                .send_result
                .clone()
                .unwrap_or_else(|| Ok(json!(TX_HASH))),
            "eth_getTransactionReceipt" => {
                let mut receipts = self.receipts.lock().unwrap();
                let response =
                    receipts.front().cloned().unwrap_or(Value::Null);
                if receipts.len() > 1 {
                    receipts.pop_front();
                }
                Ok(response)
            }
            "eth_getBlockByNumber" => {
                let tag = params[0].as_str().expect("block tag is a string");
                let number = u64::from_str_radix(tag.trim_start_matches("0x"), 16)
                    .expect("block number tag");
                Ok(self.blocks.get(&number).cloned().unwrap_or(Value::Null))
            }
            other => Err(RpcError::Call(format!("unexpected method {other}"))),
        }
    }
}

fn fast_config() -> TransactionConfig {
    TransactionConfig {
        transaction_polling_interval: Duration::from_millis(10),
        transaction_polling_timeout: Duration::from_millis(100),
        ..Default::default()
    }
}

#[tokio::test]
async fn events_fire_once_and_in_order() {
    let mock = MockRpc {
        receipts: Mutex::new(VecDeque::from([receipt_json(Some(16), Some(B256::ZERO))])),
        ..Default::default()
    };
    let eth = Eth::new(
        Arc::new(mock),
        TransactionConfig { transaction_confirmation_blocks: 0, ..fast_config() },
    );

    let pending = eth.send_transaction(TransactionRequest::default(), SendOptions::default());
    let mut events = pending.on_any();

    let receipt = pending.await.unwrap();
    assert_eq!(receipt.transaction_hash, TX_HASH.parse::<TxHash>().unwrap());

    let mut kinds = Vec::new();
    for _ in 0..4 {
        let event = tokio::time::timeout(Duration::from_secs(1), events.next())
            .await
            .expect("event should arrive")
            .expect("stream should stay open");
        if let TransactionEvent::Receipt(emitted) = &event {
            assert_eq!(*emitted, receipt, "awaited value equals the emitted receipt");
        }
        kinds.push(event.kind());
    }
    assert_eq!(
        kinds,
        vec![
            TransactionEventKind::Sending,
            TransactionEventKind::Sent,
            TransactionEventKind::TransactionHash,
            TransactionEventKind::Receipt,
        ]
    );

    // nothing fires twice
    assert!(
        tokio::time::timeout(Duration::from_millis(50), events.next()).await.is_err(),
        "no further events expected"
    );
}

#[tokio::test]
async fn receipt_polls_until_found() {
    let mock = MockRpc {
        receipts: Mutex::new(VecDeque::from([
            Value::Null,
            Value::Null,
            receipt_json(Some(16), Some(B256::ZERO)),
        ])),
        ..Default::default()
    };
    let client = Arc::new(mock);
    let eth = Eth::new(
        Arc::clone(&client),
        TransactionConfig { transaction_confirmation_blocks: 0, ..fast_config() },
    );

    let receipt = eth
        .send_transaction(TransactionRequest::default(), SendOptions::default())
        .await
        .unwrap();
    assert_eq!(receipt.block_number.map(|n| n.to::<u64>()), Some(16));
    assert_eq!(client.call_count("eth_getTransactionReceipt"), 3);
}

#[tokio::test]
async fn polling_timeout_rejects() {
    // the receipt never appears
    let mock = MockRpc::default();
    let eth = Eth::new(Arc::new(mock), fast_config());

    let started = std::time::Instant::now();
    let result = eth
        .send_transaction(TransactionRequest::default(), SendOptions::default())
        .await;
    let elapsed = started.elapsed();

    match result {
        Err(TransactionError::PollingTimeout { hash, .. }) => {
            assert_eq!(hash, TX_HASH.parse::<TxHash>().unwrap());
        }
        other => panic!("expected polling timeout, got {other:?}"),
    }
    assert!(
        elapsed >= Duration::from_millis(100) && elapsed < Duration::from_millis(500),
        "timeout fired after {elapsed:?}"
    );
}

#[tokio::test]
async fn counts_three_confirmations_then_stops() {
    let mined_at = 16u64;
    let mock = MockRpc {
        receipts: Mutex::new(VecDeque::from([receipt_json(
            Some(mined_at),
            Some(B256::ZERO),
        )])),
        blocks: (1..=3).map(|i| (mined_at + i, block_json(mined_at + i))).collect(),
        ..Default::default()
    };
    let eth = Eth::new(
        Arc::new(mock),
        TransactionConfig { transaction_confirmation_blocks: 3, ..fast_config() },
    );

    let pending = eth.send_transaction(TransactionRequest::default(), SendOptions::default());
    let mut confirmations = pending.on(TransactionEventKind::Confirmation);

    let receipt = pending.await.unwrap();

    for expected in 1..=3u64 {
        let event = tokio::time::timeout(Duration::from_secs(1), confirmations.next())
            .await
            .expect("confirmation should arrive")
            .expect("stream should stay open");
        match event {
            TransactionEvent::Confirmation(confirmation) => {
                assert_eq!(confirmation.confirmations, expected);
                assert_eq!(confirmation.receipt, receipt);
                assert_eq!(
                    confirmation.latest_block_hash,
                    B256::with_last_byte((mined_at + expected) as u8)
                );
            }
            other => panic!("expected a confirmation, got {other:?}"),
        }
    }

    // the watcher stops at the configured target
    assert!(
        tokio::time::timeout(Duration::from_millis(100), confirmations.next())
            .await
            .is_err(),
        "no confirmations past the target"
    );
}

#[tokio::test]
async fn removing_listeners_stops_the_trailing_stream() {
    let mined_at = 16u64;
    let mock = MockRpc {
        receipts: Mutex::new(VecDeque::from([receipt_json(
            Some(mined_at),
            Some(B256::ZERO),
        )])),
        // only one confirmation block ever appears
        blocks: HashMap::from([(mined_at + 1, block_json(mined_at + 1))]),
        ..Default::default()
    };
    let eth = Eth::new(
        Arc::new(mock),
        TransactionConfig { transaction_confirmation_blocks: 24, ..fast_config() },
    );

    let pending = eth.send_transaction(TransactionRequest::default(), SendOptions::default());
    let bus = pending.event_bus();
    let mut confirmations = pending.on(TransactionEventKind::Confirmation);

    let _receipt = pending.await.unwrap();
    let first = tokio::time::timeout(Duration::from_secs(1), confirmations.next())
        .await
        .expect("first confirmation")
        .expect("stream open");
    assert!(matches!(first, TransactionEvent::Confirmation(c) if c.confirmations == 1));

    // detaching every listener ends delivery; the stream closes
    bus.remove_all_listeners();
    let next = tokio::time::timeout(Duration::from_secs(1), confirmations.next())
        .await
        .expect("stream should close promptly");
    assert!(next.is_none());
}

#[tokio::test]
async fn collaborator_error_rejects_and_emits() {
    let mock = MockRpc {
        send_result: Some(Err(RpcError::Call("nonce too low".into()))),
        ..Default::default()
    };
    let eth = Eth::new(Arc::new(mock), fast_config());

    let pending = eth.send_transaction(TransactionRequest::default(), SendOptions::default());
    let mut errors = pending.on(TransactionEventKind::Error);

    let result = pending.await;
    assert_eq!(result, Err(TransactionError::Rpc(RpcError::Call("nonce too low".into()))));

    let event = tokio::time::timeout(Duration::from_secs(1), errors.next())
        .await
        .expect("error event")
        .expect("stream open");
    assert!(matches!(event, TransactionEvent::Error(TransactionError::Rpc(_))));
}

#[tokio::test]
async fn receipt_without_block_hash_is_fatal() {
    let mock = MockRpc {
        receipts: Mutex::new(VecDeque::from([receipt_json(Some(16), None)])),
        ..Default::default()
    };
    let eth = Eth::new(Arc::new(mock), fast_config());

    let result = eth
        .send_transaction(TransactionRequest::default(), SendOptions::default())
        .await;
    assert!(matches!(result, Err(TransactionError::MissingBlockHash(_))));
}

#[tokio::test]
async fn conflicting_fields_reject_before_any_network_call() {
    let client = Arc::new(MockRpc::default());
    let eth = Eth::new(Arc::clone(&client), fast_config());

    let request = TransactionRequest {
        gas_price: Some(1_000_000_000),
        max_fee_per_gas: Some(2_000_000_000),
        ..Default::default()
    };
    let result = eth.send_transaction(request, SendOptions::default()).await;
    assert_eq!(result, Err(TransactionError::Eip1559GasPrice));
    assert!(client.calls.lock().unwrap().is_empty(), "validation must not touch the node");
}

#[tokio::test]
async fn locally_signed_transaction_submits_as_raw_bytes() {
    use secp256k1::SecretKey;
    use std::str::FromStr;

    let mock = MockRpc {
        receipts: Mutex::new(VecDeque::from([receipt_json(Some(16), Some(B256::ZERO))])),
        ..Default::default()
    };
    let client = Arc::new(mock);
    let eth = Eth::new(
        Arc::clone(&client),
        TransactionConfig { transaction_confirmation_blocks: 0, ..fast_config() },
    );

    let secret =
        SecretKey::from_str("4646464646464646464646464646464646464646464646464646464646464646")
            .unwrap();
    let from = secret_key_to_address(&secret);
    let signer = PrivateKeySigner::new(vec![secret]);
    assert!(signer.is_signer_for(&from));

    let request = TransactionRequest {
        from: Some(from),
        to: Some("0x3535353535353535353535353535353535353535".parse().unwrap()),
        nonce: Some(0),
        gas: Some(21_000),
        chain_id: Some(1),
        ..Default::default()
    };
    let signed = eth.sign_transaction(request, &signer).await.unwrap();
    assert_eq!(signed.recover_signer(), Some(from));
    // the normalizer priced it off the mock's gas price
    assert_eq!(client.call_count("eth_gasPrice"), 1);

    let receipt = eth.send_signed_transaction(&signed).await.unwrap();
    assert_eq!(receipt.status(), Some(true));
    assert_eq!(client.call_count("eth_sendRawTransaction"), 1);
}

#[tokio::test]
async fn raw_submission_shares_the_lifecycle() {
    let mock = MockRpc {
        receipts: Mutex::new(VecDeque::from([receipt_json(Some(16), Some(B256::ZERO))])),
        ..Default::default()
    };
    let client = Arc::new(mock);
    let eth = Eth::new(
        Arc::clone(&client),
        TransactionConfig { transaction_confirmation_blocks: 0, ..fast_config() },
    );

    let pending = eth.send_raw_transaction(ethflow_primitives::Bytes::from_static(&[0x02, 0x01]));
    let receipt = pending.await.unwrap();
    assert_eq!(receipt.transaction_hash, TX_HASH.parse::<TxHash>().unwrap());
    assert_eq!(client.call_count("eth_sendRawTransaction"), 1);
    // the raw path never consults gas pricing
    assert_eq!(client.call_count("eth_gasPrice"), 0);
}
