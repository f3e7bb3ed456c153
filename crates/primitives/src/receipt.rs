use crate::{Address, Bloom, Bytes, B256, U256, U64};
use serde::{Deserialize, Serialize};

/// A node's record of a mined transaction's execution outcome.
///
/// Absent until the transaction is included in a block; immutable once
/// observed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Hash of the transaction this receipt is for.
    pub transaction_hash: B256,
    /// Index of the transaction within its block.
    pub transaction_index: U64,
    /// Hash of the block the transaction was included in. Absent on
    /// receipts for pending transactions.
    pub block_hash: Option<B256>,
    /// Number of the block the transaction was included in.
    pub block_number: Option<U64>,
    /// Sender address.
    pub from: Address,
    /// Recipient, null for contract-creation transactions.
    pub to: Option<Address>,
    /// Total gas used in the block up to and including this transaction.
    pub cumulative_gas_used: U256,
    /// Gas used by this transaction alone.
    pub gas_used: Option<U256>,
    /// Address of the created contract, or null for plain calls.
    pub contract_address: Option<Address>,
    /// Logs emitted by this transaction.
    pub logs: Vec<Log>,
    /// Bloom filter over the logs.
    pub logs_bloom: Bloom,
    /// Execution status: 1 for success, 0 for failure. Absent before
    /// EIP-658.
    #[serde(default, rename = "status", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<U64>,
    /// The actual per-gas price paid, base fee included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_gas_price: Option<U256>,
    /// The transaction's envelope type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<U64>,
}

impl TransactionReceipt {
    /// The execution status as a boolean, when the node reports one.
    pub fn status(&self) -> Option<bool> {
        self.status_code.map(|code| code == U64::from(1u64))
    }
}

/// A log emitted during transaction execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Address the log originated from.
    pub address: Address,
    /// Indexed topics.
    pub topics: Vec<B256>,
    /// Unindexed payload.
    pub data: Bytes,
    /// Hash of the block the log is part of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<B256>,
    /// Number of the block the log is part of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<U64>,
    /// Hash of the transaction that produced the log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<B256>,
    /// Index of the transaction within its block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_index: Option<U64>,
    /// Index of the log within its block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_index: Option<U64>,
    /// True if the log was removed by a chain reorganization.
    #[serde(default)]
    pub removed: bool,
}
