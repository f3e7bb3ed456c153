use ethflow_primitives::{TxHash, TxType};

/// Errors talking to the node.
///
/// Neither transport nor RPC-level failures are ever retried here; they
/// surface verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The node answered with an error object.
    #[error("rpc error response: {0}")]
    Call(String),
    /// A request or response failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::Serde(err.to_string())
    }
}

/// Everything that can go wrong preparing, submitting or tracking a
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    /// `gasPrice` was supplied on a dynamic-fee transaction.
    #[error("eip-1559 transactions do not support gasPrice")]
    Eip1559GasPrice,
    /// Fee-market fields were supplied on a transaction format without a
    /// fee market.
    #[error("maxFeePerGas and maxPriorityFeePerGas are not supported for transaction type {0}")]
    UnsupportedFeeMarket(TxType),
    /// The explicit `type` field names no known transaction format.
    #[error("unknown transaction type {0:#x}")]
    UnknownTransactionType(u8),
    /// `common` was supplied without `common.customChain`.
    #[error("common is missing customChain")]
    MissingCustomChain,
    /// `common.customChain` was supplied without a chain id.
    #[error("customChain is missing chainId")]
    MissingCustomChainId,
    /// The request's chain id and `common.customChain.chainId` disagree.
    #[error("chainId mismatch: request has {request}, customChain has {custom_chain}")]
    ChainIdMismatch {
        /// The chain id set directly on the request.
        request: u64,
        /// The chain id carried by `common.customChain`.
        custom_chain: u64,
    },
    /// Both `data` and `input` were supplied.
    #[error("data and input are mutually exclusive")]
    DataAndInput,
    /// The connected chain reports no base fee, so dynamic-fee pricing is
    /// unavailable.
    #[error("the network does not support eip-1559 transactions")]
    Eip1559NotSupported,
    /// No block came back for the configured default block tag.
    #[error("no block found for tag {0}")]
    BlockNotFound(String),
    /// The receipt did not appear within the polling time budget.
    #[error("transaction {hash} was not mined within {elapsed_secs} seconds")]
    PollingTimeout {
        /// The transaction being waited on.
        hash: TxHash,
        /// Seconds spent polling before giving up.
        elapsed_secs: u64,
    },
    /// The node returned a receipt without a block hash.
    #[error("receipt for transaction {0} is missing its block hash")]
    MissingBlockHash(TxHash),
    /// The node returned a receipt without a block number, so confirmations
    /// cannot be counted.
    #[error("receipt for transaction {0} is missing its block number")]
    ReceiptMissingBlockNumber(TxHash),
    /// A field required for this operation was never supplied or defaulted.
    #[error("transaction is missing required field `{0}`")]
    MissingField(&'static str),
    /// A quantity exceeds the width of the field it feeds.
    #[error("quantity too large for field `{0}`")]
    QuantityTooLarge(&'static str),
    /// Signing failed.
    #[error(transparent)]
    Sign(#[from] SignError),
    /// The collaborator failed; surfaced verbatim, never retried.
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Errors produced by a transaction signer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignError {
    /// The signer holds no key for the requested account.
    #[error("no signer available for the requested account")]
    NoAccount,
    /// The key refused to produce a signature.
    #[error("could not sign the given hash")]
    CouldNotSign,
}
