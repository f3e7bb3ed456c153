//! The JSON-RPC collaborator the engine drives.

use crate::error::RpcError;
use async_trait::async_trait;
use ethflow_primitives::{
    Block, BlockNumberOrTag, Bytes, TransactionReceipt, TransactionRequest, TxHash, U256,
};
use jsonrpsee::{
    core::{client::ClientT, params::ArrayParams, Error as JsonRpseeError},
    http_client::{HttpClient, HttpClientBuilder},
};
use serde_json::Value;

/// A JSON-RPC request dispatcher.
///
/// The engine owns no sockets; everything it needs from a node goes through
/// this one method. Implementations are shared and assumed reentrant —
/// requests are never serialized or pooled here.
#[async_trait]
pub trait RequestManager: Send + Sync + 'static {
    /// Dispatches a single method call with positional parameters.
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError>;
}

/// The fixed set of typed calls the engine issues, layered over any
/// [`RequestManager`].
#[async_trait]
pub trait EthRequests: RequestManager {
    /// `eth_gasPrice`.
    async fn gas_price(&self) -> Result<U256, RpcError> {
        let result = self.request("eth_gasPrice", Vec::new()).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// `eth_getBlockByNumber`. Returns `None` for unknown heights.
    async fn block_by_number(
        &self,
        number: BlockNumberOrTag,
        full: bool,
    ) -> Result<Option<Block>, RpcError> {
        let params = vec![serde_json::to_value(number)?, Value::Bool(full)];
        let result = self.request("eth_getBlockByNumber", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// `eth_getTransactionReceipt`. Returns `None` while the transaction is
    /// pending.
    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        let params = vec![serde_json::to_value(hash)?];
        let result = self.request("eth_getTransactionReceipt", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// `eth_sendTransaction`: hands the intent to the node for signing and
    /// pooling, returning the transaction hash.
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, RpcError> {
        let params = vec![serde_json::to_value(tx)?];
        let result = self.request("eth_sendTransaction", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// `eth_sendRawTransaction`: submits pre-signed bytes, returning the
    /// transaction hash.
    async fn send_raw_transaction(&self, raw: &Bytes) -> Result<TxHash, RpcError> {
        let params = vec![serde_json::to_value(raw)?];
        let result = self.request("eth_sendRawTransaction", params).await?;
        Ok(serde_json::from_value(result)?)
    }
}

#[async_trait]
impl<T: RequestManager + ?Sized> EthRequests for T {}

/// A [`RequestManager`] over a plain HTTP JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct HttpRequestManager {
    client: HttpClient,
}

impl HttpRequestManager {
    /// Connects to the given endpoint URL.
    pub fn new(url: impl AsRef<str>) -> Result<Self, RpcError> {
        let client = HttpClientBuilder::default()
            .build(url)
            .map_err(|err| RpcError::Transport(err.to_string()))?;
        Ok(HttpRequestManager { client })
    }
}

#[async_trait]
impl RequestManager for HttpRequestManager {
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let mut array = ArrayParams::new();
        for param in params {
            array.insert(param).map_err(RpcError::from)?;
        }
        self.client.request(method, array).await.map_err(|err| match err {
            JsonRpseeError::Call(call) => RpcError::Call(call.to_string()),
            other => RpcError::Transport(other.to_string()),
        })
    }
}
