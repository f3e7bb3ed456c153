//! Classification and defaulting of transaction requests.
//!
//! A caller-supplied [`TransactionRequest`] is first classified into one of
//! the transaction formats, then filled with protocol-correct defaults.
//! Classification and conflict checks are synchronous; defaulting consults
//! the node for gas pricing.

use crate::{
    client::{EthRequests, RequestManager},
    config::TransactionConfig,
    error::TransactionError,
};
use ethflow_primitives::{
    AccessList, Bytes, Hardfork, Transaction, TransactionRequest, TxEip1559, TxEip2930, TxKind,
    TxLegacy, TxType, U256,
};
use tracing::trace;

/// Default tip when the caller leaves `maxPriorityFeePerGas` unset:
/// 2.5 gwei.
pub const DEFAULT_PRIORITY_FEE: u128 = 2_500_000_000;

/// Classifies a request into a transaction format and rejects conflicting
/// field combinations. First match wins:
///
/// 1. an explicit `type` field;
/// 2. either fee-market field present → EIP-1559;
/// 3. a Berlin hardfork on the request or its `common` → EIP-1559;
/// 4. an access list present → EIP-2930;
/// 5. otherwise legacy.
pub fn detect_transaction_type(
    request: &TransactionRequest,
) -> Result<TxType, TransactionError> {
    if request.data.is_some() && request.input.is_some() {
        return Err(TransactionError::DataAndInput);
    }
    validate_custom_chain(request)?;

    let tx_type = if let Some(explicit) = request.transaction_type {
        TxType::try_from(explicit).map_err(TransactionError::UnknownTransactionType)?
    } else if request.has_fee_market_fields() {
        TxType::Eip1559
    } else if hardfork_is_berlin(request) {
        TxType::Eip1559
    } else if request.access_list.is_some() {
        TxType::Eip2930
    } else {
        TxType::Legacy
    };

    match tx_type {
        TxType::Eip1559 => {
            if request.gas_price.is_some() {
                return Err(TransactionError::Eip1559GasPrice);
            }
        }
        TxType::Legacy | TxType::Eip2930 => {
            if request.has_fee_market_fields() {
                return Err(TransactionError::UnsupportedFeeMarket(tx_type));
            }
        }
    }

    Ok(tx_type)
}

fn hardfork_is_berlin(request: &TransactionRequest) -> bool {
    request.hardfork == Some(Hardfork::Berlin)
        || request
            .common
            .as_ref()
            .map(|common| common.hardfork == Some(Hardfork::Berlin))
            .unwrap_or(false)
}

fn validate_custom_chain(request: &TransactionRequest) -> Result<(), TransactionError> {
    let Some(common) = request.common.as_ref() else { return Ok(()) };
    let custom_chain =
        common.custom_chain.as_ref().ok_or(TransactionError::MissingCustomChain)?;
    let chain_id = custom_chain.chain_id.ok_or(TransactionError::MissingCustomChainId)?;
    if let Some(request_id) = request.chain_id {
        if request_id != chain_id {
            return Err(TransactionError::ChainIdMismatch {
                request: request_id,
                custom_chain: chain_id,
            });
        }
    }
    Ok(())
}

/// Normalizes a request: classifies it, fills structural defaults, and —
/// unless `ignore_gas_pricing` — prices it against the node.
///
/// The returned request carries every field the detected format needs for
/// submission, with quantities in their canonical form.
pub async fn fill_transaction<T: RequestManager + ?Sized>(
    mut request: TransactionRequest,
    client: &T,
    config: &TransactionConfig,
    ignore_gas_pricing: bool,
) -> Result<(TransactionRequest, TxType), TransactionError> {
    let tx_type = detect_transaction_type(&request)?;
    request.transaction_type = Some(tx_type as u8);

    // structural defaults run regardless of pricing
    if request.input.is_none() {
        request.input = request.data.take();
    }
    if request.input.is_none() {
        request.input = Some(Bytes::new());
    }
    if request.value.is_none() {
        request.value = Some(U256::ZERO);
    }
    if request.chain_id.is_none() {
        request.chain_id = request
            .common
            .as_ref()
            .and_then(|common| common.custom_chain.as_ref())
            .and_then(|chain| chain.chain_id);
    }
    if tx_type != TxType::Legacy && request.access_list.is_none() {
        request.access_list = Some(AccessList::default());
    }

    if !ignore_gas_pricing {
        match tx_type {
            TxType::Eip1559 => fill_fee_market(&mut request, client, config).await?,
            TxType::Legacy | TxType::Eip2930 => {
                if request.gas_price.is_none() {
                    let price = client.gas_price().await?;
                    request.gas_price = Some(
                        u128::try_from(price)
                            .map_err(|_| TransactionError::QuantityTooLarge("gasPrice"))?,
                    );
                }
            }
        }
    }

    trace!(?tx_type, "normalized transaction request");
    Ok((request, tx_type))
}

/// Prices a dynamic-fee transaction off the configured block's base fee:
/// the tip defaults to [`DEFAULT_PRIORITY_FEE`] and the fee cap to
/// `2 * baseFee + tip`.
async fn fill_fee_market<T: RequestManager + ?Sized>(
    request: &mut TransactionRequest,
    client: &T,
    config: &TransactionConfig,
) -> Result<(), TransactionError> {
    if request.max_fee_per_gas.is_some() && request.max_priority_fee_per_gas.is_some() {
        return Ok(());
    }

    let block = client
        .block_by_number(config.default_block, false)
        .await?
        .ok_or_else(|| TransactionError::BlockNotFound(config.default_block.to_string()))?;
    let base_fee = block.base_fee_per_gas.ok_or(TransactionError::Eip1559NotSupported)?;

    let priority = request.max_priority_fee_per_gas.get_or_insert(DEFAULT_PRIORITY_FEE);
    if request.max_fee_per_gas.is_none() {
        request.max_fee_per_gas = Some(2 * base_fee + *priority);
    }
    Ok(())
}

/// Builds the typed transaction for the signing path once every required
/// field is present.
pub fn into_typed(
    request: &TransactionRequest,
    tx_type: TxType,
) -> Result<Transaction, TransactionError> {
    let to = request.to.map(TxKind::Call).unwrap_or(TxKind::Create);
    let nonce = request.nonce.ok_or(TransactionError::MissingField("nonce"))?;
    let gas_limit = request.gas.ok_or(TransactionError::MissingField("gas"))?;
    let value = request.value.unwrap_or_default();
    let input = request.input_data().cloned().unwrap_or_default();

    let transaction = match tx_type {
        TxType::Legacy => Transaction::Legacy(TxLegacy {
            chain_id: request.chain_id,
            nonce,
            gas_price: request.gas_price.ok_or(TransactionError::MissingField("gasPrice"))?,
            gas_limit,
            to,
            value,
            input,
        }),
        TxType::Eip2930 => Transaction::Eip2930(TxEip2930 {
            chain_id: request.chain_id.ok_or(TransactionError::MissingField("chainId"))?,
            nonce,
            gas_price: request.gas_price.ok_or(TransactionError::MissingField("gasPrice"))?,
            gas_limit,
            to,
            value,
            input,
            access_list: request.access_list.clone().unwrap_or_default(),
        }),
        TxType::Eip1559 => Transaction::Eip1559(TxEip1559 {
            chain_id: request.chain_id.ok_or(TransactionError::MissingField("chainId"))?,
            nonce,
            max_priority_fee_per_gas: request
                .max_priority_fee_per_gas
                .ok_or(TransactionError::MissingField("maxPriorityFeePerGas"))?,
            max_fee_per_gas: request
                .max_fee_per_gas
                .ok_or(TransactionError::MissingField("maxFeePerGas"))?,
            gas_limit,
            to,
            value,
            input,
            access_list: request.access_list.clone().unwrap_or_default(),
        }),
    };
    Ok(transaction)
}
