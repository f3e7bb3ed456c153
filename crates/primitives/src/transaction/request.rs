use crate::{serde_helper::num, AccessList, Address, Bytes, Common, Hardfork, U256};
use serde::{Deserialize, Serialize};

/// A caller-supplied transaction intent, as accepted from RPC input.
///
/// All fields are optional; the normalizer classifies the request into one
/// of the transaction formats and fills protocol-correct defaults. Quantity
/// fields accept 0x-hex strings, decimal strings and JSON numbers on input,
/// and always serialize as canonical 0x-hex.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Sender account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Recipient, absent for contract creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Value in wei transferred to the recipient.
    #[serde(with = "num::u256_opt", skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// Gas limit. `gasLimit` is accepted as an input alias.
    #[serde(alias = "gasLimit", with = "num::u64_opt", skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    /// Gas price in wei, legacy and EIP-2930 transactions only.
    #[serde(with = "num::u128_opt", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u128>,
    /// Maximum total fee in wei per unit of gas, EIP-1559 only.
    #[serde(with = "num::u128_opt", skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<u128>,
    /// Maximum tip in wei per unit of gas, EIP-1559 only.
    #[serde(with = "num::u128_opt", skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<u128>,
    /// Call data. Mutually exclusive with `input`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// Call data. Mutually exclusive with `data`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Bytes>,
    /// Sender account nonce.
    #[serde(with = "num::u64_opt", skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// EIP-155 chain id.
    #[serde(with = "num::u64_opt", skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Pre-declared storage accesses, EIP-2930 and EIP-1559 only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_list: Option<AccessList>,
    /// Explicit envelope type.
    #[serde(rename = "type", with = "num::u8_opt", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<u8>,
    /// Hardfork rules the request assumes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardfork: Option<Hardfork>,
    /// Chain context overriding the connected network's parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common: Option<Common>,
}

impl TransactionRequest {
    /// The call data, whichever of the two aliases carries it.
    pub fn input_data(&self) -> Option<&Bytes> {
        self.input.as_ref().or(self.data.as_ref())
    }

    /// True if either fee-market field is set.
    pub fn has_fee_market_fields(&self) -> bool {
        self.max_fee_per_gas.is_some() || self.max_priority_fee_per_gas.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn deserialize_mixed_representations() {
        let json = r#"{
            "from": "0x00000000000000000000000000000000000000fe",
            "to": "0x00000000000000000000000000000000000000ff",
            "value": "1000000000000000000",
            "gas": 21000,
            "maxFeePerGas": "0x77359400",
            "nonce": "0x1"
        }"#;
        let request: TransactionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.value, Some(U256::from(1_000_000_000_000_000_000u64)));
        assert_eq!(request.gas, Some(21_000));
        assert_eq!(request.max_fee_per_gas, Some(2_000_000_000));
        assert_eq!(request.nonce, Some(1));
        assert_eq!(request.to, Some(address!("00000000000000000000000000000000000000ff")));
    }

    #[test]
    fn gas_limit_alias() {
        let request: TransactionRequest =
            serde_json::from_str(r#"{"gasLimit": "0x5208"}"#).unwrap();
        assert_eq!(request.gas, Some(21_000));
    }

    #[test]
    fn serializes_canonical_quantities() {
        let request = TransactionRequest {
            value: Some(U256::from(15u64)),
            gas: Some(21_000),
            transaction_type: Some(2),
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["value"], "0xf");
        assert_eq!(json["gas"], "0x5208");
        assert_eq!(json["type"], "0x2");
        assert!(json.get("gasPrice").is_none());
    }

    #[test]
    fn input_data_prefers_input() {
        let request = TransactionRequest {
            data: Some(Bytes::from_static(&[0x01])),
            input: Some(Bytes::from_static(&[0x02])),
            ..Default::default()
        };
        assert_eq!(request.input_data(), Some(&Bytes::from_static(&[0x02])));
    }
}
