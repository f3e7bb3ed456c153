use crate::{serde_helper::num, Address, B256, U256, U64};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The subset of a block's header the engine consumes: identity, height and
/// fee parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Block {
    /// Block hash, absent for pending blocks.
    pub hash: Option<B256>,
    /// Hash of the parent block.
    pub parent_hash: B256,
    /// Block height, absent for pending blocks.
    pub number: Option<U64>,
    /// Unix timestamp of the block.
    pub timestamp: U64,
    /// Beneficiary of the block rewards.
    pub miner: Option<Address>,
    /// Gas limit of the block.
    pub gas_limit: U256,
    /// Total gas used by the block's transactions.
    pub gas_used: U256,
    /// The block's base fee per gas. Absent on chains without the EIP-1559
    /// fee market.
    #[serde(with = "num::u128_opt", skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<u128>,
}

/// A block height or one of the named block tags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockNumberOrTag {
    /// The most recent mined block.
    #[default]
    Latest,
    /// The lowest numbered block available.
    Earliest,
    /// The pending block, not yet part of the chain.
    Pending,
    /// The most recent block considered safe from reorganization.
    Safe,
    /// The most recent finalized block.
    Finalized,
    /// A specific block height.
    Number(u64),
}

impl From<u64> for BlockNumberOrTag {
    fn from(number: u64) -> Self {
        BlockNumberOrTag::Number(number)
    }
}

impl fmt::Display for BlockNumberOrTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockNumberOrTag::Latest => f.write_str("latest"),
            BlockNumberOrTag::Earliest => f.write_str("earliest"),
            BlockNumberOrTag::Pending => f.write_str("pending"),
            BlockNumberOrTag::Safe => f.write_str("safe"),
            BlockNumberOrTag::Finalized => f.write_str("finalized"),
            BlockNumberOrTag::Number(number) => write!(f, "{number:#x}"),
        }
    }
}

impl Serialize for BlockNumberOrTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BlockNumberOrTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "latest" => Ok(BlockNumberOrTag::Latest),
            "earliest" => Ok(BlockNumberOrTag::Earliest),
            "pending" => Ok(BlockNumberOrTag::Pending),
            "safe" => Ok(BlockNumberOrTag::Safe),
            "finalized" => Ok(BlockNumberOrTag::Finalized),
            hex if hex.starts_with("0x") => u64::from_str_radix(&hex[2..], 16)
                .map(BlockNumberOrTag::Number)
                .map_err(de::Error::custom),
            dec => dec.parse::<u64>().map(BlockNumberOrTag::Number).map_err(de::Error::custom),
        }
    }
}
