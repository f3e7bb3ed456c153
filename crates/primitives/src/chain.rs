use crate::serde_helper::num;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Chain context a caller can attach to a transaction request instead of a
/// bare chain id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Common {
    /// Parameters of the chain the transaction targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_chain: Option<CustomChain>,
    /// A named public network the custom chain derives from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_chain: Option<BaseChain>,
    /// The hardfork rules in effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardfork: Option<Hardfork>,
}

/// Identity of a custom chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomChain {
    /// Human-readable network name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The devp2p network id.
    #[serde(default, with = "num::u64_opt", skip_serializing_if = "Option::is_none")]
    pub network_id: Option<u64>,
    /// The EIP-155 chain id.
    #[serde(default, with = "num::u64_opt", skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

/// The named public networks a custom chain can be based on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum BaseChain {
    Mainnet,
    Goerli,
    Kovan,
    Rinkeby,
    Ropsten,
    Sepolia,
}

/// The named protocol upgrades.
#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Hardfork {
    #[serde(alias = "chainstart")]
    Frontier,
    Homestead,
    Dao,
    #[serde(alias = "tangerineWhistle")]
    Tangerine,
    #[serde(alias = "spuriousDragon")]
    SpuriousDragon,
    Byzantium,
    Constantinople,
    Petersburg,
    Istanbul,
    #[serde(alias = "muirGlacier")]
    Muirglacier,
    Berlin,
    London,
    #[serde(alias = "arrowGlacier")]
    ArrowGlacier,
    #[serde(alias = "grayGlacier")]
    GrayGlacier,
    Paris,
    Shanghai,
}

impl FromStr for Hardfork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        let hardfork = match s.as_str() {
            "frontier" | "chainstart" => Hardfork::Frontier,
            "homestead" => Hardfork::Homestead,
            "dao" => Hardfork::Dao,
            "tangerine" | "tangerinewhistle" => Hardfork::Tangerine,
            "spuriousdragon" => Hardfork::SpuriousDragon,
            "byzantium" => Hardfork::Byzantium,
            "constantinople" => Hardfork::Constantinople,
            "petersburg" => Hardfork::Petersburg,
            "istanbul" => Hardfork::Istanbul,
            "muirglacier" => Hardfork::Muirglacier,
            "berlin" => Hardfork::Berlin,
            "london" => Hardfork::London,
            "arrowglacier" => Hardfork::ArrowGlacier,
            "grayglacier" => Hardfork::GrayGlacier,
            "paris" | "merge" => Hardfork::Paris,
            "shanghai" => Hardfork::Shanghai,
            _ => return Err(format!("Unknown hardfork {s}")),
        };
        Ok(hardfork)
    }
}
