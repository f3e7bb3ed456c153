use serde::{Deserialize, Serialize};

/// Identifier of the legacy transaction format.
pub const LEGACY_TX_TYPE_ID: u8 = 0;
/// Identifier of the EIP-2930 (access list) transaction envelope.
pub const EIP2930_TX_TYPE_ID: u8 = 1;
/// Identifier of the EIP-1559 (dynamic fee) transaction envelope.
pub const EIP1559_TX_TYPE_ID: u8 = 2;

/// Transaction format.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum TxType {
    /// Legacy transaction, pre EIP-2718.
    #[default]
    Legacy = 0,
    /// Access-list transaction per EIP-2930.
    Eip2930 = 1,
    /// Dynamic-fee transaction per EIP-1559.
    Eip1559 = 2,
}

impl From<TxType> for u8 {
    fn from(value: TxType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for TxType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            LEGACY_TX_TYPE_ID => Ok(TxType::Legacy),
            EIP2930_TX_TYPE_ID => Ok(TxType::Eip2930),
            EIP1559_TX_TYPE_ID => Ok(TxType::Eip1559),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_type_from_u8() {
        assert_eq!(TxType::try_from(0u8), Ok(TxType::Legacy));
        assert_eq!(TxType::try_from(1u8), Ok(TxType::Eip2930));
        assert_eq!(TxType::try_from(2u8), Ok(TxType::Eip1559));
        assert_eq!(TxType::try_from(3u8), Err(3));
    }

    #[test]
    fn tx_type_display() {
        assert_eq!(TxType::Eip1559.to_string(), "0x2");
    }
}
