use ethflow_primitives::BlockNumberOrTag;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for transaction submission and confirmation tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionConfig {
    /// How often in-flight transactions are polled.
    #[serde(with = "humantime_serde")]
    pub transaction_polling_interval: Duration,

    /// Overrides [`Self::transaction_polling_interval`] for receipt and
    /// confirmation polling when set.
    #[serde(with = "humantime_serde")]
    pub transaction_receipt_polling_interval: Option<Duration>,

    /// Total time budget for waiting on a receipt before giving up.
    #[serde(with = "humantime_serde")]
    pub transaction_polling_timeout: Duration,

    /// How many confirmation blocks to report before the trailing stream
    /// stops on its own.
    pub transaction_confirmation_blocks: u64,

    /// The block tag consulted for gas pricing.
    pub default_block: BlockNumberOrTag,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        TransactionConfig {
            transaction_polling_interval: Duration::from_secs(1),
            transaction_receipt_polling_interval: None,
            transaction_polling_timeout: Duration::from_secs(750),
            transaction_confirmation_blocks: 24,
            default_block: BlockNumberOrTag::Latest,
        }
    }
}

impl TransactionConfig {
    /// The effective cadence for receipt and confirmation polling.
    pub fn receipt_polling_interval(&self) -> Duration {
        self.transaction_receipt_polling_interval.unwrap_or(self.transaction_polling_interval)
    }
}

/// Per-call submission options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Skips the gas-pricing lookups during normalization. Structural
    /// defaulting still runs.
    pub ignore_gas_pricing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TransactionConfig::default();
        assert_eq!(config.transaction_polling_interval, Duration::from_secs(1));
        assert_eq!(config.receipt_polling_interval(), Duration::from_secs(1));
        assert_eq!(config.transaction_confirmation_blocks, 24);
        assert_eq!(config.default_block, BlockNumberOrTag::Latest);
    }

    #[test]
    fn receipt_interval_override() {
        let config = TransactionConfig {
            transaction_receipt_polling_interval: Some(Duration::from_millis(250)),
            ..Default::default()
        };
        assert_eq!(config.receipt_polling_interval(), Duration::from_millis(250));
    }

    #[test]
    fn config_serde() {
        let config: TransactionConfig = serde_json::from_str(
            r#"{
                "transactionPollingInterval": "500ms",
                "transactionPollingTimeout": "2m",
                "transactionConfirmationBlocks": 3,
                "defaultBlock": "pending"
            }"#,
        )
        .unwrap();
        assert_eq!(config.transaction_polling_interval, Duration::from_millis(500));
        assert_eq!(config.transaction_polling_timeout, Duration::from_secs(120));
        assert_eq!(config.transaction_confirmation_blocks, 3);
        assert_eq!(config.default_block, BlockNumberOrTag::Pending);
        assert!(config.transaction_receipt_polling_interval.is_none());
    }
}
