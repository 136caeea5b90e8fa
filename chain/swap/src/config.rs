//! Ledger configuration

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Tunables for the in-memory settlement ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Fee charged to the signer of every successful transaction.
    pub lamports_per_signature: u64,
    /// Refundable deposit locked into every account a transaction creates.
    pub account_deposit: u64,
    /// Slot the ledger clock starts at.
    pub starting_slot: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lamports_per_signature: 5_000,
            account_deposit: 2_039_280,
            starting_slot: 0,
        }
    }
}

impl LedgerConfig {
    /// Parse from JSON; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject a zero account deposit, and a starting slot with no successor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.account_deposit == 0 {
            return Err(ConfigError::Invalid(
                "account_deposit must be greater than zero".to_string(),
            ));
        }
        if self.starting_slot == u64::MAX {
            return Err(ConfigError::Invalid(
                "starting_slot must be below u64::MAX".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.lamports_per_signature, 5_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = LedgerConfig::from_json(r#"{"lamports_per_signature": 0}"#).unwrap();
        assert_eq!(config.lamports_per_signature, 0);
        assert_eq!(config.account_deposit, LedgerConfig::default().account_deposit);
    }

    #[test]
    fn test_from_json_rejects_zero_deposit() {
        let result = LedgerConfig::from_json(r#"{"account_deposit": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_json_rejects_last_slot() {
        let result = LedgerConfig::from_json(r#"{"starting_slot": 18446744073709551615}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let config = LedgerConfig::from_json(r#"{"starting_slot": 18446744073709551614}"#).unwrap();
        assert_eq!(config.starting_slot, u64::MAX - 1);
    }

    #[test]
    fn test_from_json_malformed() {
        let result = LedgerConfig::from_json("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
