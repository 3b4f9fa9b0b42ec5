use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::asset::AssetDefinition;
use crate::core::token::TokenMetadata;
use crate::error::{Result, VaultError};

/// One week, in seconds.
pub const DEFAULT_LOCK_PERIOD: u64 = 604_800;

/// Vault settings. `name`, `symbol` and `decimals` describe the claim
/// token; `asset` is the single asset held in custody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub asset: AssetDefinition,
    /// Seconds a new deposit stays locked.
    pub lock_period: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            name: "Time-Lock Vault".to_string(),
            symbol: "VAULT".to_string(),
            decimals: 18,
            asset: AssetDefinition::default(),
            lock_period: DEFAULT_LOCK_PERIOD,
        }
    }
}

impl VaultConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(VaultError::InvalidConfig("Name cannot be empty".to_string()));
        }
        if self.symbol.trim().is_empty() {
            return Err(VaultError::InvalidConfig("Symbol cannot be empty".to_string()));
        }
        if self.lock_period == 0 {
            return Err(VaultError::InvalidConfig(
                "Lock period must be greater than zero".to_string(),
            ));
        }
        self.asset.validate().map_err(VaultError::InvalidConfig)
    }

    /// Metadata for the claim token minted against deposits.
    pub fn token_metadata(&self) -> TokenMetadata {
        TokenMetadata {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
            underlying: self.asset.id(),
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let parsed = serde_json::from_str::<VaultConfig>(&data)?;
        parsed.validate()?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = VaultConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lock_period, 604_800);

        let metadata = config.token_metadata();
        assert_eq!(metadata.symbol, "VAULT");
        assert_eq!(metadata.underlying, "mint/MOCK");
    }

    #[test]
    fn test_validate_rejects_zero_lock_period_and_blank_names() {
        let mut config = VaultConfig {
            lock_period: 0,
            ..VaultConfig::default()
        };
        assert!(matches!(config.validate(), Err(VaultError::InvalidConfig(_))));

        config.lock_period = 60;
        config.symbol = "  ".to_string();
        assert!(config.validate().is_err());

        config.symbol = "VAULT".to_string();
        config.asset.issuer = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault-config.json");
        let config = VaultConfig {
            lock_period: 3_600,
            ..VaultConfig::default()
        };

        config.save_to_file(&path).unwrap();
        assert_eq!(VaultConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"name":"x"}"#).unwrap();

        assert!(matches!(
            VaultConfig::load_from_file(&path),
            Err(VaultError::Serialization(_))
        ));
    }
}
