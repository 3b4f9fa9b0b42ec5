use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::core::vault::Vault;
use crate::error::Result;

const SNAPSHOT_FILE: &str = "vault.json";

/// Whole-state JSON persistence for a [`Vault`].
///
/// The file is rewritten on every save. Events are not persisted.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Opens (and creates if needed) `data_dir`.
    pub async fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir).await?;
        Ok(Self {
            path: dir.join(SNAPSHOT_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Reads the snapshot. A missing file is `Ok(None)`; a snapshot that
    /// fails the ledger invariants is rejected.
    pub async fn load(&self) -> Result<Option<Vault>> {
        if !self.exists().await {
            warn!("Snapshot not found at: {:?}", self.path);
            return Ok(None);
        }

        let content = fs::read(&self.path).await?;
        let vault: Vault = serde_json::from_slice(&content)?;
        vault.verify()?;

        info!(
            path = ?self.path,
            deposits = vault.total_deposits(),
            "Snapshot loaded"
        );
        Ok(Some(vault))
    }

    /// Writes to a sibling temp file, then renames it over the snapshot.
    pub async fn save(&self, vault: &Vault) -> Result<()> {
        let data = serde_json::to_vec_pretty(vault)?;
        let tmp = self.path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp, &self.path).await?;
        info!(
            path = ?self.path,
            bytes = data.len(),
            deposits = vault.total_deposits(),
            "Snapshot saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VaultConfig;
    use crate::error::VaultError;
    use timelock_common::Address;

    fn addr(s: &str) -> Address {
        Address::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_missing_snapshot_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("nested")).await.unwrap();

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).await.unwrap();

        let mut vault = Vault::new(VaultConfig::default()).unwrap();
        let depositor = addr("depositor");
        let recipient = addr("recipient");
        vault.fund(&depositor, 1_000).unwrap();
        vault.deposit(&depositor, &recipient, 400, 10).unwrap();
        vault.deposit(&depositor, &recipient, 600, 20).unwrap();
        vault.withdraw(&recipient, 0, 10 + 604_800).unwrap();

        store.save(&vault).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded.ledger(), vault.ledger());
        assert_eq!(loaded.active_deposit_ids(&recipient), vec![1]);
        assert_eq!(loaded.claim_balance_of(&recipient), 600);
        assert_eq!(loaded.asset_balance_of(&recipient), 400);
        assert_eq!(loaded.total_asset(), 600);
        assert!(loaded.events().is_empty());
        assert!(!dir.path().join("vault.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_rejects_inconsistent_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).await.unwrap();

        let mut vault = Vault::new(VaultConfig::default()).unwrap();
        let depositor = addr("depositor");
        vault.fund(&depositor, 100).unwrap();
        vault.deposit(&depositor, &addr("r"), 100, 0).unwrap();
        store.save(&vault).await.unwrap();

        // Forge a snapshot whose custody no longer covers the deposit.
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let mut json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        json["custody"]["custody"] = serde_json::json!(0);
        std::fs::write(store.path(), json.to_string()).unwrap();

        assert!(matches!(
            store.load().await,
            Err(VaultError::CorruptState(_))
        ));
    }
}
