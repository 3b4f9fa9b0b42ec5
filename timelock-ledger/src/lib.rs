//! Time-lock custody vault.
//!
//! Depositors lock an amount of a single asset for a recipient. The
//! recipient receives an equal amount of a non-transferable claim token and
//! can redeem the asset once the lock period has passed. The crate is split
//! into:
//!
//! - [`core::vault`]: the deposit ledger, withdrawal engine and queries,
//!   operating on a synchronous [`Vault`].
//! - [`core::asset`] and [`core::token`]: the custody and claim token
//!   collaborators, behind the [`AssetCustody`] and [`ClaimLedger`] traits.
//! - [`core::runtime::snapshot`]: JSON persistence.
//! - [`TimeLockVault`]: a shareable async handle that serialises writers and
//!   reads the time from a [`Clock`].

pub mod config;
pub mod core;
pub mod error;

use std::sync::Arc;

use timelock_common::{Address, Clock};
use tokio::sync::RwLock;

pub use crate::config::VaultConfig;
pub use crate::core::asset::{Amount, AssetBook, AssetCustody, AssetDefinition};
pub use crate::core::events::VaultEvent;
pub use crate::core::runtime::snapshot::SnapshotStore;
pub use crate::core::token::{ClaimLedger, ClaimToken, TokenMetadata};
pub use crate::core::vault::{
    Deposit, DepositId, Vault, WithdrawalPreview, WithdrawalReceipt, WithdrawalTerms,
};
pub use crate::error::{ClaimTokenError, CustodyError, Result, VaultError};

/// Async handle over a [`Vault`].
///
/// Every mutating call holds the write lock for its whole duration and reads
/// the clock only once the lock is held, so operations apply one at a time
/// in clock order. Queries share the read lock and see a consistent state.
#[derive(Debug, Clone)]
pub struct TimeLockVault {
    state: Arc<RwLock<Vault>>,
    clock: Arc<dyn Clock>,
}

impl TimeLockVault {
    pub fn new(config: VaultConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        Ok(Self::from_vault(Vault::new(config)?, clock))
    }

    pub fn from_vault(vault: Vault, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RwLock::new(vault)),
            clock,
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub async fn fund(&self, holder: &Address, amount: Amount) -> Result<Amount> {
        let mut vault = self.state.write().await;
        vault.fund(holder, amount)
    }

    pub async fn deposit(
        &self,
        depositor: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> Result<DepositId> {
        let mut vault = self.state.write().await;
        let now = self.clock.now();
        vault.deposit(depositor, recipient, amount, now)
    }

    pub async fn withdraw(&self, caller: &Address, id: DepositId) -> Result<WithdrawalReceipt> {
        let mut vault = self.state.write().await;
        let now = self.clock.now();
        vault.withdraw(caller, id, now)
    }

    pub async fn batch_withdraw(
        &self,
        caller: &Address,
        ids: &[DepositId],
    ) -> Result<Vec<WithdrawalReceipt>> {
        let mut vault = self.state.write().await;
        let now = self.clock.now();
        vault.batch_withdraw(caller, ids, now)
    }

    pub async fn premature_withdraw(
        &self,
        recipient: &Address,
        destination: &Address,
        id: DepositId,
    ) -> Result<WithdrawalReceipt> {
        let mut vault = self.state.write().await;
        let now = self.clock.now();
        vault.premature_withdraw(recipient, destination, id, now)
    }

    pub async fn preview_withdraw(
        &self,
        recipient: &Address,
        ids: &[DepositId],
    ) -> WithdrawalPreview {
        let vault = self.state.read().await;
        vault.preview_withdraw(recipient, ids, self.clock.now())
    }

    pub async fn set_lock_period(&self, lock_period: u64) -> Result<()> {
        self.state.write().await.set_lock_period(lock_period)
    }

    pub async fn lock_period(&self) -> u64 {
        self.state.read().await.lock_period()
    }

    pub async fn total_deposits(&self) -> u64 {
        self.state.read().await.total_deposits()
    }

    pub async fn total_deposits_of(&self, recipient: &Address) -> u64 {
        self.state.read().await.total_deposits_of(recipient)
    }

    pub async fn total_active_deposits_of(&self, recipient: &Address) -> u64 {
        self.state.read().await.total_active_deposits_of(recipient)
    }

    pub async fn all_deposit_ids(&self, recipient: &Address) -> Vec<DepositId> {
        self.state.read().await.all_deposit_ids(recipient)
    }

    pub async fn active_deposit_ids(&self, recipient: &Address) -> Vec<DepositId> {
        self.state.read().await.active_deposit_ids(recipient)
    }

    pub async fn deposit_ids(
        &self,
        recipient: &Address,
        start: u64,
        length: u64,
    ) -> Result<Vec<DepositId>> {
        self.state.read().await.deposit_ids(recipient, start, length)
    }

    pub async fn deposit_by_id(&self, id: DepositId) -> Option<Deposit> {
        self.state.read().await.deposit_by_id(id)
    }

    pub async fn deposits_by_ids(&self, ids: &[DepositId]) -> Vec<Option<Deposit>> {
        self.state.read().await.deposits_by_ids(ids)
    }

    pub async fn total_asset(&self) -> Amount {
        self.state.read().await.total_asset()
    }

    pub async fn asset_balance_of(&self, holder: &Address) -> Amount {
        self.state.read().await.asset_balance_of(holder)
    }

    pub async fn claim_balance_of(&self, holder: &Address) -> Amount {
        self.state.read().await.claim_balance_of(holder)
    }

    pub async fn drain_events(&self) -> Vec<VaultEvent> {
        self.state.write().await.drain_events()
    }

    /// Clone of the current state, e.g. for persisting.
    pub async fn snapshot(&self) -> Vault {
        self.state.read().await.clone()
    }

    pub async fn save(&self, store: &SnapshotStore) -> Result<()> {
        let vault = self.state.read().await;
        store.save(&vault).await
    }
}
