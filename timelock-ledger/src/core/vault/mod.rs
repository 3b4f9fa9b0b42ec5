//! The deposit ledger, withdrawal engine and query service.
//!
//! [`Vault`] owns all mutable state: the deposit store, the two external
//! collaborators (asset custody and claim token) and the event log. Every
//! operation takes `now` explicitly so maturity is decided by the caller's
//! clock.

pub mod deposit;
pub mod index;
pub mod ledger;
pub mod query;
pub mod withdrawal;

use serde::{Deserialize, Serialize};
use timelock_common::Address;
use tracing::info;

pub use deposit::{Deposit, DepositId};
pub use index::RecipientIndex;
pub use ledger::DepositLedger;
pub use withdrawal::{WithdrawalPreview, WithdrawalReceipt, WithdrawalTerms};

use crate::config::VaultConfig;
use crate::core::asset::{Amount, AssetBook, AssetCustody, AssetDefinition};
use crate::core::events::{EventLog, VaultEvent};
use crate::core::token::{ClaimLedger, ClaimToken};
use crate::error::{Result, VaultError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vault<A = AssetBook, T = ClaimToken> {
    config: VaultConfig,
    ledger: DepositLedger,
    custody: A,
    claims: T,
    #[serde(skip)]
    events: EventLog,
}

impl Vault<AssetBook, ClaimToken> {
    /// Builds a vault backed by the in-process asset book and claim token.
    pub fn new(config: VaultConfig) -> Result<Self> {
        let custody = AssetBook::default();
        let claims = ClaimToken::new(config.token_metadata());
        Self::with_collaborators(config, custody, claims)
    }

    /// Credits `holder` with fresh asset units outside of custody.
    pub fn fund(&mut self, holder: &Address, amount: Amount) -> Result<Amount> {
        let balance = self.custody.credit(holder, amount)?;
        info!(%holder, amount, balance, "Funded holder");
        Ok(balance)
    }

    pub fn asset_balance_of(&self, holder: &Address) -> Amount {
        self.custody.balance_of(holder)
    }
}

impl<A: AssetCustody, T: ClaimLedger> Vault<A, T> {
    pub fn with_collaborators(config: VaultConfig, custody: A, claims: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ledger: DepositLedger::new(),
            custody,
            claims,
            events: EventLog::default(),
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Lock period applied to deposits made from now on.
    pub fn lock_period(&self) -> u64 {
        self.config.lock_period
    }

    /// Changes the lock period for future deposits. Existing deposits keep
    /// the period and maturity they were created with.
    pub fn set_lock_period(&mut self, lock_period: u64) -> Result<()> {
        if lock_period == 0 {
            return Err(VaultError::InvalidConfig(
                "Lock period must be greater than zero".to_string(),
            ));
        }
        info!(old = self.config.lock_period, new = lock_period, "Lock period updated");
        self.config.lock_period = lock_period;
        Ok(())
    }

    /// The asset held in custody.
    pub fn asset(&self) -> &AssetDefinition {
        &self.config.asset
    }

    /// Amount of asset currently in custody.
    pub fn total_asset(&self) -> Amount {
        self.custody.custody_balance()
    }

    pub fn claim_balance_of(&self, holder: &Address) -> Amount {
        self.claims.balance_of(holder)
    }

    pub fn claim_total_supply(&self) -> Amount {
        self.claims.total_supply()
    }

    pub fn ledger(&self) -> &DepositLedger {
        &self.ledger
    }

    pub fn claims(&self) -> &T {
        &self.claims
    }

    pub fn claims_mut(&mut self) -> &mut T {
        &mut self.claims
    }

    pub fn events(&self) -> &[VaultEvent] {
        self.events.as_slice()
    }

    pub fn drain_events(&mut self) -> Vec<VaultEvent> {
        self.events.drain()
    }

    /// Checks the ledger invariants: index consistency, and custody and
    /// claim supply both equal to the sum of active deposits.
    pub fn verify(&self) -> Result<()> {
        self.ledger
            .check_consistency()
            .map_err(VaultError::CorruptState)?;

        let locked = self.ledger.active_amount();
        if self.custody.custody_balance() != locked {
            return Err(VaultError::CorruptState(format!(
                "custody holds {} but active deposits total {}",
                self.custody.custody_balance(),
                locked
            )));
        }
        if self.claims.total_supply() != locked {
            return Err(VaultError::CorruptState(format!(
                "claim supply is {} but active deposits total {}",
                self.claims.total_supply(),
                locked
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK: u64 = 3600 * 24 * 7;

    fn addr(s: &str) -> Address {
        Address::new(s).unwrap()
    }

    fn vault() -> Vault {
        Vault::new(VaultConfig::default()).unwrap()
    }

    #[test]
    fn test_new_vault_is_empty_and_consistent() {
        let vault = vault();
        assert_eq!(vault.lock_period(), WEEK);
        assert_eq!(vault.total_asset(), 0);
        assert_eq!(vault.asset(), &AssetDefinition::default());
        assert_eq!(
            vault.claims().metadata(),
            &VaultConfig::default().token_metadata()
        );
        assert!(vault.events().is_empty());
        assert!(vault.verify().is_ok());
    }

    #[test]
    fn test_deposit_mints_claim_and_locks_asset() {
        let mut vault = vault();
        let depositor = addr("depositor");
        let recipient = addr("recipient");
        vault.fund(&depositor, 5_000).unwrap();

        let id = vault.deposit(&depositor, &recipient, 5_000, 1_000).unwrap();

        assert_eq!(id, 0);
        assert_eq!(vault.asset_balance_of(&depositor), 0);
        assert_eq!(vault.total_asset(), 5_000);
        assert_eq!(vault.claim_balance_of(&recipient), 5_000);
        assert_eq!(
            vault.events(),
            &[
                VaultEvent::Transfer {
                    from: Address::zero(),
                    to: recipient.clone(),
                    amount: 5_000
                },
                VaultEvent::Deposit {
                    id: 0,
                    depositor: depositor.clone(),
                    recipient: recipient.clone(),
                    amount: 5_000,
                    lock_period: WEEK,
                    redeem_timestamp: 1_000 + WEEK,
                },
            ]
        );
        assert!(vault.verify().is_ok());
    }

    #[test]
    fn test_deposit_rejects_bad_parameters_without_side_effects() {
        let mut vault = vault();
        let depositor = addr("depositor");
        vault.fund(&depositor, 100).unwrap();

        assert!(matches!(
            vault.deposit(&depositor, &addr("r"), 0, 0),
            Err(VaultError::InvalidAmount)
        ));
        assert!(matches!(
            vault.deposit(&depositor, &Address::zero(), 100, 0),
            Err(VaultError::InvalidRecipient)
        ));
        assert!(matches!(
            vault.deposit(&depositor, &addr("r"), 101, 0),
            Err(VaultError::Custody(_))
        ));

        assert_eq!(vault.ledger().total_deposits(), 0);
        assert_eq!(vault.asset_balance_of(&depositor), 100);
        assert_eq!(vault.claim_total_supply(), 0);
        assert!(vault.events().is_empty());
    }

    #[test]
    fn test_lock_period_change_is_not_retroactive() {
        let mut vault = vault();
        let depositor = addr("depositor");
        let recipient = addr("recipient");
        vault.fund(&depositor, 200).unwrap();

        vault.deposit(&depositor, &recipient, 100, 0).unwrap();
        vault.set_lock_period(60).unwrap();
        vault.deposit(&depositor, &recipient, 100, 0).unwrap();

        let first = vault.ledger().get(0).unwrap();
        let second = vault.ledger().get(1).unwrap();
        assert_eq!((first.lock_period, first.redeem_timestamp), (WEEK, WEEK));
        assert_eq!((second.lock_period, second.redeem_timestamp), (60, 60));

        assert!(vault.set_lock_period(0).is_err());
        assert_eq!(vault.lock_period(), 60);
    }

    #[test]
    fn test_drain_events_clears_log() {
        let mut vault = vault();
        let depositor = addr("depositor");
        vault.fund(&depositor, 10).unwrap();
        vault.deposit(&depositor, &addr("r"), 10, 0).unwrap();

        assert_eq!(vault.drain_events().len(), 2);
        assert!(vault.events().is_empty());
    }

    #[test]
    fn test_claim_token_cannot_be_moved_by_holder() {
        let mut vault = vault();
        let depositor = addr("depositor");
        let recipient = addr("recipient");
        let other = addr("other");
        vault.fund(&depositor, 5_000).unwrap();
        vault.deposit(&depositor, &recipient, 5_000, 0).unwrap();

        let err = vault
            .claims_mut()
            .transfer(&recipient, &other, 5_000)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::ClaimTokenError::InvalidTransfer { amount: 5_000, .. }
        ));
        assert_eq!(vault.claim_balance_of(&recipient), 5_000);
        assert_eq!(vault.claim_balance_of(&other), 0);
    }
}
