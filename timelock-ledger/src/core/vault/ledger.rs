use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use timelock_common::Address;
use tracing::{info, warn};

use super::deposit::{Deposit, DepositId};
use super::index::RecipientIndex;
use super::Vault;
use crate::core::asset::{Amount, AssetCustody};
use crate::core::events::VaultEvent;
use crate::core::token::ClaimLedger;
use crate::error::{ClaimTokenError, Result, VaultError};

/// Append-only deposit store plus the per-recipient indexes.
///
/// A deposit's id is its position in `deposits`; records are never removed,
/// so ids stay valid after the deposit is withdrawn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositLedger {
    deposits: Vec<Deposit>,
    recipients: BTreeMap<Address, RecipientIndex>,
}

impl DepositLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of deposits ever created. Also the next id to assign.
    pub fn total_deposits(&self) -> u64 {
        self.deposits.len() as u64
    }

    pub fn get(&self, id: DepositId) -> Option<&Deposit> {
        usize::try_from(id).ok().and_then(|idx| self.deposits.get(idx))
    }

    pub fn recipient(&self, recipient: &Address) -> Option<&RecipientIndex> {
        self.recipients.get(recipient)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deposit> {
        self.deposits.iter()
    }

    /// Sum of the amounts of every active deposit.
    pub fn active_amount(&self) -> Amount {
        self.deposits
            .iter()
            .filter(|d| d.active)
            .map(|d| d.amount)
            .sum()
    }

    pub(crate) fn record(
        &mut self,
        depositor: Address,
        recipient: Address,
        amount: Amount,
        lock_period: u64,
        now: u64,
    ) -> &Deposit {
        let id = self.total_deposits();
        self.recipients
            .entry(recipient.clone())
            .or_default()
            .record(id);
        self.deposits.push(Deposit::new(
            id,
            depositor,
            recipient,
            amount,
            lock_period,
            now,
        ));
        &self.deposits[self.deposits.len() - 1]
    }

    /// Marks `id` withdrawn and drops it from its recipient's active set.
    /// Fails without touching either when the two disagree.
    pub(crate) fn settle(&mut self, id: DepositId) -> Result<()> {
        let deposit = usize::try_from(id)
            .ok()
            .and_then(|idx| self.deposits.get_mut(idx))
            .ok_or_else(|| VaultError::CorruptState(format!("deposit {} does not exist", id)))?;
        if !deposit.active {
            return Err(VaultError::CorruptState(format!(
                "deposit {} is already settled",
                id
            )));
        }

        let index = self.recipients.get_mut(&deposit.recipient).ok_or_else(|| {
            VaultError::CorruptState(format!("deposit {} has no recipient index", id))
        })?;
        if !index.deactivate(id) {
            return Err(VaultError::CorruptState(format!(
                "deposit {} is missing from the active set of {}",
                id, deposit.recipient
            )));
        }

        deposit.active = false;
        Ok(())
    }

    /// Cross-checks records against the indexes.
    ///
    /// Every indexed id must point at a deposit of that recipient, histories
    /// must be strictly increasing, and the index totals must match the
    /// records. Together these make each deposit appear exactly once.
    pub(crate) fn check_consistency(&self) -> std::result::Result<(), String> {
        let mut active_deposits = 0u64;
        for (position, deposit) in self.deposits.iter().enumerate() {
            if deposit.id != position as u64 {
                return Err(format!(
                    "deposit at position {} carries id {}",
                    position, deposit.id
                ));
            }
            if deposit.active {
                active_deposits += 1;
            }
        }

        let mut indexed = 0u64;
        let mut indexed_active = 0u64;
        for (recipient, index) in &self.recipients {
            let mut previous: Option<DepositId> = None;
            for &id in index.all() {
                if previous.is_some_and(|prev| prev >= id) {
                    return Err(format!("history of {} is out of order at {}", recipient, id));
                }
                previous = Some(id);
                match self.get(id) {
                    Some(deposit) if &deposit.recipient == recipient => {}
                    _ => return Err(format!("index of {} references foreign deposit {}", recipient, id)),
                }
            }
            for id in index.active() {
                match self.get(id) {
                    Some(deposit) if &deposit.recipient == recipient && deposit.active => {}
                    _ => {
                        return Err(format!(
                            "active set of {} lists settled or foreign deposit {}",
                            recipient, id
                        ))
                    }
                }
            }
            indexed += index.total();
            indexed_active += index.total_active();
        }

        if indexed != self.total_deposits() {
            return Err(format!(
                "indexes list {} deposits but the ledger holds {}",
                indexed,
                self.total_deposits()
            ));
        }
        if indexed_active != active_deposits {
            return Err(format!(
                "indexes list {} active deposits but {} are flagged active",
                indexed_active, active_deposits
            ));
        }
        Ok(())
    }
}

impl<A: AssetCustody, T: ClaimLedger> Vault<A, T> {
    /// Locks `amount` of the asset pulled from `depositor` for `recipient`
    /// and mints the matching claim. Returns the new deposit id.
    pub fn deposit(
        &mut self,
        depositor: &Address,
        recipient: &Address,
        amount: Amount,
        now: u64,
    ) -> Result<DepositId> {
        if amount == 0 {
            warn!(%depositor, %recipient, "Rejected deposit with zero amount");
            return Err(VaultError::InvalidAmount);
        }
        if recipient.is_zero() {
            warn!(%depositor, "Rejected deposit for the zero address");
            return Err(VaultError::InvalidRecipient);
        }
        if self.claims.total_supply().checked_add(amount).is_none() {
            return Err(ClaimTokenError::SupplyOverflow.into());
        }

        // Funds move first: a failed pull leaves the ledger untouched.
        self.custody.pull(depositor, amount)?;

        let lock_period = self.config.lock_period;
        let deposit = self
            .ledger
            .record(depositor.clone(), recipient.clone(), amount, lock_period, now)
            .clone();

        self.claims.mint(recipient, amount)?;

        self.events.push(VaultEvent::Transfer {
            from: Address::zero(),
            to: recipient.clone(),
            amount,
        });
        self.events.push(VaultEvent::Deposit {
            id: deposit.id,
            depositor: deposit.depositor.clone(),
            recipient: deposit.recipient.clone(),
            amount,
            lock_period,
            redeem_timestamp: deposit.redeem_timestamp,
        });

        info!(
            id = deposit.id,
            %depositor,
            %recipient,
            amount,
            redeem_timestamp = deposit.redeem_timestamp,
            "Deposit created"
        );
        Ok(deposit.id)
    }
}
