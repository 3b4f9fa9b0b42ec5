use timelock_common::Address;

use super::deposit::{Deposit, DepositId};
use super::ledger::DepositLedger;
use super::Vault;
use crate::error::{Result, VaultError};

impl DepositLedger {
    pub fn total_deposits_of(&self, recipient: &Address) -> u64 {
        self.recipient(recipient).map_or(0, |index| index.total())
    }

    pub fn total_active_deposits_of(&self, recipient: &Address) -> u64 {
        self.recipient(recipient)
            .map_or(0, |index| index.total_active())
    }

    /// Every id ever deposited for `recipient`, in creation order.
    pub fn all_deposit_ids(&self, recipient: &Address) -> Vec<DepositId> {
        self.recipient(recipient)
            .map(|index| index.all().to_vec())
            .unwrap_or_default()
    }

    /// Ids not yet withdrawn, ascending.
    pub fn active_deposit_ids(&self, recipient: &Address) -> Vec<DepositId> {
        self.recipient(recipient)
            .map(|index| index.active().collect())
            .unwrap_or_default()
    }

    /// A window of `all_deposit_ids(recipient)`.
    ///
    /// Returns at most `length` ids starting at `start`. `start` equal to
    /// the recipient's total yields an empty page; a larger `start` or a
    /// zero `length` is an `InvalidRange`.
    pub fn deposit_ids(
        &self,
        recipient: &Address,
        start: u64,
        length: u64,
    ) -> Result<Vec<DepositId>> {
        let all = self
            .recipient(recipient)
            .map(|index| index.all())
            .unwrap_or(&[]);
        let total = all.len() as u64;
        if length == 0 || start > total {
            return Err(VaultError::InvalidRange {
                start,
                length,
                total,
            });
        }

        let end = start.saturating_add(length).min(total);
        Ok(all[start as usize..end as usize].to_vec())
    }

    /// Looks up each id; ids never assigned come back as `None`.
    pub fn deposits_by_ids(&self, ids: &[DepositId]) -> Vec<Option<Deposit>> {
        ids.iter().map(|&id| self.get(id).cloned()).collect()
    }
}

impl<A, T> Vault<A, T> {
    pub fn total_deposits(&self) -> u64 {
        self.ledger.total_deposits()
    }

    pub fn total_deposits_of(&self, recipient: &Address) -> u64 {
        self.ledger.total_deposits_of(recipient)
    }

    pub fn total_active_deposits_of(&self, recipient: &Address) -> u64 {
        self.ledger.total_active_deposits_of(recipient)
    }

    pub fn all_deposit_ids(&self, recipient: &Address) -> Vec<DepositId> {
        self.ledger.all_deposit_ids(recipient)
    }

    pub fn active_deposit_ids(&self, recipient: &Address) -> Vec<DepositId> {
        self.ledger.active_deposit_ids(recipient)
    }

    pub fn deposit_ids(
        &self,
        recipient: &Address,
        start: u64,
        length: u64,
    ) -> Result<Vec<DepositId>> {
        self.ledger.deposit_ids(recipient, start, length)
    }

    pub fn deposit_by_id(&self, id: DepositId) -> Option<Deposit> {
        self.ledger.get(id).cloned()
    }

    pub fn deposits_by_ids(&self, ids: &[DepositId]) -> Vec<Option<Deposit>> {
        self.ledger.deposits_by_ids(ids)
    }
}
