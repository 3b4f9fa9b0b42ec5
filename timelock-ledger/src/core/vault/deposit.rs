use serde::{Deserialize, Serialize};
use timelock_common::Address;

use crate::core::asset::Amount;

/// Sequential deposit identifier. Assigned from zero and never reused.
pub type DepositId = u64;

/// A locked deposit.
///
/// Every field is fixed at creation except `active`, which flips to `false`
/// exactly once when the deposit is withdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: DepositId,
    pub depositor: Address,
    pub recipient: Address,
    pub amount: Amount,
    /// Lock period in effect when the deposit was made, in seconds.
    pub lock_period: u64,
    /// Absolute maturity instant (creation time + `lock_period`).
    pub redeem_timestamp: u64,
    pub active: bool,
}

impl Deposit {
    pub(crate) fn new(
        id: DepositId,
        depositor: Address,
        recipient: Address,
        amount: Amount,
        lock_period: u64,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            depositor,
            recipient,
            amount,
            lock_period,
            redeem_timestamp: created_at.saturating_add(lock_period),
            active: true,
        }
    }

    pub fn is_matured(&self, now: u64) -> bool {
        now >= self.redeem_timestamp
    }

    /// Ownership and liveness in one check: only the recipient may redeem,
    /// and only while the deposit is still active.
    pub fn is_redeemable_by(&self, caller: &Address) -> bool {
        self.active && &self.recipient == caller
    }

    /// Seconds left until maturity, zero once matured.
    pub fn time_remaining(&self, now: u64) -> u64 {
        self.redeem_timestamp.saturating_sub(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maturity_boundary_is_inclusive() {
        let deposit = Deposit::new(
            0,
            Address::new("depositor").unwrap(),
            Address::new("recipient").unwrap(),
            5_000,
            604_800,
            1_000,
        );

        assert_eq!(deposit.redeem_timestamp, 605_800);
        assert!(!deposit.is_matured(605_799));
        assert!(deposit.is_matured(605_800));
        assert_eq!(deposit.time_remaining(605_000), 800);
        assert_eq!(deposit.time_remaining(700_000), 0);
    }

    #[test]
    fn test_redeemable_only_by_recipient_while_active() {
        let recipient = Address::new("recipient").unwrap();
        let mut deposit = Deposit::new(3, Address::new("d").unwrap(), recipient.clone(), 1, 0, 0);

        assert!(deposit.is_redeemable_by(&recipient));
        assert!(!deposit.is_redeemable_by(&Address::new("mallory").unwrap()));

        deposit.active = false;
        assert!(!deposit.is_redeemable_by(&recipient));
    }

    #[test]
    fn test_redeem_timestamp_saturates() {
        let deposit = Deposit::new(
            0,
            Address::new("d").unwrap(),
            Address::new("r").unwrap(),
            1,
            u64::MAX,
            10,
        );
        assert_eq!(deposit.redeem_timestamp, u64::MAX);
    }
}
