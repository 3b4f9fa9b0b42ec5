use serde::{Deserialize, Serialize};
use timelock_common::Address;

use crate::core::asset::Amount;
use crate::core::vault::DepositId;

/// Notifications emitted by vault operations, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaultEvent {
    Deposit {
        id: DepositId,
        depositor: Address,
        recipient: Address,
        amount: Amount,
        lock_period: u64,
        redeem_timestamp: u64,
    },
    Withdrawal {
        id: DepositId,
        recipient: Address,
        destination: Address,
        amount: Amount,
        matured: bool,
    },
    /// Claim token movement. `from` is the zero address on mint and `to`
    /// is the zero address on burn.
    Transfer {
        from: Address,
        to: Address,
        amount: Amount,
    },
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<VaultEvent>,
}

impl EventLog {
    pub fn push(&mut self, event: VaultEvent) {
        self.events.push(event);
    }

    pub fn as_slice(&self) -> &[VaultEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<VaultEvent> {
        std::mem::take(&mut self.events)
    }
}
