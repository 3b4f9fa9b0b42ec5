use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use timelock_common::Address;
use tracing::warn;

use crate::core::asset::Amount;
use crate::error::ClaimTokenError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Id of the asset the claim redeems into (see `AssetDefinition::id`).
    pub underlying: String,
}

/// Mint/burn accounting for claim tokens.
///
/// The vault mints on deposit and burns on withdrawal; it never moves
/// claims between holders.
pub trait ClaimLedger {
    fn mint(&mut self, holder: &Address, amount: Amount) -> Result<(), ClaimTokenError>;

    fn burn(&mut self, holder: &Address, amount: Amount) -> Result<(), ClaimTokenError>;

    fn balance_of(&self, holder: &Address) -> Amount;

    fn total_supply(&self) -> Amount;
}

/// Non-transferable claim token issued 1:1 against locked deposits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimToken {
    metadata: TokenMetadata,
    balances: BTreeMap<Address, Amount>,
    total_supply: Amount,
}

impl ClaimToken {
    pub fn new(metadata: TokenMetadata) -> Self {
        Self {
            metadata,
            balances: BTreeMap::new(),
            total_supply: 0,
        }
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Always fails: claims stay with the recipient they were minted to.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), ClaimTokenError> {
        warn!(%from, %to, amount, "Rejected claim token transfer");
        Err(ClaimTokenError::InvalidTransfer {
            from: from.clone(),
            to: to.clone(),
            amount,
        })
    }
}

impl ClaimLedger for ClaimToken {
    fn mint(&mut self, holder: &Address, amount: Amount) -> Result<(), ClaimTokenError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(ClaimTokenError::SupplyOverflow)?;

        // A holder balance never exceeds total supply, so this cannot overflow.
        *self.balances.entry(holder.clone()).or_insert(0) += amount;
        self.total_supply = supply;
        Ok(())
    }

    fn burn(&mut self, holder: &Address, amount: Amount) -> Result<(), ClaimTokenError> {
        let balance = self.balance_of(holder);
        if balance < amount {
            return Err(ClaimTokenError::InsufficientBalance {
                holder: holder.clone(),
                balance,
                requested: amount,
            });
        }

        let remaining = balance - amount;
        if remaining == 0 {
            self.balances.remove(holder);
        } else {
            self.balances.insert(holder.clone(), remaining);
        }
        self.total_supply -= amount;
        Ok(())
    }

    fn balance_of(&self, holder: &Address) -> Amount {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }
}
