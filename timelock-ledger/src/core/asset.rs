use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use timelock_common::Address;

use crate::error::CustodyError;

/// Asset-denominated quantity.
pub type Amount = u128;

/// Describes the single fungible asset a vault holds in custody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDefinition {
    /// Who issued this asset (the mint authority).
    pub issuer: String,

    /// Human readable name ("United States Dollar", "Mock ERC20")
    pub name: String,

    /// Ticker Symbol ("USD", "MOCK")
    pub symbol: String,

    /// Precision
    pub decimals: u8,
}

impl AssetDefinition {
    pub fn new(issuer: String, name: String, symbol: String, decimals: u8) -> Self {
        Self {
            issuer,
            name,
            symbol,
            decimals,
        }
    }

    /// Returns the unique namespaced identifier: `issuer/symbol`
    pub fn id(&self) -> String {
        format!("{}/{}", self.issuer, self.symbol)
    }

    /// strict validation of parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.issuer.trim().is_empty() {
            return Err("Issuer cannot be empty".to_string());
        }
        if self.symbol.trim().is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("Name cannot be empty".to_string());
        }
        if self.symbol.len() > 10 {
            return Err("Symbol is too long".to_string());
        }
        Ok(())
    }
}

impl Default for AssetDefinition {
    fn default() -> Self {
        Self::new(
            "mint".to_string(),
            "Mock ERC20".to_string(),
            "MOCK".to_string(),
            18,
        )
    }
}

/// Moves the underlying asset in and out of vault custody.
///
/// Each call must either move the full amount or fail without touching any
/// balance.
pub trait AssetCustody {
    /// Moves `amount` from `from` into custody.
    fn pull(&mut self, from: &Address, amount: Amount) -> Result<(), CustodyError>;

    /// Moves `amount` out of custody to `to`.
    fn push(&mut self, to: &Address, amount: Amount) -> Result<(), CustodyError>;

    /// Total amount currently held in custody.
    fn custody_balance(&self) -> Amount;
}

/// In-process asset book: holder balances plus the vault's custody account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetBook {
    balances: BTreeMap<Address, Amount>,
    custody: Amount,
}

impl AssetBook {
    /// Issues fresh units to `holder` outside of custody (faucet).
    pub fn credit(&mut self, holder: &Address, amount: Amount) -> Result<Amount, CustodyError> {
        if holder.is_zero() {
            return Err(CustodyError::InvalidHolder(holder.clone()));
        }
        let balance = self.balances.entry(holder.clone()).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(CustodyError::Overflow)?;
        Ok(*balance)
    }

    pub fn balance_of(&self, holder: &Address) -> Amount {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    /// Sum of every holder balance, custody excluded.
    pub fn circulating(&self) -> Amount {
        self.balances.values().sum()
    }
}

impl AssetCustody for AssetBook {
    fn pull(&mut self, from: &Address, amount: Amount) -> Result<(), CustodyError> {
        if from.is_zero() {
            return Err(CustodyError::InvalidHolder(from.clone()));
        }
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(CustodyError::InsufficientFunds {
                holder: from.clone(),
                balance,
                requested: amount,
            });
        }
        let custody = self.custody.checked_add(amount).ok_or(CustodyError::Overflow)?;

        self.balances.insert(from.clone(), balance - amount);
        self.custody = custody;
        Ok(())
    }

    fn push(&mut self, to: &Address, amount: Amount) -> Result<(), CustodyError> {
        if to.is_zero() {
            return Err(CustodyError::InvalidHolder(to.clone()));
        }
        if self.custody < amount {
            return Err(CustodyError::InsufficientFunds {
                holder: Address::zero(),
                balance: self.custody,
                requested: amount,
            });
        }
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;

        self.custody -= amount;
        self.balances.insert(to.clone(), balance);
        Ok(())
    }

    fn custody_balance(&self) -> Amount {
        self.custody
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s).unwrap()
    }

    #[test]
    fn test_asset_definition_validation() {
        assert!(AssetDefinition::default().validate().is_ok());
        assert_eq!(AssetDefinition::default().id(), "mint/MOCK");

        let mut asset = AssetDefinition::default();
        asset.symbol = "WAY_TOO_LONG_SYMBOL".to_string();
        assert_eq!(asset.validate(), Err("Symbol is too long".to_string()));

        asset.symbol = " ".to_string();
        assert_eq!(asset.validate(), Err("Symbol cannot be empty".to_string()));
    }

    #[test]
    fn test_pull_and_push_move_through_custody() {
        let mut book = AssetBook::default();
        let alice = addr("alice");
        let bob = addr("bob");

        book.credit(&alice, 5_000).unwrap();
        book.pull(&alice, 3_000).unwrap();
        assert_eq!(book.balance_of(&alice), 2_000);
        assert_eq!(book.custody_balance(), 3_000);

        book.push(&bob, 1_000).unwrap();
        assert_eq!(book.balance_of(&bob), 1_000);
        assert_eq!(book.custody_balance(), 2_000);
        assert_eq!(book.circulating() + book.custody_balance(), 5_000);
    }

    #[test]
    fn test_failed_moves_leave_balances_untouched() {
        let mut book = AssetBook::default();
        let alice = addr("alice");
        book.credit(&alice, 100).unwrap();

        let err = book.pull(&alice, 101).unwrap_err();
        assert_eq!(
            err,
            CustodyError::InsufficientFunds {
                holder: alice.clone(),
                balance: 100,
                requested: 101
            }
        );
        assert_eq!(book.balance_of(&alice), 100);
        assert_eq!(book.custody_balance(), 0);

        assert!(book.push(&alice, 1).is_err());
        assert!(matches!(
            book.push(&Address::zero(), 0),
            Err(CustodyError::InvalidHolder(_))
        ));
        assert!(book.credit(&Address::zero(), 1).is_err());
    }
}
